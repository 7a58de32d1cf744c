use crate::model::{ExternalRecord, NormalizedImport, SourceKind};

/// Highest numbered ingredient/measure slot exposed by the recipe APIs.
pub const MAX_INGREDIENT_SLOTS: usize = 20;

const UNKNOWN_TITLE: &str = "Unknown";
const NO_INSTRUCTIONS: &str = "No instructions.";
const DEFAULT_SERVINGS: &str = "2";

/// Map a raw meal or drink record onto the canonical import shape.
///
/// Never fails: missing or malformed fields fall back to defaults.
pub fn normalize(record: &ExternalRecord, kind: SourceKind) -> NormalizedImport {
    let title = record
        .get(kind.title_field())
        .unwrap_or(UNKNOWN_TITLE)
        .to_string();

    let instructions = match record.get("strInstructions") {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NO_INSTRUCTIONS.to_string(),
    };

    NormalizedImport {
        title,
        ingredients: ingredient_lines(record).join("\n"),
        instructions,
        servings: Some(DEFAULT_SERVINGS.to_string()),
        image: record.get(kind.thumbnail_field()).map(String::from),
    }
}

/// "<measure> <ingredient>" for every filled slot, in slot order.
fn ingredient_lines(record: &ExternalRecord) -> Vec<String> {
    (1..=MAX_INGREDIENT_SLOTS)
        .filter_map(|i| {
            let ingredient = record.get(&format!("strIngredient{i}"))?;
            if ingredient.trim().is_empty() {
                return None;
            }
            let measure = record.get(&format!("strMeasure{i}")).unwrap_or("");
            Some(format!("{measure} {ingredient}").trim().to_string())
        })
        .collect()
}
