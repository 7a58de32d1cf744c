use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Image reference stored on seed recipes whose artwork has not been filled in yet.
pub const PLACEHOLDER_IMAGE: &str = "RecipePlaceholder";

/// Namespace tag for keys derived from imported records.
pub const IMPORT_KEY_PREFIX: &str = "ninja:";

/// Category filter that disables the category predicate.
pub const FILTER_ALL: &str = "All";

/// Category filter that selects favorites instead of a literal category.
pub const FILTER_FAVORITES: &str = "Favorites";

/// Filters offered by the recipe list, in display order.
pub const CATEGORY_FILTERS: [&str; 10] = [
    FILTER_ALL,
    "Dinner",
    "Breakfast",
    "Lunch",
    "Salad",
    "Street Food",
    "Sides",
    "Drinks",
    "Appetizers",
    FILTER_FAVORITES,
];

/// A recipe as held by the local store.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub category: Option<String>,
    /// Newline-delimited ingredient lines
    pub ingredients: Option<String>,
    /// Newline-delimited instruction lines
    pub steps: Option<String>,
    /// Bundled asset name or remote URL
    pub image_reference: Option<String>,
    pub difficulty: Option<String>,
    pub duration_minutes: u32,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub last_cooked_at: Option<DateTime<Utc>>,
}

impl Recipe {
    pub fn ingredients_list(&self) -> Vec<String> {
        split_lines(self.ingredients.as_deref())
    }

    pub fn steps_list(&self) -> Vec<String> {
        split_lines(self.steps.as_deref())
    }
}

fn split_lines(text: Option<&str>) -> Vec<String> {
    text.unwrap_or_default()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Which remote directory a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Meal,
    Drink,
}

impl SourceKind {
    /// Key of the record array in the API envelope
    pub fn envelope_key(&self) -> &'static str {
        match self {
            SourceKind::Meal => "meals",
            SourceKind::Drink => "drinks",
        }
    }

    pub fn id_field(&self) -> &'static str {
        match self {
            SourceKind::Meal => "idMeal",
            SourceKind::Drink => "idDrink",
        }
    }

    pub fn title_field(&self) -> &'static str {
        match self {
            SourceKind::Meal => "strMeal",
            SourceKind::Drink => "strDrink",
        }
    }

    pub fn thumbnail_field(&self) -> &'static str {
        match self {
            SourceKind::Meal => "strMealThumb",
            SourceKind::Drink => "strDrinkThumb",
        }
    }
}

/// A loosely-typed record returned by a remote source.
///
/// Values that are not JSON strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalRecord {
    fields: HashMap<String, Option<String>>,
}

impl ExternalRecord {
    pub fn from_json(object: Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => Some(s),
                    _ => None,
                };
                (key, value)
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        self.fields.insert(field.into(), value);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExternalRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())))
            .collect();
        Self { fields }
    }
}

/// Canonical shape of an imported recipe, shared by online results and the
/// bundled sample asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedImport {
    pub title: String,
    /// Pipe- or newline-delimited "<measure> <ingredient>" entries
    pub ingredients: String,
    pub instructions: String,
    #[serde(default)]
    pub servings: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl NormalizedImport {
    /// Stable store id for this record, identical across repeated fetches
    /// of the same title and ingredients regardless of case.
    pub fn stable_key(&self) -> String {
        format!(
            "{}{}::{}",
            IMPORT_KEY_PREFIX,
            self.title.to_lowercase(),
            self.ingredients.to_lowercase()
        )
    }
}

/// Hand-authored recipe shipped with the application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeSeed {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub category: String,
    #[serde(rename = "imageName")]
    pub image_name: String,
    pub difficulty: String,
    pub duration: u32,
}

impl RecipeSeed {
    pub fn into_recipe(self, created_at: DateTime<Utc>) -> Recipe {
        Recipe {
            id: self.id,
            title: self.title,
            summary: Some(self.summary),
            category: Some(self.category),
            ingredients: Some(self.ingredients.join("\n")),
            steps: Some(self.steps.join("\n")),
            image_reference: Some(self.image_name),
            difficulty: Some(self.difficulty),
            duration_minutes: self.duration,
            is_favorite: false,
            created_at,
            last_cooked_at: None,
        }
    }
}
