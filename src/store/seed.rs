use log::warn;
use std::path::Path;

use crate::error::SyncError;
use crate::model::{NormalizedImport, RecipeSeed};

const SEED_JSON: &str = include_str!("../../assets/seed_recipes.json");
const SAMPLE_JSON: &str = include_str!("../../assets/sample_recipes.json");

/// The hand-authored recipes shipped with the app
pub fn default_seeds() -> Vec<RecipeSeed> {
    serde_json::from_str(SEED_JSON).unwrap_or_else(|e| {
        warn!("Embedded seed recipes failed to decode: {}", e);
        Vec::new()
    })
}

/// The bundled sample imports shipped with the app
pub fn default_bundled() -> Vec<NormalizedImport> {
    parse_bundled(SAMPLE_JSON)
}

/// Read a bundled sample file. An undecodable file yields no records.
pub async fn load_bundled(path: impl AsRef<Path>) -> Result<Vec<NormalizedImport>, SyncError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(parse_bundled(&content))
}

fn parse_bundled(content: &str) -> Vec<NormalizedImport> {
    serde_json::from_str(content).unwrap_or_else(|e| {
        warn!("Bundled sample recipes failed to decode: {}", e);
        Vec::new()
    })
}
