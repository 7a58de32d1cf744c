pub mod cart;
pub mod config;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod sources;
pub mod store;
pub mod sync;
pub mod uniffi_bindings;

use log::{info, warn};
use std::sync::Arc;

pub use cart::{OrderCart, ORDER_CAPACITY};
pub use config::SyncConfig;
pub use error::SyncError;
pub use model::{
    ExternalRecord, NormalizedImport, Recipe, RecipeSeed, SourceKind, CATEGORY_FILTERS,
    PLACEHOLDER_IMAGE,
};
pub use normalizer::normalize;
pub use sources::{HttpRecipeSource, RecipeSource};
pub use store::{LibraryStats, RecipeStore};
pub use sync::{Bucket, BucketResult, SyncOrchestrator, SyncReport, LOOKUP_LIMIT};

/// Build an orchestrator over the HTTP recipe directories named in `config`
pub fn orchestrator_from_config(config: &SyncConfig) -> Result<SyncOrchestrator, SyncError> {
    let source = HttpRecipeSource::from_config(config)?;
    Ok(SyncOrchestrator::new(Arc::new(source)))
}

/// Bundled samples from the configured file, or the embedded asset
pub async fn bundled_samples(config: &SyncConfig) -> Vec<NormalizedImport> {
    match &config.bundled_samples_path {
        Some(path) => store::load_bundled(path).await.unwrap_or_else(|e| {
            warn!("Could not read bundled samples from {}: {}", path, e);
            Vec::new()
        }),
        None => store::default_bundled(),
    }
}

/// Startup refresh: seed, merge bundled samples, then pull every online bucket.
pub async fn refresh_library(
    store: &mut RecipeStore,
    orchestrator: &SyncOrchestrator,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError> {
    let seeded = store.seed_if_needed(&crate::store::default_seeds())?;
    let bundled = store.import_bundled(&bundled_samples(config).await)?;
    info!("Library refresh: {} seed and {} bundled changes", seeded, bundled);

    Ok(store.sync_online(orchestrator).await)
}
