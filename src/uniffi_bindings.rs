//! UniFFI bindings for recipe-sync
//!
//! This module provides FFI-compatible types and an object wrapper for use with iOS and Android.
//! Async work runs on a tokio runtime created per call, so every export is synchronous.

use log::warn;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{OrderCart, Recipe, RecipeStore, SyncConfig, SyncError, SyncOrchestrator};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible recipe structure
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub id: String,
    pub title: String,
    /// Summary line (empty string if none)
    pub summary: String,
    pub category: Option<String>,
    /// Ingredient lines, blank lines removed
    pub ingredients: Vec<String>,
    /// Instruction lines, blank lines removed
    pub steps: Vec<String>,
    /// Bundled asset name or remote URL
    pub image_reference: Option<String>,
    pub difficulty: Option<String>,
    pub duration_minutes: u32,
    pub is_favorite: bool,
    /// Unix milliseconds
    pub created_at_ms: i64,
    /// Unix milliseconds, if the recipe was ever cooked
    pub last_cooked_at_ms: Option<i64>,
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        FfiRecipe {
            ingredients: recipe.ingredients_list(),
            steps: recipe.steps_list(),
            id: recipe.id,
            title: recipe.title,
            summary: recipe.summary.unwrap_or_default(),
            category: recipe.category,
            image_reference: recipe.image_reference,
            difficulty: recipe.difficulty,
            duration_minutes: recipe.duration_minutes,
            is_favorite: recipe.is_favorite,
            created_at_ms: recipe.created_at.timestamp_millis(),
            last_cooked_at_ms: recipe.last_cooked_at.map(|t| t.timestamp_millis()),
        }
    }
}

/// Per-bucket sync summary
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiBucketSummary {
    pub category: String,
    pub records: u32,
    pub list_failed: bool,
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiSyncError {
    /// Remote source unreachable or answered with an error
    FetchError { message: String },
    /// Payload could not be decoded
    DecodeError { message: String },
    /// Local database error
    StoreError { message: String },
    /// Configuration error
    ConfigError { message: String },
    /// Runtime error (tokio, poisoned lock)
    RuntimeError { message: String },
}

impl fmt::Display for FfiSyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiSyncError::FetchError { message } => write!(f, "Fetch error: {}", message),
            FfiSyncError::DecodeError { message } => write!(f, "Decode error: {}", message),
            FfiSyncError::StoreError { message } => write!(f, "Store error: {}", message),
            FfiSyncError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiSyncError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiSyncError {}

impl From<SyncError> for FfiSyncError {
    fn from(err: SyncError) -> Self {
        let message = err.to_string();
        match err {
            SyncError::FetchError(_) | SyncError::HttpStatus(_) => {
                FfiSyncError::FetchError { message }
            }
            SyncError::DecodeError(_) => FfiSyncError::DecodeError { message },
            SyncError::StoreError(_) | SyncError::IoError(_) => {
                FfiSyncError::StoreError { message }
            }
            SyncError::ConfigError(_) => FfiSyncError::ConfigError { message },
            SyncError::RuntimeError(_) => FfiSyncError::RuntimeError { message },
        }
    }
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiSyncError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiSyncError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

fn poisoned<T>(_: T) -> FfiSyncError {
    FfiSyncError::RuntimeError {
        message: "Recipe library lock poisoned".to_string(),
    }
}

/// Recipe store plus order cart, shared with the host UI.
///
/// Constructed once by the host and passed to every screen.
#[cfg_attr(feature = "uniffi", derive(uniffi::Object))]
pub struct RecipeLibrary {
    store: Mutex<RecipeStore>,
    cart: Mutex<OrderCart>,
    config: SyncConfig,
}

impl RecipeLibrary {
    fn with_store(store: RecipeStore, config: SyncConfig) -> Arc<Self> {
        let cart = OrderCart::new(config.order_confirmation_delay());
        Arc::new(Self {
            store: Mutex::new(store),
            cart: Mutex::new(cart),
            config,
        })
    }

    fn store(&self) -> Result<MutexGuard<'_, RecipeStore>, FfiSyncError> {
        self.store.lock().map_err(poisoned)
    }

    fn cart(&self) -> Result<MutexGuard<'_, OrderCart>, FfiSyncError> {
        self.cart.lock().map_err(poisoned)
    }
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
impl RecipeLibrary {
    /// Open the library at `database_path`, using defaults for everything else
    #[cfg_attr(feature = "uniffi", uniffi::constructor)]
    pub fn open(database_path: String) -> Result<Arc<Self>, FfiSyncError> {
        let config = SyncConfig {
            database_path,
            ..Default::default()
        };
        let store = RecipeStore::open(&config.database_path)?;
        Ok(Self::with_store(store, config))
    }

    /// Library that lives in memory only
    #[cfg_attr(feature = "uniffi", uniffi::constructor)]
    pub fn open_in_memory() -> Arc<Self> {
        Self::with_store(RecipeStore::in_memory(), SyncConfig::default())
    }

    pub fn seed_if_needed(&self) -> Result<u32, FfiSyncError> {
        let changed = self.store()?.seed_if_needed(&crate::store::default_seeds())?;
        Ok(changed as u32)
    }

    pub fn import_bundled(&self) -> Result<u32, FfiSyncError> {
        let rt = create_runtime()?;
        let records = rt.block_on(crate::bundled_samples(&self.config));
        let changed = self.store()?.import_bundled(&records)?;
        Ok(changed as u32)
    }

    /// Pull every online bucket; returns once all of them have finished.
    ///
    /// The store is locked only while a finished bucket is merged.
    pub fn sync_online(&self) -> Result<Vec<FfiBucketSummary>, FfiSyncError> {
        let orchestrator: SyncOrchestrator = crate::orchestrator_from_config(&self.config)?;
        let rt = create_runtime()?;

        rt.block_on(async {
            let mut buckets = orchestrator.spawn_buckets();
            let mut summaries = Vec::new();

            while let Some(joined) = buckets.join_next().await {
                let result = match joined {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("Bucket task aborted: {}", e);
                        continue;
                    }
                };

                self.store()?.merge_bucket(&result);
                summaries.push(FfiBucketSummary {
                    category: result.bucket.label().to_string(),
                    records: result.records.len() as u32,
                    list_failed: result.list_failed,
                });
            }

            Ok::<_, FfiSyncError>(summaries)
        })
    }

    pub fn query(
        &self,
        search: Option<String>,
        category: Option<String>,
    ) -> Result<Vec<FfiRecipe>, FfiSyncError> {
        let recipes = self
            .store()?
            .query(search.as_deref(), category.as_deref())?;
        Ok(recipes.into_iter().map(FfiRecipe::from).collect())
    }

    pub fn toggle_favorite(&self, id: String) -> Result<Option<FfiRecipe>, FfiSyncError> {
        Ok(self.store()?.toggle_favorite(&id)?.map(FfiRecipe::from))
    }

    pub fn mark_cooked(&self, id: String) -> Result<Option<FfiRecipe>, FfiSyncError> {
        Ok(self.store()?.mark_cooked(&id)?.map(FfiRecipe::from))
    }

    /// Add a stored recipe to the order. `false` if unknown, duplicate or cart full.
    pub fn cart_add(&self, id: String) -> Result<bool, FfiSyncError> {
        let Some(recipe) = self.store()?.get(&id)? else {
            return Ok(false);
        };
        Ok(self.cart()?.add(&recipe))
    }

    pub fn cart_remove(&self, id: String) -> Result<(), FfiSyncError> {
        let mut cart = self.cart()?;
        if let Some(recipe) = cart.items().iter().find(|r| r.id == id).cloned() {
            cart.remove(&recipe);
        }
        Ok(())
    }

    pub fn cart_clear(&self) -> Result<(), FfiSyncError> {
        self.cart()?.clear();
        Ok(())
    }

    pub fn cart_items(&self) -> Result<Vec<FfiRecipe>, FfiSyncError> {
        Ok(self
            .cart()?
            .items()
            .iter()
            .cloned()
            .map(FfiRecipe::from)
            .collect())
    }

    /// Wait out the confirmation delay, then empty the cart.
    /// The cart stays readable while waiting.
    pub fn submit_order(&self) -> Result<bool, FfiSyncError> {
        let delay = self.cart()?.confirmation_delay();
        let rt = create_runtime()?;
        rt.block_on(tokio::time::sleep(delay));
        Ok(self.cart()?.confirm())
    }
}

/// Category filters in display order
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn category_filters() -> Vec<String> {
    crate::CATEGORY_FILTERS.iter().map(|c| c.to_string()).collect()
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
