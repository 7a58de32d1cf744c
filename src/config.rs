use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration for the sync engine and its store
#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Path of the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Base URL of the meal directory API (no trailing slash)
    #[serde(default = "default_meal_api_base")]
    pub meal_api_base: String,
    /// Base URL of the cocktail directory API (no trailing slash)
    #[serde(default = "default_drink_api_base")]
    pub drink_api_base: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Optional JSON file overriding the embedded bundled samples
    #[serde(default)]
    pub bundled_samples_path: Option<String>,
    /// Delay before an order submission is confirmed, in milliseconds
    #[serde(default = "default_order_confirmation_delay_ms")]
    pub order_confirmation_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            meal_api_base: default_meal_api_base(),
            drink_api_base: default_drink_api_base(),
            timeout: default_timeout(),
            bundled_samples_path: None,
            order_confirmation_delay_ms: default_order_confirmation_delay_ms(),
        }
    }
}

// Default value functions
fn default_database_path() -> String {
    "recipes.db".to_string()
}

fn default_meal_api_base() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_drink_api_base() -> String {
    "https://www.thecocktaildb.com/api/json/v1/1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_order_confirmation_delay_ms() -> u64 {
    1000
}

impl SyncConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SYNC__ prefix
    /// 2. recipe-sync.toml file in current directory
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn order_confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.order_confirmation_delay_ms)
    }
}

/// Load configuration from file and environment variables
///
/// Environment variable format: RECIPE_SYNC__DATABASE_PATH
pub fn load_config() -> Result<SyncConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-sync").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_SYNC")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
