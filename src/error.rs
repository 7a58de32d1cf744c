use thiserror::Error;

/// Errors that can occur while syncing or querying recipes
#[derive(Error, Debug)]
pub enum SyncError {
    /// Failed to reach a remote recipe source
    #[error("Failed to fetch from recipe source: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Remote source answered with a non-success status
    #[error("Recipe source returned HTTP {0}")]
    HttpStatus(u16),

    /// Payload could not be decoded
    #[error("Failed to decode payload: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// Local database error
    #[error("Store error: {0}")]
    StoreError(#[from] rusqlite::Error),

    /// File system error (bundled samples, database directory)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Async runtime could not be created or a task panicked
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}
