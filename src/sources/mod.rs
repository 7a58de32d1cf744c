mod http;

pub use http::HttpRecipeSource;

use async_trait::async_trait;

use crate::error::SyncError;
use crate::model::{ExternalRecord, SourceKind};

/// Read-only access to a remote recipe directory
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// List the records filed under a category. Records usually carry only
    /// an id, a title and a thumbnail.
    async fn list_by_category(
        &self,
        kind: SourceKind,
        category: &str,
    ) -> Result<Vec<ExternalRecord>, SyncError>;

    /// Fetch the full record for one id, `None` if the directory has no match
    async fn lookup_by_id(
        &self,
        kind: SourceKind,
        id: &str,
    ) -> Result<Option<ExternalRecord>, SyncError>;
}
