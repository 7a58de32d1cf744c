use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::RecipeSource;
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::model::{ExternalRecord, SourceKind};

/// TheMealDB / TheCocktailDB over HTTP
pub struct HttpRecipeSource {
    client: Client,
    meal_base: String,
    drink_base: String,
}

impl HttpRecipeSource {
    pub fn new(
        meal_base: impl Into<String>,
        drink_base: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, SyncError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; RecipeSync/1.0)")
            .build()?;

        Ok(Self {
            client,
            meal_base: trim_base(meal_base.into()),
            drink_base: trim_base(drink_base.into()),
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        Self::new(
            config.meal_api_base.clone(),
            config.drink_api_base.clone(),
            Some(config.request_timeout()),
        )
    }

    fn base(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Meal => &self.meal_base,
            SourceKind::Drink => &self.drink_base,
        }
    }

    async fn fetch_envelope(
        &self,
        kind: SourceKind,
        endpoint: &str,
        query: (&str, &str),
    ) -> Result<Vec<ExternalRecord>, SyncError> {
        let url = format!("{}/{}", self.base(kind), endpoint);
        debug!("GET {} {}={}", url, query.0, query.1);

        let response = self.client.get(&url).query(&[query]).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body)?;
        Ok(records_from_envelope(json, kind))
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

/// Pull the record array out of `{"meals": [...]}` / `{"drinks": [...]}`.
/// The directories answer `null` (or a string) when nothing matches.
fn records_from_envelope(mut json: Value, kind: SourceKind) -> Vec<ExternalRecord> {
    match json.get_mut(kind.envelope_key()).map(Value::take) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(object) => Some(ExternalRecord::from_json(object)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[async_trait]
impl RecipeSource for HttpRecipeSource {
    async fn list_by_category(
        &self,
        kind: SourceKind,
        category: &str,
    ) -> Result<Vec<ExternalRecord>, SyncError> {
        self.fetch_envelope(kind, "filter.php", ("c", category))
            .await
    }

    async fn lookup_by_id(
        &self,
        kind: SourceKind,
        id: &str,
    ) -> Result<Option<ExternalRecord>, SyncError> {
        let records = self.fetch_envelope(kind, "lookup.php", ("i", id)).await?;
        Ok(records.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_null_is_empty() {
        assert!(records_from_envelope(json!({"meals": null}), SourceKind::Meal).is_empty());
    }

    #[test]
    fn test_envelope_string_is_empty() {
        let json = json!({"drinks": "no data found"});
        assert!(records_from_envelope(json, SourceKind::Drink).is_empty());
    }

    #[test]
    fn test_envelope_uses_kind_key() {
        let json = json!({
            "meals": [{"idMeal": "1"}],
            "drinks": [{"idDrink": "2"}, {"idDrink": "3"}]
        });
        assert_eq!(records_from_envelope(json.clone(), SourceKind::Meal).len(), 1);
        assert_eq!(records_from_envelope(json, SourceKind::Drink).len(), 2);
    }

    #[test]
    fn test_base_trailing_slash_trimmed() {
        let source =
            HttpRecipeSource::new("http://localhost/meals/", "http://localhost/drinks", None)
                .unwrap();
        assert_eq!(source.base(SourceKind::Meal), "http://localhost/meals");
        assert_eq!(source.base(SourceKind::Drink), "http://localhost/drinks");
    }
}
