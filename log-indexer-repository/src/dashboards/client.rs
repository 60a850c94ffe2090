//! HTTP client for the dashboards saved-objects API.

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, instrument};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::IndexPatternRegistrar;
use crate::types::IndexPattern;

/// Registers index patterns through the saved-objects API.
///
/// `base_url` points at the API root, e.g. `http://localhost:5601/api`.
pub struct DashboardsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DashboardsClient {
    pub fn new(base_url: &str) -> Result<Self, SearchIndexError> {
        let base_url =
            Url::parse(base_url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// URL of the saved object for `id`, with overwrite enabled.
    fn index_pattern_url(&self, id: &str) -> Result<Url, SearchIndexError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SearchIndexError::connection("dashboards URL cannot be a base"))?
            .pop_if_empty()
            .extend(["saved_objects", "index-pattern", id]);
        url.query_pairs_mut().append_pair("overwrite", "true");
        Ok(url)
    }
}

#[async_trait]
impl IndexPatternRegistrar for DashboardsClient {
    #[instrument(skip(self, pattern), fields(id = %pattern.id, title = %pattern.title))]
    async fn register_index_pattern(&self, pattern: &IndexPattern) -> Result<(), SearchIndexError> {
        let url = self.index_pattern_url(&pattern.id)?;

        let response = self
            .http
            .post(url)
            .header("kbn-xsrf", "true")
            .header("osd-xsrf", "true")
            .json(&json!({ "attributes": pattern.attributes() }))
            .send()
            .await
            .map_err(|e| SearchIndexError::registration(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Index pattern registration failed");
            return Err(SearchIndexError::api(status.as_u16(), None, body));
        }

        info!("Registered index pattern");
        Ok(())
    }
}
