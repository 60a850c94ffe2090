//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cluster::ClusterHealthParts,
    http::headers::{HeaderValue, CONTENT_TYPE},
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::bulk::BulkPayload;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::responses::{error_type, summarize_bulk_response};
use crate::types::BatchOperationSummary;

const INDEX_NOT_FOUND: &str = "index_not_found_exception";
const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200", None).await?;
/// client.create_index("logs-svc", &get_index_settings()).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `basic_auth` - Optional username and password
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(
        url: &str,
        basic_auth: Option<(String, String)>,
    ) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some((username, password)) = basic_auth {
            builder = builder.auth(Credentials::Basic(username, password));
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }

    /// Read a failed response into status, structured error type and raw body.
    async fn read_failure(response: Response) -> (u16, Option<String>, String) {
        let status = response.status_code().as_u16();
        let body = response.text().await.unwrap_or_default();
        let error_type = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| error_type(&v).map(str::to_string));
        (status, error_type, body)
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_deletion(e.to_string()))?;

        if response.status_code().is_success() {
            debug!(index = %index, "Index deleted");
            return Ok(());
        }

        let (status, error_type, body) = Self::read_failure(response).await;
        if error_type.as_deref() == Some(INDEX_NOT_FOUND) || status == 404 {
            return Err(SearchIndexError::IndexNotFound(index.to_string()));
        }

        error!(status, body = %body, "Delete index request failed");
        Err(SearchIndexError::api(status, error_type, body))
    }

    #[instrument(skip(self, settings))]
    async fn create_index(&self, index: &str, settings: &Value) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(settings.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        if response.status_code().is_success() {
            debug!(index = %index, "Index created");
            return Ok(());
        }

        let (status, error_type, body) = Self::read_failure(response).await;
        if error_type.as_deref() == Some(ALREADY_EXISTS) {
            return Err(SearchIndexError::IndexAlreadyExists(index.to_string()));
        }

        error!(status, body = %body, "Create index request failed");
        Err(SearchIndexError::api(status, error_type, body))
    }

    #[instrument(skip(self, payload), fields(index = %payload.index(), document_count = payload.document_count()))]
    async fn bulk(&self, payload: BulkPayload) -> Result<BatchOperationSummary, SearchIndexError> {
        let total = payload.document_count();
        let body: Vec<JsonBody<Value>> = payload.into_lines().into_iter().map(Into::into).collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/x-ndjson"))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_operation(e.to_string()))?;

        if !response.status_code().is_success() {
            let (status, error_type, body) = Self::read_failure(response).await;
            error!(status, body = %body, "Bulk request failed");
            return Err(SearchIndexError::api(status, error_type, body));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let summary = summarize_bulk_response(&response_body, total);
        debug!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Bulk request completed"
        );
        Ok(summary)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        Ok(matches!(
            body.get("status").and_then(Value::as_str),
            Some("green") | Some("yellow")
        ))
    }
}
