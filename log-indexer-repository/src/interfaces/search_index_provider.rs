//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::bulk::BulkPayload;
use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into `SearchIndexClient`, which layers the
/// idempotency rules for provisioning on top. Providers only classify
/// outcomes; they never suppress errors themselves.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Delete an index.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was deleted
    /// * `Err(SearchIndexError::IndexNotFound)` - If there was no such index
    /// * `Err(SearchIndexError)` - Any other failure
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Create an index with the given settings and mappings.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchIndexError::IndexAlreadyExists)` - If the index exists
    /// * `Err(SearchIndexError)` - Any other failure
    async fn create_index(&self, index: &str, settings: &Value) -> Result<(), SearchIndexError>;

    /// Submit a bulk payload as a single request.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-document outcomes reported by the engine
    /// * `Err(SearchIndexError)` - If the request itself failed
    async fn bulk(&self, payload: BulkPayload) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
