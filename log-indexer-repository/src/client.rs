//! Search index client implementation.
//!
//! This module provides the main client used by the pipeline to prepare
//! destination indices and write batches of documents to them.

use tracing::{debug, info, instrument, warn};

use crate::bulk::BulkPayload;
use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::index_config::get_index_settings;
use crate::interfaces::SearchIndexProvider;
use crate::types::BatchOperationSummary;
use log_indexer_shared::IndexedDocument;

/// The main client for interacting with the search index.
///
/// Wraps a [`SearchIndexProvider`] and adds the idempotency rules for index
/// provisioning and the failure policy for bulk writes.
pub struct SearchIndexClient {
    provider: Box<dyn SearchIndexProvider>,
    config: SearchIndexConfig,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient with default configuration.
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexConfig::default(),
        }
    }

    /// Create a new SearchIndexClient with custom configuration.
    pub fn with_config(provider: Box<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        Self { provider, config }
    }

    /// Bring an index to an existing, empty state.
    ///
    /// Deletes the index, treating "not found" as success, then creates it,
    /// treating "already exists" as success. Any other error from either
    /// call is returned.
    ///
    /// Must complete before the first [`index_batch`](Self::index_batch) on
    /// the same index.
    #[instrument(skip(self))]
    pub async fn ensure_clean(&self, index: &str) -> Result<(), SearchIndexError> {
        match self.provider.delete_index(index).await {
            Ok(()) => info!(index = %index, "Deleted existing index"),
            Err(SearchIndexError::IndexNotFound(_)) => {
                debug!(index = %index, "No existing index to delete")
            }
            Err(e) => return Err(e),
        }

        match self.provider.create_index(index, &get_index_settings()).await {
            Ok(()) => info!(index = %index, "Created index"),
            Err(SearchIndexError::IndexAlreadyExists(_)) => {
                warn!(index = %index, "Index already exists, keeping it")
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }

    /// Write a batch of documents to `index` in one bulk request.
    ///
    /// An empty batch sends nothing. If the engine reports per-document
    /// failures, the batch fails unless the client is configured to
    /// tolerate them.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn index_batch(
        &self,
        index: &str,
        documents: &[IndexedDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BatchOperationSummary::empty());
        }

        let payload = BulkPayload::build(index, self.config.document_type.as_deref(), documents);
        let summary = self.provider.bulk(payload).await?;

        if summary.failed > 0 {
            let reason = summary.first_error().unwrap_or("unknown").to_string();
            if !self.config.tolerate_item_failures {
                return Err(SearchIndexError::bulk_operation(format!(
                    "{} of {} documents failed in {}: {}",
                    summary.failed, summary.total, index, reason
                )));
            }
            warn!(
                index = %index,
                failed = summary.failed,
                total = summary.total,
                reason = %reason,
                "Bulk request had document failures"
            );
        }

        debug!(index = %index, succeeded = summary.succeeded, "Indexed batch");
        Ok(summary)
    }

    /// Check if the search engine is healthy.
    pub async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.provider.health_check().await
    }
}
