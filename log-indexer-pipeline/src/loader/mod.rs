//! Loader module for the log indexer pipeline.
//!
//! Turns a page of raw events into documents and writes them to the search
//! index in one bulk request.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::errors::PipelineError;
use crate::parser::EventParser;
use log_indexer_repository::SearchIndexClient;
use log_indexer_shared::{IndexedDocument, RawLogRecord};

/// Build the documents for one page of events from a stream.
pub fn build_documents(
    log_group: &str,
    log_stream: &str,
    records: &[RawLogRecord],
    parser: &dyn EventParser,
) -> Vec<IndexedDocument> {
    records
        .iter()
        .map(|record| IndexedDocument::merge(record, log_group, log_stream, parser.parse(record)))
        .collect()
}

/// Loader that indexes pages of log events into the search engine.
pub struct SearchLoader {
    client: Arc<SearchIndexClient>,
}

impl SearchLoader {
    /// Create a new search loader with the given client.
    pub fn new(client: Arc<SearchIndexClient>) -> Self {
        Self { client }
    }

    /// Parse, tag and index one page of events.
    ///
    /// The whole page is sent as a single bulk request. Returns the number of
    /// documents the engine accepted.
    #[instrument(skip(self, records, parser), fields(record_count = records.len(), parser = parser.name()))]
    pub async fn load(
        &self,
        index: &str,
        log_group: &str,
        log_stream: &str,
        records: &[RawLogRecord],
        parser: &dyn EventParser,
    ) -> Result<usize, PipelineError> {
        let documents = build_documents(log_group, log_stream, records, parser);
        let summary = self.client.index_batch(index, &documents).await?;

        debug!(index = %index, indexed = summary.succeeded, "Loaded page");
        Ok(summary.succeeded)
    }
}
