//! Paginating reader over a single log stream.

use tracing::debug;

use crate::errors::PipelineError;
use crate::source::LogSource;
use log_indexer_shared::RawLogRecord;

/// Drains one (source, stream) pair from a fixed start time to the present.
///
/// Each call to [`next_batch`](Self::next_batch) returns the next non-empty
/// page of events. Pagination ends when the source echoes back the token it
/// was sent, or returns no token at all; empty pages with a fresh token are
/// skipped, not treated as the end. Once exhausted the reader stays
/// exhausted; reading again needs a new reader.
pub struct LogSourceReader<'a> {
    log_source: &'a dyn LogSource,
    source: &'a str,
    stream: &'a str,
    start_time: i64,
    token: Option<String>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<'a> LogSourceReader<'a> {
    pub fn new(log_source: &'a dyn LogSource, source: &'a str, stream: &'a str, start_time: i64) -> Self {
        Self {
            log_source,
            source,
            stream,
            start_time,
            token: None,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Fetch pages until one has events, or the stream is exhausted.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. Request failures are
    /// returned as-is; there is no retry here.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<RawLogRecord>>, PipelineError> {
        while !self.exhausted {
            let page = self
                .log_source
                .fetch_page(self.source, self.stream, self.start_time, self.token.as_deref())
                .await?;
            self.pages_fetched += 1;

            debug!(
                source = %self.source,
                stream = %self.stream,
                page = self.pages_fetched,
                record_count = page.records.len(),
                "Received page"
            );

            self.exhausted = match page.next_token.as_deref() {
                Some(next) => self.token.as_deref() == Some(next),
                None => true,
            };
            self.token = page.next_token;

            if !page.records.is_empty() {
                return Ok(Some(page.records));
            }
        }

        Ok(None)
    }

    /// Number of page requests issued so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
