//! Log source trait definition.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::PipelineError;
use log_indexer_shared::RawLogRecord;

/// One page of events from a log stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogPage {
    /// Events in time order. May be empty.
    pub records: Vec<RawLogRecord>,
    /// Continuation token for the next request.
    pub next_token: Option<String>,
}

/// One page of stream names from a log source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamPage {
    pub streams: Vec<String>,
    /// Token for the next page; `None` once the listing is complete.
    pub next_token: Option<String>,
}

/// Abstract interface to a paginated remote log service.
///
/// A log source (CloudWatch log group) holds any number of streams, each of
/// which is read page by page with an opaque continuation token.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// List one page of the streams belonging to `source`.
    ///
    /// `token` is `None` for the first page.
    async fn list_streams(
        &self,
        source: &str,
        token: Option<&str>,
    ) -> Result<StreamPage, PipelineError>;

    /// Fetch one page of events from `stream`, starting at `start_time`
    /// (epoch milliseconds).
    ///
    /// `token` is `None` for the first page. The source signals the end of
    /// the stream by returning the token it was given.
    async fn fetch_page(
        &self,
        source: &str,
        stream: &str,
        start_time: i64,
        token: Option<&str>,
    ) -> Result<LogPage, PipelineError>;
}

/// List every stream of `source`, following continuation tokens.
pub async fn list_all_streams(
    log_source: &dyn LogSource,
    source: &str,
) -> Result<Vec<String>, PipelineError> {
    let mut streams = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = log_source.list_streams(source, token.as_deref()).await?;
        streams.extend(page.streams);

        match page.next_token {
            Some(next) if token.as_deref() != Some(next.as_str()) => token = Some(next),
            _ => break,
        }
    }

    debug!(source = %source, stream_count = streams.len(), "Listed streams");
    Ok(streams)
}
