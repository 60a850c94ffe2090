//! CloudWatch Logs implementation of the log source.
//!
//! Log groups map to sources and log streams to streams. Events are read
//! oldest first with `GetLogEvents`, following `nextForwardToken`.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs::config::Region;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::OutputLogEvent;
use aws_sdk_cloudwatchlogs::Client;
use tracing::{info, instrument};

use crate::errors::PipelineError;
use crate::source::{LogPage, LogSource, StreamPage};
use log_indexer_shared::RawLogRecord;

/// CloudWatch Logs backed log source.
pub struct CloudWatchLogSource {
    client: Client,
}

impl CloudWatchLogSource {
    /// Create a source for `region`, optionally reading credentials from a
    /// named profile in the shared AWS config files.
    pub async fn new(region: &str, profile: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let aws_cfg = loader.load().await;

        info!(region = %region, profile = ?profile, "CloudWatch log source initialised");

        Self {
            client: Client::new(&aws_cfg),
        }
    }
}

fn to_raw_record(event: &OutputLogEvent) -> RawLogRecord {
    RawLogRecord {
        timestamp: event.timestamp().unwrap_or_default(),
        message: event.message().unwrap_or_default().to_string(),
        ingestion_time: event.ingestion_time(),
    }
}

#[async_trait]
impl LogSource for CloudWatchLogSource {
    #[instrument(skip(self))]
    async fn list_streams(
        &self,
        source: &str,
        token: Option<&str>,
    ) -> Result<StreamPage, PipelineError> {
        let output = self
            .client
            .describe_log_streams()
            .log_group_name(source)
            .set_next_token(token.map(str::to_string))
            .send()
            .await
            .map_err(|e| {
                PipelineError::log_source(format!(
                    "DescribeLogStreams failed for {}: {}",
                    source,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(StreamPage {
            streams: output
                .log_streams()
                .iter()
                .filter_map(|s| s.log_stream_name().map(str::to_string))
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    #[instrument(skip(self))]
    async fn fetch_page(
        &self,
        source: &str,
        stream: &str,
        start_time: i64,
        token: Option<&str>,
    ) -> Result<LogPage, PipelineError> {
        let output = self
            .client
            .get_log_events()
            .log_group_name(source)
            .log_stream_name(stream)
            .start_time(start_time)
            .start_from_head(true)
            .set_next_token(token.map(str::to_string))
            .send()
            .await
            .map_err(|e| {
                PipelineError::log_source(format!(
                    "GetLogEvents failed for {}/{}: {}",
                    source,
                    stream,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(LogPage {
            records: output.events().iter().map(to_raw_record).collect(),
            next_token: output.next_forward_token().map(str::to_string),
        })
    }
}
