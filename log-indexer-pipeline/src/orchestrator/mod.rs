//! Orchestrator module for the log indexer pipeline.
//!
//! Coordinates the log source, parsers, and loader for every configured log
//! source.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info, instrument};

use crate::errors::{PipelineError, SourcePhase};
use crate::loader::SearchLoader;
use crate::parser::{EventParser, ParserKind};
use crate::source::{list_all_streams, LogSource, LogSourceReader};
use log_indexer_repository::{IndexPattern, IndexPatternRegistrar, SearchIndexClient};
use log_indexer_shared::TIMESTAMP_FIELD;

/// A log source to ingest and the parser for its events.
#[derive(Clone)]
pub struct LogSourceConfig {
    pub name: String,
    pub parser: Arc<dyn EventParser>,
}

impl LogSourceConfig {
    /// Configure a source with one of the built-in parsers.
    pub fn new(name: impl Into<String>, kind: ParserKind) -> Self {
        Self {
            name: name.into(),
            parser: kind.parser(),
        }
    }

    /// Configure a source with a custom parser.
    pub fn with_parser(name: impl Into<String>, parser: Arc<dyn EventParser>) -> Self {
        Self {
            name: name.into(),
            parser,
        }
    }
}

impl fmt::Debug for LogSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSourceConfig")
            .field("name", &self.name)
            .field("parser", &self.parser.name())
            .finish()
    }
}

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// How far back from now each stream is read.
    pub lookback: Duration,
    /// Prefix of destination index names; the source name is appended.
    pub index_prefix: String,
    /// Index pattern registered with the dashboards layer before ingesting.
    pub index_pattern: IndexPattern,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            lookback: Duration::days(2),
            index_prefix: "logs-".to_string(),
            index_pattern: IndexPattern::new("logs", "logs-*", TIMESTAMP_FIELD),
        }
    }
}

impl OrchestratorConfig {
    /// Destination index for a log source.
    pub fn index_name(&self, source: &str) -> String {
        format!("{}{}", self.index_prefix, source)
    }
}

/// Counts collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sources: usize,
    pub streams: usize,
    pub pages: usize,
    pub documents: usize,
}

/// Orchestrator that drives every log source through the pipeline.
///
/// For each source, in order:
/// - Provisioning: recreate the destination index empty
/// - Enumerating streams: list every stream of the source
/// - Draining: read each stream from `now - lookback`, indexing page by page
///
/// Sources, streams and pages are handled one at a time. The first error
/// stops the run; later sources are not attempted.
pub struct Orchestrator {
    log_source: Arc<dyn LogSource>,
    search_client: Arc<SearchIndexClient>,
    loader: SearchLoader,
    registrar: Arc<dyn IndexPatternRegistrar>,
    sources: Vec<LogSourceConfig>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        log_source: Arc<dyn LogSource>,
        search_client: Arc<SearchIndexClient>,
        registrar: Arc<dyn IndexPatternRegistrar>,
        sources: Vec<LogSourceConfig>,
    ) -> Self {
        Self::with_config(
            log_source,
            search_client,
            registrar,
            sources,
            OrchestratorConfig::default(),
        )
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        log_source: Arc<dyn LogSource>,
        search_client: Arc<SearchIndexClient>,
        registrar: Arc<dyn IndexPatternRegistrar>,
        sources: Vec<LogSourceConfig>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            log_source,
            loader: SearchLoader::new(search_client.clone()),
            search_client,
            registrar,
            sources,
            config,
        }
    }

    /// Run the orchestrator.
    ///
    /// Registers the index pattern, then ingests every configured source.
    #[instrument(skip(self), fields(source_count = self.sources.len()))]
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        info!("Starting log indexer orchestrator");

        self.registrar
            .register_index_pattern(&self.config.index_pattern)
            .await?;

        let mut summary = RunSummary::default();
        for source in &self.sources {
            if let Err(e) = self.index_source(source, &mut summary).await {
                error!(source = %source.name, error = %e, "Log source ingestion failed");
                return Err(e);
            }
            summary.sources += 1;
        }

        info!(
            sources = summary.sources,
            streams = summary.streams,
            pages = summary.pages,
            documents = summary.documents,
            "Orchestrator run complete"
        );
        Ok(summary)
    }

    /// Ingest one log source into its own index.
    #[instrument(skip(self, source, summary), fields(source = %source.name))]
    async fn index_source(
        &self,
        source: &LogSourceConfig,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let index = self.config.index_name(&source.name);

        self.search_client
            .ensure_clean(&index)
            .await
            .map_err(|e| PipelineError::source_failed(&source.name, SourcePhase::Provisioning, e))?;

        let streams = list_all_streams(self.log_source.as_ref(), &source.name)
            .await
            .map_err(|e| {
                PipelineError::source_failed(&source.name, SourcePhase::EnumeratingStreams, e)
            })?;
        info!(index = %index, stream_count = streams.len(), "Enumerated streams");

        for stream in &streams {
            let start_time = self.start_time().map_err(|e| {
                PipelineError::source_failed(&source.name, SourcePhase::DrainingStream, e)
            })?;
            self.drain_stream(source, &index, stream, start_time, summary)
                .await
                .map_err(|e| {
                    PipelineError::source_failed(&source.name, SourcePhase::DrainingStream, e)
                })?;
            summary.streams += 1;
        }

        Ok(())
    }

    /// Start of the read window in epoch milliseconds.
    fn start_time(&self) -> Result<i64, PipelineError> {
        Utc::now()
            .checked_sub_signed(self.config.lookback)
            .map(|start| start.timestamp_millis())
            .ok_or_else(|| {
                PipelineError::config(format!(
                    "lookback of {} hours is out of range",
                    self.config.lookback.num_hours()
                ))
            })
    }

    /// Read a stream to the end, indexing every non-empty page before
    /// requesting the next one.
    async fn drain_stream(
        &self,
        source: &LogSourceConfig,
        index: &str,
        stream: &str,
        start_time: i64,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let mut reader =
            LogSourceReader::new(self.log_source.as_ref(), &source.name, stream, start_time);

        let mut documents = 0;
        while let Some(records) = reader.next_batch().await? {
            documents += self
                .loader
                .load(index, &source.name, stream, &records, source.parser.as_ref())
                .await?;
        }

        summary.pages += reader.pages_fetched();
        summary.documents += documents;
        info!(
            stream = %stream,
            pages = reader.pages_fetched(),
            documents,
            "Drained stream"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{LogPage, StreamPage};
    use async_trait::async_trait;
    use log_indexer_repository::{
        BatchOperationSummary, BulkPayload, SearchIndexError, SearchIndexProvider,
    };
    use log_indexer_shared::{ParsedRecord, RawLogRecord};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// Ordered record of every external call made during a run.
    type CallLog = Arc<Mutex<Vec<String>>>;

    /// Log source serving scripted pages per stream.
    struct MockLogSource {
        streams: HashMap<String, Vec<String>>,
        pages: Mutex<HashMap<String, Vec<LogPage>>>,
        start_times: Mutex<Vec<i64>>,
        calls: CallLog,
        fail_fetch: bool,
    }

    impl MockLogSource {
        fn new(calls: CallLog) -> Self {
            Self {
                streams: HashMap::new(),
                pages: Mutex::new(HashMap::new()),
                start_times: Mutex::new(Vec::new()),
                calls,
                fail_fetch: false,
            }
        }

        fn with_stream(mut self, source: &str, stream: &str, pages: Vec<LogPage>) -> Self {
            self.streams
                .entry(source.to_string())
                .or_default()
                .push(stream.to_string());
            self.pages
                .get_mut()
                .insert(format!("{}/{}", source, stream), pages.into_iter().rev().collect());
            self
        }
    }

    #[async_trait]
    impl LogSource for MockLogSource {
        async fn list_streams(
            &self,
            source: &str,
            _token: Option<&str>,
        ) -> Result<StreamPage, PipelineError> {
            self.calls.lock().await.push(format!("list {}", source));
            Ok(StreamPage {
                streams: self.streams.get(source).cloned().unwrap_or_default(),
                next_token: None,
            })
        }

        async fn fetch_page(
            &self,
            source: &str,
            stream: &str,
            start_time: i64,
            token: Option<&str>,
        ) -> Result<LogPage, PipelineError> {
            self.calls
                .lock()
                .await
                .push(format!("fetch {}/{} {:?}", source, stream, token));
            self.start_times.lock().await.push(start_time);
            if self.fail_fetch {
                return Err(PipelineError::log_source("ThrottlingException"));
            }
            self.pages
                .lock()
                .await
                .get_mut(&format!("{}/{}", source, stream))
                .and_then(|pages| pages.pop())
                .ok_or_else(|| PipelineError::log_source("unexpected page request"))
        }
    }

    /// Search provider recording calls and payloads.
    struct MockProvider {
        calls: CallLog,
        payloads: Arc<Mutex<Vec<BulkPayload>>>,
        create_error: Option<SearchIndexError>,
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
            self.calls.lock().await.push(format!("delete {}", index));
            Err(SearchIndexError::IndexNotFound(index.to_string()))
        }

        async fn create_index(&self, index: &str, _settings: &Value) -> Result<(), SearchIndexError> {
            self.calls.lock().await.push(format!("create {}", index));
            match &self.create_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        async fn bulk(&self, payload: BulkPayload) -> Result<BatchOperationSummary, SearchIndexError> {
            self.calls
                .lock()
                .await
                .push(format!("bulk {} {}", payload.index(), payload.document_count()));
            let total = payload.document_count();
            self.payloads.lock().await.push(payload);
            Ok(BatchOperationSummary::all_succeeded(total))
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }
    }

    /// Registrar recording registered patterns.
    struct MockRegistrar {
        calls: CallLog,
    }

    #[async_trait]
    impl IndexPatternRegistrar for MockRegistrar {
        async fn register_index_pattern(&self, pattern: &IndexPattern) -> Result<(), SearchIndexError> {
            self.calls
                .lock()
                .await
                .push(format!("register {} {}", pattern.id, pattern.title));
            Ok(())
        }
    }

    struct Harness {
        calls: CallLog,
        payloads: Arc<Mutex<Vec<BulkPayload>>>,
        log_source: Arc<MockLogSource>,
    }

    fn orchestrator(
        log_source: MockLogSource,
        create_error: Option<SearchIndexError>,
        sources: Vec<LogSourceConfig>,
    ) -> (Orchestrator, Harness) {
        let calls = log_source.calls.clone();
        let payloads = Arc::new(Mutex::new(Vec::new()));
        let provider = MockProvider {
            calls: calls.clone(),
            payloads: payloads.clone(),
            create_error,
        };
        let log_source = Arc::new(log_source);
        let orchestrator = Orchestrator::new(
            log_source.clone(),
            Arc::new(SearchIndexClient::new(Box::new(provider))),
            Arc::new(MockRegistrar {
                calls: calls.clone(),
            }),
            sources,
        );
        (
            orchestrator,
            Harness {
                calls,
                payloads,
                log_source,
            },
        )
    }

    fn page(records: Vec<RawLogRecord>, token: &str) -> LogPage {
        LogPage {
            records,
            next_token: Some(token.to_string()),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_single_stream() {
        let calls = CallLog::default();
        let log_source = MockLogSource::new(calls.clone()).with_stream(
            "svc",
            "s1",
            vec![
                page(
                    vec![
                        RawLogRecord::new(1000, "2020-10-04 07:56:05,703 INFO FEED Checking feeds"),
                        RawLogRecord::new(2000, "not structured"),
                    ],
                    "T1",
                ),
                page(vec![], "T1"),
            ],
        );
        let (orchestrator, harness) = orchestrator(
            log_source,
            None,
            vec![LogSourceConfig::new("svc", ParserKind::PythonLogging)],
        );

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(
            *harness.calls.lock().await,
            vec![
                "register logs logs-*",
                "delete logs-svc",
                "create logs-svc",
                "list svc",
                "fetch svc/s1 None",
                "bulk logs-svc 2",
                "fetch svc/s1 Some(\"T1\")",
            ]
        );
        assert_eq!(
            summary,
            RunSummary {
                sources: 1,
                streams: 1,
                pages: 2,
                documents: 2,
            }
        );

        let payloads = harness.payloads.lock().await;
        assert_eq!(payloads.len(), 1);
        let lines = payloads[0].lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1]["@loggroup"], json!("svc"));
        assert_eq!(lines[1]["@logstream"], json!("s1"));
        assert_eq!(lines[1]["level"], json!("INFO"));
        assert_eq!(lines[3]["message"], json!("not structured"));
        assert_eq!(lines[3]["@timestamp"], json!("1970-01-01T00:00:02.000Z"));
    }

    #[tokio::test]
    async fn test_start_time_uses_lookback() {
        let calls = CallLog::default();
        let log_source =
            MockLogSource::new(calls).with_stream("svc", "s1", vec![page(vec![], "A"), page(vec![], "A")]);
        let (orchestrator, harness) =
            orchestrator(log_source, None, vec![LogSourceConfig::new("svc", ParserKind::Plain)]);

        let before = (Utc::now() - Duration::days(2)).timestamp_millis();
        orchestrator.run().await.unwrap();
        let after = (Utc::now() - Duration::days(2)).timestamp_millis();

        let start_times = harness.log_source.start_times.lock().await;
        assert_eq!(start_times.len(), 2);
        assert!(start_times.iter().all(|t| *t >= before && *t <= after));
        assert_eq!(start_times[0], start_times[1]);
    }

    #[tokio::test]
    async fn test_lookback_out_of_range_fails_source() {
        let calls = CallLog::default();
        let log_source = MockLogSource::new(calls.clone())
            .with_stream("svc", "s1", vec![page(vec![RawLogRecord::new(1, "x")], "A")]);
        let (orchestrator, harness) =
            orchestrator(log_source, None, vec![LogSourceConfig::new("svc", ParserKind::Plain)]);
        let orchestrator = Orchestrator {
            config: OrchestratorConfig {
                lookback: Duration::hours(10_000_000_000),
                ..OrchestratorConfig::default()
            },
            ..orchestrator
        };

        let err = orchestrator.run().await.unwrap_err();

        match err {
            PipelineError::SourceFailed { phase, error, .. } => {
                assert_eq!(phase, SourcePhase::DrainingStream);
                assert!(matches!(*error, PipelineError::ConfigError(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(harness.log_source.start_times.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_sources_and_streams_run_in_order() {
        let calls = CallLog::default();
        let log_source = MockLogSource::new(calls.clone())
            .with_stream("a", "a1", vec![page(vec![RawLogRecord::new(1, "x")], "A"), page(vec![], "A")])
            .with_stream("a", "a2", vec![page(vec![RawLogRecord::new(2, "y")], "B"), page(vec![], "B")])
            .with_stream("b", "b1", vec![page(vec![], "C"), page(vec![], "C")]);
        let (orchestrator, harness) = orchestrator(
            log_source,
            None,
            vec![
                LogSourceConfig::new("a", ParserKind::Plain),
                LogSourceConfig::new("b", ParserKind::Json),
            ],
        );

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary.sources, 2);
        assert_eq!(summary.streams, 3);
        assert_eq!(summary.documents, 2);

        let calls = harness.calls.lock().await;
        let position = |needle: &str| calls.iter().position(|c| c == needle).unwrap();
        assert!(position("create logs-a") < position("bulk logs-a 1"));
        assert!(position("fetch a/a1 None") < position("fetch a/a2 None"));
        assert!(position("fetch a/a2 Some(\"B\")") < position("delete logs-b"));
        assert!(position("create logs-b") < position("fetch b/b1 None"));
    }

    #[tokio::test]
    async fn test_provisioning_failure_stops_run() {
        let calls = CallLog::default();
        let log_source = MockLogSource::new(calls.clone())
            .with_stream("a", "a1", vec![page(vec![RawLogRecord::new(1, "x")], "A")]);
        let (orchestrator, harness) = orchestrator(
            log_source,
            Some(SearchIndexError::api(
                403,
                Some("security_exception".to_string()),
                r#"{"error":{"type":"security_exception"},"status":403}"#,
            )),
            vec![
                LogSourceConfig::new("a", ParserKind::Plain),
                LogSourceConfig::new("b", ParserKind::Plain),
            ],
        );

        let err = orchestrator.run().await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::SourceFailed {
                phase: SourcePhase::Provisioning,
                ..
            }
        ));
        assert!(err.response_body().unwrap().contains("security_exception"));

        let calls = harness.calls.lock().await;
        assert!(!calls.iter().any(|c| c.starts_with("list")));
        assert!(!calls.iter().any(|c| c.contains("logs-b")));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_source() {
        let calls = CallLog::default();
        let mut log_source = MockLogSource::new(calls.clone())
            .with_stream("a", "a1", vec![page(vec![RawLogRecord::new(1, "x")], "A")]);
        log_source.fail_fetch = true;
        let (orchestrator, harness) =
            orchestrator(log_source, None, vec![LogSourceConfig::new("a", ParserKind::Plain)]);

        let err = orchestrator.run().await.unwrap_err();

        match err {
            PipelineError::SourceFailed {
                source_name,
                phase,
                error,
            } => {
                assert_eq!(source_name, "a");
                assert_eq!(phase, SourcePhase::DrainingStream);
                assert!(matches!(*error, PipelineError::SourceError(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(harness.payloads.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_sources_still_registers_pattern() {
        let calls = CallLog::default();
        let (orchestrator, harness) = orchestrator(MockLogSource::new(calls), None, vec![]);

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary, RunSummary::default());
        assert_eq!(*harness.calls.lock().await, vec!["register logs logs-*"]);
    }

    #[tokio::test]
    async fn test_custom_parser_output_wins() {
        struct Override;

        impl EventParser for Override {
            fn name(&self) -> &str {
                "override"
            }

            fn parse(&self, record: &RawLogRecord) -> ParsedRecord {
                ParsedRecord::from_raw(record).with_field("@logstream", "rewritten")
            }
        }

        let calls = CallLog::default();
        let log_source = MockLogSource::new(calls)
            .with_stream("svc", "s1", vec![page(vec![RawLogRecord::new(1, "x")], "A"), page(vec![], "A")]);
        let (orchestrator, harness) = orchestrator(
            log_source,
            None,
            vec![LogSourceConfig::with_parser("svc", Arc::new(Override))],
        );

        orchestrator.run().await.unwrap();

        let payloads = harness.payloads.lock().await;
        assert_eq!(payloads[0].lines()[1]["@logstream"], json!("rewritten"));
    }

    #[test]
    fn test_index_name() {
        assert_eq!(OrchestratorConfig::default().index_name("svc"), "logs-svc");
    }
}
