//! Environment-driven settings for the log indexer.

use std::collections::HashSet;
use std::env;

use chrono::{Duration, Utc};

use crate::IndexingError;
use log_indexer_pipeline::orchestrator::{LogSourceConfig, OrchestratorConfig};
use log_indexer_pipeline::parser::ParserKind;
use log_indexer_repository::{IndexPattern, SearchIndexConfig};
use log_indexer_shared::TIMESTAMP_FIELD;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default dashboards API base URL.
const DEFAULT_DASHBOARDS_URL: &str = "http://localhost:5601/api";

/// Default saved-object id of the index pattern.
const DEFAULT_INDEX_PATTERN_ID: &str = "logs";

/// Default destination index prefix.
const DEFAULT_INDEX_PREFIX: &str = "logs-";

/// Default lookback window in hours.
const DEFAULT_LOOKBACK_HOURS: i64 = 48;

/// Default AWS region for CloudWatch Logs.
const DEFAULT_AWS_REGION: &str = "eu-west-1";

/// Settings for one indexer run.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub opensearch_url: String,
    pub opensearch_auth: Option<(String, String)>,
    pub dashboards_url: String,
    pub aws_region: String,
    pub aws_profile: Option<String>,
    pub sources: Vec<LogSourceConfig>,
    pub orchestrator: OrchestratorConfig,
    pub search: SearchIndexConfig,
}

impl IndexerConfig {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_USERNAME` / `OPENSEARCH_PASSWORD`: optional basic auth
    /// - `DASHBOARDS_URL`: dashboards API base (default: http://localhost:5601/api)
    /// - `INDEX_PATTERN_ID`: index pattern saved-object id (default: logs)
    /// - `INDEX_PREFIX`: destination index prefix (default: logs-)
    /// - `LOOKBACK_HOURS`: how far back each stream is read (default: 48)
    /// - `LOG_SOURCES`: comma list of `name:parser` entries (required)
    /// - `AWS_REGION`: CloudWatch region (default: eu-west-1)
    /// - `AWS_PROFILE`: optional shared-credentials profile
    /// - `BULK_DOCUMENT_TYPE`: `_type` of bulk actions (default: _doc, empty omits it)
    /// - `BULK_TOLERATE_ITEM_FAILURES`: log rather than fail on bulk item errors (default: false)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the value of a variable
    /// if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IndexingError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let sources = lookup("LOG_SOURCES")
            .ok_or_else(|| IndexingError::config("LOG_SOURCES is not set"))
            .and_then(|value| parse_log_sources(&value))?;

        let opensearch_auth = match (lookup("OPENSEARCH_USERNAME"), lookup("OPENSEARCH_PASSWORD")) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            _ => {
                return Err(IndexingError::config(
                    "OPENSEARCH_USERNAME and OPENSEARCH_PASSWORD must be set together",
                ))
            }
        };

        let lookback = match lookup("LOOKBACK_HOURS") {
            Some(value) => parse_lookback(&value)?,
            None => Duration::hours(DEFAULT_LOOKBACK_HOURS),
        };

        let index_prefix = get("INDEX_PREFIX", DEFAULT_INDEX_PREFIX);
        let orchestrator = OrchestratorConfig {
            lookback,
            index_pattern: IndexPattern::new(
                get("INDEX_PATTERN_ID", DEFAULT_INDEX_PATTERN_ID),
                format!("{}*", index_prefix),
                TIMESTAMP_FIELD,
            ),
            index_prefix,
        };

        let mut search = SearchIndexConfig::default();
        if let Some(document_type) = lookup("BULK_DOCUMENT_TYPE") {
            search = search.with_document_type(document_type);
        }
        if let Some(value) = lookup("BULK_TOLERATE_ITEM_FAILURES") {
            search = search.tolerating_item_failures(parse_flag("BULK_TOLERATE_ITEM_FAILURES", &value)?);
        }

        Ok(Self {
            opensearch_url: get("OPENSEARCH_URL", DEFAULT_OPENSEARCH_URL),
            opensearch_auth,
            dashboards_url: get("DASHBOARDS_URL", DEFAULT_DASHBOARDS_URL),
            aws_region: get("AWS_REGION", DEFAULT_AWS_REGION),
            aws_profile: lookup("AWS_PROFILE").filter(|p| !p.is_empty()),
            sources,
            orchestrator,
            search,
        })
    }
}

/// Parse a `LOG_SOURCES` value such as `api:python_logging,worker:json,cron`.
///
/// An entry without a parser uses `plain`. Each log group may appear once.
pub fn parse_log_sources(value: &str) -> Result<Vec<LogSourceConfig>, IndexingError> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, kind) = match entry.split_once(':') {
            Some((name, parser)) => (
                name.trim(),
                parser
                    .parse::<ParserKind>()
                    .map_err(|e| IndexingError::config(format!("log source '{}': {}", name.trim(), e)))?,
            ),
            None => (entry, ParserKind::Plain),
        };

        if name.is_empty() {
            return Err(IndexingError::config(format!(
                "log source entry '{}' has no name",
                entry
            )));
        }
        if !seen.insert(name.to_string()) {
            return Err(IndexingError::config(format!(
                "log source '{}' is listed more than once",
                name
            )));
        }

        sources.push(LogSourceConfig::new(name, kind));
    }

    if sources.is_empty() {
        return Err(IndexingError::config("LOG_SOURCES names no log sources"));
    }

    Ok(sources)
}

/// Parse `LOOKBACK_HOURS`. The start of the window must be a representable
/// date.
fn parse_lookback(value: &str) -> Result<Duration, IndexingError> {
    let hours = value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|hours| *hours > 0)
        .ok_or_else(|| {
            IndexingError::config(format!(
                "LOOKBACK_HOURS must be a positive integer, got '{}'",
                value
            ))
        })?;

    Duration::try_hours(hours)
        .filter(|lookback| Utc::now().checked_sub_signed(*lookback).is_some())
        .ok_or_else(|| {
            IndexingError::config(format!("LOOKBACK_HOURS is out of range, got '{}'", value))
        })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, IndexingError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(IndexingError::config(format!(
            "{} must be true or false, got '{}'",
            key, other
        ))),
    }
}
