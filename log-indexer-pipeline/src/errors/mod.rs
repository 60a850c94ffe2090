//! Error types for the log indexer pipeline.

use std::fmt;

use log_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Stage of a log source's ingestion, used to report where it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePhase {
    Provisioning,
    EnumeratingStreams,
    DrainingStream,
}

impl fmt::Display for SourcePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Self::Provisioning => "provisioning",
            Self::EnumeratingStreams => "enumerating streams",
            Self::DrainingStream => "draining stream",
        };
        f.write_str(phase)
    }
}

/// Errors that can occur in the log indexer pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A request to the log source failed.
    #[error("Source error: {0}")]
    SourceError(String),

    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),

    /// Ingestion of a log source was aborted.
    #[error("Log source '{source_name}' failed while {phase}: {error}")]
    SourceFailed {
        source_name: String,
        phase: SourcePhase,
        error: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Create a source error.
    pub fn log_source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Wrap an error with the source and phase it occurred in.
    pub fn source_failed(
        source_name: impl Into<String>,
        phase: SourcePhase,
        error: impl Into<PipelineError>,
    ) -> Self {
        Self::SourceFailed {
            source_name: source_name.into(),
            phase,
            error: Box::new(error.into()),
        }
    }

    /// Response body of the underlying search engine failure, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::SearchError(e) => e.response_body(),
            Self::SourceFailed { error, .. } => error.response_body(),
            _ => None,
        }
    }
}
