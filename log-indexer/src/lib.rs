//! # Log Indexer
//!
//! Main library for the CloudWatch log indexer.
//!
//! This crate provides the entry point and configuration for running
//! the log indexer pipeline.

pub mod config;

pub use config::{Dependencies, IndexerConfig};

use std::future::Future;

use log_indexer_pipeline::orchestrator::RunSummary;
use log_indexer_pipeline::PipelineError;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] log_indexer_pipeline::PipelineError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] log_indexer_repository::SearchIndexError),

    /// The run was stopped by a shutdown signal before it finished.
    #[error("Interrupted before the run completed; indices may be partially loaded")]
    Interrupted,
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Raw response body of the failed search engine or dashboards call.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::PipelineError(e) => e.response_body(),
            Self::SearchError(e) => e.response_body(),
            Self::ConfigError(_) | Self::Interrupted => None,
        }
    }
}

/// Drive `run` to completion unless `shutdown` resolves first.
///
/// An interrupted run is an error, so the process never reports success for
/// a partially loaded index.
pub async fn run_until_shutdown<R, S>(run: R, shutdown: S) -> Result<RunSummary, IndexingError>
where
    R: Future<Output = Result<RunSummary, PipelineError>>,
    S: Future,
{
    tokio::select! {
        result = run => Ok(result?),
        _ = shutdown => {
            warn!("Received shutdown signal, abandoning run");
            Err(IndexingError::Interrupted)
        }
    }
}
