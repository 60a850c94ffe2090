//! Event parsers for the log indexer pipeline.
//!
//! Each log source names a parser in its configuration. The name is resolved
//! to an implementation once, when configuration is loaded.

mod json;
mod python_logging;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::PipelineError;
use log_indexer_shared::{ParsedRecord, RawLogRecord};

pub use json::JsonParser;
pub use python_logging::PythonLoggingParser;

/// Turns a raw log event into a structured record.
///
/// Parsers never fail: input they cannot structure still yields a record
/// carrying `@timestamp` taken from the event's own timestamp.
pub trait EventParser: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn parse(&self, record: &RawLogRecord) -> ParsedRecord;
}

/// Emits only `@timestamp`; the raw message passes through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainParser;

impl EventParser for PlainParser {
    fn name(&self) -> &str {
        "plain"
    }

    fn parse(&self, record: &RawLogRecord) -> ParsedRecord {
        ParsedRecord::from_raw(record)
    }
}

/// The parsers that can be selected from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    Plain,
    PythonLogging,
    Json,
}

impl ParserKind {
    /// Build the parser implementation for this kind.
    pub fn parser(self) -> Arc<dyn EventParser> {
        match self {
            Self::Plain => Arc::new(PlainParser),
            Self::PythonLogging => Arc::new(PythonLoggingParser),
            Self::Json => Arc::new(JsonParser),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::PythonLogging => "python_logging",
            Self::Json => "json",
        }
    }
}

impl FromStr for ParserKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "plain" => Ok(Self::Plain),
            "python_logging" => Ok(Self::PythonLogging),
            "json" => Ok(Self::Json),
            other => Err(PipelineError::config(format!(
                "unknown parser '{}' (expected plain, python_logging or json)",
                other
            ))),
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
