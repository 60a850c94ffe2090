//! # Log Indexer Shared
//!
//! Data structures that flow between the log source, the parsers and the
//! search index.

mod document;
mod record;

pub use document::{IndexedDocument, LOG_GROUP_FIELD, LOG_STREAM_FIELD};
pub use record::{ParsedRecord, RawLogRecord, TIMESTAMP_FIELD};
