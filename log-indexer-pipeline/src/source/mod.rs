//! Log source module for the log indexer pipeline.
//!
//! Provides access to the remote log service and the paginating reader that
//! drains one stream at a time.

mod cloudwatch;
mod log_source;
mod reader;

pub use cloudwatch::CloudWatchLogSource;
pub use log_source::{list_all_streams, LogPage, LogSource, StreamPage};
pub use reader::LogSourceReader;
