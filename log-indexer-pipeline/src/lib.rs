//! # Log Indexer Pipeline
//!
//! This crate provides the pipeline components for reading log events from
//! a remote log source and indexing them into OpenSearch.
//!
//! ## Architecture
//!
//! The pipeline follows the Source-Parser-Loader pattern:
//!
//! 1. **Source**: Pages through a log stream with continuation tokens
//! 2. **Parser**: Turns each raw event into a structured record
//! 3. **Loader**: Merges records into documents and bulk-indexes them
//! 4. **Orchestrator**: Provisions indices and drives every stream through the pipeline

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod parser;
pub mod source;

pub use errors::{PipelineError, SourcePhase};
