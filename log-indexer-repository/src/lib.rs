//! # Log Indexer Repository
//!
//! Traits and implementations for the search-engine side of the log
//! indexer: index provisioning, bulk writes, and index-pattern registration
//! with the dashboards layer. Includes a concrete implementation for
//! OpenSearch.

pub mod bulk;
pub mod client;
pub mod config;
pub mod dashboards;
pub mod errors;
pub mod index_config;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use bulk::BulkPayload;
pub use client::SearchIndexClient;
pub use config::SearchIndexConfig;
pub use dashboards::DashboardsClient;
pub use errors::SearchIndexError;
pub use interfaces::{IndexPatternRegistrar, SearchIndexProvider};
pub use opensearch::OpenSearchClient;
pub use types::{BatchOperationResult, BatchOperationSummary, IndexPattern};
