//! Interface definitions for the search-engine side.
//!
//! These traits allow for dependency injection and swappable backend
//! implementations (OpenSearch, Elasticsearch, mocks in tests).

mod index_pattern_registrar;
mod search_index_provider;

pub use index_pattern_registrar::IndexPatternRegistrar;
pub use search_index_provider::SearchIndexProvider;
