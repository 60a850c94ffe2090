//! Index pattern registration trait definition.

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::IndexPattern;

/// Registers index patterns with the visualization layer
/// (OpenSearch Dashboards or Kibana).
#[async_trait]
pub trait IndexPatternRegistrar: Send + Sync {
    /// Create or overwrite the index pattern saved object.
    ///
    /// Registration is idempotent: registering the same pattern twice
    /// leaves one saved object.
    async fn register_index_pattern(&self, pattern: &IndexPattern) -> Result<(), SearchIndexError>;
}
