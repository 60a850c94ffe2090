//! Configuration types for the SearchIndexClient.

/// Mapping type written into bulk action lines unless configured otherwise.
pub const DEFAULT_DOCUMENT_TYPE: &str = "_doc";

/// Configuration for the SearchIndexClient.
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    /// `_type` written into each bulk action line.
    /// Set to None for clusters that reject mapping types.
    pub document_type: Option<String>,
    /// When true, per-document failures inside a bulk response are logged
    /// instead of failing the batch.
    pub tolerate_item_failures: bool,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            document_type: Some(DEFAULT_DOCUMENT_TYPE.to_string()),
            tolerate_item_failures: false,
        }
    }
}

impl SearchIndexConfig {
    /// Create a config with a custom document type. An empty string omits
    /// `_type` from action lines.
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        let document_type = document_type.into();
        self.document_type = if document_type.is_empty() {
            None
        } else {
            Some(document_type)
        };
        self
    }

    /// Log per-document bulk failures instead of failing the batch.
    pub fn tolerating_item_failures(mut self, tolerate: bool) -> Self {
        self.tolerate_item_failures = tolerate;
        self
    }
}
