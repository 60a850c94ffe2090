//! Request and response types for search index operations.

use serde::Serialize;

/// Outcome of one document within a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOperationResult {
    /// Position of the document within the batch.
    pub position: usize,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error reason if the operation failed.
    pub error: Option<String>,
}

/// Summary of a bulk request: aggregate counts and individual results.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOperationSummary {
    /// Total number of documents in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each document.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Summary of a batch with nothing in it.
    pub fn empty() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: 0,
            results: vec![],
        }
    }

    /// Summary of a batch in which every document succeeded.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: 0,
            results: (0..total)
                .map(|position| BatchOperationResult {
                    position,
                    success: true,
                    error: None,
                })
                .collect(),
        }
    }

    /// First reported failure reason, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.results.iter().find_map(|r| r.error.as_deref())
    }
}

/// A dashboards index pattern (saved object).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPattern {
    /// Saved-object id.
    pub id: String,
    /// Pattern matched against index names, e.g. `logs-*`.
    pub title: String,
    /// Field used as the time axis.
    pub time_field_name: String,
}

/// Attributes object sent to the saved-objects API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexPatternAttributes<'a> {
    pub title: &'a str,
    pub time_field_name: &'a str,
}

impl IndexPattern {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        time_field_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time_field_name: time_field_name.into(),
        }
    }

    pub(crate) fn attributes(&self) -> IndexPatternAttributes<'_> {
        IndexPatternAttributes {
            title: &self.title,
            time_field_name: &self.time_field_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_pattern_attributes() {
        let pattern = IndexPattern::new("logs", "logs-*", "@timestamp");
        let value = json!({ "attributes": pattern.attributes() });

        assert_eq!(
            value,
            json!({"attributes": {"title": "logs-*", "timeFieldName": "@timestamp"}})
        );
    }

    #[test]
    fn test_summary_first_error() {
        let mut summary = BatchOperationSummary::all_succeeded(3);
        assert!(summary.first_error().is_none());

        summary.results[1].success = false;
        summary.results[1].error = Some("mapper_parsing_exception".to_string());
        assert_eq!(summary.first_error(), Some("mapper_parsing_exception"));
    }
}
