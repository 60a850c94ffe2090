//! Bulk wire format.
//!
//! A bulk request body is newline-delimited JSON: one action line naming the
//! target index followed by the document body, repeated for every document.

use serde_json::{json, Map, Value};

use log_indexer_shared::IndexedDocument;

/// The lines of one bulk request, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkPayload {
    index: String,
    lines: Vec<Value>,
}

impl BulkPayload {
    /// Build the action/document line pairs for `documents`.
    pub fn build(index: &str, document_type: Option<&str>, documents: &[IndexedDocument]) -> Self {
        let action = action_line(index, document_type);

        let mut lines = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            lines.push(action.clone());
            lines.push(Value::Object(document.as_map().clone()));
        }

        Self {
            index: index.to_string(),
            lines,
        }
    }

    /// Target index named by every action line.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Number of documents carried by the payload.
    pub fn document_count(&self) -> usize {
        self.lines.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Value] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<Value> {
        self.lines
    }

    /// Render the payload as it goes over the wire; every line ends in `\n`.
    pub fn to_ndjson(&self) -> String {
        let mut body = String::new();
        for line in &self.lines {
            body.push_str(&line.to_string());
            body.push('\n');
        }
        body
    }
}

fn action_line(index: &str, document_type: Option<&str>) -> Value {
    let mut meta = Map::new();
    meta.insert("_index".to_string(), json!(index));
    if let Some(document_type) = document_type {
        meta.insert("_type".to_string(), json!(document_type));
    }
    json!({ "index": meta })
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_indexer_shared::{ParsedRecord, RawLogRecord};

    fn documents(n: usize) -> Vec<IndexedDocument> {
        (0..n)
            .map(|i| {
                let raw = RawLogRecord::new(1000 + i as i64, format!("line {}", i));
                IndexedDocument::merge(&raw, "g", "s", ParsedRecord::from_raw(&raw))
            })
            .collect()
    }

    #[test]
    fn test_payload_shape() {
        let docs = documents(3);
        let payload = BulkPayload::build("logs-svc", Some("_doc"), &docs);
        let body = payload.to_ndjson();

        assert!(body.ends_with('\n'));
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(payload.document_count(), 3);

        for (i, pair) in lines.chunks(2).enumerate() {
            let action: Value = serde_json::from_str(pair[0]).unwrap();
            assert_eq!(action["index"]["_index"], "logs-svc");
            assert_eq!(action["index"]["_type"], "_doc");

            let body: Value = serde_json::from_str(pair[1]).unwrap();
            assert_eq!(body, docs[i].clone().into_value());
        }
    }

    #[test]
    fn test_action_line_wire_format() {
        let payload = BulkPayload::build("logs-svc", Some("_doc"), &documents(1));
        let first = payload.to_ndjson().lines().next().unwrap().to_string();

        assert_eq!(first, r#"{"index":{"_index":"logs-svc","_type":"_doc"}}"#);
    }

    #[test]
    fn test_action_line_without_type() {
        let payload = BulkPayload::build("logs-svc", None, &documents(1));
        assert!(payload.lines()[0]["index"].get("_type").is_none());
    }

    #[test]
    fn test_empty_payload() {
        let payload = BulkPayload::build("logs-svc", Some("_doc"), &[]);
        assert!(payload.is_empty());
        assert_eq!(payload.to_ndjson(), "");
    }
}
