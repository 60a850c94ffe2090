//! Parser for structured JSON log lines.

use serde_json::Value;

use crate::parser::EventParser;
use log_indexer_shared::{ParsedRecord, RawLogRecord};

/// Lifts the top-level keys of a JSON object message into fields.
///
/// Anything that is not a JSON object yields only `@timestamp`. A
/// `@timestamp` key inside the message is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl EventParser for JsonParser {
    fn name(&self) -> &str {
        "json"
    }

    fn parse(&self, record: &RawLogRecord) -> ParsedRecord {
        let mut parsed = ParsedRecord::from_raw(record);

        if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(record.message.trim()) {
            for (key, value) in fields {
                parsed.insert(key, value);
            }
        }

        parsed
    }
}
