//! The flattened document written to the search index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::{ParsedRecord, RawLogRecord};

/// Field tagging every document with the log source (group) it came from.
pub const LOG_GROUP_FIELD: &str = "@loggroup";

/// Field tagging every document with the stream it came from.
pub const LOG_STREAM_FIELD: &str = "@logstream";

/// A search document built from one log event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexedDocument(Map<String, Value>);

impl IndexedDocument {
    /// Merge the three field layers of a log event into one document.
    ///
    /// Layers are applied in order and a later layer overwrites earlier keys:
    /// 1. raw record fields
    /// 2. `@loggroup` / `@logstream` tags
    /// 3. parsed fields (including `@timestamp`)
    pub fn merge(
        raw: &RawLogRecord,
        log_group: &str,
        log_stream: &str,
        parsed: ParsedRecord,
    ) -> Self {
        let mut fields = raw.to_fields();
        fields.insert(LOG_GROUP_FIELD.to_string(), Value::from(log_group));
        fields.insert(LOG_STREAM_FIELD.to_string(), Value::from(log_stream));
        fields.extend(parsed.into_fields());
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
