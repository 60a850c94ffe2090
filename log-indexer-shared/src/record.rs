//! Raw and parsed log records.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the mandatory time field carried by every parsed record.
pub const TIMESTAMP_FIELD: &str = "@timestamp";

/// A log event as returned by the remote log source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLogRecord {
    /// Event time in epoch milliseconds.
    pub timestamp: i64,
    /// The raw log line.
    pub message: String,
    /// Time the source received the event, in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion_time: Option<i64>,
}

impl RawLogRecord {
    /// Create a record without ingestion metadata.
    pub fn new(timestamp: i64, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
            ingestion_time: None,
        }
    }

    /// Set the ingestion time.
    pub fn with_ingestion_time(mut self, ingestion_time: i64) -> Self {
        self.ingestion_time = Some(ingestion_time);
        self
    }

    /// The event time as a UTC datetime.
    ///
    /// Timestamps outside chrono's range map to the Unix epoch so that a
    /// record always has a usable time.
    pub fn datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp)
            .single()
            .unwrap_or_default()
    }

    /// The record's own fields, keyed by their wire names.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("timestamp".to_string(), Value::from(self.timestamp));
        fields.insert("message".to_string(), Value::from(self.message.clone()));
        if let Some(ingestion_time) = self.ingestion_time {
            fields.insert("ingestionTime".to_string(), Value::from(ingestion_time));
        }
        fields
    }
}

/// Structured output of an event parser.
///
/// Always carries `@timestamp`; any other fields are defined by the parser
/// that produced the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    timestamp: DateTime<Utc>,
    fields: Map<String, Value>,
}

impl ParsedRecord {
    /// Create a record holding only a timestamp.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            fields: Map::new(),
        }
    }

    /// Minimal record for a raw event: its own timestamp and nothing else.
    pub fn from_raw(raw: &RawLogRecord) -> Self {
        Self::new(raw.datetime())
    }

    /// Add a field, replacing any previous value under the same key.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field. `@timestamp` is reserved and cannot be overwritten
    /// this way.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if key != TIMESTAMP_FIELD {
            self.fields.insert(key, value.into());
        }
    }

    /// Source-specific fields, without `@timestamp`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Flatten into a JSON object including `@timestamp`.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = self.fields;
        fields.insert(
            TIMESTAMP_FIELD.to_string(),
            Value::from(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        fields
    }
}
