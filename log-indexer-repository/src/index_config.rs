//! Index settings and mappings for log indices.

use serde_json::{json, Value};

use log_indexer_shared::{LOG_GROUP_FIELD, LOG_STREAM_FIELD, TIMESTAMP_FIELD};

/// Get the settings and mappings used when creating a log index.
///
/// Only the fields the pipeline itself adds are mapped; everything a parser
/// emits is left to dynamic mapping.
///
/// - `@timestamp` as `date`, the time field of the dashboards pattern
/// - `@loggroup` / `@logstream` as `keyword` for exact filtering
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                TIMESTAMP_FIELD: {
                    "type": "date"
                },
                LOG_GROUP_FIELD: {
                    "type": "keyword"
                },
                LOG_STREAM_FIELD: {
                    "type": "keyword"
                }
            }
        }
    })
}
