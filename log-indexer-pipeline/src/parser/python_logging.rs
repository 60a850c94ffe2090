//! Parser for Python `logging` style lines.
//!
//! ```text
//! 2020-10-04 07:56:05,703 INFO FEED Checking feeds
//! ```

use chrono::NaiveDate;

use crate::parser::EventParser;
use log_indexer_shared::{ParsedRecord, RawLogRecord};

/// Splits `<date> <time> <level> <module> <message...>` into fields.
///
/// Lines that do not start with a `YYYY-MM-DD` date followed by at least
/// three more space-separated tokens yield only `@timestamp`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonLoggingParser;

impl EventParser for PythonLoggingParser {
    fn name(&self) -> &str {
        "python_logging"
    }

    fn parse(&self, record: &RawLogRecord) -> ParsedRecord {
        let parsed = ParsedRecord::from_raw(record);

        let mut parts = record.message.splitn(5, ' ');
        let (Some(date), Some(time), Some(level), Some(module)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return parsed;
        };
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return parsed;
        }

        parsed
            .with_field("date", date)
            .with_field("time", time)
            .with_field("level", level)
            .with_field("module", module)
            .with_field("message", parts.next().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_indexer_shared::TIMESTAMP_FIELD;
    use serde_json::json;

    #[test]
    fn test_parse_well_formed_line() {
        let raw = RawLogRecord::new(
            1601798165703,
            "2020-10-04 07:56:05,703 INFO FEED Checking feeds",
        );

        let fields = PythonLoggingParser.parse(&raw).into_fields();

        assert_eq!(
            serde_json::Value::Object(fields),
            json!({
                "@timestamp": "2020-10-04T07:56:05.703Z",
                "date": "2020-10-04",
                "time": "07:56:05,703",
                "level": "INFO",
                "module": "FEED",
                "message": "Checking feeds"
            })
        );
    }

    #[test]
    fn test_message_keeps_inner_spacing() {
        let raw = RawLogRecord::new(0, "2020-10-04 07:56:05,703 ERROR BOT a  b c");
        let record = PythonLoggingParser.parse(&raw);

        assert_eq!(record.fields()["message"], json!("a  b c"));
    }

    #[test]
    fn test_line_without_message() {
        let raw = RawLogRecord::new(0, "2020-10-04 07:56:05,703 INFO FEED");
        let record = PythonLoggingParser.parse(&raw);

        assert_eq!(record.fields()["module"], json!("FEED"));
        assert_eq!(record.fields()["message"], json!(""));
    }

    #[test]
    fn test_invalid_date_degrades() {
        for message in ["2020-13-45 07:56:05,703 INFO FEED x", "WARNING 07:56:05 INFO FEED x"] {
            let raw = RawLogRecord::new(0, message);
            assert!(PythonLoggingParser.parse(&raw).fields().is_empty(), "{}", message);
        }
    }

    #[test]
    fn test_malformed_line_degrades() {
        for message in ["Traceback (most recent call last):", "", "  File \"bot.py\", line 3, in <module>"] {
            let raw = RawLogRecord::new(1601798165703, message);
            let record = PythonLoggingParser.parse(&raw);

            assert!(record.fields().is_empty(), "unexpected fields for {:?}", message);
            let fields = record.into_fields();
            assert_eq!(fields[TIMESTAMP_FIELD], json!("2020-10-04T07:56:05.703Z"));
        }
    }
}
