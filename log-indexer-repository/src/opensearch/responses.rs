//! Interpretation of OpenSearch response bodies.

use serde_json::Value;

use crate::types::{BatchOperationResult, BatchOperationSummary};

/// Structured error type of an error response (`error.type`).
pub(crate) fn error_type(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(|e| e.get("type"))
        .and_then(Value::as_str)
}

/// Build a summary from a `_bulk` response body.
///
/// Each entry of `items` is keyed by its action (`index`, `create`, ...).
/// An item failed if it carries an `error` or a non-2xx `status`. When the
/// response has no `items`, the `errors` flag decides for the whole batch.
pub(crate) fn summarize_bulk_response(body: &Value, total: usize) -> BatchOperationSummary {
    let Some(items) = body.get("items").and_then(Value::as_array) else {
        if body.get("errors").and_then(Value::as_bool) == Some(true) {
            return BatchOperationSummary {
                total,
                succeeded: 0,
                failed: total,
                results: (0..total)
                    .map(|position| BatchOperationResult {
                        position,
                        success: false,
                        error: Some("bulk response reported errors".to_string()),
                    })
                    .collect(),
            };
        }
        return BatchOperationSummary::all_succeeded(total);
    };

    let results: Vec<BatchOperationResult> = items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let outcome = item.as_object().and_then(|o| o.values().next());
            let error = outcome.and_then(|o| o.get("error")).map(describe_error);
            let status_ok = outcome
                .and_then(|o| o.get("status"))
                .and_then(Value::as_u64)
                .map_or(true, |s| (200..300).contains(&s));

            BatchOperationResult {
                position,
                success: error.is_none() && status_ok,
                error: error.or_else(|| (!status_ok).then(|| "non-success status".to_string())),
            }
        })
        .collect();

    let failed = results.iter().filter(|r| !r.success).count();
    BatchOperationSummary {
        total: results.len(),
        succeeded: results.len() - failed,
        failed,
        results,
    }
}

fn describe_error(error: &Value) -> String {
    match (
        error.get("type").and_then(Value::as_str),
        error.get("reason").and_then(Value::as_str),
    ) {
        (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
        (Some(kind), None) => kind.to_string(),
        _ => error.to_string(),
    }
}
