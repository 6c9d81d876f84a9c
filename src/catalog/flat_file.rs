//! Flat-file fallback source.
//!
//! When every GraphQL query shape has been rejected, the pipeline falls
//! back to the public supported-game list: a static JSON resource exposing
//! the catalog as a plain array of flat records. This is a single
//! non-retried fetch; no further fallback exists below this layer, so any
//! failure here is fatal for the whole acquisition pipeline.

use serde_json::Value;

use crate::clients::{Transport, TransportError};

/// Fetches the static game list and returns its records.
///
/// The records are flat (no nested image role map or computed values);
/// the normalizer simply produces sparser entities from them.
///
/// # Errors
///
/// Returns [`TransportError`] on any network, status or decode failure, or
/// [`TransportError::MissingData`] when the body is valid JSON but not a
/// list.
pub async fn fetch_flat_list(
    transport: &Transport,
    url: &str,
) -> Result<Vec<Value>, TransportError> {
    tracing::info!(url, "Fetching flat-file game list");

    let body = transport.get_json(url).await?;
    match body {
        Value::Array(records) => {
            tracing::info!(count = records.len(), "Fetched flat-file game list");
            Ok(records)
        }
        other => {
            tracing::warn!(
                "Flat-file response was not a JSON list (got {})",
                json_kind(&other)
            );
            Err(TransportError::MissingData)
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
