//! Transport-level error types.
//!
//! This module contains error types for single-request execution and retry
//! exhaustion.
//!
//! # Error Handling
//!
//! The transport layer distinguishes protocol-level failures from
//! application-level ones so callers can decide between retrying and
//! falling back to another query shape:
//!
//! - [`TransportError::Network`]: connection, TLS or timeout failures
//! - [`TransportError::Status`]: non-2xx HTTP responses
//! - [`TransportError::Decode`]: response body was not valid JSON
//! - [`TransportError::Api`]: the GraphQL response carried an `errors` array
//! - [`TransportError::MissingData`]: the response had no usable `data` field
//! - [`RetriesExhaustedError`]: all retry attempts failed; wraps the last
//!   observed [`TransportError`] as its source
//!
//! # Example
//!
//! ```rust,ignore
//! use gfn_datafeed::clients::TransportError;
//!
//! match transport.execute(&query).await {
//!     Ok(data) => println!("Data: {data}"),
//!     Err(TransportError::Api { errors }) => {
//!         // Shape rejected by the remote; try the next candidate.
//!         println!("GraphQL errors: {errors}");
//!     }
//!     Err(e) => println!("Transport failure: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error type for a single request against the remote endpoint.
///
/// The transport never retries; it fails immediately with the most specific
/// variant it can determine. Application-level failures (the response body
/// itself signalling an error) use [`Api`](Self::Api) or
/// [`MissingData`](Self::MissingData) and are distinguishable from
/// protocol-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or connection error (includes timeouts).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status code.
    #[error("HTTP status {code}: {body}")]
    Status {
        /// The HTTP status code of the response.
        code: u16,
        /// The response body, truncated for diagnostics.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The GraphQL response carried a non-empty `errors` array.
    ///
    /// This is an application-level rejection (typically of the query's
    /// field selection) and is never worth retrying with the same shape.
    #[error("GraphQL errors: {errors}")]
    Api {
        /// The serialized `errors` array from the response.
        errors: String,
    },

    /// The GraphQL response contained neither `errors` nor a usable `data`
    /// field.
    #[error("GraphQL response contained no data")]
    MissingData,
}

/// Error returned when all retry attempts have been exhausted.
///
/// The last observed failure is preserved as the error source; no success
/// is ever synthesized.
///
/// # Example
///
/// ```rust
/// use gfn_datafeed::clients::{RetriesExhaustedError, TransportError};
///
/// let error = RetriesExhaustedError {
///     attempts: 4,
///     source: TransportError::MissingData,
/// };
///
/// assert!(error.to_string().contains("4"));
/// ```
#[derive(Debug, Error)]
#[error("Exhausted maximum attempt count of {attempts}. Last error: {source}")]
pub struct RetriesExhaustedError {
    /// The number of attempts that were made.
    pub attempts: u32,
    /// The failure observed on the final attempt.
    #[source]
    pub source: TransportError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_includes_code_and_body() {
        let error = TransportError::Status {
            code: 503,
            body: "Service Unavailable".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("Service Unavailable"));
    }

    #[test]
    fn test_api_error_includes_graphql_errors() {
        let error = TransportError::Api {
            errors: r#"[{"message":"Cannot query field \"bogus\""}]"#.to_string(),
        };
        assert!(error.to_string().contains("Cannot query field"));
    }

    #[test]
    fn test_retries_exhausted_preserves_source() {
        use std::error::Error;

        let error = RetriesExhaustedError {
            attempts: 4,
            source: TransportError::MissingData,
        };

        assert!(error.to_string().contains("attempt count of 4"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let transport_error: &dyn std::error::Error = &TransportError::MissingData;
        let _ = transport_error;

        let retries_error: &dyn std::error::Error = &RetriesExhaustedError {
            attempts: 1,
            source: TransportError::MissingData,
        };
        let _ = retries_error;
    }
}
