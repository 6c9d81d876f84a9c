//! Transport layer for the GeForce NOW endpoints.
//!
//! This module provides the [`Transport`] type for executing single requests
//! against the remote GraphQL endpoint and the flat-file fallback. The
//! transport itself never retries; retry behavior lives in
//! [`execute_with_retry`](Transport::execute_with_retry) driven by a
//! [`RetryPolicy`].

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::errors::{RetriesExhaustedError, TransportError};
use crate::clients::retry::RetryPolicy;
use crate::config::CatalogConfig;

/// Crate version from Cargo.toml.
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum number of response-body bytes carried in status errors.
const ERROR_BODY_LIMIT: usize = 512;

/// Transport for the catalog acquisition pipeline.
///
/// The transport owns one long-lived `reqwest::Client` created at
/// construction and shared read-only by every layer above it. Default
/// headers (Accept, User-Agent) are assembled once.
///
/// # Thread Safety
///
/// `Transport` is `Send + Sync`, making it safe to share across async tasks,
/// although the pipeline itself issues requests strictly sequentially.
///
/// # Example
///
/// ```rust
/// use gfn_datafeed::{CatalogConfig, clients::Transport};
///
/// let config = CatalogConfig::builder().build().unwrap();
/// let transport = Transport::new(&config);
/// assert_eq!(transport.graphql_url(), "https://games.geforce.com/graphql");
/// ```
#[derive(Debug)]
pub struct Transport {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// The GraphQL endpoint URL.
    graphql_url: String,
    /// Retry policy applied by [`execute_with_retry`](Self::execute_with_retry).
    retry_policy: RetryPolicy,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify Transport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Transport>();
};

impl Transport {
    /// Creates a new transport from the pipeline configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        // Build User-Agent header
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}GeForce NOW DataFeed v{CRATE_VERSION} | Rust {rust_version}"
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            graphql_url: config.graphql_url().to_string(),
            retry_policy: RetryPolicy::from_config(config),
            default_headers,
        }
    }

    /// Returns the GraphQL endpoint URL for this transport.
    #[must_use]
    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Returns the default headers for this transport.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the retry policy applied by
    /// [`execute_with_retry`](Self::execute_with_retry).
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Executes one GraphQL query and returns the response's `data` value.
    ///
    /// This is a single request with no retry. Protocol-level failures
    /// (connection, timeout, non-success status) and application-level
    /// failures (a non-empty `errors` array, a missing `data` field) are
    /// surfaced as distinct [`TransportError`] variants; there is no silent
    /// partial success.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if:
    /// - The request cannot be sent (`Network`)
    /// - A non-2xx status is received (`Status`)
    /// - The body is not valid JSON (`Decode`)
    /// - The response carries GraphQL errors (`Api`)
    /// - The response has no usable `data` field (`MissingData`)
    pub async fn execute(&self, query: &str) -> Result<Value, TransportError> {
        let body = serde_json::json!({ "query": query });

        let mut req_builder = self.client.post(&self.graphql_url).json(&body);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        let res = req_builder.send().await?;
        let code = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();

        if !(200..300).contains(&code) {
            return Err(TransportError::Status {
                code,
                body: truncate_body(&text),
            });
        }

        let parsed: Value = serde_json::from_str(&text)?;

        if let Some(errors) = parsed.get("errors") {
            let is_rejection = errors.as_array().map_or(false, |a| !a.is_empty());
            if is_rejection {
                return Err(TransportError::Api {
                    errors: errors.to_string(),
                });
            }
        }

        match parsed.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(TransportError::MissingData),
        }
    }

    /// Executes a GraphQL query with bounded exponential backoff.
    ///
    /// Applies [`execute`](Self::execute) up to the policy's maximum attempt
    /// count. Each retry logs the attempt index and the computed delay at
    /// `warn` level. On exhausting all attempts, the last observed failure
    /// is re-raised inside [`RetriesExhaustedError`]; no success is ever
    /// synthesized.
    ///
    /// # Errors
    ///
    /// Returns [`RetriesExhaustedError`] wrapping the final
    /// [`TransportError`] once every attempt has failed.
    pub async fn execute_with_retry(&self, query: &str) -> Result<Value, RetriesExhaustedError> {
        let max_attempts = self.retry_policy.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            match self.execute(query).await {
                Ok(data) => return Ok(data),
                Err(error) => {
                    attempt += 1;
                    if attempt >= max_attempts {
                        return Err(RetriesExhaustedError {
                            attempts: attempt,
                            source: error,
                        });
                    }

                    let delay = self.retry_policy.delay_for(attempt - 1);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed ({error}); retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Fetches a URL with a plain GET and parses the body as JSON.
    ///
    /// Used for the flat-file fallback source. This is a single request
    /// with no retry.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`], [`TransportError::Status`] or
    /// [`TransportError::Decode`] on failure.
    pub async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let mut req_builder = self.client.get(url);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        let res = req_builder.send().await?;
        let code = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();

        if !(200..300).contains(&code) {
            return Err(TransportError::Status {
                code,
                body: truncate_body(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Truncates a response body for inclusion in error messages.
fn truncate_body(text: &str) -> String {
    if text.len() <= ERROR_BODY_LIMIT {
        return text.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_transport() -> Transport {
        let config = CatalogConfig::builder().build().unwrap();
        Transport::new(&config)
    }

    #[test]
    fn test_transport_construction_uses_config_endpoint() {
        let config = CatalogConfig::builder()
            .graphql_url("https://example.com/graphql")
            .build()
            .unwrap();
        let transport = Transport::new(&config);

        assert_eq!(transport.graphql_url(), "https://example.com/graphql");
    }

    #[test]
    fn test_user_agent_header_format() {
        let transport = create_test_transport();

        let user_agent = transport.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("GeForce NOW DataFeed v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = CatalogConfig::builder()
            .user_agent_prefix("FeedJob/2.0")
            .build()
            .unwrap();
        let transport = Transport::new(&config);

        let user_agent = transport.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("FeedJob/2.0 | "));
    }

    #[test]
    fn test_accept_header_is_json() {
        let transport = create_test_transport();

        assert_eq!(
            transport.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_retry_policy_follows_config() {
        let config = CatalogConfig::builder().max_attempts(2).build().unwrap();
        let transport = Transport::new(&config);

        assert_eq!(transport.retry_policy().max_attempts(), 2);
    }

    #[test]
    fn test_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Transport>();
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let long = "é".repeat(ERROR_BODY_LIMIT);
        let truncated = truncate_body(&long);
        assert!(truncated.len() <= ERROR_BODY_LIMIT);
        assert!(long.starts_with(&truncated));
    }
}
