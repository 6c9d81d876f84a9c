//! Configuration types for the GeForce NOW DataFeed crate.
//!
//! This module provides the core configuration used to initialize the
//! acquisition pipeline.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`CatalogConfig`]: The main configuration struct holding all settings
//! - [`CatalogConfigBuilder`]: A builder for constructing [`CatalogConfig`] instances
//!
//! # Example
//!
//! ```rust
//! use gfn_datafeed::CatalogConfig;
//! use std::time::Duration;
//!
//! let config = CatalogConfig::builder()
//!     .page_size(500)
//!     .max_attempts(3)
//!     .initial_backoff(Duration::from_secs(1))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_size(), 500);
//! ```

use std::time::Duration;

use crate::error::ConfigError;

/// Default GraphQL endpoint for the GeForce NOW catalog.
pub const DEFAULT_GRAPHQL_URL: &str = "https://games.geforce.com/graphql";

/// Default flat-file fallback: the public supported-game list.
pub const DEFAULT_FLAT_FILE_URL: &str =
    "https://static.nvidiagrid.net/supported-public-game-list/gfnpc.json";

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 1200;

/// Default maximum attempt count for retried requests.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Default initial backoff delay, doubled on each retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(2);

/// Default per-request timeout ceiling.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the catalog acquisition pipeline.
///
/// Holds the endpoint URLs, pagination and retry settings shared by every
/// layer of the pipeline. All values are validated at build time.
///
/// # Thread Safety
///
/// `CatalogConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use gfn_datafeed::CatalogConfig;
///
/// let config = CatalogConfig::builder().build().unwrap();
/// assert_eq!(config.page_size(), 1200);
/// ```
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    graphql_url: String,
    flat_file_url: String,
    page_size: u32,
    max_attempts: u32,
    initial_backoff: Duration,
    request_timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl CatalogConfig {
    /// Creates a new builder for constructing a `CatalogConfig`.
    #[must_use]
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::new()
    }

    /// Returns the GraphQL endpoint URL.
    #[must_use]
    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Returns the flat-file fallback URL.
    #[must_use]
    pub fn flat_file_url(&self) -> &str {
        &self.flat_file_url
    }

    /// Returns the number of items requested per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the maximum attempt count for retried requests.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the initial backoff delay.
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    /// Returns the per-request timeout ceiling.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            flat_file_url: DEFAULT_FLAT_FILE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent_prefix: None,
        }
    }
}

/// Builder for constructing [`CatalogConfig`] instances.
///
/// Provides a fluent API with fail-fast validation in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct CatalogConfigBuilder {
    graphql_url: Option<String>,
    flat_file_url: Option<String>,
    page_size: Option<u32>,
    max_attempts: Option<u32>,
    initial_backoff: Option<Duration>,
    request_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl CatalogConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Sets the GraphQL endpoint URL.
    #[must_use]
    pub fn graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = Some(url.into());
        self
    }

    /// Sets the flat-file fallback URL.
    #[must_use]
    pub fn flat_file_url(mut self, url: impl Into<String>) -> Self {
        self.flat_file_url = Some(url.into());
        self
    }

    /// Sets the number of items requested per page.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the maximum attempt count for retried requests.
    #[must_use]
    pub const fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Sets the initial backoff delay, doubled on each retry.
    #[must_use]
    pub const fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = Some(backoff);
        self
    }

    /// Sets the per-request timeout ceiling.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets a prefix prepended to the default User-Agent header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`CatalogConfig`], validating all settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a URL is not absolute, or if the page size
    /// or attempt count is zero.
    pub fn build(self) -> Result<CatalogConfig, ConfigError> {
        let graphql_url = self
            .graphql_url
            .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string());
        if !is_absolute_url(&graphql_url) {
            return Err(ConfigError::InvalidGraphqlUrl { url: graphql_url });
        }

        let flat_file_url = self
            .flat_file_url
            .unwrap_or_else(|| DEFAULT_FLAT_FILE_URL.to_string());
        if !is_absolute_url(&flat_file_url) {
            return Err(ConfigError::InvalidFlatFileUrl { url: flat_file_url });
        }

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        let max_attempts = self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        if max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts);
        }

        Ok(CatalogConfig {
            graphql_url,
            flat_file_url,
            page_size,
            max_attempts,
            initial_backoff: self.initial_backoff.unwrap_or(DEFAULT_INITIAL_BACKOFF),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
