//! Top-level error types for the GeForce NOW DataFeed crate.
//!
//! This module contains the configuration validation errors and the unified
//! [`CatalogError`] returned by the acquisition pipeline.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Acquisition failures are handled internally up to
//! the shape selector; only total-acquisition failure (every GraphQL shape
//! rejected *and* the flat-file fallback failed) surfaces as a
//! [`CatalogError`].
//!
//! # Example
//!
//! ```rust
//! use gfn_datafeed::{CatalogConfig, ConfigError};
//!
//! let result = CatalogConfig::builder().page_size(0).build();
//! assert!(matches!(result, Err(ConfigError::InvalidPageSize)));
//! ```

use thiserror::Error;

use crate::clients::TransportError;

/// Errors that can occur during crate configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The GraphQL endpoint URL is empty or lacks a scheme.
    #[error("Invalid GraphQL endpoint URL '{url}'. Please provide an absolute URL (e.g., 'https://games.geforce.com/graphql').")]
    InvalidGraphqlUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The flat-file fallback URL is empty or lacks a scheme.
    #[error("Invalid flat-file URL '{url}'. Please provide an absolute URL to a JSON game list.")]
    InvalidFlatFileUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The page size must be at least 1.
    #[error("Page size cannot be zero. Please provide a page size of at least 1.")]
    InvalidPageSize,

    /// The retry attempt count must be at least 1.
    #[error("Maximum attempt count cannot be zero. Please provide at least 1 attempt.")]
    InvalidMaxAttempts,
}

/// Unified error type for catalog acquisition.
///
/// This is the only error a caller of
/// [`CatalogClient`](crate::CatalogClient) sees: transient failures are
/// retried internally, rejected query shapes trigger the next fallback
/// candidate, and partial pagination results are surfaced as data plus a
/// warning, not as errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Every acquisition path failed, including the flat-file fallback.
    ///
    /// The wrapped error is the flat-file failure, which is always the last
    /// path tried.
    #[error("All acquisition paths exhausted; flat-file fallback failed: {0}")]
    AllPathsExhausted(#[source] TransportError),
}
