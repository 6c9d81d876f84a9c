//! HTTP transport types for the catalog acquisition pipeline.
//!
//! This module provides the foundational request layer: a single-shot
//! transport against the GeForce NOW GraphQL endpoint plus the bounded
//! retry wrapper above it.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Transport`]: executes one request, surfacing protocol-level and
//!   application-level failures as distinct errors; never retries
//! - [`RetryPolicy`]: bounded exponential backoff settings
//! - [`TransportError`]: single-request failure taxonomy
//! - [`RetriesExhaustedError`]: raised when all attempts fail, preserving
//!   the last failure as its source
//!
//! # Retry Behavior
//!
//! [`Transport::execute_with_retry`] retries any [`TransportError`] with
//! exponentially growing delays (2s, 4s, 8s with the defaults) and no
//! jitter. Introspection and shape-probe traffic deliberately bypasses the
//! wrapper: a rejected field selection will not become valid by retrying.

mod errors;
mod retry;
mod transport;

pub use errors::{RetriesExhaustedError, TransportError};
pub use retry::RetryPolicy;
pub use transport::{Transport, CRATE_VERSION};
