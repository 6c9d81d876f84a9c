//! # GeForce NOW DataFeed
//!
//! A client for the NVIDIA GeForce NOW game catalog that produces
//! schema.org Game Actions `DataFeed` output.
//!
//! ## Overview
//!
//! This crate provides:
//! - A resilient acquisition pipeline: adaptive query construction via
//!   schema introspection, tiered fallback over static query templates,
//!   and a flat-file source of last resort
//! - Cursor-based pagination with partial-failure recovery
//! - Bounded exponential-backoff retries for transient failures
//! - A pure normalization layer reconciling both source shapes into one
//!   canonical [`VideoGame`] model
//! - Type-safe configuration via [`CatalogConfig`] and
//!   [`CatalogConfigBuilder`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gfn_datafeed::{CatalogClient, CatalogConfig};
//!
//! let config = CatalogConfig::builder().build()?;
//! let client = CatalogClient::new(config);
//!
//! // Acquire, normalize and wrap the whole catalog
//! let feed = client.build_feed().await?;
//! println!("{}", serde_json::to_string_pretty(&feed)?);
//! ```
//!
//! ## Acquisition Strategy
//!
//! The shape selector tries, in strict order: a query shape derived from
//! schema introspection, then each hand-authored fallback template
//! (richest first), each validated with one minimal probe request. If
//! every GraphQL shape is rejected, the pipeline fetches the public
//! supported-game list instead. Only when that last path also fails does
//! acquisition error out.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Configuration validates on construction;
//!   query shapes validate before selection, never lazily
//! - **Sequential execution**: One request in flight at a time; the
//!   pipeline suspends during calls and backoff delays
//! - **Best-effort normalization**: A malformed record yields a sparser
//!   entity, never an error

pub mod catalog;
pub mod clients;
pub mod config;
pub mod error;
pub mod feed;
pub mod schema;

use serde_json::Value;

use catalog::{fetch_all, fetch_flat_list};
use schema::{select_strategy, Strategy};

// Re-export public types at crate root for convenience
pub use clients::{RetriesExhaustedError, RetryPolicy, Transport, TransportError};
pub use config::{CatalogConfig, CatalogConfigBuilder};
pub use error::{CatalogError, ConfigError};
pub use feed::{normalize, DataFeed, Edition, Organization, VideoGame};

// Re-export acquisition types for convenience
pub use catalog::{FetchError, FetchOutcome};
pub use schema::{QueryShape, ShapeOrigin};

/// The raw records produced by one acquisition run.
#[derive(Debug)]
pub struct Acquisition {
    /// Source records in original order, shape depending on the path taken.
    pub records: Vec<Value>,
    /// `false` when pagination failed mid-stream and only a prefix of the
    /// catalog was recovered.
    pub complete: bool,
}

/// High-level client driving the whole pipeline.
///
/// Owns the long-lived transport; all network traffic of one run goes
/// through it, strictly sequentially.
///
/// # Example
///
/// ```rust
/// use gfn_datafeed::{CatalogClient, CatalogConfig};
///
/// let config = CatalogConfig::builder().build().unwrap();
/// let client = CatalogClient::new(config);
/// assert_eq!(client.config().page_size(), 1200);
/// ```
#[derive(Debug)]
pub struct CatalogClient {
    config: CatalogConfig,
    transport: Transport,
}

impl CatalogClient {
    /// Creates a client from the given configuration.
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        let transport = Transport::new(&config);
        Self { config, transport }
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Acquires the raw catalog records.
    ///
    /// Runs the shape selector, then either cursor pagination over the
    /// winning shape or the flat-file fallback. A GraphQL path that fails
    /// before producing any items falls back to the flat file; a partial
    /// pagination result is returned with `complete = false` and a logged
    /// warning rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] only on total-acquisition failure, i.e.
    /// when the flat-file fallback itself fails.
    pub async fn fetch_games(&self) -> Result<Acquisition, CatalogError> {
        match select_strategy(&self.transport).await {
            Strategy::Graphql(shape) => {
                match fetch_all(&self.transport, &shape, self.config.page_size()).await {
                    Ok(outcome) => {
                        let complete = outcome.is_complete();
                        Ok(Acquisition {
                            records: outcome.into_items(),
                            complete,
                        })
                    }
                    Err(error) => {
                        tracing::warn!(
                            "GraphQL acquisition failed before any items ({error}); \
                             falling back to flat file"
                        );
                        self.fetch_flat().await
                    }
                }
            }
            Strategy::FlatFile => self.fetch_flat().await,
        }
    }

    /// Acquires, normalizes and wraps the catalog into a [`DataFeed`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on total-acquisition failure; normalization
    /// itself never fails.
    pub async fn build_feed(&self) -> Result<DataFeed, CatalogError> {
        let acquisition = self.fetch_games().await?;

        let games: Vec<VideoGame> = acquisition.records.iter().map(normalize).collect();
        tracing::info!(
            count = games.len(),
            complete = acquisition.complete,
            "Built catalog feed"
        );

        Ok(DataFeed::new(games))
    }

    /// The acquisition path of last resort.
    async fn fetch_flat(&self) -> Result<Acquisition, CatalogError> {
        let records = fetch_flat_list(&self.transport, self.config.flat_file_url())
            .await
            .map_err(CatalogError::AllPathsExhausted)?;
        Ok(Acquisition {
            records,
            complete: true,
        })
    }
}
