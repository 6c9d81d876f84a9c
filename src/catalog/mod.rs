//! Catalog acquisition: pagination and the flat-file fallback.
//!
//! The types in this module produce the raw, shape-varying source records
//! that the feed normalizer consumes:
//!
//! - [`paginator::fetch_all`]: cursor-based traversal of the chosen query
//!   shape, tolerating mid-stream failure
//! - [`flat_file::fetch_flat_list`]: the last-resort static JSON source
//!
//! All records accumulate in memory for the run's duration; there is no
//! streaming emission to the output stage.

pub mod flat_file;
pub mod paginator;

pub use flat_file::fetch_flat_list;
pub use paginator::{fetch_all, FetchError, FetchOutcome};
