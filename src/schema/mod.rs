//! Query-shape discovery and selection.
//!
//! This module owns everything that decides *what* the pipeline asks the
//! remote service for:
//!
//! - [`introspection`]: derives a field selection from the remote schema,
//!   bounded to a fixed depth, and validates it with a probe
//! - [`selector`]: strict-precedence fallback over the introspected shape,
//!   static templates and the flat file
//!
//! The rendered query always has the same outer structure; only the
//! items-block selection varies between shapes.

pub mod introspection;
pub mod selector;

pub use introspection::{discover_shape, TypeGraph, INTROSPECTION_QUERY, MAX_SELECTION_DEPTH};
pub use selector::{select_strategy, QueryShape, ShapeOrigin, Strategy, FALLBACK_TEMPLATES};

use serde_json::Value;

use crate::clients::Transport;
use introspection::{COLLECTION_FIELD, ITEMS_FIELD};

/// Renders the catalog listing query for one page.
///
/// The outer structure (collection field, page info, items block) is fixed;
/// `selection` fills the items block.
#[must_use]
pub fn apps_query(selection: &str, cursor: &str, page_size: u32) -> String {
    format!(
        "{{ {COLLECTION_FIELD}(first: {page_size}, after: \"{cursor}\") {{ \
         numberReturned \
         pageInfo {{ hasNextPage endCursor totalCount }} \
         {ITEMS_FIELD} {{ {selection} }} }} }}"
    )
}

/// Validates a candidate selection with one minimal-size probe request.
///
/// A candidate passes only when the probe succeeds and returns a usable
/// item list. The probe is a single request; shape rejection is not a
/// transient condition and is never retried.
pub(crate) async fn probe_selection(transport: &Transport, selection: &str) -> bool {
    let probe = apps_query(selection, "", 1);
    match transport.execute(&probe).await {
        Ok(response) => response
            .get(COLLECTION_FIELD)
            .and_then(|apps| apps.get(ITEMS_FIELD))
            .map_or(false, Value::is_array),
        Err(error) => {
            tracing::debug!("Probe request failed: {error}");
            false
        }
    }
}
