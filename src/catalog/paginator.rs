//! Cursor-based pagination over the chosen query shape.
//!
//! [`fetch_all`] drives the listing query page by page, accumulating every
//! returned item. The loop is a small state machine with three terminal
//! outcomes:
//!
//! - [`FetchOutcome::Complete`]: the remote declared no further continuation
//! - [`FetchOutcome::Partial`]: a page failed after at least one item was
//!   accumulated; recoverable, surfaced as a warning
//! - `Err(`[`FetchError`]`)`: the first page failed outright; fatal for the
//!   GraphQL acquisition path and handled by the caller's fallback
//!
//! Termination is guaranteed because every successful step either ends
//! pagination or the remote declares no further continuation; an
//! infinite-continuation stream is a remote correctness bug this layer does
//! not guard against.

use serde_json::Value;
use thiserror::Error;

use crate::clients::{RetriesExhaustedError, Transport};
use crate::schema::introspection::{COLLECTION_FIELD, ITEMS_FIELD};
use crate::schema::QueryShape;

/// Error for a pagination step that could not produce items.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The page request failed on every retry attempt.
    #[error(transparent)]
    Exhausted(#[from] RetriesExhaustedError),

    /// The page response was structurally unusable.
    #[error("Page response missing expected '{field}' field")]
    MalformedPage {
        /// The field that was absent or of the wrong type.
        field: &'static str,
    },
}

/// Terminal outcome of a pagination run that produced items.
#[derive(Debug)]
pub enum FetchOutcome {
    /// All pages were fetched.
    Complete(Vec<Value>),
    /// Pagination failed mid-stream; the accumulated prefix is returned.
    Partial {
        /// Items accumulated before the failure, in original order.
        items: Vec<Value>,
        /// The failure that ended the run.
        error: FetchError,
    },
}

impl FetchOutcome {
    /// Returns the accumulated items regardless of completeness.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        match self {
            Self::Complete(items) | Self::Partial { items, .. } => items,
        }
    }

    /// Consumes the outcome, yielding the accumulated items.
    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Complete(items) | Self::Partial { items, .. } => items,
        }
    }

    /// Returns `true` when every page was fetched.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// One successfully parsed page.
struct Page {
    items: Vec<Value>,
    has_next: bool,
    end_cursor: String,
    total_count: Option<u64>,
}

/// Extracts items and continuation state from a page response's `data`.
fn parse_page(data: &Value) -> Result<Page, FetchError> {
    let apps = data
        .get(COLLECTION_FIELD)
        .ok_or(FetchError::MalformedPage {
            field: COLLECTION_FIELD,
        })?;

    let items = apps
        .get(ITEMS_FIELD)
        .and_then(Value::as_array)
        .ok_or(FetchError::MalformedPage { field: ITEMS_FIELD })?
        .clone();

    let page_info = apps.get("pageInfo");
    let has_next = page_info
        .and_then(|p| p.get("hasNextPage"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let end_cursor = page_info
        .and_then(|p| p.get("endCursor"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let total_count = page_info
        .and_then(|p| p.get("totalCount"))
        .and_then(Value::as_u64);

    Ok(Page {
        items,
        has_next,
        end_cursor,
        total_count,
    })
}

/// Paginates through the catalog with the given validated shape.
///
/// Each step fetches one page through the retrying transport, appends the
/// returned items and advances the cursor. Progress is logged at `info`
/// level per page.
///
/// # Errors
///
/// Returns [`FetchError`] only when the failure occurred before any item
/// was accumulated. A mid-stream failure yields
/// [`FetchOutcome::Partial`] instead.
pub async fn fetch_all(
    transport: &Transport,
    shape: &QueryShape,
    page_size: u32,
) -> Result<FetchOutcome, FetchError> {
    let mut items: Vec<Value> = Vec::new();
    let mut cursor = String::new();
    let mut page_number: u32 = 0;

    loop {
        page_number += 1;
        tracing::info!(page = page_number, cursor = %cursor, "Fetching catalog page");

        let query = shape.paged_query(&cursor, page_size);
        let step = match transport.execute_with_retry(&query).await {
            Ok(data) => parse_page(&data),
            Err(error) => Err(FetchError::Exhausted(error)),
        };

        let page = match step {
            Ok(page) => page,
            Err(error) => {
                if items.is_empty() {
                    return Err(error);
                }
                tracing::warn!(
                    accumulated = items.len(),
                    "Pagination failed mid-stream ({error}); returning partial catalog"
                );
                return Ok(FetchOutcome::Partial { items, error });
            }
        };

        let got = page.items.len();
        items.extend(page.items);
        tracing::info!(
            got,
            total_so_far = items.len(),
            total_count = page.total_count,
            "Fetched page"
        );

        if !page.has_next {
            return Ok(FetchOutcome::Complete(items));
        }
        cursor = page.end_cursor;
    }
}
