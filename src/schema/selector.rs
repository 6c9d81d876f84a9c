//! Query-shape selection with tiered fallback.
//!
//! This module chooses the query shape the paginator will drive, in strict
//! precedence order:
//!
//! 1. the introspected shape from [`discover_shape`](crate::schema::introspection::discover_shape);
//! 2. an ordered list of hand-authored fallback templates, richest first,
//!    each validated with one minimal probe before acceptance;
//! 3. the flat-file fallback, signalled as [`Strategy::FlatFile`] rather
//!    than raised as an error.
//!
//! Only the first probe-successful shape is selected; no further candidates
//! are tried after success.

use crate::clients::Transport;
use crate::schema::introspection::discover_shape;
use crate::schema::{apps_query, probe_selection};

/// Hand-authored fallback selections, richest first, minimal-fields last.
///
/// Template 0 mirrors the full field set the feed can use; later templates
/// shed the fields most likely to be rejected by a schema change.
pub const FALLBACK_TEMPLATES: [&str; 3] = [
    // Full selection
    "osType id cmsId sortName title longDescription \
     contentRatings { type categoryKey } developerName geForceUrl \
     images { FEATURE_IMAGE GAME_BOX_ART HERO_IMAGE MARQUEE_HERO_IMAGE \
     KEY_ART KEY_ICON KEY_IMAGE TV_BANNER SCREENSHOTS SCREENSHOT_THUMB } \
     keywords maxLocalPlayers maxOnlinePlayers publisherName \
     storeIds { id store } \
     streamingModes { framesPerSecond heightInPixels widthInPixels } \
     supportedControls supportedGamePlayModes type \
     computedValues { earliestReleaseDate earliestStreetDate allKeywords } \
     genres appStore \
     variants { id title appStore developerName \
     gfn { status visibility releaseDate isInLibrary } osType storeId }",
    // Core feed fields only
    "id cmsId title longDescription contentRatings { type categoryKey } \
     developerName publisherName osType \
     images { GAME_BOX_ART KEY_ART HERO_IMAGE } keywords \
     storeIds { id store } \
     computedValues { earliestReleaseDate earliestStreetDate } genres \
     variants { title appStore gfn { status } }",
    // Minimal selection; enough for identity and name
    "id title",
];

/// Where a selected query shape came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeOrigin {
    /// Derived from schema introspection.
    Introspected,
    /// One of the static [`FALLBACK_TEMPLATES`], by index.
    Template(usize),
}

/// A validated field selection for the catalog listing query.
///
/// A `QueryShape` is only ever constructed after its selection has passed a
/// probe request, so a shape in hand is never invalid. It is an
/// acquisition-time artifact and is not persisted.
#[derive(Clone, Debug)]
pub struct QueryShape {
    selection: String,
    origin: ShapeOrigin,
}

impl QueryShape {
    /// Wraps a probe-validated selection. Crate-private: shapes enter the
    /// pipeline only through [`select_strategy`].
    pub(crate) fn new(selection: String, origin: ShapeOrigin) -> Self {
        Self { selection, origin }
    }

    /// Returns the items-block field selection text.
    #[must_use]
    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Returns where this shape came from.
    #[must_use]
    pub const fn origin(&self) -> ShapeOrigin {
        self.origin
    }

    /// Renders the full listing query for one page.
    #[must_use]
    pub fn paged_query(&self, cursor: &str, page_size: u32) -> String {
        apps_query(&self.selection, cursor, page_size)
    }
}

/// The acquisition strategy chosen by [`select_strategy`].
#[derive(Clone, Debug)]
pub enum Strategy {
    /// Drive cursor pagination with the given validated shape.
    Graphql(QueryShape),
    /// Every GraphQL shape was rejected; fetch the flat file instead.
    FlatFile,
}

/// Chooses the acquisition strategy for this run.
///
/// Tries the introspected shape first, then each fallback template in
/// order, probing each candidate once. If every GraphQL-based shape is
/// rejected this returns [`Strategy::FlatFile`] rather than an error; no
/// failure below the flat file exists at selection time.
pub async fn select_strategy(transport: &Transport) -> Strategy {
    if let Some(selection) = discover_shape(transport).await {
        tracing::info!("Selected introspected query shape");
        return Strategy::Graphql(QueryShape::new(selection, ShapeOrigin::Introspected));
    }

    for (index, template) in FALLBACK_TEMPLATES.iter().enumerate() {
        if probe_selection(transport, template).await {
            tracing::info!("Selected fallback query template {index}");
            return Strategy::Graphql(QueryShape::new(
                (*template).to_string(),
                ShapeOrigin::Template(index),
            ));
        }
        tracing::debug!("Fallback template {index} rejected by probe");
    }

    tracing::warn!("Every GraphQL query shape was rejected; using flat-file fallback");
    Strategy::FlatFile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_ordered_richest_first() {
        // Later templates must never request more than earlier ones.
        assert!(FALLBACK_TEMPLATES[0].len() > FALLBACK_TEMPLATES[1].len());
        assert!(FALLBACK_TEMPLATES[1].len() > FALLBACK_TEMPLATES[2].len());
        assert_eq!(FALLBACK_TEMPLATES[2], "id title");
    }

    #[test]
    fn test_every_template_requests_identity_and_name() {
        for template in FALLBACK_TEMPLATES {
            assert!(template.contains("id"));
            assert!(template.contains("title"));
        }
    }

    #[test]
    fn test_paged_query_embeds_selection_cursor_and_size() {
        let shape = QueryShape::new("id title".to_string(), ShapeOrigin::Template(2));
        let query = shape.paged_query("abc123", 500);

        assert!(query.contains("apps(first: 500, after: \"abc123\")"));
        assert!(query.contains("items { id title }"));
        assert!(query.contains("pageInfo { hasNextPage endCursor totalCount }"));
    }

    #[test]
    fn test_shape_reports_origin() {
        let shape = QueryShape::new("id".to_string(), ShapeOrigin::Introspected);
        assert_eq!(shape.origin(), ShapeOrigin::Introspected);

        let shape = QueryShape::new("id".to_string(), ShapeOrigin::Template(1));
        assert_eq!(shape.origin(), ShapeOrigin::Template(1));
    }
}
