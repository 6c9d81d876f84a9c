//! Canonical entity model: schema.org JSON-LD types for the game feed.
//!
//! These are fixed-shape structs with explicit optional members rather than
//! dynamic maps, so a normalization typo fails at compile time instead of
//! producing a silently malformed feed. Optional fields carry
//! `skip_serializing_if` so absent source data is omitted from the output,
//! never serialized as `null`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// JSON-LD context for every emitted entity.
pub const SCHEMA_CONTEXT: &str = "http://schema.org";

/// Timestamp format for the feed envelope.
const DATE_MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A labeled contributor reference (publisher or developer).
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Organization {
    /// Always `"Organization"`.
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    /// The organization's name.
    pub name: String,
    /// Contributor role label, set for developers.
    #[serde(rename = "roleName", skip_serializing_if = "Option::is_none")]
    pub role_name: Option<&'static str>,
}

impl Organization {
    /// A publisher reference (no role label).
    #[must_use]
    pub const fn publisher(name: String) -> Self {
        Self {
            schema_type: "Organization",
            name,
            role_name: None,
        }
    }

    /// A developer reference, labeled with the `developer` role.
    #[must_use]
    pub const fn developer(name: String) -> Self {
        Self {
            schema_type: "Organization",
            name,
            role_name: Some("developer"),
        }
    }
}

/// Deep-link entry point for the play action.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct EntryPoint {
    /// Always `"EntryPoint"`.
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    /// The deep-link URL template.
    #[serde(rename = "urlTemplate")]
    pub url_template: String,
    /// Platforms the action applies to.
    #[serde(rename = "actionPlatform")]
    pub action_platform: Vec<&'static str>,
}

/// The platform's own play-game action descriptor.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PlayGameAction {
    /// Always `"PlayGameAction"`.
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    /// The entry point carrying the deep link.
    pub target: EntryPoint,
}

impl PlayGameAction {
    /// Builds the streaming play action for the given deep-link URL.
    #[must_use]
    pub fn to(play_url: String) -> Self {
        Self {
            schema_type: "PlayGameAction",
            target: EntryPoint {
                schema_type: "EntryPoint",
                url_template: play_url,
                action_platform: vec!["http://schema.org/DesktopWebPlatform"],
            },
        }
    }
}

/// One store- or platform-specific offering of a game.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Edition {
    /// JSON-LD context.
    #[serde(rename = "@context")]
    pub context: &'static str,
    /// Always `"VideoGame"`.
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    /// Display name, usually suffixed with the store or platform.
    pub name: String,
    /// Platforms the edition runs on.
    #[serde(rename = "gamePlatform")]
    pub game_platform: Vec<&'static str>,
    /// The originating store, when known.
    #[serde(rename = "applicationCategory", skip_serializing_if = "Option::is_none")]
    pub application_category: Option<String>,
    /// Present only on the primary streaming edition.
    #[serde(rename = "potentialAction", skip_serializing_if = "Option::is_none")]
    pub potential_action: Option<PlayGameAction>,
}

impl Edition {
    /// The always-present primary streaming edition.
    #[must_use]
    pub fn streaming(title: &str, play_url: String) -> Self {
        Self {
            context: SCHEMA_CONTEXT,
            schema_type: "VideoGame",
            name: format!("{title} (GeForce NOW)"),
            game_platform: vec!["PC"],
            application_category: None,
            potential_action: Some(PlayGameAction::to(play_url)),
        }
    }

    /// A store-specific edition derived from a surviving variant.
    #[must_use]
    pub fn variant(name: String, store: Option<String>) -> Self {
        Self {
            context: SCHEMA_CONTEXT,
            schema_type: "VideoGame",
            name,
            game_platform: vec!["PC"],
            application_category: store,
            potential_action: None,
        }
    }
}

/// The canonical, acquisition-path-independent representation of one game.
///
/// Invariant: `id` and `name` are always present, possibly derived from
/// empty source strings; every other descriptive field is optional and
/// omitted when source data is absent.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct VideoGame {
    /// JSON-LD context.
    #[serde(rename = "@context")]
    pub context: &'static str,
    /// Always `"VideoGame"`.
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    /// Stable identity, `gfn-` prefixed.
    #[serde(rename = "@id")]
    pub id: String,
    /// The game's title.
    pub name: String,
    /// Generated deep-link URL.
    pub url: String,
    /// Always `"Game"`.
    #[serde(rename = "applicationCategory")]
    pub application_category: &'static str,
    /// Long description text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Genre labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    /// Formatted content-rating label (e.g. `"ESRB TEEN"`).
    #[serde(rename = "contentRating", skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<String>,
    /// Single best-available image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Publishing organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Organization>,
    /// Developing organization, role-labeled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor: Option<Organization>,
    /// Keyword labels; a scalar source value is wrapped into a list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Platform labels derived from the record's OS type.
    #[serde(rename = "gamePlatform", skip_serializing_if = "Option::is_none")]
    pub game_platform: Option<Vec<String>>,
    /// Player-count hint; the online maximum wins over the local one.
    #[serde(rename = "numberOfPlayers", skip_serializing_if = "Option::is_none")]
    pub number_of_players: Option<u64>,
    /// Supported play modes.
    #[serde(rename = "playMode", skip_serializing_if = "Option::is_none")]
    pub play_mode: Option<Vec<String>>,
    /// Cross-store reference URLs.
    #[serde(rename = "sameAs", skip_serializing_if = "Option::is_none")]
    pub same_as: Option<Vec<String>>,
    /// Earliest known release date.
    #[serde(rename = "datePublished", skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    /// Ordered edition list: the primary streaming edition plus one entry
    /// per surviving variant.
    #[serde(rename = "exampleOfWork")]
    pub example_of_work: Vec<Edition>,
}

/// The feed envelope handed to the output collaborator.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DataFeed {
    /// JSON-LD context.
    #[serde(rename = "@context")]
    pub context: &'static str,
    /// Always `"DataFeed"`.
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    /// Generation timestamp, UTC.
    #[serde(rename = "dateModified")]
    pub date_modified: String,
    /// The canonical entity list.
    #[serde(rename = "dataFeedElement")]
    pub data_feed_element: Vec<VideoGame>,
}

impl DataFeed {
    /// Wraps the entity list with the current UTC generation timestamp.
    #[must_use]
    pub fn new(games: Vec<VideoGame>) -> Self {
        Self::with_timestamp(games, Utc::now())
    }

    /// Wraps the entity list with an explicit timestamp.
    #[must_use]
    pub fn with_timestamp(games: Vec<VideoGame>, generated_at: DateTime<Utc>) -> Self {
        Self {
            context: SCHEMA_CONTEXT,
            schema_type: "DataFeed",
            date_modified: generated_at.format(DATE_MODIFIED_FORMAT).to_string(),
            data_feed_element: games,
        }
    }

    /// Serializes the envelope to a JSON value.
    ///
    /// # Panics
    ///
    /// Never panics in practice: every field of the model serializes
    /// infallibly.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_organization_constructors() {
        let publisher = Organization::publisher("Valve".to_string());
        assert!(publisher.role_name.is_none());

        let developer = Organization::developer("Valve".to_string());
        assert_eq!(developer.role_name, Some("developer"));
    }

    #[test]
    fn test_streaming_edition_carries_play_action() {
        let edition = Edition::streaming("Alpha", "https://example.com/play".to_string());

        assert_eq!(edition.name, "Alpha (GeForce NOW)");
        assert_eq!(edition.game_platform, vec!["PC"]);
        let action = edition.potential_action.unwrap();
        assert_eq!(action.target.url_template, "https://example.com/play");
        assert_eq!(
            action.target.action_platform,
            vec!["http://schema.org/DesktopWebPlatform"]
        );
    }

    #[test]
    fn test_variant_edition_has_no_play_action() {
        let edition = Edition::variant("Alpha (STEAM)".to_string(), Some("STEAM".to_string()));

        assert!(edition.potential_action.is_none());
        assert_eq!(edition.application_category.as_deref(), Some("STEAM"));
    }

    #[test]
    fn test_datafeed_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let feed = DataFeed::with_timestamp(Vec::new(), at);

        assert_eq!(feed.date_modified, "2026-01-02T03:04:05Z");
    }

    #[test]
    fn test_datafeed_serialized_field_names() {
        let feed = DataFeed::with_timestamp(Vec::new(), Utc::now());
        let value = feed.to_value();

        assert_eq!(value["@context"], SCHEMA_CONTEXT);
        assert_eq!(value["@type"], "DataFeed");
        assert!(value["dataFeedElement"].is_array());
        assert!(value.get("dateModified").is_some());
    }
}
