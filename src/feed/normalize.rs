//! Normalization of heterogeneous source records into canonical entities.
//!
//! [`normalize`] is a pure function with no I/O and no failure path: field
//! extraction is best-effort, so a missing source field simply omits the
//! corresponding output field. The same function handles both source
//! shapes (nested GraphQL items and flat fallback records); flat records
//! just produce sparser entities.

use serde_json::Value;

use crate::feed::entity::{Edition, Organization, VideoGame, SCHEMA_CONTEXT};

/// Base for the generated deep-link URL.
const DEEPLINK_BASE: &str = "https://play.geforcenow.com/mall/#/deeplink?game-id=";

/// Image role keys in fixed priority order, best first.
pub const IMAGE_ROLE_PRIORITY: [&str; 7] = [
    "GAME_BOX_ART",
    "KEY_ART",
    "KEY_IMAGE",
    "HERO_IMAGE",
    "FEATURE_IMAGE",
    "MARQUEE_HERO_IMAGE",
    "TV_BANNER",
];

/// Flat-record image field synonyms, in the same priority order.
const FLAT_IMAGE_SYNONYMS: [&str; 5] = [
    "boxArtUrl",
    "keyArtUrl",
    "heroImageUrl",
    "imageUrl",
    "bannerUrl",
];

/// Variant life-cycle statuses that keep a variant in the edition list.
/// An absent status also keeps the variant; any other status excludes it.
pub const AVAILABLE_STATUSES: [&str; 2] = ["AVAILABLE", "MAINTENANCE"];

/// Returns a non-empty string field from the record.
fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Renders a scalar field (string or number) as a string.
///
/// Identifiers arrive as strings from the GraphQL source but as bare
/// numbers in the flat fallback records.
fn scalar_string(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extracts a list of strings; a bare string is wrapped into a one-element
/// list.
fn string_list(record: &Value, key: &str) -> Option<Vec<String>> {
    match record.get(key)? {
        Value::Array(values) => {
            let list: Vec<String> = values
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect();
            (!list.is_empty()).then_some(list)
        }
        Value::String(s) if !s.is_empty() => Some(vec![s.clone()]),
        _ => None,
    }
}

/// Returns a positive integer field, treating zero as absent.
fn player_count(record: &Value, key: &str) -> Option<u64> {
    record
        .get(key)
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
}

/// Builds the GeForce NOW deep-link URL for the record.
///
/// Prefers the CMS identifier; falls back to the plain id, then to an
/// empty identifier so the URL is always present.
#[must_use]
pub fn build_play_url(record: &Value) -> String {
    let game_id = scalar_string(record, "cmsId")
        .or_else(|| scalar_string(record, "id"))
        .unwrap_or_default();
    format!("{DEEPLINK_BASE}{game_id}")
}

/// Picks the best available image URL for the record.
///
/// Scans the nested `images` role map in fixed priority order, then the
/// flat synonym fields; returns the first non-empty match.
#[must_use]
pub fn pick_image(record: &Value) -> Option<String> {
    if let Some(images) = record.get("images").filter(|v| v.is_object()) {
        for role in IMAGE_ROLE_PRIORITY {
            if let Some(url) = images.get(role).and_then(Value::as_str) {
                if !url.is_empty() {
                    return Some(url.to_string());
                }
            }
        }
    }

    for key in FLAT_IMAGE_SYNONYMS {
        if let Some(url) = str_field(record, key) {
            return Some(url.to_string());
        }
    }

    None
}

/// Formats the record's rating list into a single label.
///
/// Entries look like `{"type": "ESRB", "categoryKey": "TEEN"}` and format
/// as `"ESRB TEEN"`. Prefers an ESRB-tagged entry, then PEGI, else the
/// first labeled entry, regardless of list order.
#[must_use]
pub fn format_content_rating(content_ratings: Option<&Value>) -> Option<String> {
    let list = content_ratings?.as_array()?;

    let mut esrb = None;
    let mut pegi = None;
    let mut first = None;

    for rating in list {
        let rating_type = rating
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_uppercase();
        let category = rating
            .get("categoryKey")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let label = format!("{rating_type} {category}").trim().to_string();
        if label.is_empty() {
            continue;
        }

        if first.is_none() {
            first = Some(label.clone());
        }
        match rating_type.as_str() {
            "ESRB" => esrb = Some(label),
            "PEGI" => pegi = Some(label),
            _ => {}
        }
    }

    esrb.or(pegi).or(first)
}

/// Synthesizes cross-store reference URLs from the record's store ids.
///
/// Known stores get a canonical URL from a per-store template. A directly
/// provided store URL field seeds the list, and synthesized URLs are
/// deduplicated against it by exact string membership (deliberately not
/// normalized).
fn store_references(record: &Value) -> Option<Vec<String>> {
    let mut same_as: Vec<String> = Vec::new();

    if let Some(direct) = str_field(record, "steamUrl") {
        same_as.push(direct.to_string());
    }

    if let Some(store_ids) = record.get("storeIds").and_then(Value::as_array) {
        for entry in store_ids {
            let store = entry
                .get("store")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_uppercase();
            let Some(store_id) = scalar_string(entry, "id") else {
                continue;
            };

            let url = match store.as_str() {
                "STEAM" => format!("https://store.steampowered.com/app/{store_id}"),
                "EPIC" => format!("https://store.epicgames.com/p/{store_id}"),
                _ => continue,
            };
            if !same_as.contains(&url) {
                same_as.push(url);
            }
        }
    }

    (!same_as.is_empty()).then_some(same_as)
}

/// Builds the edition list: the primary streaming edition plus one entry
/// per variant whose status is absent or within the availability
/// allow-list.
fn build_editions(record: &Value, title: &str, play_url: String) -> Vec<Edition> {
    let mut editions = vec![Edition::streaming(title, play_url)];

    let Some(variants) = record.get("variants").and_then(Value::as_array) else {
        return editions;
    };

    for variant in variants {
        let status = variant
            .get("gfn")
            .and_then(|gfn| gfn.get("status"))
            .and_then(Value::as_str);
        if let Some(status) = status {
            if !AVAILABLE_STATUSES.contains(&status) {
                continue;
            }
        }

        let variant_title = str_field(variant, "title").unwrap_or(title);
        let store = str_field(variant, "appStore");
        let name = store.map_or_else(
            || variant_title.to_string(),
            |s| format!("{variant_title} ({s})"),
        );

        editions.push(Edition::variant(name, store.map(ToString::to_string)));
    }

    editions
}

/// Maps one source record into a canonical [`VideoGame`] entity.
///
/// Works on both source shapes and never fails: identity and name are
/// always emitted (derived from empty strings on sparse input), and every
/// other field is omitted when absent.
#[must_use]
pub fn normalize(record: &Value) -> VideoGame {
    let id = scalar_string(record, "id").unwrap_or_default();
    let title = str_field(record, "title").unwrap_or_default().to_string();
    let play_url = build_play_url(record);

    let computed = record.get("computedValues");
    let date_published = computed
        .and_then(|c| c.get("earliestReleaseDate"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            computed
                .and_then(|c| c.get("earliestStreetDate"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .map(ToString::to_string);

    let number_of_players =
        player_count(record, "maxOnlinePlayers").or_else(|| player_count(record, "maxLocalPlayers"));

    VideoGame {
        context: SCHEMA_CONTEXT,
        schema_type: "VideoGame",
        id: format!("gfn-{id}"),
        name: title.clone(),
        url: play_url.clone(),
        application_category: "Game",
        description: str_field(record, "longDescription").map(ToString::to_string),
        genre: string_list(record, "genres"),
        content_rating: format_content_rating(record.get("contentRatings")),
        image: pick_image(record),
        publisher: str_field(record, "publisherName")
            .or_else(|| str_field(record, "publisher"))
            .map(|name| Organization::publisher(name.to_string())),
        contributor: str_field(record, "developerName")
            .map(|name| Organization::developer(name.to_string())),
        keywords: string_list(record, "keywords"),
        game_platform: str_field(record, "osType").map(|os| vec![os.to_string()]),
        number_of_players,
        play_mode: string_list(record, "supportedGamePlayModes"),
        same_as: store_references(record),
        date_published,
        example_of_work: build_editions(record, &title, play_url),
    }
}
