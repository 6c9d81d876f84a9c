//! Canonical feed model and normalization.
//!
//! This module turns raw source records (from either acquisition path) into
//! the schema.org JSON-LD feed:
//!
//! - [`entity`]: fixed-shape serde models for [`VideoGame`], its editions
//!   and the [`DataFeed`] envelope
//! - [`normalize`]: the pure, infallible mapping from one source record to
//!   one canonical entity

pub mod entity;
pub mod normalize;

pub use entity::{DataFeed, Edition, EntryPoint, Organization, PlayGameAction, VideoGame};
pub use normalize::{
    build_play_url, format_content_rating, normalize, pick_image, AVAILABLE_STATUSES,
    IMAGE_ROLE_PRIORITY,
};
