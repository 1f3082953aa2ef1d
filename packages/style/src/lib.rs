#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Style catalogue loading and feature enrichment.
//!
//! Features fetched for the current viewport carry only geometry and a
//! `feature_id`. Enrichment joins each feature against the static style
//! catalogue and merges the matching record's display attributes into
//! the feature's properties so the renderer can read `name`, `color`,
//! and friends directly.

pub mod catalogue;
pub mod enrich;
pub mod name;

pub use catalogue::StyleCatalogue;
pub use enrich::{EnrichOutcome, FEATURE_ID_PROPERTY, enrich, feature_style_id, try_enrich};
pub use name::strip_count_suffix;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a catalogue or enriching features.
#[derive(Debug, Error)]
pub enum StyleError {
    /// A feature references a style id that the catalogue does not contain.
    #[error("Unknown style id: {feature_id}")]
    UnknownStyleId {
        /// The offending `feature_id`.
        feature_id: i64,
    },

    /// A feature has no usable `feature_id` property.
    #[error("Feature at index {index} has no feature_id")]
    MissingFeatureId {
        /// Position of the feature within its collection.
        index: usize,
    },

    /// Reading a catalogue file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The catalogue file extension is neither `.json` nor `.toml`.
    #[error("Unsupported catalogue format: {}", .path.display())]
    UnsupportedFormat {
        /// Path of the rejected file.
        path: PathBuf,
    },
}
