#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map session pipeline.
//!
//! A [`MapSession`] owns everything a single map view needs: its
//! configuration, the shared style catalogue, a [`FeatureSource`] that
//! fetches features for a bbox, and the [`RenderSurface`] that draws them.
//! Viewport changes flow through [`MapSession::refresh`]; focusing a single
//! cadastral object flows through [`MapSession::focus_object`].

pub mod config;
pub mod render;
pub mod session;
pub mod source;

pub use config::SessionConfig;
pub use render::{RenderSurface, SelectionImage, ZoneOverlay};
pub use session::{CameraBounds, FocusPlan, MapSession};
pub use source::{FeatureSource, HttpFeatureSource, parse_features};

use thiserror::Error;

/// Errors that can occur while running the session pipeline.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Viewport construction failed.
    #[error("Projection error: {0}")]
    Projection(#[from] cadastre_map_projection::ProjectionError),

    /// Catalogue loading or strict enrichment failed.
    #[error("Style error: {0}")]
    Style(#[from] cadastre_map_style::StyleError),

    /// Strict cadastral id parsing failed.
    #[error("Cadastral error: {0}")]
    Cadastral(#[from] cadastre_map_cadastral::CadastralError),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The feature endpoint answered with a non-success status.
    #[error("Feature request to {url} failed with status {status}")]
    Fetch {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The feature endpoint answered without a `features` array.
    #[error("No features array in response from {url}")]
    MissingFeatures {
        /// Requested URL.
        url: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
