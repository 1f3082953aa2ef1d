#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Forward projection and viewport construction for cadastre extents.
//!
//! Converts the planar extent reported by the cadastre service into a
//! square, renderer-ready viewport in degrees, alongside the raw bbox
//! string used verbatim for follow-up data queries.

pub mod mercator;
pub mod pkk;
pub mod viewport;

pub use mercator::{EARTH_RADIUS, convert};
pub use pkk::extent_from_pkk;
pub use viewport::{build_viewport, build_viewport_from, square_extent};

use thiserror::Error;

/// Errors that can occur while building a viewport.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// No extent was supplied for the object being displayed.
    #[error("Extent is not set")]
    InvalidExtent,

    /// A cadastre service coordinate could not be read as a number.
    #[error("Invalid coordinate for {field}: {value:?}")]
    InvalidCoordinate {
        /// Which extent field held the bad value (e.g. `"min.longitude"`).
        field: &'static str,
        /// The raw value as received.
        value: String,
    },
}
