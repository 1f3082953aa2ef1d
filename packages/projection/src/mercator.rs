//! Spherical Mercator to geographic forward conversion.

use std::f64::consts::{FRAC_PI_2, PI};

use cadastre_map_projection_models::ProjectedPoint;

/// Sphere radius in meters used by the planar reference system.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Degrees-to-radians factor, kept as a division operand so results
/// match the renderer's arithmetic bit for bit.
const RADIANS_PER_DEGREE: f64 = PI / 180.0;

/// Converts planar `(x, y)` meters into a geographic point.
///
/// The operation order is fixed: `lat = (2·atan(exp(y/R)) − π/2) / (π/180)`
/// and `lon = (x / (π/180)) / R`. Rewriting these with `to_degrees()` or
/// `mul_add` changes the last bits of the result.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn convert(x: f64, y: f64) -> ProjectedPoint {
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - FRAC_PI_2) / RADIANS_PER_DEGREE;
    let lon = x / RADIANS_PER_DEGREE / EARTH_RADIUS;
    ProjectedPoint::new(lat, lon)
}
