#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Extent, viewport, and projected point types.
//!
//! These types describe the planar extents reported by the cadastre
//! service and the renderer-facing viewport derived from them. They are
//! plain data; the transforms live in `cadastre_map_projection`.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in planar (spherical Mercator) meters.
///
/// `xmax >= xmin` and `ymax >= ymin` are expected but not enforced;
/// upstream geometry is passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Minimum easting.
    pub xmin: f64,
    /// Minimum northing.
    pub ymin: f64,
    /// Maximum easting.
    pub xmax: f64,
    /// Maximum northing.
    pub ymax: f64,
}

impl Extent {
    /// Creates a new extent from its four edges.
    #[must_use]
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Width of the extent (`xmax - xmin`).
    #[must_use]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height of the extent (`ymax - ymin`).
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Formats the extent as the literal `"xmin,ymin,xmax,ymax"` query
    /// string, each value written by [`format_coordinate`].
    #[must_use]
    pub fn bbox_string(&self) -> String {
        [self.xmin, self.ymin, self.xmax, self.ymax]
            .map(format_coordinate)
            .join(",")
    }
}

/// Writes a coordinate the way web clients print numbers.
///
/// Shortest round-trip digits, `-0` written as `0`, exponent notation
/// (`1e+21`, `1.5e-7`) outside `1e-6..1e21`, and `NaN`/`Infinity` for
/// non-finite values.
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exponential = format!("{value:e}");
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponential,
    }
}

/// Padding offset and raw bbox string produced by squaring an extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquaredBox {
    /// `[dx, dy]` padding applied symmetrically to the shorter axis.
    pub point: [f64; 2],
    /// `"xmin,ymin,xmax,ymax"` of the *unpadded* extent.
    pub bbox: String,
}

/// A geographic point produced by the forward projection.
///
/// The array form is latitude-first: `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl ProjectedPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns the positional `[lat, lon]` form.
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// The renderer-facing viewport plus the raw-coordinate query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    /// `[lon_min, lat_min, lon_max, lat_max]`.
    pub bounds: [f64; 4],
    /// `"xmin,ymin,xmax,ymax"` of the unpadded planar extent.
    pub bbox: String,
}

impl ViewportBounds {
    /// Western longitude.
    #[must_use]
    pub const fn west(&self) -> f64 {
        self.bounds[0]
    }

    /// Southern latitude.
    #[must_use]
    pub const fn south(&self) -> f64 {
        self.bounds[1]
    }

    /// Eastern longitude.
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.bounds[2]
    }

    /// Northern latitude.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.bounds[3]
    }
}

/// A coordinate value from the cadastre service.
///
/// The service emits either JSON numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PkkNumber {
    /// A plain JSON number.
    Number(f64),
    /// A number encoded as a string (e.g. `"4163780.04"`).
    Text(String),
}

impl PkkNumber {
    /// Coerces the value to `f64`, returning `None` for non-numeric text.
    ///
    /// Text follows web-client number coercion: blank text is `0`,
    /// `0x`/`0o`/`0b` prefixes select the radix, and only the spelling
    /// `Infinity` is infinite (`inf` and `NaN` are not numeric).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_numeric_text(s.trim()),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn parse_numeric_text(text: &str) -> Option<f64> {
    if text.is_empty() {
        return Some(0.0);
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &text[2..];
        if !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return u128::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }

    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    text.parse().ok()
}

impl From<f64> for PkkNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A corner of a cadastre service extent.
///
/// Despite the field names, values are planar meters, not degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PkkCoordinate {
    /// Easting.
    pub longitude: PkkNumber,
    /// Northing.
    pub latitude: PkkNumber,
}

/// The extent shape reported by the cadastre service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PkkExtent {
    /// Lower-left corner.
    pub min: PkkCoordinate,
    /// Upper-right corner.
    pub max: PkkCoordinate,
}

/// The `pkk` block of a cadastre object response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PkkInfo {
    /// Extent of the object itself.
    pub extent: Option<PkkExtent>,
    /// Secondary extent used when focusing the selected object.
    pub extent2: Option<PkkExtent>,
}

/// A cadastre object response as delivered to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PkkResponse {
    /// Cadastre service data; absent for objects without geometry.
    #[serde(default)]
    pub pkk: Option<PkkInfo>,
}

impl PkkResponse {
    /// Returns `pkk.extent`, if present.
    #[must_use]
    pub fn extent(&self) -> Option<&PkkExtent> {
        self.pkk.as_ref().and_then(|p| p.extent.as_ref())
    }

    /// Returns `pkk.extent2`, if present.
    #[must_use]
    pub fn extent2(&self) -> Option<&PkkExtent> {
        self.pkk.as_ref().and_then(|p| p.extent2.as_ref())
    }
}
