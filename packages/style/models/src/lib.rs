#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone style catalogue record types.
//!
//! A style catalogue is static reference data: one record per zone style
//! id, carrying the display name, colors, and any further attributes the
//! renderer reads from feature properties.

use serde::{Deserialize, Serialize};

/// Stroke and fill colors for a zone style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleColor {
    /// Outline color (e.g. `"#ff0000"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

/// A single entry of the style catalogue.
///
/// `id` matches the `feature_id` property of fetched features. Attributes
/// other than `id`, `name`, and `color` are kept verbatim in `extra` and
/// merged into feature properties alongside the named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRecord {
    /// Style identifier.
    pub id: i64,
    /// Display name, possibly carrying a trailing count like `"Zone A (12)"`.
    pub name: String,
    /// Display colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<StyleColor>,
    /// Any further display attributes (`outline`, `code`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StyleRecord {
    /// Creates a record with no color and no extra attributes.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// On-disk catalogue layout: `{ "styles": [...] }` in JSON or
/// `[[styles]]` tables in TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogueFile {
    /// Catalogue entries.
    #[serde(default)]
    pub styles: Vec<StyleRecord>,
}

/// Paint for a static overlay layer derived from a style's colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerPaint {
    /// Stroked layer, optionally also carrying the style's fill color.
    Line {
        /// Line color.
        color: String,
        /// Line width in pixels.
        width: f64,
        /// Fill color painted alongside the stroke.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
    },
    /// Filled polygon layer.
    Fill {
        /// Fill color.
        color: String,
        /// Fill opacity in `0.0..=1.0`.
        opacity: f64,
    },
}

impl LayerPaint {
    /// Line width used for stroked overlays.
    pub const LINE_WIDTH: f64 = 2.0;
    /// Opacity used for filled overlays.
    pub const FILL_OPACITY: f64 = 0.7;

    /// Picks the paint for a style color: a stroke makes a line layer,
    /// keeping any fill, otherwise a fill makes a fill layer.
    ///
    /// Returns `None` when neither color is set, meaning the overlay has
    /// nothing to draw.
    #[must_use]
    pub fn from_color(color: Option<&StyleColor>) -> Option<Self> {
        let color = color?;
        if let Some(stroke) = &color.stroke {
            return Some(Self::Line {
                color: stroke.clone(),
                width: Self::LINE_WIDTH,
                fill: color.fill.clone(),
            });
        }
        color.fill.as_ref().map(|fill| Self::Fill {
            color: fill.clone(),
            opacity: Self::FILL_OPACITY,
        })
    }

    /// Renderer layer type (`"line"` or `"fill"`).
    #[must_use]
    pub const fn layer_type(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Fill { .. } => "fill",
        }
    }

    /// Renderer paint properties for this layer.
    #[must_use]
    pub fn paint_properties(&self) -> serde_json::Value {
        match self {
            Self::Line { color, width, fill } => {
                let mut paint = serde_json::json!({
                    "line-color": color,
                    "line-width": width,
                });
                if let Some(fill) = fill {
                    paint["fill-color"] = fill.as_str().into();
                    paint["fill-opacity"] = Self::FILL_OPACITY.into();
                }
                paint
            }
            Self::Fill { color, opacity } => serde_json::json!({
                "fill-color": color,
                "fill-opacity": opacity,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_extra_attributes() {
        let record: StyleRecord = serde_json::from_str(
            r##"{"id": 7, "name": "Zone A (12)", "color": {"fill": "#aabbcc"}, "outline": "#000"}"##,
        )
        .unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.name, "Zone A (12)");
        assert_eq!(
            record.color.as_ref().and_then(|c| c.fill.as_deref()),
            Some("#aabbcc")
        );
        assert_eq!(record.extra["outline"], "#000");
        assert!(!record.extra.contains_key("id"));
    }

    #[test]
    fn stroke_takes_precedence_over_fill() {
        let color = StyleColor {
            stroke: Some("#111".to_string()),
            fill: Some("#222".to_string()),
        };
        let paint = LayerPaint::from_color(Some(&color)).unwrap();
        assert_eq!(paint.layer_type(), "line");
        let props = paint.paint_properties();
        assert_eq!(props["line-color"], "#111");
        assert_eq!(props["line-width"], 2.0);
        assert_eq!(props["fill-color"], "#222");
        assert_eq!(props["fill-opacity"], 0.7);
    }

    #[test]
    fn stroke_only_style_has_no_fill_paint() {
        let color = StyleColor {
            stroke: Some("#111".to_string()),
            fill: None,
        };
        let props = LayerPaint::from_color(Some(&color))
            .unwrap()
            .paint_properties();
        assert!(props.get("fill-color").is_none());
        assert!(props.get("fill-opacity").is_none());
    }

    #[test]
    fn fill_only_style_is_filled() {
        let color = StyleColor {
            stroke: None,
            fill: Some("#222".to_string()),
        };
        let paint = LayerPaint::from_color(Some(&color)).unwrap();
        assert_eq!(paint.layer_type(), "fill");
        assert_eq!(paint.paint_properties()["fill-opacity"], 0.7);
    }

    #[test]
    fn colorless_style_has_no_paint() {
        assert!(LayerPaint::from_color(None).is_none());
        assert!(LayerPaint::from_color(Some(&StyleColor::default())).is_none());
    }
}
