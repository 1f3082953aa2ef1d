//! Render surface boundary.
//!
//! The session never draws anything itself. It hands viewport bounds and
//! layer payloads to a [`RenderSurface`] supplied by the embedding
//! application.

use cadastre_map_cadastral::SelectionQuery;
use cadastre_map_projection_models::ViewportBounds;
use cadastre_map_style_models::LayerPaint;
use geojson::FeatureCollection;
use serde::Serialize;

/// Image overlay highlighting one selected cadastral object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionImage {
    /// Fully-qualified image request URL.
    pub url: String,
    /// Viewport the image covers.
    pub viewport: ViewportBounds,
    /// Layer selection the image was rendered with.
    pub selection: SelectionQuery,
}

/// A static zone layer drawn beneath the dynamic features.
#[derive(Debug, Clone)]
pub struct ZoneOverlay {
    /// Zone style name used to look up the overlay paint.
    pub name: String,
    /// Zone geometry.
    pub data: FeatureCollection,
}

/// Drawing capability injected into a [`crate::MapSession`].
///
/// Implementations are handles onto the embedding renderer, so methods
/// take `&self`.
pub trait RenderSurface: Send + Sync {
    /// Replaces the data of the layer `layer_id`.
    fn set_layer_data(&self, layer_id: &str, data: &FeatureCollection);

    /// Moves the camera to fit `viewport.bounds`
    /// (`[lon_min, lat_min, lon_max, lat_max]`).
    fn fit_bounds(&self, viewport: &ViewportBounds);

    /// Shows the highlight image for a selected object.
    fn show_selection(&self, image: &SelectionImage);

    /// Adds a static overlay layer painted with `paint`.
    fn add_overlay(&self, layer_id: &str, paint: &LayerPaint, data: &FeatureCollection);
}
