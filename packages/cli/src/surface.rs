//! A render surface that reports calls through the logger.
//!
//! The CLI has no map to draw on; this surface makes the session's
//! rendering decisions visible with `RUST_LOG=info`.

use cadastre_map_projection_models::ViewportBounds;
use cadastre_map_session::{RenderSurface, SelectionImage};
use cadastre_map_style_models::LayerPaint;
use geojson::FeatureCollection;

/// Logs every render call instead of drawing.
pub struct LogSurface;

impl RenderSurface for LogSurface {
    fn set_layer_data(&self, layer_id: &str, data: &FeatureCollection) {
        log::info!("Layer {layer_id}: {} features", data.features.len());
    }

    fn fit_bounds(&self, viewport: &ViewportBounds) {
        log::info!(
            "Fit bounds: west {}, south {}, east {}, north {}",
            viewport.west(),
            viewport.south(),
            viewport.east(),
            viewport.north()
        );
    }

    fn show_selection(&self, image: &SelectionImage) {
        log::info!("Selection image: {}", image.url);
    }

    fn add_overlay(&self, layer_id: &str, paint: &LayerPaint, data: &FeatureCollection) {
        log::info!(
            "Overlay {layer_id} ({}): {} features",
            paint.layer_type(),
            data.features.len()
        );
    }
}
