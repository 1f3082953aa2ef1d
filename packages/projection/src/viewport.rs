//! Extent squaring and viewport bounds construction.

use cadastre_map_projection_models::{Extent, SquaredBox, ViewportBounds};

use crate::{ProjectionError, mercator::convert};

/// Computes the symmetric padding that makes `extent` square.
///
/// The shorter axis is padded by half the size difference on each side.
/// The returned `bbox` always describes the original, unpadded extent:
/// data queries use the exact area while only the display corners are
/// padded.
#[must_use]
pub fn square_extent(extent: &Extent) -> SquaredBox {
    let dx = extent.width();
    let dy = extent.height();
    let bbox = extent.bbox_string();

    let point = if dx < dy {
        [(dy - dx) / 2.0, 0.0]
    } else if dx > dy {
        [0.0, (dx - dy) / 2.0]
    } else {
        [0.0, 0.0]
    };

    SquaredBox { point, bbox }
}

/// Builds the renderer viewport for an extent.
///
/// # Errors
///
/// Returns [`ProjectionError::InvalidExtent`] if `extent` is `None`.
pub fn build_viewport(extent: Option<&Extent>) -> Result<ViewportBounds, ProjectionError> {
    let extent = extent.ok_or(ProjectionError::InvalidExtent)?;
    Ok(build_viewport_from(extent))
}

/// Builds the renderer viewport for an extent that is known to exist.
///
/// `bounds` is assembled as `[min[1], min[0], max[1], max[0]]` from the
/// latitude-first projected corners, which yields
/// `[lon_min, lat_min, lon_max, lat_max]`. The renderer depends on this
/// axis order.
#[must_use]
pub fn build_viewport_from(extent: &Extent) -> ViewportBounds {
    let SquaredBox { point, bbox } = square_extent(extent);

    let min = convert(extent.xmin - point[0], extent.ymin - point[1]);
    let max = convert(extent.xmax + point[0], extent.ymax + point[1]);

    log::debug!(
        "Viewport for bbox {bbox}: padding [{}, {}], sw ({}, {}), ne ({}, {})",
        point[0],
        point[1],
        min.lon,
        min.lat,
        max.lon,
        max.lat,
    );

    ViewportBounds {
        bounds: [min.lon, min.lat, max.lon, max.lat],
        bbox,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EARTH_RADIUS;

    const EPS: f64 = 1e-12;

    fn lat_of(y: f64) -> f64 {
        (2.0 * (y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees()
    }

    fn lon_of(x: f64) -> f64 {
        (x / EARTH_RADIUS).to_degrees()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn wide_extent_pads_y_axis() {
        let squared = square_extent(&Extent::new(0.0, 0.0, 10.0, 4.0));
        assert_eq!(squared.point, [0.0, 3.0]);
        assert_eq!(squared.bbox, "0,0,10,4");
    }

    #[test]
    fn tall_extent_pads_x_axis() {
        let squared = square_extent(&Extent::new(100.0, 200.0, 104.0, 216.0));
        assert_eq!(squared.point, [6.0, 0.0]);
        assert_eq!(squared.bbox, "100,200,104,216");
    }

    #[test]
    fn square_extent_has_no_padding() {
        let squared = square_extent(&Extent::new(-5.0, -5.0, 5.0, 5.0));
        assert_eq!(squared.point, [0.0, 0.0]);
        assert_eq!(squared.bbox, "-5,-5,5,5");
    }

    #[test]
    fn padded_extent_is_always_square() {
        let extents = [
            Extent::new(0.0, 0.0, 10.0, 4.0),
            Extent::new(0.0, 0.0, 4.0, 10.0),
            Extent::new(4_163_780.04, 7_558_020.5, 4_164_293.0, 7_558_272.25),
            Extent::new(-1.5, 2.25, 7.75, 2.25),
            Extent::new(3.0, 3.0, 3.0, 3.0),
        ];
        for extent in &extents {
            let SquaredBox { point, .. } = square_extent(extent);
            let width = (extent.xmax + point[0]) - (extent.xmin - point[0]);
            let height = (extent.ymax + point[1]) - (extent.ymin - point[1]);
            let side = extent.width().max(extent.height());
            assert!((width - side).abs() < 1e-6, "width {width} != {side}");
            assert!((height - side).abs() < 1e-6, "height {height} != {side}");
        }
    }

    #[test]
    fn missing_extent_is_rejected() {
        assert!(matches!(
            build_viewport(None),
            Err(ProjectionError::InvalidExtent)
        ));
    }

    #[test]
    fn viewport_bounds_are_lon_lat_ordered() {
        let extent = Extent::new(4_165_796.6, 7_558_020.0, 4_166_310.0, 7_558_300.0);
        let viewport = build_viewport(Some(&extent)).unwrap();

        // wider than tall, so only y is padded
        let pad = (extent.width() - extent.height()) / 2.0;

        assert!((viewport.west() - lon_of(extent.xmin)).abs() < 1e-9);
        assert!((viewport.south() - lat_of(extent.ymin - pad)).abs() < 1e-9);
        assert!((viewport.east() - lon_of(extent.xmax)).abs() < 1e-9);
        assert!((viewport.north() - lat_of(extent.ymax + pad)).abs() < 1e-9);

        assert!(viewport.west() > 37.0 && viewport.west() < 38.0);
        assert!(viewport.south() > 55.0 && viewport.south() < 57.0);
        assert_eq!(viewport.bbox, "4165796.6,7558020,4166310,7558300");
    }

    #[test]
    fn square_viewport_uses_unpadded_corners() {
        let extent = Extent::new(1000.0, 2000.0, 3000.0, 4000.0);
        assert_eq!(square_extent(&extent).point, [0.0, 0.0]);

        let viewport = build_viewport_from(&extent);
        let min = convert(1000.0, 2000.0);
        let max = convert(3000.0, 4000.0);
        assert_eq!(
            viewport.bounds,
            [min.to_array()[1], min.to_array()[0], max.to_array()[1], max.to_array()[0]]
        );
    }

    #[test]
    fn wide_viewport_matches_independent_projection() {
        let viewport = build_viewport_from(&Extent::new(0.0, 0.0, 10.0, 4.0));
        assert_close(viewport.bounds[0], 0.0);
        assert_close(viewport.bounds[1], lat_of(-3.0));
        assert_close(viewport.bounds[2], lon_of(10.0));
        assert_close(viewport.bounds[3], lat_of(7.0));
        assert_eq!(viewport.bbox, "0,0,10,4");
    }
}
