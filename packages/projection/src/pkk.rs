//! Adapter from the cadastre service extent shape to [`Extent`].

use cadastre_map_projection_models::{Extent, PkkExtent, PkkNumber};

use crate::ProjectionError;

/// Maps a cadastre service extent onto an [`Extent`].
///
/// Field correspondence is `xmin = min.longitude`, `ymin = min.latitude`,
/// `xmax = max.longitude`, `ymax = max.latitude`. Numeric strings are
/// coerced.
///
/// # Errors
///
/// Returns [`ProjectionError::InvalidExtent`] if `pkk` is `None`, or
/// [`ProjectionError::InvalidCoordinate`] if a value is not numeric.
pub fn extent_from_pkk(pkk: Option<&PkkExtent>) -> Result<Extent, ProjectionError> {
    let pkk = pkk.ok_or(ProjectionError::InvalidExtent)?;

    Ok(Extent::new(
        coerce("min.longitude", &pkk.min.longitude)?,
        coerce("min.latitude", &pkk.min.latitude)?,
        coerce("max.longitude", &pkk.max.longitude)?,
        coerce("max.latitude", &pkk.max.latitude)?,
    ))
}

fn coerce(field: &'static str, value: &PkkNumber) -> Result<f64, ProjectionError> {
    value
        .as_f64()
        .ok_or_else(|| ProjectionError::InvalidCoordinate {
            field,
            value: match value {
                PkkNumber::Number(n) => n.to_string(),
                PkkNumber::Text(s) => s.clone(),
            },
        })
}
