//! Joining fetched features against the style catalogue.

use std::collections::BTreeSet;

use cadastre_map_style_models::StyleRecord;
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};

use crate::{StyleCatalogue, StyleError, name::strip_count_suffix};

/// Feature property holding the style id.
pub const FEATURE_ID_PROPERTY: &str = "feature_id";

/// Result of enriching a feature collection.
#[derive(Debug, Clone)]
pub struct EnrichOutcome {
    /// The enriched collection. Always the same length as the input.
    pub collection: FeatureCollection,
    /// Number of features that received style attributes.
    pub enriched: usize,
    /// Distinct style ids that had no catalogue entry.
    pub unknown_ids: BTreeSet<i64>,
    /// Number of features without a usable `feature_id`.
    pub missing_feature_id: usize,
}

impl EnrichOutcome {
    /// Whether every feature was enriched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unknown_ids.is_empty() && self.missing_feature_id == 0
    }
}

/// Reads the style id of a feature.
///
/// Accepts integer numbers, integral floats, and numeric strings, since
/// upstream services are not consistent about the property's type.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn feature_style_id(feature: &Feature) -> Option<i64> {
    match feature.properties.as_ref()?.get(FEATURE_ID_PROPERTY)? {
        JsonValue::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Builds the properties contributed by a style record.
///
/// The record itself is left untouched; the returned `name` has its
/// trailing count stripped.
fn style_properties(record: &StyleRecord) -> JsonObject {
    let mut props = record.extra.clone();
    props.insert("id".to_string(), JsonValue::from(record.id));
    props.insert(
        "name".to_string(),
        JsonValue::String(strip_count_suffix(&record.name).into_owned()),
    );
    if let Some(color) = &record.color {
        let mut color_obj = JsonObject::new();
        if let Some(stroke) = &color.stroke {
            color_obj.insert("stroke".to_string(), JsonValue::String(stroke.clone()));
        }
        if let Some(fill) = &color.fill {
            color_obj.insert("fill".to_string(), JsonValue::String(fill.clone()));
        }
        props.insert("color".to_string(), JsonValue::Object(color_obj));
    }
    props
}

/// Merges style attributes into a feature. Style keys overwrite
/// same-named feature properties.
fn merge(feature: &mut Feature, record: &StyleRecord) {
    feature
        .properties
        .get_or_insert_with(JsonObject::new)
        .extend(style_properties(record));
}

/// Enriches every feature that has a catalogue match.
///
/// Features whose style id is unknown, or that carry no `feature_id`, are
/// passed through untouched; each distinct unknown id is logged once.
/// The catalogue is never modified, so repeated calls produce identical
/// output.
#[must_use]
pub fn enrich(mut collection: FeatureCollection, catalogue: &StyleCatalogue) -> EnrichOutcome {
    let mut enriched = 0;
    let mut unknown_ids = BTreeSet::new();
    let mut missing_feature_id = 0;

    for (index, feature) in collection.features.iter_mut().enumerate() {
        let Some(style_id) = feature_style_id(feature) else {
            log::debug!("Feature {index} has no {FEATURE_ID_PROPERTY}, skipping enrichment");
            missing_feature_id += 1;
            continue;
        };

        match catalogue.get(style_id) {
            Some(record) => {
                merge(feature, record);
                enriched += 1;
            }
            None => {
                if unknown_ids.insert(style_id) {
                    log::warn!("No style record for feature_id {style_id}");
                }
            }
        }
    }

    log::debug!(
        "Enriched {enriched}/{} features ({} unknown style ids, {missing_feature_id} without id)",
        collection.features.len(),
        unknown_ids.len(),
    );

    EnrichOutcome {
        collection,
        enriched,
        unknown_ids,
        missing_feature_id,
    }
}

/// Enriches every feature, failing on the first one that cannot be
/// matched.
///
/// # Errors
///
/// Returns [`StyleError::MissingFeatureId`] for a feature without a
/// usable `feature_id`, or [`StyleError::UnknownStyleId`] for an id that
/// is not in the catalogue.
pub fn try_enrich(
    mut collection: FeatureCollection,
    catalogue: &StyleCatalogue,
) -> Result<FeatureCollection, StyleError> {
    for (index, feature) in collection.features.iter_mut().enumerate() {
        let feature_id = feature_style_id(feature).ok_or(StyleError::MissingFeatureId { index })?;
        let record = catalogue
            .get(feature_id)
            .ok_or(StyleError::UnknownStyleId { feature_id })?;
        merge(feature, record);
    }
    Ok(collection)
}
