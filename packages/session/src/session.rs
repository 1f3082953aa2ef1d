//! The map session and its pipelines.

use std::sync::Arc;

use cadastre_map_cadastral::{CadastralId, ObjectType, SelectionQuery};
use cadastre_map_projection::build_viewport;
use cadastre_map_projection_models::{Extent, ViewportBounds, format_coordinate};
use cadastre_map_style::{EnrichOutcome, StyleCatalogue, enrich};
use serde::{Deserialize, Serialize};

use crate::{
    FeatureSource, HttpFeatureSource, RenderSurface, SelectionImage, SessionConfig, SessionError,
    ZoneOverlay,
};

/// The visible map area as reported by the renderer, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBounds {
    /// Western longitude.
    pub west: f64,
    /// Southern latitude.
    pub south: f64,
    /// Eastern longitude.
    pub east: f64,
    /// Northern latitude.
    pub north: f64,
    /// Current zoom level.
    pub zoom: f64,
}

impl CameraBounds {
    /// `"west,south,east,north"` for the feature request.
    #[must_use]
    pub fn bbox_param(&self) -> String {
        [self.west, self.south, self.east, self.north]
            .map(format_coordinate)
            .join(",")
    }
}

/// Everything computed when focusing a single object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusPlan {
    /// Identifier after normalization.
    pub cid: String,
    /// Viewport framing the object.
    pub viewport: ViewportBounds,
    /// Highlight image request; `None` when the id did not parse.
    pub image: Option<SelectionImage>,
}

/// One map view: configuration, catalogue, feature source, and surface.
pub struct MapSession {
    config: SessionConfig,
    catalogue: Arc<StyleCatalogue>,
    source: Box<dyn FeatureSource>,
    surface: Box<dyn RenderSurface>,
}

impl MapSession {
    /// Creates a session from explicit collaborators.
    #[must_use]
    pub fn new(
        config: SessionConfig,
        catalogue: Arc<StyleCatalogue>,
        source: Box<dyn FeatureSource>,
        surface: Box<dyn RenderSurface>,
    ) -> Self {
        Self {
            config,
            catalogue,
            source,
            surface,
        }
    }

    /// Creates a session fetching features over HTTP per `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Http`] if the HTTP client cannot be built.
    pub fn with_http_source(
        config: SessionConfig,
        catalogue: Arc<StyleCatalogue>,
        surface: Box<dyn RenderSurface>,
    ) -> Result<Self, SessionError> {
        let source = HttpFeatureSource::from_config(&config)?;
        Ok(Self::new(config, catalogue, Box::new(source), surface))
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Refreshes the feature layers for a new camera position.
    ///
    /// Fetches the features inside the camera bounds, enriches them from
    /// the catalogue, and pushes the result to every configured feature
    /// layer. Features without a catalogue match are drawn unstyled.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the fetch fails. The surface is left
    /// untouched in that case.
    pub async fn refresh(&self, camera: &CameraBounds) -> Result<EnrichOutcome, SessionError> {
        let bbox = camera.bbox_param();
        let collection = self.source.fetch(&bbox, camera.zoom).await?;

        let outcome = enrich(collection, &self.catalogue);
        log::debug!(
            "Enriched {} features for bbox {bbox} ({} unknown style ids)",
            outcome.enriched,
            outcome.unknown_ids.len()
        );

        for layer_id in &self.config.feature_layer_ids {
            self.surface.set_layer_data(layer_id, &outcome.collection);
        }

        Ok(outcome)
    }

    /// Frames and highlights one cadastral object.
    ///
    /// The highlight filter is only ever built from a parsed
    /// [`CadastralId`]. With `strict_ids` unset, an id that does not parse
    /// still frames the viewport but is not highlighted, and `FocusPlan::cid`
    /// echoes the input.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Projection`] if `extent` is `None`,
    /// [`SessionError::Cadastral`] if `strict_ids` is set and `cid` is
    /// malformed, or [`SessionError::Config`] if the image URL is invalid.
    pub fn focus_object(
        &self,
        cid: &str,
        object_type: ObjectType,
        extent: Option<&Extent>,
    ) -> Result<FocusPlan, SessionError> {
        let parsed = match cid.parse::<CadastralId>() {
            Ok(parsed) => Some(parsed),
            Err(e) if self.config.strict_ids => return Err(e.into()),
            Err(e) => {
                log::warn!("Not highlighting {object_type}: {e}");
                None
            }
        };
        let viewport = build_viewport(extent)?;

        let image = parsed
            .as_ref()
            .map(|id| self.selection_image(id, object_type, &viewport))
            .transpose()?;
        let cid = parsed.map_or_else(|| cid.to_string(), |id| id.to_string());

        log::info!("Focusing {object_type} {cid} at {:?}", viewport.bounds);
        self.surface.fit_bounds(&viewport);
        if let Some(image) = &image {
            self.surface.show_selection(image);
        }

        Ok(FocusPlan {
            cid,
            viewport,
            image,
        })
    }

    fn selection_image(
        &self,
        cid: &CadastralId,
        object_type: ObjectType,
        viewport: &ViewportBounds,
    ) -> Result<SelectionImage, SessionError> {
        let selection = SelectionQuery::new(object_type, cid, &self.config.layers_api_url);
        let url = reqwest::Url::parse_with_params(
            &self.config.selected_image_url,
            selection.image_params(&viewport.bbox),
        )
        .map_err(|e| SessionError::Config {
            message: format!(
                "Invalid selected image URL {:?}: {e}",
                self.config.selected_image_url
            ),
        })?;

        Ok(SelectionImage {
            url: url.to_string(),
            viewport: viewport.clone(),
            selection,
        })
    }

    /// Adds static zone overlays, painted from the catalogue by zone name.
    ///
    /// Zones whose style has no stroke or fill color are skipped. Returns
    /// the number of overlays added.
    pub fn add_overlays(&self, overlays: &[ZoneOverlay]) -> usize {
        let mut added = 0;
        for (index, overlay) in overlays.iter().enumerate() {
            let Some(paint) = self.catalogue.paint_for_name(&overlay.name) else {
                log::debug!("No paint for zone overlay {:?}, skipping", overlay.name);
                continue;
            };
            self.surface
                .add_overlay(&format!("zone-overlay-{index}"), &paint, &overlay.data);
            added += 1;
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use cadastre_map_projection::ProjectionError;
    use cadastre_map_style_models::{LayerPaint, StyleColor, StyleRecord};
    use geojson::{Feature, FeatureCollection};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SetLayerData(String, usize),
        FitBounds([f64; 4]),
        ShowSelection(String),
        AddOverlay(String, &'static str),
    }

    #[derive(Clone, Default)]
    struct RecordingSurface {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl RecordingSurface {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl RenderSurface for RecordingSurface {
        fn set_layer_data(&self, layer_id: &str, data: &FeatureCollection) {
            self.record(Call::SetLayerData(layer_id.to_string(), data.features.len()));
        }

        fn fit_bounds(&self, viewport: &ViewportBounds) {
            self.record(Call::FitBounds(viewport.bounds));
        }

        fn show_selection(&self, image: &SelectionImage) {
            self.record(Call::ShowSelection(image.url.clone()));
        }

        fn add_overlay(&self, layer_id: &str, paint: &LayerPaint, _data: &FeatureCollection) {
            self.record(Call::AddOverlay(layer_id.to_string(), paint.layer_type()));
        }
    }

    struct StaticSource {
        collection: FeatureCollection,
        requests: Mutex<Vec<(String, f64)>>,
    }

    #[async_trait]
    impl FeatureSource for StaticSource {
        async fn fetch(&self, bbox: &str, zoom: f64) -> Result<FeatureCollection, SessionError> {
            self.requests.lock().unwrap().push((bbox.to_string(), zoom));
            Ok(self.collection.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl FeatureSource for FailingSource {
        async fn fetch(&self, bbox: &str, _zoom: f64) -> Result<FeatureCollection, SessionError> {
            Err(SessionError::MissingFeatures {
                url: format!("test://{bbox}"),
            })
        }
    }

    fn feature_with_id(feature_id: i64) -> Feature {
        let mut props = geojson::JsonObject::new();
        props.insert("feature_id".to_string(), feature_id.into());
        Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }

    fn catalogue() -> Arc<StyleCatalogue> {
        let mut zone = StyleRecord::new(7, "Zone A (12)");
        zone.color = Some(StyleColor {
            stroke: None,
            fill: Some("#f4cccc".to_string()),
        });
        Arc::new(StyleCatalogue::from_records([zone]))
    }

    fn session(
        source: Box<dyn FeatureSource>,
        config: SessionConfig,
    ) -> (MapSession, RecordingSurface) {
        let surface = RecordingSurface::default();
        let session = MapSession::new(config, catalogue(), source, Box::new(surface.clone()));
        (session, surface)
    }

    fn camera() -> CameraBounds {
        CameraBounds {
            west: 37.4,
            south: 55.9,
            east: 37.5,
            north: 56.0,
            zoom: 14.0,
        }
    }

    #[tokio::test]
    async fn refresh_enriches_and_pushes_to_every_layer() {
        let source = StaticSource {
            collection: FeatureCollection {
                bbox: None,
                features: vec![feature_with_id(7), feature_with_id(99)],
                foreign_members: None,
            },
            requests: Mutex::new(Vec::new()),
        };
        let (session, surface) = session(Box::new(source), SessionConfig::default());

        let outcome = session.refresh(&camera()).await.unwrap();
        assert_eq!(outcome.enriched, 1);
        assert_eq!(outcome.collection.features.len(), 2);
        assert!(outcome.unknown_ids.contains(&99));
        assert_eq!(
            outcome.collection.features[0].properties.as_ref().unwrap()["name"],
            "Zone A"
        );

        assert_eq!(
            surface.calls(),
            [
                Call::SetLayerData("l".to_string(), 2),
                Call::SetLayerData("l-text".to_string(), 2),
            ]
        );
    }

    struct WarnCapture(Mutex<Vec<String>>);

    impl log::Log for WarnCapture {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record<'_>) {
            if self.enabled(record.metadata()) {
                self.0.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static WARNINGS: WarnCapture = WarnCapture(Mutex::new(Vec::new()));

    #[tokio::test]
    async fn refresh_warns_once_per_unknown_style_id() {
        let _ = log::set_logger(&WARNINGS);
        log::set_max_level(log::LevelFilter::Warn);

        let source = StaticSource {
            collection: FeatureCollection {
                bbox: None,
                features: vec![feature_with_id(424_242), feature_with_id(424_242)],
                foreign_members: None,
            },
            requests: Mutex::new(Vec::new()),
        };
        let (session, _surface) = session(Box::new(source), SessionConfig::default());
        session.refresh(&camera()).await.unwrap();

        let mentions = WARNINGS
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|message| message.contains("424242"))
            .count();
        assert_eq!(mentions, 1);
    }

    #[tokio::test]
    async fn refresh_requests_camera_bbox() {
        let source = Arc::new(StaticSource {
            collection: FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
            requests: Mutex::new(Vec::new()),
        });

        struct Shared(Arc<StaticSource>);

        #[async_trait]
        impl FeatureSource for Shared {
            async fn fetch(
                &self,
                bbox: &str,
                zoom: f64,
            ) -> Result<FeatureCollection, SessionError> {
                self.0.fetch(bbox, zoom).await
            }
        }

        let (session, _surface) =
            session(Box::new(Shared(source.clone())), SessionConfig::default());
        session.refresh(&camera()).await.unwrap();

        let requests = source.requests.lock().unwrap().clone();
        assert_eq!(requests, [("37.4,55.9,37.5,56".to_string(), 14.0)]);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_surface_untouched() {
        let (session, surface) = session(Box::new(FailingSource), SessionConfig::default());
        let err = session.refresh(&camera()).await.unwrap_err();
        assert!(matches!(err, SessionError::MissingFeatures { .. }));
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn focus_object_frames_and_highlights() {
        let (session, surface) = session(Box::new(FailingSource), SessionConfig::default());
        let extent = Extent::new(4_165_796.6, 7_558_020.0, 4_166_310.0, 7_558_300.0);

        let plan = session
            .focus_object("50:41:0030401:1", ObjectType::Zu, Some(&extent))
            .unwrap();

        assert_eq!(plan.cid, "50:41:30401:1");
        assert_eq!(plan.viewport.bbox, "4165796.6,7558020,4166310,7558300");
        let image = plan.image.as_ref().unwrap();
        assert_eq!(image.selection.layers, "show:6,7,8,9");

        let url = reqwest::Url::parse(&image.url).unwrap();
        let id = url
            .query_pairs()
            .find(|(k, _)| k == "id")
            .map(|(_, v)| v.into_owned());
        assert_eq!(id.as_deref(), Some("50:41:30401:1"));

        assert_eq!(
            surface.calls(),
            [
                Call::FitBounds(plan.viewport.bounds),
                Call::ShowSelection(image.url.clone()),
            ]
        );
    }

    #[test]
    fn focus_object_requires_extent() {
        let (session, surface) = session(Box::new(FailingSource), SessionConfig::default());
        let err = session
            .focus_object("50:41:0030401:1", ObjectType::Zu, None)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Projection(ProjectionError::InvalidExtent)
        ));
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn strict_ids_reject_malformed_cid() {
        let config = SessionConfig {
            strict_ids: true,
            ..SessionConfig::default()
        };
        let (session, _surface) = session(Box::new(FailingSource), config);
        let extent = Extent::new(0.0, 0.0, 10.0, 4.0);
        let err = session
            .focus_object("not-a-cid", ObjectType::Zone, Some(&extent))
            .unwrap_err();
        assert!(matches!(err, SessionError::Cadastral(_)));
    }

    #[test]
    fn permissive_ids_frame_without_highlight() {
        let (session, surface) = session(Box::new(FailingSource), SessionConfig::default());
        let extent = Extent::new(0.0, 0.0, 10.0, 4.0);
        let plan = session
            .focus_object("not-a-cid", ObjectType::Zone, Some(&extent))
            .unwrap();
        assert_eq!(plan.cid, "not-a-cid");
        assert!(plan.image.is_none());
        assert_eq!(surface.calls(), [Call::FitBounds(plan.viewport.bounds)]);
    }

    #[test]
    fn quoted_cid_never_reaches_layer_filter() {
        let (session, surface) = session(Box::new(FailingSource), SessionConfig::default());
        let extent = Extent::new(0.0, 0.0, 10.0, 4.0);
        let plan = session
            .focus_object("1' OR '1'='1", ObjectType::Zone, Some(&extent))
            .unwrap();
        assert!(plan.image.is_none());
        assert!(
            !surface
                .calls()
                .iter()
                .any(|call| matches!(call, Call::ShowSelection(_)))
        );
    }

    #[test]
    fn overlays_use_catalogue_paint() {
        let (session, surface) = session(Box::new(FailingSource), SessionConfig::default());
        let empty = FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        };
        let added = session.add_overlays(&[
            ZoneOverlay {
                name: "Zone A".to_string(),
                data: empty.clone(),
            },
            ZoneOverlay {
                name: "Unknown zone".to_string(),
                data: empty,
            },
        ]);
        assert_eq!(added, 1);
        assert_eq!(
            surface.calls(),
            [Call::AddOverlay("zone-overlay-0".to_string(), "fill")]
        );
    }
}
