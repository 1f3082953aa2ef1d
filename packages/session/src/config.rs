//! Session configuration.
//!
//! Defaults point at the public endpoints. A TOML file and environment
//! variables can override them:
//!
//! | Variable | Field |
//! |---|---|
//! | `CADASTRE_MAP_CONFIG` | path of a TOML file loaded first |
//! | `CADASTRE_MAP_FEATURES_URL` | `features_url` |
//! | `CADASTRE_MAP_SELECTED_IMAGE_URL` | `selected_image_url` |
//! | `CADASTRE_MAP_LAYERS_API_URL` | `layers_api_url` |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Endpoints and layer wiring for a map session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Endpoint returning zone features for `?bbox=...&zoom=...`.
    pub features_url: String,
    /// Endpoint rendering the selected-object image.
    pub selected_image_url: String,
    /// Root of the cadastre layers API (`.../arcgis/rest/services/...`).
    pub layers_api_url: String,
    /// Renderer layers that receive the enriched feature collection.
    pub feature_layer_ids: Vec<String>,
    /// HTTP timeout for feature requests, in seconds.
    pub timeout_secs: u64,
    /// Reject malformed cadastral ids instead of passing them through.
    pub strict_ids: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            features_url: "https://test.bstrv.ru/api/geojson".to_string(),
            selected_image_url:
                "https://xn--c1adzl.xn--c1avg/map-w-pkk/api/rosreestr/cadastre-selected.php"
                    .to_string(),
            layers_api_url: "https://egrn.click/next/api/layers".to_string(),
            feature_layer_ids: vec!["l".to_string(), "l-text".to_string()],
            timeout_secs: 30,
            strict_ids: false,
        }
    }
}

impl SessionConfig {
    /// Reads a TOML configuration file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::de::from_str(&contents)?;
        log::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Builds the configuration from `CADASTRE_MAP_*` environment
    /// variables, starting from the file named by `CADASTRE_MAP_CONFIG`
    /// when set.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the configured file cannot be loaded.
    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SessionError> {
        let mut config = match lookup("CADASTRE_MAP_CONFIG") {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(url) = lookup("CADASTRE_MAP_FEATURES_URL") {
            config.features_url = url;
        }
        if let Some(url) = lookup("CADASTRE_MAP_SELECTED_IMAGE_URL") {
            config.selected_image_url = url;
        }
        if let Some(url) = lookup("CADASTRE_MAP_LAYERS_API_URL") {
            config.layers_api_url = url;
        }

        Ok(config)
    }
}
