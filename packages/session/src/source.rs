//! Feature fetch boundary.

use std::time::Duration;

use async_trait::async_trait;
use geojson::FeatureCollection;

use crate::{SessionConfig, SessionError};

/// Supplies the raw feature collection for a viewport.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    /// Fetches features inside `bbox` (`"west,south,east,north"`) at the
    /// given zoom level.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the features cannot be fetched or
    /// parsed.
    async fn fetch(&self, bbox: &str, zoom: f64) -> Result<FeatureCollection, SessionError>;
}

/// Fetches features from an HTTP endpoint taking `bbox` and `zoom` query
/// parameters.
pub struct HttpFeatureSource {
    client: reqwest::Client,
    url: String,
}

impl HttpFeatureSource {
    /// Creates a source for `url` using an existing client.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Creates a source from the session configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::new(client, config.features_url.clone()))
    }

    /// Request URL for a bbox and zoom.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if the configured base URL is
    /// invalid.
    pub fn request_url(&self, bbox: &str, zoom: f64) -> Result<reqwest::Url, SessionError> {
        let zoom = zoom.to_string();
        reqwest::Url::parse_with_params(&self.url, [("bbox", bbox), ("zoom", zoom.as_str())])
            .map_err(|e| SessionError::Config {
                message: format!("Invalid features URL {:?}: {e}", self.url),
            })
    }
}

#[async_trait]
impl FeatureSource for HttpFeatureSource {
    async fn fetch(&self, bbox: &str, zoom: f64) -> Result<FeatureCollection, SessionError> {
        let url = self.request_url(bbox, zoom)?;
        log::debug!("Fetching features: {url}");

        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        let body = if status.is_success() {
            resp.text().await?
        } else {
            String::new()
        };

        let collection = parse_features(&url, status, &body)?;
        log::debug!("Fetched {} features for bbox {bbox}", collection.features.len());
        Ok(collection)
    }
}

/// Interprets a feature endpoint response.
///
/// # Errors
///
/// Returns [`SessionError::Fetch`] for a non-success `status`,
/// [`SessionError::Json`] if `body` is not a valid feature collection, or
/// [`SessionError::MissingFeatures`] if it has no `features` array.
pub fn parse_features(
    url: &reqwest::Url,
    status: reqwest::StatusCode,
    body: &str,
) -> Result<FeatureCollection, SessionError> {
    if !status.is_success() {
        return Err(SessionError::Fetch {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let json: serde_json::Value = serde_json::from_str(body)?;
    if !json["features"].is_array() {
        log::warn!("Response from {url} has no features array");
        return Err(SessionError::MissingFeatures {
            url: url.to_string(),
        });
    }

    Ok(serde_json::from_value(json)?)
}
