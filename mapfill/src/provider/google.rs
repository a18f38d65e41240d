//! Google Static Maps provider.
//!
//! Fetches a single static map image via the Maps Static API. Requires an
//! API key with the Static Maps service enabled (billing required).
//!
//! # URL Pattern
//!
//! `https://maps.googleapis.com/maps/api/staticmap?center={lat},{lon}&zoom={z}&size=640x640&scale=2&maptype={type}&style={style}&key={key}`
//!
//! The style parameter is omitted when the (whitespace-collapsed) style
//! string is empty.

use tracing::debug;

use crate::geocode::Coordinates;
use crate::net::HttpClient;
use crate::provider::types::{validate_image_bytes, MapImageError, MapImageProvider};
use crate::settings::{collapse_whitespace, MapSettings};

/// Base URL for the Maps Static API.
const GOOGLE_STATIC_BASE_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Minimum zoom level with usable imagery.
const MIN_ZOOM: u8 = 1;

/// Maximum zoom level accepted by the Static Maps service.
const MAX_ZOOM: u8 = 20;

/// Requested image dimensions in logical pixels.
const IMAGE_SIZE: &str = "640x640";

/// Density multiplier; 2 doubles the physical pixel count.
const IMAGE_SCALE: u8 = 2;

/// Google Static Maps image provider.
///
/// # Example
///
/// ```ignore
/// use mapfill::net::ReqwestClient;
/// use mapfill::provider::GoogleStaticMaps;
///
/// let client = ReqwestClient::new().unwrap();
/// let provider = GoogleStaticMaps::new(client, "your_api_key");
/// ```
pub struct GoogleStaticMaps<C: HttpClient> {
    http_client: C,
    api_key: String,
}

impl<C: HttpClient> GoogleStaticMaps<C> {
    /// Creates a new provider with the given API key.
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
        }
    }

    /// Builds the static-map URL for the given center and settings.
    fn build_url(&self, center: Coordinates, settings: &MapSettings) -> String {
        let mut url = format!(
            "{}?center={},{}&zoom={}&size={}&scale={}&maptype={}",
            GOOGLE_STATIC_BASE_URL,
            center.lat,
            center.lon,
            settings.zoom,
            IMAGE_SIZE,
            IMAGE_SCALE,
            settings.map_type.as_str()
        );

        let style = collapse_whitespace(&settings.style);
        if !style.is_empty() {
            url.push_str("&style=");
            url.push_str(&style);
        }

        url.push_str("&key=");
        url.push_str(&self.api_key);
        url
    }
}

impl<C: HttpClient> MapImageProvider for GoogleStaticMaps<C> {
    fn fetch_map(
        &self,
        center: Coordinates,
        settings: &MapSettings,
    ) -> Result<Vec<u8>, MapImageError> {
        if !self.supports_zoom(settings.zoom) {
            return Err(MapImageError::UnsupportedZoom(settings.zoom));
        }

        let url = self.build_url(center, settings);
        debug!(lat = center.lat, lon = center.lon, zoom = settings.zoom, "fetching static map");

        let bytes = self.http_client.get(&url)?;
        validate_image_bytes(&bytes)?;
        Ok(bytes)
    }

    fn service(&self) -> &str {
        "google"
    }

    fn name(&self) -> &str {
        "Google Static Maps"
    }

    fn min_zoom(&self) -> u8 {
        MIN_ZOOM
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }
}
