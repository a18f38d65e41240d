//! Mapbox Static Images provider.
//!
//! Fetches a single static map image via the Static Images API. Requires a
//! Mapbox access token (free tier available with usage limits).
//!
//! # URL Pattern
//!
//! `https://api.mapbox.com/styles/v1/mapbox/{style}/static/{lon},{lat},{zoom}/640x640@2x?access_token={token}`
//!
//! The style id is derived from the map type unless the submission carries a
//! non-empty style string, which then overrides the mapping.

use tracing::debug;

use crate::geocode::Coordinates;
use crate::net::HttpClient;
use crate::provider::types::{validate_image_bytes, MapImageError, MapImageProvider};
use crate::settings::{collapse_whitespace, MapSettings, MapType};

/// Base URL for Mapbox-owned styles in the Static Images API.
const MAPBOX_STATIC_BASE_URL: &str = "https://api.mapbox.com/styles/v1/mapbox";

/// Minimum zoom level accepted by the Static Images API.
const MIN_ZOOM: u8 = 0;

/// Maximum zoom level with usable imagery.
const MAX_ZOOM: u8 = 20;

/// Requested image dimensions; @2x doubles the physical pixel count.
const IMAGE_SIZE: &str = "640x640@2x";

/// Mapbox Static Images provider.
pub struct MapboxStatic<C: HttpClient> {
    http_client: C,
    access_token: String,
}

impl<C: HttpClient> MapboxStatic<C> {
    /// Creates a new provider with the given access token.
    pub fn new(http_client: C, access_token: impl Into<String>) -> Self {
        Self {
            http_client,
            access_token: access_token.into(),
        }
    }

    /// The style id for a submission: the explicit style string when present,
    /// otherwise the id matching the chosen map type.
    fn style_id(settings: &MapSettings) -> String {
        let custom = collapse_whitespace(&settings.style);
        if !custom.is_empty() {
            return custom;
        }

        match settings.map_type {
            MapType::Roadmap => "streets-v11",
            MapType::Satellite => "satellite-v9",
            MapType::Hybrid => "satellite-streets-v11",
            MapType::Terrain => "outdoors-v11",
        }
        .to_string()
    }

    /// Builds the static-image URL for the given center and settings.
    ///
    /// Mapbox orders the center as `{lon},{lat}`.
    fn build_url(&self, center: Coordinates, settings: &MapSettings) -> String {
        format!(
            "{}/{}/static/{},{},{}/{}?access_token={}",
            MAPBOX_STATIC_BASE_URL,
            Self::style_id(settings),
            center.lon,
            center.lat,
            settings.zoom,
            IMAGE_SIZE,
            self.access_token
        )
    }
}

impl<C: HttpClient> MapImageProvider for MapboxStatic<C> {
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
        "mapbox"
    }

    fn name(&self) -> &str {
        "Mapbox Static Images"
    }

    fn min_zoom(&self) -> u8 {
        MIN_ZOOM
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }
}
