//! Provider factory for centralized provider creation.
//!
//! Encapsulates which map services exist and what credential each needs, so
//! callers select a service by configuration instead of naming concrete
//! types.

use crate::geocode::Coordinates;
use crate::net::ReqwestClient;
use crate::provider::google::GoogleStaticMaps;
use crate::provider::mapbox::MapboxStatic;
use crate::provider::types::{MapImageError, MapImageProvider};
use crate::settings::MapSettings;

/// Configuration for creating a map image provider.
///
/// New services are added as new enum variants without touching existing
/// call sites.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// Google Static Maps.
    ///
    /// Requires an API key with the Maps Static API enabled.
    Google {
        /// Google Maps Platform API key
        api_key: String,
    },

    /// Mapbox Static Images.
    ///
    /// Requires a Mapbox access token (free tier available).
    Mapbox {
        /// Mapbox access token
        access_token: String,
    },
}

impl ProviderConfig {
    /// Create a Google Static Maps configuration with the given API key.
    pub fn google(api_key: impl Into<String>) -> Self {
        Self::Google {
            api_key: api_key.into(),
        }
    }

    /// Create a Mapbox configuration with the given access token.
    pub fn mapbox(access_token: impl Into<String>) -> Self {
        Self::Mapbox {
            access_token: access_token.into(),
        }
    }

    /// Returns the provider name for this configuration.
    pub fn name(&self) -> &str {
        match self {
            Self::Google { .. } => "Google Static Maps",
            Self::Mapbox { .. } => "Mapbox Static Images",
        }
    }

    /// Returns the service identifier that scopes this provider's
    /// preference keys.
    pub fn service(&self) -> &str {
        match self {
            Self::Google { .. } => "google",
            Self::Mapbox { .. } => "mapbox",
        }
    }
}

/// A provider created by [`ProviderFactory`].
///
/// Enum dispatch keeps the concrete provider types behind one value that
/// still implements [`MapImageProvider`].
pub enum MapProvider {
    Google(GoogleStaticMaps<ReqwestClient>),
    Mapbox(MapboxStatic<ReqwestClient>),
}

impl MapImageProvider for MapProvider {
    fn fetch_map(
        &self,
        center: Coordinates,
        settings: &MapSettings,
    ) -> Result<Vec<u8>, MapImageError> {
        match self {
            Self::Google(p) => p.fetch_map(center, settings),
            Self::Mapbox(p) => p.fetch_map(center, settings),
        }
    }

    fn service(&self) -> &str {
        match self {
            Self::Google(p) => p.service(),
            Self::Mapbox(p) => p.service(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Google(p) => p.name(),
            Self::Mapbox(p) => p.name(),
        }
    }

    fn min_zoom(&self) -> u8 {
        match self {
            Self::Google(p) => p.min_zoom(),
            Self::Mapbox(p) => p.min_zoom(),
        }
    }

    fn max_zoom(&self) -> u8 {
        match self {
            Self::Google(p) => p.max_zoom(),
            Self::Mapbox(p) => p.max_zoom(),
        }
    }
}

/// Factory for creating provider instances.
pub struct ProviderFactory {
    http_client: ReqwestClient,
}

impl ProviderFactory {
    /// Create a new provider factory with the given HTTP client.
    pub fn new(http_client: ReqwestClient) -> Self {
        Self { http_client }
    }

    /// Create a provider from the given configuration.
    pub fn create(self, config: &ProviderConfig) -> MapProvider {
        match config {
            ProviderConfig::Google { api_key } => {
                MapProvider::Google(GoogleStaticMaps::new(self.http_client, api_key.clone()))
            }
            ProviderConfig::Mapbox { access_token } => {
                MapProvider::Mapbox(MapboxStatic::new(self.http_client, access_token.clone()))
            }
        }
    }
}
