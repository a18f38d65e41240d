//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;

use mapfill::provider::ProviderConfig;
use mapfill::settings::MapType;

use crate::error::CliError;

/// Map service selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ServiceChoice {
    /// Google Static Maps (requires API key, billing enabled)
    Google,
    /// Mapbox Static Images (requires access token, free tier available)
    Mapbox,
}

impl ServiceChoice {
    /// Convert to a ProviderConfig, requiring the credential the service needs.
    pub fn to_config(
        self,
        api_key: Option<String>,
        access_token: Option<String>,
    ) -> Result<ProviderConfig, CliError> {
        match self {
            ServiceChoice::Google => {
                let key = api_key.ok_or_else(|| {
                    CliError::InvalidArgument(
                        "The google service requires an API key. Use --api-key".to_string(),
                    )
                })?;
                Ok(ProviderConfig::google(key))
            }
            ServiceChoice::Mapbox => {
                let token = access_token.ok_or_else(|| {
                    CliError::InvalidArgument(
                        "The mapbox service requires an access token. Use --access-token"
                            .to_string(),
                    )
                })?;
                Ok(ProviderConfig::mapbox(token))
            }
        }
    }

    /// The service identifier that scopes preference keys.
    pub fn service_id(self) -> &'static str {
        match self {
            ServiceChoice::Google => "google",
            ServiceChoice::Mapbox => "mapbox",
        }
    }
}

/// Map type selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MapTypeChoice {
    /// Standard street map
    Roadmap,
    /// Satellite imagery
    Satellite,
    /// Satellite imagery with road overlay
    Hybrid,
    /// Terrain relief map
    Terrain,
}

impl From<MapTypeChoice> for MapType {
    fn from(choice: MapTypeChoice) -> Self {
        match choice {
            MapTypeChoice::Roadmap => MapType::Roadmap,
            MapTypeChoice::Satellite => MapType::Satellite,
            MapTypeChoice::Hybrid => MapType::Hybrid,
            MapTypeChoice::Terrain => MapType::Terrain,
        }
    }
}
