//! Static map image providers
//!
//! This module provides traits and implementations for fetching rendered
//! static map images from map services (Google Static Maps, Mapbox).
//!
//! # Factory Pattern
//!
//! For centralized provider creation, use the [`ProviderFactory`]:
//!
//! ```ignore
//! use mapfill::net::ReqwestClient;
//! use mapfill::provider::{ProviderConfig, ProviderFactory};
//!
//! let http_client = ReqwestClient::new()?;
//! let factory = ProviderFactory::new(http_client);
//! let provider = factory.create(&ProviderConfig::google("YOUR_API_KEY"));
//! ```

mod factory;
mod google;
mod mapbox;
mod types;

pub use factory::{MapProvider, ProviderConfig, ProviderFactory};
pub use google::GoogleStaticMaps;
pub use mapbox::MapboxStatic;
pub use types::{validate_image_bytes, MapImageError, MapImageProvider};
