//! mapfill - Fill a design shape with a static map of a street address
//!
//! This library provides the address-to-image pipeline behind a map
//! generator plugin: validate user-entered settings, persist them across
//! invocations, geocode the address, fetch a static map image centered on
//! the result, and hand the bytes to a fill applicator.
//!
//! # High-Level API
//!
//! Most hosts wire the pieces through [`pipeline::MapFillPipeline`]:
//!
//! ```ignore
//! use mapfill::fill::FileFillApplicator;
//! use mapfill::geocode::AlgoliaPlaces;
//! use mapfill::net::ReqwestClient;
//! use mapfill::pipeline::MapFillPipeline;
//! use mapfill::prefs::{IniPreferenceStore, DEFAULT_NAMESPACE};
//! use mapfill::provider::{ProviderConfig, ProviderFactory};
//!
//! let factory = ProviderFactory::new(ReqwestClient::new()?);
//! let provider = factory.create(&ProviderConfig::google("YOUR_API_KEY"));
//! let pipeline = MapFillPipeline::new(
//!     AlgoliaPlaces::new(ReqwestClient::new()?),
//!     provider,
//!     IniPreferenceStore::open(DEFAULT_NAMESPACE),
//! );
//!
//! let mut form = pipeline.prefill();
//! // ... apply the user's edits to the form ...
//! let image = pipeline.run(&form, &FileFillApplicator::new("map.png"))?;
//! ```

pub mod fill;
pub mod form;
pub mod geocode;
pub mod logging;
pub mod net;
pub mod pipeline;
pub mod prefs;
pub mod provider;
pub mod settings;

/// Version of the mapfill library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
