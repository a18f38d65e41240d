//! Address geocoding via the Algolia Places search API.
//!
//! Turns a free-text street address into a single coordinate pair. The query
//! asks for one hit and takes the service's top-ranked result as-is; there is
//! no disambiguation between candidate matches and no fallback geocoder.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::net::{HttpClient, NetError};

/// Place-search endpoint.
const PLACES_QUERY_URL: &str = "https://places-dsn.algolia.net/1/places/query";

/// A resolved geographic position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Errors from address resolution.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeocodeError {
    /// The service returned an empty hit list for the address.
    #[error("Address not found")]
    NotFound,

    /// Transport failure or a response that did not parse as JSON.
    ///
    /// Both cases are fatal for the invocation; the caller has no fallback
    /// data source.
    #[error("Error communicating with server: {0}")]
    Communication(String),
}

impl From<NetError> for GeocodeError {
    fn from(e: NetError) -> Self {
        GeocodeError::Communication(e.to_string())
    }
}

/// Request body for the place-search endpoint.
#[derive(Debug, Serialize)]
struct PlacesQuery<'a> {
    query: &'a str,
    #[serde(rename = "hitsPerPage")]
    hits_per_page: u32,
}

/// Response from the place-search endpoint.
#[derive(Debug, Clone, Deserialize)]
struct PlacesResponse {
    hits: Vec<PlaceHit>,
}

/// One candidate result for the query.
#[derive(Debug, Clone, Deserialize)]
struct PlaceHit {
    #[serde(rename = "_geoloc")]
    geoloc: GeoLoc,
}

/// Geolocation field of a hit. The wire format names longitude `lng`.
#[derive(Debug, Clone, Copy, Deserialize)]
struct GeoLoc {
    lat: f64,
    lng: f64,
}

/// Trait for address-to-coordinates resolution.
///
/// Enables mock resolvers in tests and alternative search services.
pub trait Geocoder: Send + Sync {
    /// Resolves an address to the best-match coordinates.
    ///
    /// Returns [`GeocodeError::NotFound`] when the service has no hits for
    /// the address.
    fn resolve(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// Geocoder backed by the Algolia Places search service.
pub struct AlgoliaPlaces<C: HttpClient> {
    http_client: C,
}

impl<C: HttpClient> AlgoliaPlaces<C> {
    /// Creates a new resolver using the given HTTP client.
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    /// Builds the JSON query body for an address.
    ///
    /// Addresses may arrive percent-encoded from the host; they are decoded
    /// before querying so the service sees the literal text.
    fn build_query(address: &str) -> Result<String, GeocodeError> {
        let decoded = percent_decode_str(address).decode_utf8_lossy();
        let query = PlacesQuery {
            query: &decoded,
            hits_per_page: 1,
        };
        serde_json::to_string(&query).map_err(|e| GeocodeError::Communication(e.to_string()))
    }
}

impl<C: HttpClient> Geocoder for AlgoliaPlaces<C> {
    fn resolve(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let body = Self::build_query(address)?;
        debug!(address = address, "resolving address");

        let bytes = self.http_client.post_json(PLACES_QUERY_URL, &body)?;

        let response: PlacesResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GeocodeError::Communication(e.to_string()))?;

        // Service-ranked first hit wins
        let hit = response.hits.first().ok_or(GeocodeError::NotFound)?;

        debug!(
            lat = hit.geoloc.lat,
            lng = hit.geoloc.lng,
            "address resolved"
        );

        Ok(Coordinates {
            lat: hit.geoloc.lat,
            lon: hit.geoloc.lng,
        })
    }
}
