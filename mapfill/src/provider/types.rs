//! Map image provider types and traits.

use image::ImageFormat;
use thiserror::Error;

use crate::geocode::Coordinates;
use crate::net::NetError;
use crate::settings::MapSettings;

/// How much of a rejected payload to keep in the error for logging.
const PAYLOAD_PREVIEW_BYTES: usize = 120;

/// Errors from map image fetching.
///
/// [`Transport`](MapImageError::Transport) is the connectivity failure
/// category; every other variant means the service answered but the request
/// itself was wrong (the address-settings category). The two categories map
/// to distinct user-facing messages.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MapImageError {
    /// No response came back at all (connection, DNS, timeout).
    #[error("Map image request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status code.
    #[error("Map service rejected the request: HTTP {status}")]
    Rejected { status: u16 },

    /// The service returned bytes that are not a PNG or JPEG image,
    /// typically a textual error payload.
    #[error("Map service returned a non-image payload: {0}")]
    NotAnImage(String),

    /// Zoom level not supported by this provider.
    #[error("Zoom level {0} not supported by provider")]
    UnsupportedZoom(u8),
}

impl From<NetError> for MapImageError {
    fn from(e: NetError) -> Self {
        match e {
            NetError::Request(msg) => MapImageError::Transport(msg),
            NetError::Status { status, .. } => MapImageError::Rejected { status },
        }
    }
}

/// Trait for static-map image services.
///
/// Implementors turn resolved coordinates plus display settings into one
/// image request and return the raw bytes.
pub trait MapImageProvider: Send + Sync {
    /// Fetches the map image centered on `center`.
    ///
    /// # Returns
    ///
    /// Raw PNG or JPEG bytes on success. Payloads that are not images are
    /// rejected here so callers never apply a textual error body as a fill.
    fn fetch_map(&self, center: Coordinates, settings: &MapSettings)
        -> Result<Vec<u8>, MapImageError>;

    /// Service identifier used to scope preference keys (e.g. `google`).
    fn service(&self) -> &str;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;

    /// Returns the minimum supported zoom level.
    fn min_zoom(&self) -> u8;

    /// Returns the maximum supported zoom level.
    fn max_zoom(&self) -> u8;

    /// Checks if this provider supports the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }
}

/// Checks that a response payload is a PNG or JPEG image.
///
/// Map services report errors (bad API key, malformed coordinates) as text
/// bodies with a 200 status; magic-byte sniffing is what separates those
/// from real imagery.
pub fn validate_image_bytes(bytes: &[u8]) -> Result<(), MapImageError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) | Ok(ImageFormat::Jpeg) => Ok(()),
        Ok(other) => Err(MapImageError::NotAnImage(format!(
            "unexpected image format {:?}",
            other
        ))),
        Err(_) => Err(MapImageError::NotAnImage(payload_preview(bytes))),
    }
}

/// A short lossy-text preview of a non-image payload for error messages.
fn payload_preview(bytes: &[u8]) -> String {
    let end = bytes.len().min(PAYLOAD_PREVIEW_BYTES);
    let mut preview = String::from_utf8_lossy(&bytes[..end]).into_owned();
    if bytes.len() > end {
        preview.push_str("...");
    }
    preview
}
