//! Map display settings and validation.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from settings validation and parsing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettingsError {
    /// The address is empty after trimming.
    #[error("Address is empty")]
    EmptyAddress,

    /// The zoom level falls outside the service's supported range.
    #[error("Zoom level {zoom} outside supported range {min}..={max}")]
    ZoomOutOfRange { zoom: u8, min: u8, max: u8 },

    /// The map type string is not one of the four known values.
    #[error("Unknown map type '{0}'")]
    UnknownMapType(String),

    /// A select field held an index with no matching option.
    #[error("No option at index {index} for field '{field}'")]
    BadOptionIndex { field: &'static str, index: usize },

    /// A form field was missing or held the wrong kind of value.
    #[error("Missing or mismatched value for field '{0}'")]
    MissingField(&'static str),
}

/// Base map rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapType {
    Roadmap,
    Satellite,
    Hybrid,
    Terrain,
}

impl MapType {
    /// All map types, in the order they appear in select boxes.
    pub const ALL: [MapType; 4] = [
        MapType::Roadmap,
        MapType::Satellite,
        MapType::Hybrid,
        MapType::Terrain,
    ];

    /// The value embedded in map-image request URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Roadmap => "roadmap",
            MapType::Satellite => "satellite",
            MapType::Hybrid => "hybrid",
            MapType::Terrain => "terrain",
        }
    }

    /// Option titles for a map-type select box.
    pub fn option_titles() -> Vec<String> {
        Self::ALL.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapType {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roadmap" => Ok(MapType::Roadmap),
            "satellite" => Ok(MapType::Satellite),
            "hybrid" => Ok(MapType::Hybrid),
            "terrain" => Ok(MapType::Terrain),
            other => Err(SettingsError::UnknownMapType(other.to_string())),
        }
    }
}

/// One submission's worth of map settings.
///
/// Constructed fresh from live form state per user action and not retained
/// beyond the pipeline call.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub address: String,
    pub zoom: u8,
    pub map_type: MapType,
    /// Free-form style string. Whitespace runs are collapsed out with
    /// [`collapse_whitespace`] before the string is embedded in a URL.
    pub style: String,
}

impl MapSettings {
    /// Checks the per-submission invariants that do not depend on a service.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.address.trim().is_empty() {
            return Err(SettingsError::EmptyAddress);
        }
        Ok(())
    }
}

/// Removes every whitespace run (spaces, tabs, newlines) from a style string.
///
/// Style strings are pasted from styling tools as multi-line text; the map
/// services expect them as a single unbroken parameter value.
pub fn collapse_whitespace(style: &str) -> String {
    style.split_whitespace().collect()
}

/// Builds the option list for a zoom-level select box: the integer zoom
/// levels from `min_zoom` through `max_zoom` inclusive, as strings.
pub fn zoom_levels(min_zoom: u8, max_zoom: u8) -> Vec<String> {
    (min_zoom..=max_zoom).map(|z| z.to_string()).collect()
}
