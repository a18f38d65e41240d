//! Pipeline error taxonomy and user-facing status lines.

use thiserror::Error;

use crate::fill::FillError;
use crate::geocode::GeocodeError;
use crate::provider::MapImageError;
use crate::settings::SettingsError;

use super::PipelineStage;

/// Status line shown after a successful run.
pub const SUCCESS_MESSAGE: &str = "Map generated!";

/// Aggregate error for a pipeline run.
///
/// Each variant wraps the failing layer's error unchanged. Hosts show the
/// user [`user_message`] and keep the wrapped error for logs.
///
/// [`user_message`]: PipelineError::user_message
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The form values failed validation; nothing was persisted or fetched.
    #[error(transparent)]
    Validation(#[from] SettingsError),

    /// The address could not be resolved to coordinates.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// The map image could not be fetched.
    #[error(transparent)]
    ImageFetch(#[from] MapImageError),

    /// The applicator could not install the fetched image.
    #[error(transparent)]
    Fill(#[from] FillError),
}

impl PipelineError {
    /// The stage the pipeline was in when the run aborted.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Validation(_) => PipelineStage::Validating,
            Self::Geocode(_) => PipelineStage::Resolving,
            Self::ImageFetch(_) => PipelineStage::Fetching,
            Self::Fill(_) => PipelineStage::Applying,
        }
    }

    /// The status line to show the user for this abort.
    ///
    /// Connectivity problems and bad address settings get distinct wording
    /// so the user knows whether to check the network or the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(SettingsError::EmptyAddress) => "Please enter a valid address.",
            Self::Validation(_) => "Please check the address settings.",
            Self::Geocode(GeocodeError::NotFound) => {
                "Address not found, please check the address settings."
            }
            Self::Geocode(GeocodeError::Communication(_)) => "Error communicating with server",
            Self::ImageFetch(MapImageError::Transport(_)) => {
                "There was a problem, please check your Internet connection or the address settings."
            }
            Self::ImageFetch(_) => "There was a problem, please check the address settings.",
            Self::Fill(_) => "There was a problem generating the map.",
        }
    }
}
