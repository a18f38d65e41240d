//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use mapfill::fill::SelectionError;
use mapfill::net::NetError;
use mapfill::pipeline::PipelineError;
use mapfill::prefs::PreferenceError;
use mapfill::provider::MapImageError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// A command-line argument was invalid
    InvalidArgument(String),
    /// Failed to read or write the preferences file
    Preferences(PreferenceError),
    /// Failed to create the HTTP client
    Http(NetError),
    /// The selection did not qualify for a map fill
    Selection(SelectionError),
    /// The map fill pipeline aborted
    Pipeline(PipelineError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Pipeline(e) => {
                eprintln!();
                eprintln!("Details: {}", e);
                if let PipelineError::ImageFetch(MapImageError::Rejected { .. }) = e {
                    eprintln!();
                    eprintln!("The map service refused the request. Make sure:");
                    eprintln!("  1. Your API key or access token is valid");
                    eprintln!("  2. The static maps service is enabled for your account");
                    eprintln!("  3. Billing is set up if the service requires it");
                }
            }
            CliError::Http(_) => {
                eprintln!();
                eprintln!("Check your Internet connection and proxy settings.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "{}", msg),
            CliError::Preferences(e) => write!(f, "Preferences error: {}", e),
            CliError::Http(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Selection(e) => write!(f, "{}", e),
            CliError::Pipeline(e) => write!(f, "{}", e.user_message()),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Preferences(e) => Some(e),
            CliError::Http(e) => Some(e),
            CliError::Selection(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PreferenceError> for CliError {
    fn from(e: PreferenceError) -> Self {
        CliError::Preferences(e)
    }
}

impl From<NetError> for CliError {
    fn from(e: NetError) -> Self {
        CliError::Http(e)
    }
}

impl From<SelectionError> for CliError {
    fn from(e: SelectionError) -> Self {
        CliError::Selection(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}
