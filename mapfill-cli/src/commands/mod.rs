//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Preference management (get, set, list, path)
//! - [`generate`] - Geocode an address and save a static map image

pub mod common;
pub mod config;
pub mod generate;
