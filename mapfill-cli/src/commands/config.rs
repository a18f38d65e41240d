//! Preference management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! commands for viewing and modifying the stored dialog preferences from the
//! command line.

use clap::Subcommand;

use mapfill::form::FieldKey;
use mapfill::prefs::{
    preferences_file_path, IniPreferenceStore, PrefValue, PreferenceStore, DEFAULT_NAMESPACE,
};

use crate::error::CliError;

/// Services whose preference keys the CLI recognizes.
const SERVICES: [&str; 2] = ["google", "mapbox"];

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a stored preference value
    Get {
        /// Preference key in format service.field (e.g., google.address)
        key: String,
    },

    /// Set a stored preference value
    Set {
        /// Preference key in format service.field (e.g., google.address)
        key: String,

        /// Value to set (zoom and type store the select option index)
        value: String,
    },

    /// List all stored preferences
    List,

    /// Show the preferences file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

/// Get a stored preference value.
fn run_get(key: &str) -> Result<(), CliError> {
    parse_key(key)?;

    let store = IniPreferenceStore::open(DEFAULT_NAMESPACE);
    // A text default echoes whatever string is stored, index or not
    let value = store.get(key, PrefValue::Text(String::new()));

    match value {
        PrefValue::Text(text) if text.is_empty() => println!("(not set)"),
        other => println!("{}", other),
    }

    Ok(())
}

/// Set a stored preference value.
fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let (_, field) = parse_key(key)?;
    let pref_value = parse_value(field, value)?;

    let store = IniPreferenceStore::open(DEFAULT_NAMESPACE);
    store.set(key, pref_value)?;

    println!("Set {} = {}", key, value);

    Ok(())
}

/// List all stored preferences, grouped by service.
fn run_list() -> Result<(), CliError> {
    let store = IniPreferenceStore::open(DEFAULT_NAMESPACE);

    println!("Stored Preferences");
    println!("==================");

    for service in SERVICES {
        println!();
        println!("[{}]", service);

        for field in FieldKey::ALL {
            let key = format!("{}.{}", service, field.name());
            let value = store.get(&key, PrefValue::Text(String::new()));

            match value {
                PrefValue::Text(text) if text.is_empty() => {
                    println!("  {} = (not set)", field.name());
                }
                other => println!("  {} = {}", field.name(), other),
            }
        }
    }

    Ok(())
}

/// Show the preferences file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", preferences_file_path().display());
    Ok(())
}

/// Split and validate a service.field preference key.
fn parse_key(key: &str) -> Result<(&str, FieldKey), CliError> {
    let unknown = || {
        CliError::InvalidArgument(format!(
            "Unknown preference key '{}'. Keys are service.field, e.g. google.address. \
             Use 'mapfill config list' to see available keys.",
            key
        ))
    };

    let (service, field) = key.split_once('.').ok_or_else(unknown)?;
    if !SERVICES.contains(&service) {
        return Err(unknown());
    }

    let field_key = FieldKey::ALL
        .into_iter()
        .find(|k| k.name() == field)
        .ok_or_else(unknown)?;

    Ok((service, field_key))
}

/// Interpret a set value according to the field it targets.
///
/// Input fields store their text verbatim; select fields store the option
/// index, so the value must be a number.
fn parse_value(field: FieldKey, value: &str) -> Result<PrefValue, CliError> {
    match field {
        FieldKey::Address | FieldKey::Style => Ok(PrefValue::Text(value.to_string())),
        FieldKey::Zoom | FieldKey::MapType => {
            let index: usize = value.parse().map_err(|_| {
                CliError::InvalidArgument(format!(
                    "The '{}' field stores a select option index; '{}' is not a number",
                    field.name(),
                    value
                ))
            })?;
            Ok(PrefValue::Index(index))
        }
    }
}
