//! Preference store trait definition for dependency injection.

use std::fmt;
use thiserror::Error;

/// Namespace under which the plugin's preference keys are stored.
pub const DEFAULT_NAMESPACE: &str = "io.eduardogomez.sketch.map-generator";

/// Errors from preference persistence.
///
/// Reads never produce these: an absent namespace or key yields the caller's
/// default. Only the backing medium failing to load or save is an error.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Failed to read the backing store
    #[error("Failed to read preferences: {0}")]
    Read(String),

    /// Failed to write the backing store
    #[error("Failed to write preferences: {0}")]
    Write(String),
}

/// A stored preference value.
///
/// Input fields store their text; select fields store the index of the
/// chosen option, so option lists can be reordered per service without
/// migrating stored titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    Text(String),
    Index(usize),
}

impl PrefValue {
    /// Interprets a stored string according to the variant of `default`.
    ///
    /// Backing media store strings; the default supplies the expected shape.
    /// An index that fails to parse falls back to the default, matching the
    /// "absent storage is a default, never a failure" contract.
    pub fn from_stored(stored: &str, default: &PrefValue) -> PrefValue {
        match default {
            PrefValue::Text(_) => PrefValue::Text(stored.to_string()),
            PrefValue::Index(d) => PrefValue::Index(stored.parse().unwrap_or(*d)),
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Text(s) => f.write_str(s),
            PrefValue::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Namespaced key/value preference persistence.
///
/// Keys are composed as `<service>.<field>` so independent services share
/// one namespace without collision. Implementations are injected into the
/// pipeline rather than reached through a singleton, enabling test doubles.
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored value for `key`, or `default` when the namespace
    /// or the key is absent.
    ///
    /// First access lazily creates an empty namespace record if the backing
    /// medium has none; subsequent reads observe an existing-but-empty
    /// namespace.
    fn get(&self, key: &str, default: PrefValue) -> PrefValue;

    /// Merges `value` into the namespaced record.
    ///
    /// Read-modify-write: the current record is loaded, one key overwritten,
    /// and the whole record written back. Sibling keys in the namespace are
    /// preserved.
    fn set(&self, key: &str, value: PrefValue) -> Result<(), PreferenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stored_text() {
        let value = PrefValue::from_stored("hello", &PrefValue::Text(String::new()));
        assert_eq!(value, PrefValue::Text("hello".to_string()));
    }

    #[test]
    fn test_from_stored_index() {
        let value = PrefValue::from_stored("3", &PrefValue::Index(0));
        assert_eq!(value, PrefValue::Index(3));
    }

    #[test]
    fn test_from_stored_bad_index_falls_back_to_default() {
        let value = PrefValue::from_stored("not a number", &PrefValue::Index(2));
        assert_eq!(value, PrefValue::Index(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(PrefValue::Text("abc".to_string()).to_string(), "abc");
        assert_eq!(PrefValue::Index(7).to_string(), "7");
    }
}
