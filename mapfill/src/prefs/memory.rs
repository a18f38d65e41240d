//! In-memory preference store.
//!
//! Backs tests and ephemeral runs where nothing should touch the disk.
//! Holds the same string-valued record an INI section would.

use std::collections::HashMap;
use std::sync::Mutex;

use super::store::{PrefValue, PreferenceError, PreferenceStore};

/// Preference store held entirely in memory.
pub struct MemoryPreferenceStore {
    namespace: String,
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Creates an empty store for `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: Mutex::new(HashMap::new()),
        }
    }

    /// The namespace this store was created for.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.lock().unwrap().is_empty()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str, default: PrefValue) -> PrefValue {
        let values = self.values.lock().unwrap();
        match values.get(key) {
            Some(stored) => PrefValue::from_stored(stored, &default),
            None => default,
        }
    }

    fn set(&self, key: &str, value: PrefValue) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
