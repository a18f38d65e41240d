//! File-backed preference store at ~/.mapfill/preferences.ini.
//!
//! One INI section per namespace; keys inside the section are the
//! `<service>.<field>` composites. Every operation reloads the file so that
//! the read-modify-write in [`PreferenceStore::set`] always merges into the
//! latest on-disk record. The merge is not atomic across processes; the host
//! runs one user action at a time.

use ini::{Ini, Properties};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::store::{PrefValue, PreferenceError, PreferenceStore};

/// Preference store backed by an INI file.
pub struct IniPreferenceStore {
    namespace: String,
    path: PathBuf,
}

impl IniPreferenceStore {
    /// Opens the store for `namespace` at the default path
    /// (~/.mapfill/preferences.ini).
    pub fn open(namespace: impl Into<String>) -> Self {
        Self::open_at(namespace, preferences_file_path())
    }

    /// Opens the store for `namespace` at a specific path.
    ///
    /// A missing file is an empty store, not an error.
    pub fn open_at(namespace: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// The namespace this store reads and writes.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Ini {
        if !self.path.exists() {
            return Ini::new();
        }

        match Ini::load_from_file(&self.path) {
            Ok(ini) => ini,
            Err(e) => {
                // Unreadable storage degrades to defaults rather than failing reads
                warn!(path = %self.path.display(), error = %e, "failed to load preferences file");
                Ini::new()
            }
        }
    }

    fn persist(&self, ini: &Ini) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PreferenceError::Write(e.to_string()))?;
        }

        ini.write_to_file(&self.path)
            .map_err(|e| PreferenceError::Write(e.to_string()))
    }
}

impl PreferenceStore for IniPreferenceStore {
    fn get(&self, key: &str, default: PrefValue) -> PrefValue {
        let mut ini = self.load();

        // Lazily create the namespace section on first access
        if ini.section(Some(self.namespace.as_str())).is_none() {
            ini.entry(Some(self.namespace.clone()))
                .or_insert_with(Properties::new);
            if let Err(e) = self.persist(&ini) {
                warn!(namespace = %self.namespace, error = %e, "failed to create preference namespace");
            }
        }

        match ini.get_from(Some(self.namespace.as_str()), key) {
            Some(stored) => PrefValue::from_stored(stored, &default),
            None => default,
        }
    }

    fn set(&self, key: &str, value: PrefValue) -> Result<(), PreferenceError> {
        let mut ini = self.load();
        ini.set_to(
            Some(self.namespace.as_str()),
            key.to_string(),
            value.to_string(),
        );
        self.persist(&ini)
    }
}

/// Get the path to the preferences directory (~/.mapfill).
pub fn preferences_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mapfill")
}

/// Get the path to the preferences file (~/.mapfill/preferences.ini).
pub fn preferences_file_path() -> PathBuf {
    preferences_directory().join("preferences.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::DEFAULT_NAMESPACE;

    fn temp_store(dir: &tempfile::TempDir) -> IniPreferenceStore {
        IniPreferenceStore::open_at(DEFAULT_NAMESPACE, dir.path().join("preferences.ini"))
    }

    #[test]
    fn test_get_missing_file_returns_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = temp_store(&dir);

        let value = store.get("google.address", PrefValue::Text("fallback".to_string()));
        assert_eq!(value, PrefValue::Text("fallback".to_string()));
    }

    #[test]
    fn test_get_creates_empty_namespace() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = temp_store(&dir);

        store.get("google.address", PrefValue::Text(String::new()));

        // The file now holds the namespace section, still with no keys
        let ini = Ini::load_from_file(store.path()).unwrap();
        let section = ini.section(Some(DEFAULT_NAMESPACE)).unwrap();
        assert_eq!(section.iter().count(), 0);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = temp_store(&dir);

        store
            .set("google.address", PrefValue::Text("Baker Street".to_string()))
            .unwrap();

        let value = store.get("google.address", PrefValue::Text(String::new()));
        assert_eq!(value, PrefValue::Text("Baker Street".to_string()));
    }

    #[test]
    fn test_set_preserves_sibling_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = temp_store(&dir);

        store
            .set("google.address", PrefValue::Text("Baker Street".to_string()))
            .unwrap();
        store.set("google.zoom", PrefValue::Index(14)).unwrap();
        store.set("mapbox.zoom", PrefValue::Index(3)).unwrap();

        // Overwrite one key; the others must survive the rewrite
        store
            .set("google.address", PrefValue::Text("Abbey Road".to_string()))
            .unwrap();

        assert_eq!(
            store.get("google.address", PrefValue::Text(String::new())),
            PrefValue::Text("Abbey Road".to_string())
        );
        assert_eq!(
            store.get("google.zoom", PrefValue::Index(0)),
            PrefValue::Index(14)
        );
        assert_eq!(
            store.get("mapbox.zoom", PrefValue::Index(0)),
            PrefValue::Index(3)
        );
    }

    #[test]
    fn test_index_values_survive_the_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = temp_store(&dir);

        store.set("google.type", PrefValue::Index(2)).unwrap();

        // A second store over the same file sees the same record
        let reopened = temp_store(&dir);
        assert_eq!(
            reopened.get("google.type", PrefValue::Index(0)),
            PrefValue::Index(2)
        );
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("preferences.ini");
        let store = IniPreferenceStore::open_at(DEFAULT_NAMESPACE, &path);
        let other = IniPreferenceStore::open_at("com.example.other", &path);

        store
            .set("google.address", PrefValue::Text("Baker Street".to_string()))
            .unwrap();
        other
            .set("google.address", PrefValue::Text("Somewhere Else".to_string()))
            .unwrap();

        assert_eq!(
            store.get("google.address", PrefValue::Text(String::new())),
            PrefValue::Text("Baker Street".to_string())
        );
        assert_eq!(
            other.get("google.address", PrefValue::Text(String::new())),
            PrefValue::Text("Somewhere Else".to_string())
        );
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("nested").join("prefs.ini");
        let store = IniPreferenceStore::open_at(DEFAULT_NAMESPACE, &nested);

        store
            .set("google.style", PrefValue::Text("feature:water".to_string()))
            .unwrap();

        assert!(nested.exists());
    }

    #[test]
    fn test_default_path_is_under_home() {
        let path = preferences_file_path();
        assert!(path.ends_with(".mapfill/preferences.ini"));
    }
}
