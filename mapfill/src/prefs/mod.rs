//! Namespaced preference persistence.
//!
//! Provides the injectable key/value store the pipeline persists form state
//! through, with a file-backed implementation for real runs and an in-memory
//! one for tests.

mod ini;
mod memory;
mod store;

pub use self::ini::{preferences_directory, preferences_file_path, IniPreferenceStore};
pub use memory::MemoryPreferenceStore;
pub use store::{PrefValue, PreferenceError, PreferenceStore, DEFAULT_NAMESPACE};
