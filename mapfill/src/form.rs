//! Form field descriptors and snapshot extraction.
//!
//! The dialog's fields are described by tagged variants rather than by
//! stringly-typed element records: an [`Input`](FieldDescriptor::Input)
//! carries free text, a [`Select`](FieldDescriptor::Select) carries a fixed
//! option list and stores the chosen index. Extraction into [`MapSettings`]
//! resolves every field by exhaustive matching.

use std::collections::HashMap;

use crate::prefs::{PrefValue, PreferenceStore};
use crate::settings::{zoom_levels, MapSettings, MapType, SettingsError};

/// Zoom option preselected when nothing is stored yet (city scale).
const DEFAULT_ZOOM_TITLE: &str = "15";

/// Identity of a form field.
///
/// [`name`](FieldKey::name) doubles as the `<field>` half of preference keys,
/// so renaming a variant's name string orphans previously stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Address,
    Zoom,
    MapType,
    Style,
}

impl FieldKey {
    /// All field keys, in dialog order.
    pub const ALL: [FieldKey; 4] = [
        FieldKey::Address,
        FieldKey::Zoom,
        FieldKey::MapType,
        FieldKey::Style,
    ];

    /// The field's name in preference keys and logs.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKey::Address => "address",
            FieldKey::Zoom => "zoom",
            FieldKey::MapType => "type",
            FieldKey::Style => "style",
        }
    }
}

/// Description of one dialog field.
#[derive(Debug, Clone)]
pub enum FieldDescriptor {
    /// Free-text input field.
    Input { key: FieldKey, default: String },

    /// Select box over a fixed option list; the stored value is the index of
    /// the chosen option.
    Select {
        key: FieldKey,
        options: Vec<String>,
        default_index: usize,
    },
}

impl FieldDescriptor {
    /// The field this descriptor describes.
    pub fn key(&self) -> FieldKey {
        match self {
            FieldDescriptor::Input { key, .. } => *key,
            FieldDescriptor::Select { key, .. } => *key,
        }
    }
}

/// The value a field holds in a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text of an input field.
    Text(String),
    /// Selected option index of a select field.
    Index(usize),
}

/// Live form state, one value per field.
///
/// Captured when the user submits; also produced by [`prefill`](FormSnapshot::prefill)
/// to open the dialog with the last attempted values.
#[derive(Debug, Clone, Default)]
pub struct FormSnapshot {
    values: HashMap<FieldKey, FieldValue>,
}

impl FormSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the initial dialog state for `fields`, reading each field's
    /// stored value under `<service>.<field>` with the descriptor's default.
    pub fn prefill(
        store: &dyn PreferenceStore,
        service: &str,
        fields: &[FieldDescriptor],
    ) -> Self {
        let mut snapshot = Self::new();

        for field in fields {
            let pref_key = format!("{}.{}", service, field.key().name());
            let value = match field {
                FieldDescriptor::Input { default, .. } => {
                    match store.get(&pref_key, PrefValue::Text(default.clone())) {
                        PrefValue::Text(text) => FieldValue::Text(text),
                        PrefValue::Index(index) => FieldValue::Index(index),
                    }
                }
                FieldDescriptor::Select { default_index, .. } => {
                    match store.get(&pref_key, PrefValue::Index(*default_index)) {
                        PrefValue::Index(index) => FieldValue::Index(index),
                        PrefValue::Text(text) => FieldValue::Text(text),
                    }
                }
            };
            snapshot.values.insert(field.key(), value);
        }

        snapshot
    }

    /// Sets an input field's text.
    pub fn set_text(&mut self, key: FieldKey, text: impl Into<String>) {
        self.values.insert(key, FieldValue::Text(text.into()));
    }

    /// Sets a select field's chosen option index.
    pub fn set_index(&mut self, key: FieldKey, index: usize) {
        self.values.insert(key, FieldValue::Index(index));
    }

    /// Returns the value currently held for `key`.
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }
}

/// The standard dialog fields: address input, zoom select, map-type select,
/// style input.
///
/// The zoom option list covers `min_zoom..=max_zoom` for the service in use.
pub fn standard_fields(min_zoom: u8, max_zoom: u8) -> Vec<FieldDescriptor> {
    let zooms = zoom_levels(min_zoom, max_zoom);
    let default_zoom_index = zooms
        .iter()
        .position(|z| z == DEFAULT_ZOOM_TITLE)
        .unwrap_or(0);

    vec![
        FieldDescriptor::Input {
            key: FieldKey::Address,
            default: String::new(),
        },
        FieldDescriptor::Select {
            key: FieldKey::Zoom,
            options: zooms,
            default_index: default_zoom_index,
        },
        FieldDescriptor::Select {
            key: FieldKey::MapType,
            options: MapType::option_titles(),
            default_index: 0,
        },
        FieldDescriptor::Input {
            key: FieldKey::Style,
            default: String::new(),
        },
    ]
}

/// Resolves a snapshot against its field descriptors into [`MapSettings`].
///
/// Select fields resolve their stored index to the option title, then parse
/// it; input fields are taken verbatim.
pub fn extract_settings(
    snapshot: &FormSnapshot,
    fields: &[FieldDescriptor],
) -> Result<MapSettings, SettingsError> {
    let mut address = None;
    let mut zoom = None;
    let mut map_type = None;
    let mut style = None;

    for field in fields {
        let key = field.key();
        let title = resolve_field(snapshot, field)?;

        match key {
            FieldKey::Address => address = Some(title),
            FieldKey::Zoom => {
                let parsed = title.parse::<u8>().map_err(|_| SettingsError::MissingField(key.name()))?;
                zoom = Some(parsed);
            }
            FieldKey::MapType => map_type = Some(title.parse::<MapType>()?),
            FieldKey::Style => style = Some(title),
        }
    }

    Ok(MapSettings {
        address: address.ok_or(SettingsError::MissingField(FieldKey::Address.name()))?,
        zoom: zoom.ok_or(SettingsError::MissingField(FieldKey::Zoom.name()))?,
        map_type: map_type.ok_or(SettingsError::MissingField(FieldKey::MapType.name()))?,
        style: style.ok_or(SettingsError::MissingField(FieldKey::Style.name()))?,
    })
}

/// Resolves one field of a snapshot to its effective string value.
fn resolve_field(
    snapshot: &FormSnapshot,
    field: &FieldDescriptor,
) -> Result<String, SettingsError> {
    let key = field.key();
    let value = snapshot
        .get(key)
        .ok_or(SettingsError::MissingField(key.name()))?;

    match (field, value) {
        (FieldDescriptor::Input { .. }, FieldValue::Text(text)) => Ok(text.clone()),
        (FieldDescriptor::Select { options, .. }, FieldValue::Index(index)) => options
            .get(*index)
            .cloned()
            .ok_or(SettingsError::BadOptionIndex {
                field: key.name(),
                index: *index,
            }),
        // A select answered with text or an input with an index
        _ => Err(SettingsError::MissingField(key.name())),
    }
}
