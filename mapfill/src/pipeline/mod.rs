//! Address-to-image pipeline orchestration.
//!
//! Coordinates one user action end to end: validate the submitted form
//! values, persist them, resolve the address to coordinates, fetch the map
//! image, and hand the bytes to the fill applicator. The run is strictly
//! sequential with a single attempt per step; any failure aborts the whole
//! run and the user resubmits from scratch.

mod error;

pub use error::{PipelineError, SUCCESS_MESSAGE};

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::fill::FillApplicator;
use crate::form::{extract_settings, standard_fields, FieldDescriptor, FieldValue, FormSnapshot};
use crate::geocode::Geocoder;
use crate::prefs::{PrefValue, PreferenceStore};
use crate::provider::MapImageProvider;
use crate::settings::SettingsError;

/// The stages a run moves through, in order.
///
/// `Aborted` is absorbing: it is reachable from `Validating`, `Resolving`,
/// `Fetching` and `Applying`, and there is no retry transition out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Validating,
    Persisting,
    Resolving,
    Fetching,
    Applying,
    Done,
    Aborted,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Validating => "validating",
            PipelineStage::Persisting => "persisting",
            PipelineStage::Resolving => "resolving",
            PipelineStage::Fetching => "fetching",
            PipelineStage::Applying => "applying",
            PipelineStage::Done => "done",
            PipelineStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Orchestrates the address-to-image pipeline for one map service.
///
/// Holds the geocoder, the map image provider and the preference store for
/// the lifetime of the host session; each [`run`] call processes one form
/// submission. Collaborators are injected so tests can substitute doubles
/// for every external service.
///
/// # Example
///
/// ```ignore
/// use mapfill::fill::FileFillApplicator;
/// use mapfill::geocode::AlgoliaPlaces;
/// use mapfill::net::ReqwestClient;
/// use mapfill::pipeline::MapFillPipeline;
/// use mapfill::prefs::{IniPreferenceStore, DEFAULT_NAMESPACE};
/// use mapfill::provider::{ProviderConfig, ProviderFactory};
///
/// let factory = ProviderFactory::new(ReqwestClient::new()?);
/// let provider = factory.create(&ProviderConfig::google("YOUR_API_KEY"));
/// let pipeline = MapFillPipeline::new(
///     AlgoliaPlaces::new(ReqwestClient::new()?),
///     provider,
///     IniPreferenceStore::open(DEFAULT_NAMESPACE),
/// );
///
/// let mut form = pipeline.prefill();
/// // ... user edits the form ...
/// let applicator = FileFillApplicator::new("map.png");
/// let image = pipeline.run(&form, &applicator)?;
/// ```
///
/// [`run`]: MapFillPipeline::run
pub struct MapFillPipeline<G, P, S>
where
    G: Geocoder,
    P: MapImageProvider,
    S: PreferenceStore,
{
    geocoder: G,
    provider: P,
    store: S,
    fields: Vec<FieldDescriptor>,
}

impl<G, P, S> MapFillPipeline<G, P, S>
where
    G: Geocoder,
    P: MapImageProvider,
    S: PreferenceStore,
{
    /// Creates a pipeline with the standard form fields.
    ///
    /// The zoom select options are built from the provider's supported
    /// range.
    pub fn new(geocoder: G, provider: P, store: S) -> Self {
        let fields = standard_fields(provider.min_zoom(), provider.max_zoom());
        Self {
            geocoder,
            provider,
            store,
            fields,
        }
    }

    /// Creates a pipeline with a custom field layout.
    pub fn with_fields(geocoder: G, provider: P, store: S, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            geocoder,
            provider,
            store,
            fields,
        }
    }

    /// The form fields this pipeline validates and persists.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The preference store backing this pipeline.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Builds the initial form state from stored preferences.
    ///
    /// Each field is read under `<service>.<field>` with its descriptor's
    /// default, so the dialog opens pre-filled with the last attempted
    /// values.
    pub fn prefill(&self) -> FormSnapshot {
        FormSnapshot::prefill(&self.store, self.provider.service(), &self.fields)
    }

    /// Runs the pipeline for one form submission.
    ///
    /// On success the fetched image bytes are returned after the applicator
    /// has installed them. On failure the applicator is never called with
    /// partial data; the target's existing fill is untouched.
    pub fn run(
        &self,
        snapshot: &FormSnapshot,
        applicator: &dyn FillApplicator,
    ) -> Result<Vec<u8>, PipelineError> {
        info!(
            provider = self.provider.name(),
            service = self.provider.service(),
            "Starting map fill pipeline"
        );

        let result = self.execute(snapshot, applicator);

        match &result {
            Ok(image) => {
                info!(
                    stage = %PipelineStage::Done,
                    bytes = image.len(),
                    "Map fill pipeline complete"
                );
            }
            Err(e) => {
                error!(
                    stage = %PipelineStage::Aborted,
                    failed_at = %e.stage(),
                    error = %e,
                    "Map fill pipeline aborted"
                );
            }
        }

        result
    }

    fn execute(
        &self,
        snapshot: &FormSnapshot,
        applicator: &dyn FillApplicator,
    ) -> Result<Vec<u8>, PipelineError> {
        debug!(stage = %PipelineStage::Validating, "Validating form values");
        let settings = extract_settings(snapshot, &self.fields)?;
        settings.validate()?;
        if !self.provider.supports_zoom(settings.zoom) {
            return Err(SettingsError::ZoomOutOfRange {
                zoom: settings.zoom,
                min: self.provider.min_zoom(),
                max: self.provider.max_zoom(),
            }
            .into());
        }

        debug!(stage = %PipelineStage::Persisting, "Persisting form values");
        self.persist(snapshot);

        debug!(
            stage = %PipelineStage::Resolving,
            address = %settings.address,
            "Resolving address"
        );
        let center = self.geocoder.resolve(&settings.address)?;

        debug!(
            stage = %PipelineStage::Fetching,
            lat = center.lat,
            lon = center.lon,
            zoom = settings.zoom,
            map_type = %settings.map_type,
            "Fetching map image"
        );
        let image = self.provider.fetch_map(center, &settings)?;

        debug!(
            stage = %PipelineStage::Applying,
            bytes = image.len(),
            "Applying fill"
        );
        applicator.apply_fill(&image)?;

        Ok(image)
    }

    /// Writes every form field back under `<service>.<field>`.
    ///
    /// Runs after validation succeeds and regardless of the later geocoding
    /// outcome, so the next dialog opens pre-filled with the last attempted
    /// values. Write failures are logged and do not abort the run.
    fn persist(&self, snapshot: &FormSnapshot) {
        let service = self.provider.service();

        for field in &self.fields {
            let key = field.key();
            let Some(value) = snapshot.get(key) else {
                continue;
            };

            let pref_key = format!("{}.{}", service, key.name());
            let pref_value = match value {
                FieldValue::Text(text) => PrefValue::Text(text.clone()),
                FieldValue::Index(index) => PrefValue::Index(*index),
            };

            if let Err(e) = self.store.set(&pref_key, pref_value) {
                warn!(key = %pref_key, error = %e, "Failed to persist preference");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::FillError;
    use crate::form::FieldKey;
    use crate::geocode::{Coordinates, GeocodeError};
    use crate::prefs::{MemoryPreferenceStore, PreferenceError};
    use crate::provider::MapImageError;
    use crate::settings::MapType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubGeocoder {
        result: Result<Coordinates, GeocodeError>,
        calls: AtomicUsize,
    }

    impl StubGeocoder {
        fn resolving_to(lat: f64, lon: f64) -> Self {
            Self {
                result: Ok(Coordinates { lat, lon }),
                calls: AtomicUsize::new(0),
            }
        }

        fn not_found() -> Self {
            Self {
                result: Err(GeocodeError::NotFound),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Geocoder for StubGeocoder {
        fn resolve(&self, _address: &str) -> Result<Coordinates, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct StubProvider {
        image: Vec<u8>,
        calls: AtomicUsize,
        last_center: Mutex<Option<Coordinates>>,
    }

    impl StubProvider {
        fn serving(image: Vec<u8>) -> Self {
            Self {
                image,
                calls: AtomicUsize::new(0),
                last_center: Mutex::new(None),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MapImageProvider for StubProvider {
        fn fetch_map(
            &self,
            center: Coordinates,
            _settings: &crate::settings::MapSettings,
        ) -> Result<Vec<u8>, MapImageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_center.lock().unwrap() = Some(center);
            Ok(self.image.clone())
        }

        fn service(&self) -> &str {
            "stub"
        }

        fn name(&self) -> &str {
            "Stub Maps"
        }

        fn min_zoom(&self) -> u8 {
            1
        }

        fn max_zoom(&self) -> u8 {
            20
        }
    }

    #[derive(Default)]
    struct RecordingApplicator {
        applied: Mutex<Vec<Vec<u8>>>,
    }

    impl RecordingApplicator {
        fn applied(&self) -> Vec<Vec<u8>> {
            self.applied.lock().unwrap().clone()
        }
    }

    impl FillApplicator for RecordingApplicator {
        fn apply_fill(&self, image: &[u8]) -> Result<(), FillError> {
            self.applied.lock().unwrap().push(image.to_vec());
            Ok(())
        }
    }

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn get(&self, _key: &str, default: PrefValue) -> PrefValue {
            default
        }

        fn set(&self, _key: &str, _value: PrefValue) -> Result<(), PreferenceError> {
            Err(PreferenceError::Write("read-only store".to_string()))
        }
    }

    fn test_pipeline(
        geocoder: StubGeocoder,
    ) -> MapFillPipeline<StubGeocoder, StubProvider, MemoryPreferenceStore> {
        MapFillPipeline::new(
            geocoder,
            StubProvider::serving(vec![0xFF, 0xD8, 0xFF, 0xE0]),
            MemoryPreferenceStore::new("test"),
        )
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::Idle.to_string(), "idle");
        assert_eq!(PipelineStage::Validating.to_string(), "validating");
        assert_eq!(PipelineStage::Persisting.to_string(), "persisting");
        assert_eq!(PipelineStage::Resolving.to_string(), "resolving");
        assert_eq!(PipelineStage::Fetching.to_string(), "fetching");
        assert_eq!(PipelineStage::Applying.to_string(), "applying");
        assert_eq!(PipelineStage::Done.to_string(), "done");
        assert_eq!(PipelineStage::Aborted.to_string(), "aborted");
    }

    #[test]
    fn test_standard_fields_follow_provider_zoom_range() {
        let pipeline = test_pipeline(StubGeocoder::resolving_to(0.0, 0.0));

        let zoom_field = pipeline
            .fields
            .iter()
            .find(|f| f.key() == FieldKey::Zoom)
            .unwrap();

        match zoom_field {
            FieldDescriptor::Select { options, .. } => {
                assert_eq!(options.len(), 20);
                assert_eq!(options.first().map(String::as_str), Some("1"));
                assert_eq!(options.last().map(String::as_str), Some("20"));
            }
            other => panic!("Expected zoom select, got {:?}", other),
        }
    }

    #[test]
    fn test_prefill_defaults_on_empty_store() {
        let pipeline = test_pipeline(StubGeocoder::resolving_to(0.0, 0.0));
        let snapshot = pipeline.prefill();

        assert_eq!(
            snapshot.get(FieldKey::Address),
            Some(&FieldValue::Text(String::new()))
        );
        // Zoom defaults to the option "15" (index 14 in the 1..=20 list).
        assert_eq!(snapshot.get(FieldKey::Zoom), Some(&FieldValue::Index(14)));
        assert_eq!(snapshot.get(FieldKey::MapType), Some(&FieldValue::Index(0)));
        assert_eq!(
            snapshot.get(FieldKey::Style),
            Some(&FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn test_empty_address_aborts_before_any_work() {
        let pipeline = test_pipeline(StubGeocoder::resolving_to(37.422, -122.084));
        let snapshot = pipeline.prefill();
        let applicator = RecordingApplicator::default();

        let err = pipeline.run(&snapshot, &applicator).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Validation(SettingsError::EmptyAddress)
        ));
        assert_eq!(pipeline.geocoder.call_count(), 0);
        assert_eq!(pipeline.provider.call_count(), 0);
        assert!(pipeline.store().is_empty());
        assert!(applicator.applied().is_empty());
    }

    #[test]
    fn test_successful_run_applies_and_returns_bytes() {
        let pipeline = test_pipeline(StubGeocoder::resolving_to(37.422, -122.084));
        let mut snapshot = pipeline.prefill();
        snapshot.set_text(FieldKey::Address, "1600 Amphitheatre Parkway");
        let applicator = RecordingApplicator::default();

        let image = pipeline.run(&snapshot, &applicator).unwrap();

        assert_eq!(image, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(applicator.applied(), vec![image]);

        let center = pipeline.provider.last_center.lock().unwrap().unwrap();
        assert_eq!(center.lat, 37.422);
        assert_eq!(center.lon, -122.084);
    }

    #[test]
    fn test_run_persists_every_field() {
        let pipeline = test_pipeline(StubGeocoder::resolving_to(37.422, -122.084));
        let mut snapshot = pipeline.prefill();
        snapshot.set_text(FieldKey::Address, "221B Baker Street");
        snapshot.set_index(FieldKey::MapType, 1);

        pipeline
            .run(&snapshot, &RecordingApplicator::default())
            .unwrap();

        assert_eq!(pipeline.store().len(), 4);
        assert_eq!(
            pipeline
                .store()
                .get("stub.address", PrefValue::Text(String::new())),
            PrefValue::Text("221B Baker Street".to_string())
        );
        assert_eq!(
            pipeline.store().get("stub.type", PrefValue::Index(0)),
            PrefValue::Index(1)
        );
    }

    #[test]
    fn test_geocode_failure_skips_fetch_but_keeps_persistence() {
        let pipeline = test_pipeline(StubGeocoder::not_found());
        let mut snapshot = pipeline.prefill();
        snapshot.set_text(FieldKey::Address, "nowhere in particular");
        let applicator = RecordingApplicator::default();

        let err = pipeline.run(&snapshot, &applicator).unwrap_err();

        assert!(matches!(err, PipelineError::Geocode(GeocodeError::NotFound)));
        assert_eq!(pipeline.provider.call_count(), 0);
        assert!(applicator.applied().is_empty());
        // Valid form values were persisted before resolving failed.
        assert_eq!(pipeline.store().len(), 4);
    }

    #[test]
    fn test_zoom_outside_provider_range_aborts() {
        let fields = vec![
            FieldDescriptor::Input {
                key: FieldKey::Address,
                default: String::new(),
            },
            FieldDescriptor::Select {
                key: FieldKey::Zoom,
                options: vec!["25".to_string()],
                default_index: 0,
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
        ];
        let pipeline = MapFillPipeline::with_fields(
            StubGeocoder::resolving_to(0.0, 0.0),
            StubProvider::serving(vec![1, 2, 3]),
            MemoryPreferenceStore::new("test"),
            fields,
        );
        let mut snapshot = pipeline.prefill();
        snapshot.set_text(FieldKey::Address, "somewhere");

        let err = pipeline
            .run(&snapshot, &RecordingApplicator::default())
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Validation(SettingsError::ZoomOutOfRange {
                zoom: 25,
                min: 1,
                max: 20,
            })
        ));
        assert!(pipeline.store().is_empty());
    }

    #[test]
    fn test_preference_write_failure_is_not_fatal() {
        let pipeline = MapFillPipeline::new(
            StubGeocoder::resolving_to(40.415, -3.707),
            StubProvider::serving(vec![0x89, 0x50]),
            FailingStore,
        );
        let mut snapshot = pipeline.prefill();
        snapshot.set_text(FieldKey::Address, "Plaza Mayor, Madrid");

        let image = pipeline
            .run(&snapshot, &RecordingApplicator::default())
            .unwrap();

        assert_eq!(image, vec![0x89, 0x50]);
    }
}
