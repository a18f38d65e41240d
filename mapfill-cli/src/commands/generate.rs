//! Generate command - geocode an address and save a static map image.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::info;

use mapfill::fill::{AlwaysValidSelection, FileFillApplicator, SelectionValidator};
use mapfill::form::{FieldDescriptor, FieldKey, FieldValue};
use mapfill::geocode::AlgoliaPlaces;
use mapfill::logging::{default_log_dir, default_log_file, init_logging};
use mapfill::net::ReqwestClient;
use mapfill::pipeline::{MapFillPipeline, SUCCESS_MESSAGE};
use mapfill::prefs::{IniPreferenceStore, DEFAULT_NAMESPACE};
use mapfill::provider::ProviderFactory;
use mapfill::settings::MapType;

use super::common::{MapTypeChoice, ServiceChoice};
use crate::error::CliError;

/// Arguments for the generate command.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Street address to center the map on (falls back to the stored address)
    pub address: Option<String>,

    /// Map service to fetch the image from
    #[arg(long, value_enum, default_value = "google")]
    pub service: ServiceChoice,

    /// Google Maps API key (required with --service google)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Mapbox access token (required with --service mapbox)
    #[arg(long)]
    pub access_token: Option<String>,

    /// Zoom level (defaults to the stored value, then to the service default)
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Base map rendering style
    #[arg(long, value_enum)]
    pub map_type: Option<MapTypeChoice>,

    /// Custom style string passed through to the map service
    #[arg(long)]
    pub style: Option<String>,

    /// Output file for the fetched image
    #[arg(long, default_value = "map.png")]
    pub output: PathBuf,
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> Result<(), CliError> {
    let _logging_guard = init_logging(&default_log_dir(), default_log_file())
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    info!("mapfill v{}", mapfill::VERSION);
    info!("mapfill CLI: generate command");

    // No canvas selection exists on the command line; the gate always passes.
    AlwaysValidSelection.validate_selection()?;

    let provider_config = args.service.to_config(args.api_key, args.access_token)?;

    let http_client = ReqwestClient::new()?;
    let provider = ProviderFactory::new(http_client.clone()).create(&provider_config);
    let pipeline = MapFillPipeline::new(
        AlgoliaPlaces::new(http_client),
        provider,
        IniPreferenceStore::open(DEFAULT_NAMESPACE),
    );

    // Start from the stored values, then apply command-line overrides
    let mut form = pipeline.prefill();

    if let Some(address) = args.address {
        form.set_text(FieldKey::Address, address);
    }
    if let Some(zoom) = args.zoom {
        let index = zoom_option_index(pipeline.fields(), zoom).ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "Zoom level {} is not supported by the {} service",
                zoom,
                args.service.service_id()
            ))
        })?;
        form.set_index(FieldKey::Zoom, index);
    }
    if let Some(choice) = args.map_type {
        let index = MapType::ALL
            .iter()
            .position(|t| *t == MapType::from(choice))
            .unwrap_or(0);
        form.set_index(FieldKey::MapType, index);
    }
    if let Some(style) = args.style {
        form.set_text(FieldKey::Style, style);
    }

    println!("Generating map for:");
    if let Some(FieldValue::Text(address)) = form.get(FieldKey::Address) {
        println!("  Address: {}", address);
    }
    println!("  Service: {}", provider_config.name());
    println!("  Output: {}", args.output.display());
    println!();

    let applicator = FileFillApplicator::new(&args.output);

    println!("Resolving address and fetching map...");
    let start = Instant::now();
    let image = pipeline.run(&form, &applicator)?;
    let elapsed = start.elapsed();

    println!("{}", SUCCESS_MESSAGE);
    println!(
        "✓ Saved successfully: {} ({:.1} KB in {:.2}s)",
        args.output.display(),
        image.len() as f64 / 1024.0,
        elapsed.as_secs_f64()
    );

    Ok(())
}

/// Index of `zoom` in the pipeline's zoom select options, if it is offered.
fn zoom_option_index(fields: &[FieldDescriptor], zoom: u8) -> Option<usize> {
    let title = zoom.to_string();
    fields.iter().find_map(|field| match field {
        FieldDescriptor::Select { key, options, .. } if *key == FieldKey::Zoom => {
            options.iter().position(|option| *option == title)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapfill::form::standard_fields;

    #[test]
    fn test_zoom_option_index_in_range() {
        let fields = standard_fields(1, 20);
        assert_eq!(zoom_option_index(&fields, 1), Some(0));
        assert_eq!(zoom_option_index(&fields, 15), Some(14));
        assert_eq!(zoom_option_index(&fields, 20), Some(19));
    }

    #[test]
    fn test_zoom_option_index_out_of_range() {
        let fields = standard_fields(1, 20);
        assert_eq!(zoom_option_index(&fields, 0), None);
        assert_eq!(zoom_option_index(&fields, 21), None);
    }

    #[test]
    fn test_map_type_positions_follow_select_order() {
        let index = |choice: MapTypeChoice| {
            MapType::ALL
                .iter()
                .position(|t| *t == MapType::from(choice))
                .unwrap()
        };
        assert_eq!(index(MapTypeChoice::Roadmap), 0);
        assert_eq!(index(MapTypeChoice::Satellite), 1);
        assert_eq!(index(MapTypeChoice::Hybrid), 2);
        assert_eq!(index(MapTypeChoice::Terrain), 3);
    }
}
