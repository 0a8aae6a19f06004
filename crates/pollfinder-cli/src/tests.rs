use clap::Parser;
use pollfinder_core::{Environment, FetchStatus, LocationRecord, LocationTypes, Precinct};
use pollfinder_store::LocationStore;
use serde_json::json;

use super::*;

fn drop_box(id: &str) -> LocationRecord {
    serde_json::from_value(json!({
        "id": id,
        "fields": {"Location Type": "Drop Box", "Latitude": 33.5, "Longitude": -112.25}
    }))
    .expect("fixture should deserialize")
}

fn loaded_store() -> LocationStore {
    let mut store = LocationStore::default();
    store.set_precinct(Some(Precinct::new("Maricopa", "0421")));
    store.set_locations_fetch_status(FetchStatus::Success);
    store.set_locations_data(vec![drop_box("rec1")]);
    store.set_selected_location_type("drop-boxes");
    store
}

#[test]
fn parses_lookup_command() {
    let cli = Cli::try_parse_from([
        "pollfinder-cli",
        "lookup",
        "--county",
        "Maricopa",
        "--precinct",
        "0421",
        "--type",
        "drop-boxes",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Lookup { ref county, ref precinct, ref location_type, lat: None, json: false, .. }
            if county == "Maricopa" && precinct == "0421" && location_type == "drop-boxes"
    ));
}

#[test]
fn lookup_type_defaults_to_polling_places() {
    let cli = Cli::try_parse_from([
        "pollfinder-cli",
        "lookup",
        "--county",
        "Pima",
        "--precinct",
        "7",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Lookup { ref location_type, .. } if location_type == "polling-places"
    ));
}

#[test]
fn lookup_accepts_negative_longitude() {
    let cli = Cli::try_parse_from([
        "pollfinder-cli",
        "lookup",
        "--county",
        "Pima",
        "--precinct",
        "7",
        "--lat",
        "32.2",
        "--lng",
        "-110.9",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Lookup { lat: Some(_), lng: Some(_), .. }
    ));
}

#[test]
fn lookup_point_needs_both_coordinates() {
    let result = Cli::try_parse_from([
        "pollfinder-cli",
        "lookup",
        "--county",
        "Pima",
        "--precinct",
        "7",
        "--lat",
        "32.2",
    ]);
    assert!(result.is_err());
}

#[test]
fn lookup_requires_precinct() {
    let result = Cli::try_parse_from(["pollfinder-cli", "lookup", "--county", "Pima"]);
    assert!(result.is_err());
}

#[test]
fn parses_types_command() {
    let cli = Cli::try_parse_from(["pollfinder-cli", "types"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Types));
}

#[test]
fn text_output_lists_counts_and_selection() {
    let text = lookup::render_text(&loaded_store());
    assert!(text.contains("precinct: Maricopa / 0421"), "{text}");
    assert!(text.contains("status:   success"), "{text}");
    assert!(text.contains("1 drop box\n"), "{text}");
    assert!(text.contains("rec1  33.50000, -112.25000"), "{text}");
}

#[test]
fn json_output_mirrors_store_state() {
    let value = lookup::render_json(&loaded_store());
    assert_eq!(value["precinct"]["precinctId"], "0421");
    assert_eq!(value["locations"]["status"], "success");
    assert_eq!(value["locationCounts"]["drop-boxes"], 1);
    assert_eq!(value["locationCounts"]["polling-places"], 0);
    assert_eq!(value["selectedLocationTypeLabel"], "drop box");
    assert_eq!(
        value["locationsForSelectedType"]
            .as_array()
            .map(Vec::len),
        Some(1)
    );
}

#[test]
fn production_logs_drop_colour_and_targets() {
    assert_eq!(
        log_style(&Environment::Production),
        LogStyle {
            ansi: false,
            target: false
        }
    );
    assert_eq!(
        log_style(&Environment::Development),
        LogStyle {
            ansi: true,
            target: true
        }
    );
    assert!(!log_style(&Environment::Test).target);
}

#[test]
fn types_listing_shows_keys_and_labels() {
    let text = lookup::render_types(&LocationTypes::default());
    assert!(text.contains("drop-boxes"), "{text}");
    assert!(text.contains("Drop Box"), "{text}");
    assert!(!text.contains("raw keys"), "{text}");

    let raw = lookup::render_types(&LocationTypes::default().with_raw_keys(true));
    assert!(raw.contains("raw keys"), "{raw}");
}
