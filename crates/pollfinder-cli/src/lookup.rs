//! `lookup` and `types` command handlers.
//!
//! The CLI stands in for the page: it feeds the store a selection, waits for
//! the fetch to settle, and renders the derived views.

use std::fmt::Write as _;

use pollfinder_core::{AppConfig, LocationTypes, Point, Precinct};
use pollfinder_store::{AirtableSource, LocationStore, SelectionOutcome, StoreConfig, StoreHandle};
use serde_json::json;

pub(crate) struct LookupRequest {
    pub precinct: Precinct,
    pub location_type: String,
    pub point: Option<Point>,
    pub json: bool,
}

/// Select `request.precinct` in a fresh store and print the result.
///
/// # Errors
///
/// Returns an error if the Airtable client cannot be built, the store task
/// dies, or the fetch fails.
pub(crate) async fn run_lookup(config: &AppConfig, request: LookupRequest) -> anyhow::Result<()> {
    if config.location_types.label_for(&request.location_type).is_none() {
        tracing::warn!(
            location_type = %request.location_type,
            "unknown location type; the list will be empty"
        );
    }

    let source = AirtableSource::from_app_config(config)?;
    let handle = StoreHandle::spawn(source, StoreConfig::from_app_config(config));
    handle.set_selected_point(request.point)?;
    handle.set_selected_location_type(request.location_type)?;

    let outcome = handle.select_precinct(Some(request.precinct)).await?;
    let store = handle.snapshot();

    if request.json {
        println!("{}", serde_json::to_string_pretty(&render_json(&store))?);
    } else {
        print!("{}", render_text(&store));
    }

    match outcome {
        SelectionOutcome::Failed(message) => anyhow::bail!("location fetch failed: {message}"),
        SelectionOutcome::Loaded { .. } | SelectionOutcome::Cleared | SelectionOutcome::Superseded => {
            Ok(())
        }
    }
}

pub(crate) fn render_types(types: &LocationTypes) -> String {
    let mut out = String::new();
    for t in types.iter() {
        let _ = writeln!(out, "{:<28} {}", t.key, t.label);
    }
    if types.raw_keys() {
        out.push_str("(raw keys: every key is matched verbatim as its own label)\n");
    }
    out
}

pub(crate) fn render_text(store: &LocationStore) -> String {
    let mut out = String::new();
    let precinct = store.precinct().map_or_else(
        || "\u{2014}".to_string(),
        |p| format!("{} / {}", p.county, p.precinct_id),
    );
    let _ = writeln!(out, "precinct: {precinct}");
    let _ = writeln!(out, "status:   {}", store.status());
    if let Some(error) = store.precinct_error() {
        let _ = writeln!(out, "error:    {error}");
    }
    if let Some(point) = store.selected_point() {
        let _ = writeln!(out, "point:    {:.5}, {:.5}", point.lat, point.lng);
    }

    out.push('\n');
    for (key, count) in store.location_counts().iter() {
        let _ = writeln!(out, "  {key:<28} {count:>4}");
    }

    let selected = store.locations_for_selected_type();
    let label = store
        .selected_location_type_label()
        .unwrap_or_else(|| store.selected_location_type().to_owned());
    let _ = writeln!(out, "\n{} {label}", selected.len());
    for record in selected {
        let id = record.id.as_deref().unwrap_or("?");
        match record.point() {
            Some(p) => {
                let _ = writeln!(out, "  {id}  {:.5}, {:.5}", p.lat, p.lng);
            }
            None => {
                let _ = writeln!(out, "  {id}");
            }
        }
    }
    out
}

pub(crate) fn render_json(store: &LocationStore) -> serde_json::Value {
    let counts: serde_json::Map<String, serde_json::Value> = store
        .location_counts()
        .iter()
        .map(|(key, count)| (key.to_owned(), json!(count)))
        .collect();

    json!({
        "selectedPoint": store.selected_point(),
        "precinct": store.precinct(),
        "precinctError": store.precinct_error(),
        "selectedLocationType": store.selected_location_type(),
        "selectedLocationTypeLabel": store.selected_location_type_label(),
        "locations": {
            "status": store.status(),
            "fetchedAt": store.locations().fetched_at,
            "data": store.locations().data,
        },
        "locationCounts": counts,
        "locationsForSelectedType": store.locations_for_selected_type(),
    })
}
