//! End-to-end: `StoreHandle` over `AirtableSource` against a mock Airtable.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pollfinder_airtable::{AirtableClient, FetchOptions};
use pollfinder_core::{FetchStatus, Precinct};
use pollfinder_store::{AirtableSource, SelectionOutcome, StoreConfig, StoreHandle};

const TABLE_PATH: &str = "/appBASE/Locations";

fn source(server: &MockServer, options: FetchOptions) -> AirtableSource {
    let client = AirtableClient::with_base_url(&server.uri(), "appBASE", "Locations", "keyTEST", 5)
        .expect("failed to build test AirtableClient");
    AirtableSource::new(client, options)
}

fn page(records: &[(&str, &str)], offset: Option<&str>) -> serde_json::Value {
    let records: Vec<serde_json::Value> = records
        .iter()
        .map(|(id, location_type)| {
            json!({
                "id": id,
                "fields": {
                    "Location Type": location_type,
                    "Latitude": 34.5,
                    "Longitude": -111.9,
                    "County": "Yavapai",
                    "Precinct Number": "All",
                    "Active": true
                }
            })
        })
        .collect();
    match offset {
        Some(token) => json!({"records": records, "offset": token}),
        None => json!({"records": records}),
    }
}

#[tokio::test]
async fn paginated_selection_stores_all_pages_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(header("Authorization", "Bearer keyTEST"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            &[("rec1", "Polling Place"), ("rec2", "Drop Box")],
            Some("T"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("offset", "T"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[("rec3", "Polling Place")], Some("T2"))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("offset", "T2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(&[("rec4", "Polling Place")], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = StoreHandle::spawn(
        source(&server, FetchOptions::default()),
        StoreConfig::default(),
    );
    let outcome = handle
        .select_precinct(Some(Precinct::new("Yavapai", "0101")))
        .await
        .unwrap();
    assert_eq!(outcome, SelectionOutcome::Loaded { count: 4 });

    let store = handle.snapshot();
    let ids: Vec<&str> = store
        .locations()
        .data
        .iter()
        .filter_map(|r| r.id.as_deref())
        .collect();
    assert_eq!(ids, vec!["rec1", "rec2", "rec3", "rec4"]);
    assert_eq!(store.location_counts().get("polling-places"), 3);
    assert_eq!(store.location_counts().get("drop-boxes"), 1);
}

#[tokio::test]
async fn http_failure_surfaces_as_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"type": "INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND", "message": "forbidden"}
        })))
        .mount(&server)
        .await;

    let handle = StoreHandle::spawn(
        source(&server, FetchOptions::default()),
        StoreConfig::default(),
    );
    let outcome = handle
        .select_precinct(Some(Precinct::new("Yavapai", "0101")))
        .await
        .unwrap();
    assert!(matches!(outcome, SelectionOutcome::Failed(_)));

    let store = handle.snapshot();
    assert_eq!(store.status(), FetchStatus::Error);
    assert!(store
        .precinct_error()
        .is_some_and(|e| e.contains("INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND")));
    assert!(store.locations().data.is_empty());
    assert!(store.precinct().is_none());
}
