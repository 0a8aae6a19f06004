//! Domain types shared by the source client and the store.
//!
//! ## Record shape
//!
//! Rows come back from the locations table as `{id, createdTime, fields}`.
//! `fields` is an open mapping; Airtable omits a field entirely when the
//! cell is empty, so every accessor returns `Option`. Only `Location Type`
//! takes part in filtering; the other accessors exist for display.
//!
//! `Latitude` / `Longitude` are number columns in most bases but have been
//! seen as text columns, so both encodings are accepted. `Active` and
//! `Tribal Land` are checkbox columns: `true` when ticked, absent otherwise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_LOCATION_TYPE: &str = "Location Type";
pub const FIELD_LATITUDE: &str = "Latitude";
pub const FIELD_LONGITUDE: &str = "Longitude";
pub const FIELD_COUNTY: &str = "County";
pub const FIELD_PRECINCT_NUMBER: &str = "Precinct Number";
pub const FIELD_ACTIVE: &str = "Active";
pub const FIELD_TRIBAL_LAND: &str = "Tribal Land";

/// A coordinate picked on the map. The store never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

/// County plus precinct-number key produced by the precinct lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Precinct {
    pub county: String,
    pub precinct_id: String,
}

impl Precinct {
    #[must_use]
    pub fn new(county: impl Into<String>, precinct_id: impl Into<String>) -> Self {
        Self {
            county: county.into(),
            precinct_id: precinct_id.into(),
        }
    }
}

/// Status of the most recent location fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// Nothing fetched, or the selection was cleared.
    #[default]
    Unset,
    Loading,
    Success,
    /// The last fetch failed; see the store's precinct error.
    Error,
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::Unset => write!(f, "unset"),
            FetchStatus::Loading => write!(f, "loading"),
            FetchStatus::Success => write!(f, "success"),
            FetchStatus::Error => write!(f, "error"),
        }
    }
}

/// One row from the locations table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl LocationRecord {
    /// Builds a record from bare fields, as a test fixture or for callers
    /// that assemble rows themselves.
    #[must_use]
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            id: None,
            created_time: None,
            fields,
        }
    }

    #[must_use]
    pub fn location_type(&self) -> Option<&str> {
        self.text(FIELD_LOCATION_TYPE)
    }

    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.number(FIELD_LATITUDE)
    }

    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.number(FIELD_LONGITUDE)
    }

    #[must_use]
    pub fn county(&self) -> Option<&str> {
        self.text(FIELD_COUNTY)
    }

    #[must_use]
    pub fn precinct_number(&self) -> Option<&str> {
        self.text(FIELD_PRECINCT_NUMBER)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.checkbox(FIELD_ACTIVE)
    }

    #[must_use]
    pub fn is_tribal_land(&self) -> bool {
        self.checkbox(FIELD_TRIBAL_LAND)
    }

    /// Latitude/longitude pair when both are present.
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        Some(Point {
            lat: self.latitude()?,
            lng: self.longitude()?,
        })
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    fn checkbox(&self, name: &str) -> bool {
        match self.fields.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> LocationRecord {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn deserializes_airtable_row() {
        let rec = record(json!({
            "id": "rec123",
            "createdTime": "2020-10-01T17:04:05.000Z",
            "fields": {
                "Location Type": "Drop Box",
                "Latitude": 33.45,
                "Longitude": -112.07,
                "County": "Maricopa",
                "Precinct Number": "All",
                "Active": true
            }
        }));

        assert_eq!(rec.id.as_deref(), Some("rec123"));
        assert!(rec.created_time.is_some());
        assert_eq!(rec.location_type(), Some("Drop Box"));
        assert_eq!(rec.county(), Some("Maricopa"));
        assert_eq!(rec.precinct_number(), Some("All"));
        assert!(rec.is_active());
        assert!(!rec.is_tribal_land());
        assert_eq!(
            rec.point(),
            Some(Point {
                lat: 33.45,
                lng: -112.07
            })
        );
    }

    #[test]
    fn text_coordinates_are_parsed() {
        let rec = record(json!({"fields": {"Latitude": " 31.5 ", "Longitude": "-110.2"}}));
        assert_eq!(rec.latitude(), Some(31.5));
        assert_eq!(rec.longitude(), Some(-110.2));
    }

    #[test]
    fn missing_fields_are_absent() {
        let rec = record(json!({"fields": {}}));
        assert!(rec.location_type().is_none());
        assert!(rec.point().is_none());
        assert!(!rec.is_active());
    }

    #[test]
    fn precinct_uses_camel_case_on_the_wire() {
        let p: Precinct =
            serde_json::from_value(json!({"county": "Pima", "precinctId": "042"})).unwrap();
        assert_eq!(p, Precinct::new("Pima", "042"));
    }

    #[test]
    fn fetch_status_defaults_to_unset() {
        assert_eq!(FetchStatus::default(), FetchStatus::Unset);
        assert_eq!(FetchStatus::Error.to_string(), "error");
    }
}
