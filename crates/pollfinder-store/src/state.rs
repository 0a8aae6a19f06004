//! The location store: selection state, fetched locations, derived views.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pollfinder_core::{
    AppConfig, FetchStatus, LocationRecord, LocationTypeKey, LocationTypes, Point, Precinct,
};

/// Knobs that change what the store does with its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location_types: LocationTypes,
    /// When off, [`LocationStore::set_precinct_error`] is a no-op and
    /// fetch failures are only visible through the status.
    pub track_precinct_error: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location_types: LocationTypes::default(),
            track_precinct_error: true,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            location_types: config.location_types.clone(),
            track_precinct_error: config.track_precinct_error,
        }
    }
}

/// Fetch status and the records the last successful fetch returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationsCollection {
    pub status: FetchStatus,
    pub data: Vec<LocationRecord>,
    /// When `data` was last replaced by a completed fetch.
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Per-type location counts, in location-type table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationCounts(Vec<(String, usize)>);

impl LocationCounts {
    /// Count for `key`; zero for keys outside the table.
    #[must_use]
    pub fn get(&self, key: &str) -> usize {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map_or(0, |(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, n)| (k.as_str(), *n))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, n)| n).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationStore {
    selected_point: Option<Point>,
    precinct: Option<Precinct>,
    precinct_error: Option<String>,
    selected_location_type: String,
    locations: LocationsCollection,
    config: Arc<StoreConfig>,
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl LocationStore {
    /// Empty store: nothing selected, no locations, polling places as the
    /// active type.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            selected_point: None,
            precinct: None,
            precinct_error: None,
            selected_location_type: LocationTypeKey::PollingPlaces.as_str().to_owned(),
            locations: LocationsCollection::default(),
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[must_use]
    pub fn selected_point(&self) -> Option<Point> {
        self.selected_point
    }

    #[must_use]
    pub fn precinct(&self) -> Option<&Precinct> {
        self.precinct.as_ref()
    }

    #[must_use]
    pub fn precinct_error(&self) -> Option<&str> {
        self.precinct_error.as_deref()
    }

    #[must_use]
    pub fn selected_location_type(&self) -> &str {
        &self.selected_location_type
    }

    #[must_use]
    pub fn locations(&self) -> &LocationsCollection {
        &self.locations
    }

    #[must_use]
    pub fn status(&self) -> FetchStatus {
        self.locations.status
    }

    // -- mutators ------------------------------------------------------------

    pub fn set_selected_point(&mut self, point: Option<Point>) {
        self.selected_point = point;
    }

    pub fn set_precinct(&mut self, precinct: Option<Precinct>) {
        self.precinct = precinct;
    }

    pub fn set_precinct_error(&mut self, error: Option<String>) {
        if self.config.track_precinct_error {
            self.precinct_error = error;
        }
    }

    pub fn set_locations_fetch_status(&mut self, status: FetchStatus) {
        self.locations.status = status;
    }

    pub fn set_locations_data(&mut self, data: Vec<LocationRecord>) {
        self.locations.data = data;
    }

    pub fn set_selected_location_type(&mut self, key: impl Into<String>) {
        self.selected_location_type = key.into();
    }

    pub(crate) fn set_fetched_at(&mut self, at: Option<DateTime<Utc>>) {
        self.locations.fetched_at = at;
    }

    // -- derived views -------------------------------------------------------

    /// Records whose `Location Type` is the label of the selected type.
    /// Empty when the selected key has no label.
    #[must_use]
    pub fn locations_for_selected_type(&self) -> Vec<&LocationRecord> {
        self.locations_of_type(&self.selected_location_type)
    }

    /// Number of records for every type in the table.
    #[must_use]
    pub fn location_counts(&self) -> LocationCounts {
        LocationCounts(
            self.config
                .location_types
                .keys()
                .map(|key| (key.to_owned(), self.locations_of_type(key).len()))
                .collect(),
        )
    }

    /// Lower-cased label of the selected type, pluralized unless exactly
    /// one record of that type is loaded: `"drop box"`, `"drop boxes"`,
    /// `"polling places"`.
    #[must_use]
    pub fn selected_location_type_label(&self) -> Option<String> {
        let key = self.selected_location_type.as_str();
        let types = &self.config.location_types;
        let label = types.label_for(key)?.to_lowercase();

        if self.locations_of_type(key).len() == 1 {
            Some(label)
        } else {
            Some(label + types.plural_suffix_for(key))
        }
    }

    fn locations_of_type(&self, key: &str) -> Vec<&LocationRecord> {
        let Some(label) = self.config.location_types.label_for(key) else {
            return Vec::new();
        };
        self.locations
            .data
            .iter()
            .filter(|r| r.location_type() == Some(label))
            .collect()
    }
}
