//! Location-type keys and the key → label table used for filtering.
//!
//! The table is ordered: counts and listings follow the order in which the
//! types are declared. A table may also run in *raw-key* mode, where every
//! key is its own label and rows are matched on the key verbatim.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

const DEFAULT_PLURAL_SUFFIX: &str = "s";

/// The four location categories the voter page knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationTypeKey {
    PollingPlaces,
    EarlyVotingLocations,
    DropBoxes,
    EmergencyVotingLocations,
}

impl LocationTypeKey {
    pub const ALL: [LocationTypeKey; 4] = [
        LocationTypeKey::PollingPlaces,
        LocationTypeKey::EarlyVotingLocations,
        LocationTypeKey::DropBoxes,
        LocationTypeKey::EmergencyVotingLocations,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LocationTypeKey::PollingPlaces => "polling-places",
            LocationTypeKey::EarlyVotingLocations => "early-voting-locations",
            LocationTypeKey::DropBoxes => "drop-boxes",
            LocationTypeKey::EmergencyVotingLocations => "emergency-voting-locations",
        }
    }

    /// Value of the `Location Type` column for this category.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LocationTypeKey::PollingPlaces => "Polling Place",
            LocationTypeKey::EarlyVotingLocations => "Early Voting Location",
            LocationTypeKey::DropBoxes => "Drop Box",
            LocationTypeKey::EmergencyVotingLocations => "Emergency Voting Location",
        }
    }

    #[must_use]
    pub fn plural_suffix(self) -> &'static str {
        match self {
            LocationTypeKey::DropBoxes => "es",
            _ => DEFAULT_PLURAL_SUFFIX,
        }
    }
}

impl std::fmt::Display for LocationTypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationTypeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationTypeKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown location type \"{s}\""))
    }
}

/// One row of the key → label table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationType {
    pub key: String,
    pub label: String,
    #[serde(default = "default_plural_suffix")]
    pub plural_suffix: String,
}

fn default_plural_suffix() -> String {
    DEFAULT_PLURAL_SUFFIX.to_owned()
}

impl From<LocationTypeKey> for LocationType {
    fn from(key: LocationTypeKey) -> Self {
        Self {
            key: key.as_str().to_owned(),
            label: key.label().to_owned(),
            plural_suffix: key.plural_suffix().to_owned(),
        }
    }
}

/// Ordered key → label table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTypes {
    types: Vec<LocationType>,
    raw_keys: bool,
}

impl Default for LocationTypes {
    fn default() -> Self {
        Self {
            types: LocationTypeKey::ALL.into_iter().map(LocationType::from).collect(),
            raw_keys: false,
        }
    }
}

impl LocationTypes {
    #[must_use]
    pub fn new(types: Vec<LocationType>) -> Self {
        Self {
            types,
            raw_keys: false,
        }
    }

    /// Parses a YAML list of `{key, label, plural_suffix?}` entries.
    ///
    /// # Errors
    ///
    /// Returns the `serde_yaml` error when the document is not such a list.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let types: Vec<LocationType> = serde_yaml::from_str(yaml)?;
        Ok(Self::new(types))
    }

    #[must_use]
    pub fn with_raw_keys(mut self, raw_keys: bool) -> Self {
        self.raw_keys = raw_keys;
        self
    }

    #[must_use]
    pub fn raw_keys(&self) -> bool {
        self.raw_keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationType> {
        self.types.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.key.as_str())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LocationType> {
        self.types.iter().find(|t| t.key == key)
    }

    /// `Location Type` value that rows of `key` carry.
    ///
    /// In raw-key mode every key is its own label, table entry or not.
    #[must_use]
    pub fn label_for<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if self.raw_keys {
            return Some(key);
        }
        self.get(key).map(|t| t.label.as_str())
    }

    /// Raw-key mode always pluralizes with the default suffix.
    #[must_use]
    pub fn plural_suffix_for(&self, key: &str) -> &str {
        if self.raw_keys {
            return DEFAULT_PLURAL_SUFFIX;
        }
        self.get(key)
            .map_or(DEFAULT_PLURAL_SUFFIX, |t| t.plural_suffix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_builtin_order() {
        let types = LocationTypes::default();
        let keys: Vec<&str> = types.keys().collect();
        assert_eq!(
            keys,
            vec![
                "polling-places",
                "early-voting-locations",
                "drop-boxes",
                "emergency-voting-locations"
            ]
        );
        assert_eq!(types.label_for("drop-boxes"), Some("Drop Box"));
        assert_eq!(types.plural_suffix_for("drop-boxes"), "es");
        assert_eq!(types.plural_suffix_for("polling-places"), "s");
    }

    #[test]
    fn unknown_key_has_no_label() {
        assert!(LocationTypes::default().label_for("ballot-boats").is_none());
    }

    #[test]
    fn raw_key_mode_uses_key_as_label() {
        let types = LocationTypes::default().with_raw_keys(true);
        assert_eq!(types.label_for("Ballot Boat"), Some("Ballot Boat"));
        // Keys with a table entry bypass it too.
        assert_eq!(types.label_for("polling-places"), Some("polling-places"));
        assert_eq!(types.plural_suffix_for("drop-boxes"), "s");
    }

    #[test]
    fn parses_yaml_table_with_default_suffix() {
        let yaml = r"
- key: drop-boxes
  label: Drop Box
  plural_suffix: es
- key: vote-centers
  label: Vote Center
";
        let types = LocationTypes::from_yaml_str(yaml).unwrap();
        assert_eq!(types.label_for("vote-centers"), Some("Vote Center"));
        assert_eq!(types.plural_suffix_for("vote-centers"), "s");
        assert_eq!(types.plural_suffix_for("drop-boxes"), "es");
    }

    #[test]
    fn key_round_trips_through_from_str() {
        for key in LocationTypeKey::ALL {
            assert_eq!(key.as_str().parse::<LocationTypeKey>().unwrap(), key);
        }
        assert!("nope".parse::<LocationTypeKey>().is_err());
    }
}
