use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ConfigError;

/// Station names for O'Hill, keyed by upstream station id, as shown in the
/// venue's sticky navigation.
const BUILTIN_STATIONS: [(&str, &str); 9] = [
    ("22867", "Hearth"),
    ("22869", "True Balance"),
    ("22871", "Trattoria - Pizza"),
    ("22866", "Under the Hood"),
    ("22878", "Cavalier Crepes and Patisserie"),
    ("22876", "Omelets At Green Fork"),
    ("22870", "Meze"),
    ("22873", "Greens & Grains"),
    ("22872", "Savory Stack"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationOverride {
    /// Upstream ids are numeric; YAML may give them quoted or bare.
    #[serde(deserialize_with = "station_id")]
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStationId {
    Text(String),
    Number(u64),
}

fn station_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawStationId::deserialize(deserializer)? {
        RawStationId::Text(id) => id,
        RawStationId::Number(id) => id.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct StationsFile {
    stations: Vec<StationOverride>,
}

/// Station-id to display-name table that takes precedence over whatever
/// name the upstream payload declares.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StationOverrides {
    names: HashMap<String, String>,
}

impl StationOverrides {
    /// The built-in O'Hill table.
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN_STATIONS
            .iter()
            .map(|(id, name)| ((*id).to_string(), (*name).to_string()))
            .collect()
    }

    #[must_use]
    pub fn get(&self, station_id: &str) -> Option<&str> {
        self.names.get(station_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for StationOverrides {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Load the station override table from a YAML file.
///
/// A missing file yields [`StationOverrides::builtin`].
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or
/// fails validation.
pub fn load_station_overrides(path: &Path) -> Result<StationOverrides, ConfigError> {
    if !path.exists() {
        return Ok(StationOverrides::builtin());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StationsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: StationsFile = serde_yaml::from_str(&content)?;
    validate_stations(&file)?;

    Ok(file
        .stations
        .into_iter()
        .map(|s| (s.id.trim().to_string(), s.name.trim().to_string()))
        .collect())
}

fn validate_stations(file: &StationsFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for station in &file.stations {
        let id = station.id.trim();
        if id.is_empty() {
            return Err(ConfigError::Validation(
                "station id must be non-empty".to_string(),
            ));
        }
        if station.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "station '{id}' has an empty name"
            )));
        }
        if !seen_ids.insert(id.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate station id: '{id}'"
            )));
        }
    }

    Ok(())
}
