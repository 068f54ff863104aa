//! User-configured vehicle type filter.

/// Durable storage for the filter configuration.
pub mod store;

use std::{collections::BTreeSet, fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::VehicleTypeId;

pub use store::{FilterStore, JsonFileStore, KeyValueStore, MemoryStore};

/// How the configured type identifiers are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMode {
    /// Configured types are hidden.
    #[default]
    Exclude,
    /// Only configured types are shown.
    IncludeOnly,
}

impl FilterMode {
    /// Storage representation of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::Exclude => "exclude",
            FilterMode::IncludeOnly => "includeOnly",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "exclude" => Ok(FilterMode::Exclude),
            "includeOnly" => Ok(FilterMode::IncludeOnly),
            other => Err(format!("unknown filter mode '{other}'")),
        }
    }
}

/// Vehicle types selected by the user and the mode they are applied with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Selected vehicle type identifiers.
    pub type_ids: BTreeSet<VehicleTypeId>,
    /// How `type_ids` is applied.
    pub mode: FilterMode,
}

impl FilterConfig {
    /// Build a configuration from any collection of identifiers.
    pub fn new(type_ids: impl IntoIterator<Item = VehicleTypeId>, mode: FilterMode) -> Self {
        Self {
            type_ids: type_ids.into_iter().collect(),
            mode,
        }
    }

    /// Whether a vehicle of the given type passes the type filter.
    ///
    /// An empty set excludes nothing in `Exclude` mode and admits nothing in
    /// `IncludeOnly` mode.
    pub fn admits(&self, vehicle_type: VehicleTypeId) -> bool {
        let listed = self.type_ids.contains(&vehicle_type);
        match self.mode {
            FilterMode::Exclude => !listed,
            FilterMode::IncludeOnly => listed,
        }
    }

    /// Comma separated identifiers, suitable for editing and for `parse_identifier_list`.
    pub fn joined_type_ids(&self) -> String {
        self.type_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

static TOKEN_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;\r\n]").expect("invalid separator regex"));

/// Parse free-form user input into a set of vehicle type identifiers.
///
/// Tokens are separated by commas, semicolons or line breaks and trimmed.
/// Tokens that are not plain non-negative integers are dropped. Never fails.
pub fn parse_identifier_list(raw: &str) -> BTreeSet<VehicleTypeId> {
    TOKEN_SEPARATOR
        .split(raw)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<VehicleTypeId>().ok())
        .collect()
}
