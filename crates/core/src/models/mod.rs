//! Shared domain models.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a vehicle within one inventory fetch.
pub type VehicleId = u64;

/// Identifier of a vehicle category in the type catalog.
pub type VehicleTypeId = u32;

/// Category identifiers flagged as trailer equipment.
pub type TrailerIdSet = HashSet<VehicleTypeId>;

/// A single vehicle as reported by the fleet inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Vehicle identifier, unique within a fetch.
    pub id: VehicleId,
    /// Display caption chosen by the player. Missing or null captions decode as empty text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub caption: String,
    /// Category identifier, a key into the type catalog.
    pub vehicle_type: VehicleTypeId,
    /// Crew currently assigned. `None` when the inventory omits it or reports null.
    #[serde(default)]
    pub assigned_personnel_count: Option<u32>,
}

impl VehicleRecord {
    /// True when no personnel is assigned to the vehicle.
    pub fn is_unassigned(&self) -> bool {
        self.assigned_personnel_count.unwrap_or(0) == 0
    }

    /// Path of the page where personnel can be assigned to this vehicle.
    pub fn assignment_path(&self) -> String {
        format!("/vehicles/{}/zuweisung", self.id)
    }

    /// Returns a user-facing label combining caption and identifier.
    pub fn display_name(&self) -> String {
        format!("{} (ID: {})", self.caption, self.id)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
