//! Selection of unassigned vehicles.

use serde::{Deserialize, Serialize};

use crate::{
    filter::FilterConfig,
    models::{TrailerIdSet, VehicleRecord},
};

/// Vehicles that need personnel, in inventory order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredResult {
    vehicles: Vec<VehicleRecord>,
}

impl FilteredResult {
    /// Matching vehicles in inventory order.
    pub fn vehicles(&self) -> &[VehicleRecord] {
        &self.vehicles
    }

    /// Number of matching vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// True when no vehicle matched.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Comma separated vehicle identifiers.
    pub fn joined_ids(&self) -> String {
        self.vehicles
            .iter()
            .map(|vehicle| vehicle.id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Consume the result and return the vehicles.
    pub fn into_vehicles(self) -> Vec<VehicleRecord> {
        self.vehicles
    }
}

/// Select the vehicles without personnel that pass the configured type filter.
///
/// Trailers are always dropped, whatever the filter mode. Input order is kept.
pub fn filter_fleet(
    vehicles: &[VehicleRecord],
    trailer_ids: &TrailerIdSet,
    config: &FilterConfig,
) -> FilteredResult {
    FilteredResult {
        vehicles: vehicles
            .iter()
            .filter(|vehicle| {
                vehicle.is_unassigned()
                    && !trailer_ids.contains(&vehicle.vehicle_type)
                    && config.admits(vehicle.vehicle_type)
            })
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMode;

    fn vehicle(id: u64, vehicle_type: u32, assigned: Option<u32>) -> VehicleRecord {
        VehicleRecord {
            id,
            caption: format!("Vehicle {id}"),
            vehicle_type,
            assigned_personnel_count: assigned,
        }
    }

    fn sample_inventory() -> Vec<VehicleRecord> {
        vec![
            vehicle(1, 10, Some(0)),
            vehicle(2, 20, Some(2)),
            vehicle(3, 10, None),
        ]
    }

    fn ids(result: &FilteredResult) -> Vec<u64> {
        result.vehicles().iter().map(|v| v.id).collect()
    }

    #[test]
    fn blacklisted_category_hides_everything() {
        let result = filter_fleet(
            &sample_inventory(),
            &TrailerIdSet::from([20]),
            &FilterConfig::new([10], FilterMode::Exclude),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn whitelisted_category_keeps_unassigned() {
        let result = filter_fleet(
            &sample_inventory(),
            &TrailerIdSet::from([20]),
            &FilterConfig::new([10], FilterMode::IncludeOnly),
        );
        assert_eq!(ids(&result), vec![1, 3]);
        assert_eq!(result.joined_ids(), "1,3");
    }

    #[test]
    fn assigned_vehicles_never_listed() {
        let inventory = vec![
            vehicle(1, 5, Some(1)),
            vehicle(2, 6, Some(9)),
            vehicle(3, 5, Some(0)),
        ];
        for config in [
            FilterConfig::default(),
            FilterConfig::new([5, 6], FilterMode::IncludeOnly),
            FilterConfig::new([7], FilterMode::Exclude),
        ] {
            let result = filter_fleet(&inventory, &TrailerIdSet::new(), &config);
            assert!(result.vehicles().iter().all(|v| v.is_unassigned()));
            assert!(!ids(&result).contains(&1));
            assert!(!ids(&result).contains(&2));
        }
    }

    #[test]
    fn trailers_dropped_even_when_whitelisted() {
        let inventory = vec![vehicle(1, 43, None), vehicle(2, 44, None)];
        let result = filter_fleet(
            &inventory,
            &TrailerIdSet::from([43]),
            &FilterConfig::new([43, 44], FilterMode::IncludeOnly),
        );
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn empty_exclude_list_is_identity_over_candidates() {
        let inventory = vec![
            vehicle(5, 1, None),
            vehicle(4, 2, Some(0)),
            vehicle(3, 3, Some(1)),
            vehicle(2, 9, None),
            vehicle(1, 1, None),
        ];
        let result = filter_fleet(
            &inventory,
            &TrailerIdSet::from([9]),
            &FilterConfig::new([], FilterMode::Exclude),
        );
        assert_eq!(ids(&result), vec![5, 4, 1]);
    }

    #[test]
    fn empty_include_list_matches_nothing() {
        let result = filter_fleet(
            &sample_inventory(),
            &TrailerIdSet::new(),
            &FilterConfig::new([], FilterMode::IncludeOnly),
        );
        assert!(result.is_empty());
        assert_eq!(result.joined_ids(), "");
    }

    #[test]
    fn input_is_left_untouched() {
        let inventory = sample_inventory();
        let before = inventory.clone();
        let _ = filter_fleet(&inventory, &TrailerIdSet::new(), &FilterConfig::default());
        assert_eq!(inventory, before);
    }
}
