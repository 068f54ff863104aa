#![warn(clippy::all, missing_docs)]

//! Core logic for fleetwatch.
//!
//! This crate reads the vehicle type catalog and the fleet inventory,
//! selects the vehicles that still need personnel, and persists the
//! user's vehicle type filter between runs.

pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod monitor;
pub mod resource;

#[cfg(test)]
mod testing;

pub use classify::{filter_fleet, FilteredResult};
pub use config::AppConfig;
pub use error::FetchError;
pub use filter::{
    parse_identifier_list, FilterConfig, FilterMode, FilterStore, JsonFileStore, KeyValueStore,
    MemoryStore,
};
pub use models::{TrailerIdSet, VehicleId, VehicleRecord, VehicleTypeId};
pub use monitor::{FleetMonitor, FleetSnapshot, RefreshOutcome};
pub use resource::{Fetched, FleetInventory, TypeCatalog};
