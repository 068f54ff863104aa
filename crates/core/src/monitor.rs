//! Fetch-and-classify sessions and the filter configuration they use.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    classify::{filter_fleet, FilteredResult},
    config::AppConfig,
    error::FetchError,
    filter::{FilterConfig, FilterStore, KeyValueStore},
    models::{TrailerIdSet, VehicleRecord},
    resource::{FleetInventory, Fetched, TypeCatalog},
};

/// Data from one completed fetch.
#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    /// Inventory in fetch order.
    pub vehicles: Vec<VehicleRecord>,
    /// Trailer categories known for this session.
    pub trailer_ids: TrailerIdSet,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of a [`FleetMonitor::refresh`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh result. `catalog_warning` is set when trailers could not be resolved.
    Ready {
        /// Vehicles needing personnel.
        result: FilteredResult,
        /// Why trailers are not being excluded, if the catalog read failed.
        catalog_warning: Option<String>,
    },
    /// The inventory could not be read; no result is available.
    Unavailable {
        /// Why the inventory read failed.
        reason: String,
    },
    /// A newer refresh started before this one completed; its data was dropped.
    Superseded,
}

/// Owns the filter configuration and the latest fleet snapshot.
pub struct FleetMonitor<S> {
    catalog: TypeCatalog,
    inventory: FleetInventory,
    store: FilterStore<S>,
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    config: FilterConfig,
    generation: u64,
    snapshot: Option<FleetSnapshot>,
    result: Option<FilteredResult>,
}

impl<S: KeyValueStore> FleetMonitor<S> {
    /// Build a monitor for the endpoints in `config`, persisting filters to `store`.
    pub fn new(config: &AppConfig, store: S) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self::with_sources(
            TypeCatalog::new(client.clone(), config.catalog_url.clone()),
            FleetInventory::new(client, config.inventory_url()),
            store,
        ))
    }

    /// Build a monitor from explicit sources. Loads the persisted filter once.
    pub fn with_sources(catalog: TypeCatalog, inventory: FleetInventory, store: S) -> Self {
        let store = FilterStore::new(store);
        let config = store.load();
        info!(mode = %config.mode, types = config.type_ids.len(), "Filter configuration loaded");
        Self {
            catalog,
            inventory,
            store,
            inner: Arc::new(RwLock::new(Inner {
                config,
                generation: 0,
                snapshot: None,
                result: None,
            })),
        }
    }

    /// Current filter configuration.
    pub fn config(&self) -> FilterConfig {
        self.inner.read().config.clone()
    }

    /// Result of the latest completed refresh, if the inventory could be read.
    pub fn filtered_result(&self) -> Option<FilteredResult> {
        self.inner.read().result.clone()
    }

    /// Data behind the latest result.
    pub fn snapshot(&self) -> Option<FleetSnapshot> {
        self.inner.read().snapshot.clone()
    }

    /// Persist a new configuration and re-classify the current snapshot with it.
    ///
    /// The in-memory configuration only changes once the write succeeded.
    pub fn set_config(&self, config: FilterConfig) -> Result<Option<FilteredResult>> {
        self.store.save(&config)?;

        let mut inner = self.inner.write();
        inner.result = inner
            .snapshot
            .as_ref()
            .map(|snapshot| filter_fleet(&snapshot.vehicles, &snapshot.trailer_ids, &config));
        inner.config = config;
        Ok(inner.result.clone())
    }

    /// Fetch the catalog and inventory concurrently, then classify.
    pub async fn refresh(&self) -> RefreshOutcome {
        let generation = self.begin_refresh();
        let (trailers, vehicles) =
            tokio::join!(self.catalog.fetch_trailer_ids(), self.inventory.fetch());
        self.complete_refresh(generation, trailers, vehicles)
    }

    fn begin_refresh(&self) -> u64 {
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.generation
    }

    fn complete_refresh(
        &self,
        generation: u64,
        trailers: Fetched<TrailerIdSet>,
        vehicles: Result<Vec<VehicleRecord>, FetchError>,
    ) -> RefreshOutcome {
        let mut inner = self.inner.write();
        if inner.generation != generation {
            debug!(
                generation,
                latest = inner.generation,
                "Dropping superseded refresh"
            );
            return RefreshOutcome::Superseded;
        }

        let vehicles = match vehicles {
            Ok(vehicles) => vehicles,
            Err(err) => {
                warn!("Fleet inventory unavailable: {err}");
                inner.snapshot = None;
                inner.result = None;
                return RefreshOutcome::Unavailable {
                    reason: err.to_string(),
                };
            }
        };

        let catalog_warning = trailers.reason().map(str::to_string);
        let snapshot = FleetSnapshot {
            vehicles,
            trailer_ids: trailers.into_value(),
            fetched_at: Utc::now(),
        };
        let result = filter_fleet(&snapshot.vehicles, &snapshot.trailer_ids, &inner.config);
        info!(
            total = snapshot.vehicles.len(),
            unassigned = result.len(),
            degraded = catalog_warning.is_some(),
            "Fleet classified"
        );

        inner.snapshot = Some(snapshot);
        inner.result = Some(result.clone());
        RefreshOutcome::Ready {
            result,
            catalog_warning,
        }
    }
}
