use reqwest::Client;
use tracing::debug;

use crate::{error::FetchError, models::VehicleRecord};

use super::get_json;

/// Reads the player's fleet inventory.
#[derive(Debug, Clone)]
pub struct FleetInventory {
    client: Client,
    url: String,
}

impl FleetInventory {
    /// Build an inventory reader for the given endpoint.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch every vehicle in inventory order.
    ///
    /// A payload that does not decode as a list of vehicles fails as a whole;
    /// no partial list is ever returned.
    pub async fn fetch(&self) -> Result<Vec<VehicleRecord>, FetchError> {
        let vehicles: Vec<VehicleRecord> = get_json(&self.client, &self.url).await?;
        debug!(url = %self.url, total = vehicles.len(), "Fleet inventory loaded");
        Ok(vehicles)
    }
}
