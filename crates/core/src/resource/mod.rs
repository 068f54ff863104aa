//! Remote resources: the vehicle type catalog and the fleet inventory.

/// Trailer lookup from the vehicle type catalog.
pub mod catalog;
/// Fleet inventory reads.
pub mod inventory;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::FetchError;

pub use catalog::{parse_trailer_ids, TypeCatalog};
pub use inventory::FleetInventory;

/// Result of a read that falls back to a usable value instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The resource was read successfully.
    Ready(T),
    /// The read failed; `value` is the fallback used in its place.
    Degraded {
        /// Fallback value.
        value: T,
        /// Why the fallback was used.
        reason: String,
    },
}

impl<T> Fetched<T> {
    /// Borrow the fetched or fallback value.
    pub fn value(&self) -> &T {
        match self {
            Fetched::Ready(value) | Fetched::Degraded { value, .. } => value,
        }
    }

    /// Consume the outcome and return the fetched or fallback value.
    pub fn into_value(self) -> T {
        match self {
            Fetched::Ready(value) | Fetched::Degraded { value, .. } => value,
        }
    }

    /// Diagnostic note when the fallback was used.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Fetched::Ready(_) => None,
            Fetched::Degraded { reason, .. } => Some(reason),
        }
    }

    /// True when the fallback was used.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetched::Degraded { .. })
    }
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
) -> Result<T, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
    serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}
