use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    models::{TrailerIdSet, VehicleTypeId},
};

use super::{get_json, Fetched};

/// Reads the vehicle type catalog and extracts the trailer categories.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    client: Client,
    url: String,
}

impl TypeCatalog {
    /// Build a catalog reader for the given endpoint.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch the catalog and return the trailer category identifiers.
    ///
    /// Never fails: any read or decode error yields an empty set marked as degraded,
    /// so trailers are simply not excluded for this session.
    pub async fn fetch_trailer_ids(&self) -> Fetched<TrailerIdSet> {
        match self.try_fetch().await {
            Ok(ids) => {
                debug!(url = %self.url, trailers = ids.len(), "Type catalog loaded");
                Fetched::Ready(ids)
            }
            Err(err) => {
                warn!("Type catalog unavailable, trailers will not be excluded: {err}");
                Fetched::Degraded {
                    value: TrailerIdSet::new(),
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn try_fetch(&self) -> Result<TrailerIdSet, FetchError> {
        let payload: Value = get_json(&self.client, &self.url).await?;
        parse_trailer_ids(&payload).ok_or_else(|| FetchError::Shape {
            url: self.url.clone(),
            detail: "expected an object keyed by vehicle type id".to_string(),
        })
    }
}

/// Extract trailer category identifiers from a catalog payload.
///
/// Returns `None` when the payload is not an object. Keys that are not category
/// identifiers are skipped, as are entries without a boolean `isTrailer` flag.
pub fn parse_trailer_ids(payload: &Value) -> Option<TrailerIdSet> {
    let entries = payload.as_object()?;
    Some(
        entries
            .iter()
            .filter(|(_, entry)| {
                entry
                    .get("isTrailer")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .filter_map(|(key, _)| key.trim().parse::<VehicleTypeId>().ok())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{serve, Route};
    use serde_json::json;

    #[test]
    fn selects_flagged_categories() {
        let payload = json!({
            "0": {"caption": "LF 20", "isTrailer": false},
            "43": {"caption": "BRmG R", "isTrailer": true},
            "69": {"caption": "Bt-Kombi", "isTrailer": true},
            "70": {"caption": "MTW-TZ"},
            "abc": {"isTrailer": true},
            "71": {"isTrailer": "yes"}
        });

        let ids = parse_trailer_ids(&payload).expect("object payload");
        assert_eq!(ids, TrailerIdSet::from([43, 69]));
    }

    #[test]
    fn rejects_non_object_payload() {
        assert!(parse_trailer_ids(&json!([1, 2, 3])).is_none());
        assert!(parse_trailer_ids(&json!(null)).is_none());
    }

    #[tokio::test]
    async fn fetch_reads_catalog_from_endpoint() -> anyhow::Result<()> {
        let base = serve(vec![Route::new(
            "/de_DE/vehicles",
            200,
            r#"{"1": {"isTrailer": false}, "2": {"isTrailer": true}}"#,
        )])
        .await?;

        let catalog = TypeCatalog::new(Client::new(), format!("{base}/de_DE/vehicles"));
        let outcome = catalog.fetch_trailer_ids().await;
        assert_eq!(outcome, Fetched::Ready(TrailerIdSet::from([2])));
        Ok(())
    }

    #[tokio::test]
    async fn fetch_degrades_to_empty_set() -> anyhow::Result<()> {
        let base = serve(vec![
            Route::new("/error", 500, "boom"),
            Route::new("/list", 200, "[1, 2]"),
        ])
        .await?;

        for path in ["/error", "/list", "/missing"] {
            let catalog = TypeCatalog::new(Client::new(), format!("{base}{path}"));
            let outcome = catalog.fetch_trailer_ids().await;
            assert!(outcome.is_degraded(), "{path} should degrade");
            assert!(outcome.value().is_empty());
        }
        Ok(())
    }
}
