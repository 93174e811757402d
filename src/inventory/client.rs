// client.rs
use crate::config::InventoryConfig;
use crate::domain::Listing;
use crate::errors::TrackerError;
use crate::inventory::models::{InventoryQuery, Vehicle};
use crate::inventory::{InventoryError, InventorySource};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:135.0) Gecko/20100101 Firefox/135.0";

const MAX_ATTEMPTS: u64 = 3;
const MAX_BACKOFF_SECS: u64 = 10;
const JITTER_MAX_SECS: u64 = 2;

pub struct InventoryClient {
    client: Client,
    endpoint: String,
    query: InventoryQuery,
    link_base: String,
}

impl InventoryClient {
    pub fn new(config: InventoryConfig) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| InventoryError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            query: config.query,
            link_base: config.link_base,
        })
    }

    /// Fetches the raw inventory, retrying transient failures with backoff.
    pub fn fetch_vehicles(&self) -> Result<Vec<Vehicle>, InventoryError> {
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let start = std::time::Instant::now();

            match self.try_fetch_vehicles() {
                Ok(vehicles) => {
                    log::debug!(
                        "Inventory fetch attempt {attempt} succeeded in {:?}",
                        start.elapsed()
                    );
                    return Ok(vehicles);
                }
                Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                    log::warn!(
                        "Inventory fetch attempt {attempt} failed in {:?}: {e}",
                        start.elapsed()
                    );
                    last_err = Some(e);

                    let base = std::cmp::min(2 * attempt, MAX_BACKOFF_SECS);
                    let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
                    std::thread::sleep(Duration::from_secs(base + jitter));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| InventoryError::Network("retry loop exhausted".into())))
    }

    fn try_fetch_vehicles(&self) -> Result<Vec<Vehicle>, InventoryError> {
        let query = self
            .query
            .to_param()
            .map_err(|e| InventoryError::JsonParse(e.to_string()))?;

        let resp = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .query(&[("query", query)])
            .send()
            .map_err(|e| InventoryError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| InventoryError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(InventoryError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_results(&text)
    }
}

impl InventorySource for InventoryClient {
    fn fetch_listings(&self) -> Result<Vec<Listing>, TrackerError> {
        let vehicles = self.fetch_vehicles()?;
        log::info!("Fetched {} vehicles from inventory", vehicles.len());

        vehicles
            .iter()
            .map(|v| Listing::from_vehicle(v, &self.link_base))
            .collect()
    }
}

/// Extracts the vehicle records from an inventory response body.
///
/// `results` is normally an array. When nothing matches exactly the endpoint
/// answers with an object holding `exact` and `approximate` arrays instead;
/// only the exact matches are taken.
pub fn parse_results(body: &str) -> Result<Vec<Vehicle>, InventoryError> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| InventoryError::JsonParse(e.to_string()))?;

    let results = match &data["results"] {
        Value::Array(items) => items.clone(),
        Value::Object(obj) => match obj.get("exact") {
            Some(Value::Array(items)) => items.clone(),
            Some(_) | None => Vec::new(),
        },
        Value::Null => {
            return Err(InventoryError::UnexpectedShape("results missing".to_string()));
        }
        other => {
            return Err(InventoryError::UnexpectedShape(format!(
                "results is neither array nor object: {other}"
            )));
        }
    };

    results
        .into_iter()
        .map(serde_json::from_value::<Vehicle>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| InventoryError::JsonParse(e.to_string()))
}
