//! Nominatim geocoding.
//!
//! Nominatim's usage policy allows at most one request per second and asks
//! for an identifying User-Agent; both are enforced here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{check_status, http_client, Geocoder};
use crate::{
    config::Config,
    entities::{Coordinates, Location},
    error::{address_not_found_error, invalid_input_error, upstream_error, Error},
};

const MIN_REQUEST_SPACING: Duration = Duration::from_millis(1100);

#[derive(Clone, Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.nominatim_url.clone(),
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < MIN_REQUEST_SPACING {
                let wait = MIN_REQUEST_SPACING - elapsed;
                tracing::debug!(?wait, "throttling geocoding request");
                tokio::time::sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Location, Error> {
        let address = address.trim();
        if address.is_empty() {
            return Err(invalid_input_error());
        }

        self.throttle().await;

        let res = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;

        check_status(&res)?;

        let results: Vec<SearchResult> = res.json().await?;
        let result = results
            .into_iter()
            .next()
            .ok_or_else(|| address_not_found_error(address))?;

        let coordinates = parse_coordinates(&result)?;
        let description = result.display_name.unwrap_or_else(|| address.to_string());

        tracing::debug!(?coordinates, "geocoded address");

        Ok(Location::new(coordinates, description))
    }

    #[tracing::instrument(skip(self))]
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, Error> {
        self.throttle().await;

        let res = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("format", "jsonv2".to_string()),
            ])
            .send()
            .await?;

        check_status(&res)?;

        // an unmatched point comes back as {"error": "Unable to geocode"}
        let body: serde_json::Value = res.json().await?;
        let name = body
            .get("display_name")
            .and_then(|name| name.as_str())
            .map(String::from)
            .unwrap_or_else(|| coordinates.into());

        Ok(name)
    }
}

fn parse_coordinates(result: &SearchResult) -> Result<Coordinates, Error> {
    let latitude: f64 = result.lat.parse().map_err(|_| upstream_error())?;
    let longitude: f64 = result.lon.parse().map_err(|_| upstream_error())?;

    Coordinates::new(latitude, longitude)
        .validate()
        .map_err(|_| upstream_error())
}

#[test]
fn parse_search_result_test() {
    let json = r#"[{"lat": "52.5170365", "lon": "13.3888599", "display_name": "Berlin, Deutschland"}]"#;
    let results: Vec<SearchResult> = serde_json::from_str(json).unwrap();

    let coordinates = parse_coordinates(&results[0]).unwrap();
    assert_eq!(coordinates, Coordinates::new(52.5170365, 13.3888599));
}

#[test]
fn parse_bad_search_result_test() {
    let result = SearchResult {
        lat: "north".into(),
        lon: "13.0".into(),
        display_name: None,
    };
    assert_eq!(parse_coordinates(&result).unwrap_err().code, 4);
}
