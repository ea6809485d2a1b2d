//! Adapters for the hosted OpenStreetMap services the planner delegates to.

pub mod nominatim;
pub mod osrm;
pub mod overpass;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::{
    config::Config,
    entities::{Coordinates, Location},
    error::{invalid_input_error, upstream_error, Error},
};

pub use nominatim::NominatimClient;
pub use osrm::OsrmClient;
pub use overpass::OverpassClient;

#[async_trait]
pub trait Geocoder {
    async fn geocode(&self, address: &str) -> Result<Location, Error>;
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, Error>;
}

/// Driving route geometry as reported by the routing service.
#[derive(Clone, Debug)]
pub struct RouteGeometry {
    pub path: Vec<Coordinates>,
    pub distance_m: f64,
    pub duration_s: f64,
}

#[async_trait]
pub trait Router {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteGeometry, Error>;
}

/// Charging point as it comes out of the POI lookup, before it is placed on a route.
#[derive(Clone, Debug)]
pub struct StationNode {
    pub id: i64,
    pub name: String,
    pub coordinates: Coordinates,
    pub operator: Option<String>,
    pub capacity: Option<u32>,
    pub socket_types: Vec<String>,
}

#[async_trait]
pub trait StationFinder {
    async fn stations_near(
        &self,
        points: &[Coordinates],
        radius_m: f64,
    ) -> Result<Vec<StationNode>, Error>;
}

pub(crate) fn http_client(config: &Config) -> Result<Client, Error> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?;

    Ok(client)
}

pub(crate) fn check_status(res: &Response) -> Result<(), Error> {
    let status = res.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!(url = %res.url(), "upstream rate limit hit");
        return Err(upstream_error());
    } else if status.is_client_error() {
        tracing::warn!(%status, url = %res.url(), "upstream rejected request");
        return Err(invalid_input_error());
    } else if !status.is_success() {
        tracing::warn!(%status, url = %res.url(), "upstream failed");
        return Err(upstream_error());
    }

    Ok(())
}
