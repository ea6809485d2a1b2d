mod location_api;
mod plan_api;
mod route_api;
mod station_api;
mod vehicle_api;

#[cfg(test)]
mod fakes;

use std::sync::Arc;

use crate::{
    api::API,
    config::Config,
    entities::{catalog, EvModel},
    error::Error,
    external::{Geocoder, NominatimClient, OsrmClient, OverpassClient, Router, StationFinder},
};

pub type DynGeocoder = Arc<dyn Geocoder + Send + Sync>;
pub type DynRouter = Arc<dyn Router + Send + Sync>;
pub type DynStationFinder = Arc<dyn StationFinder + Send + Sync>;

/// Request orchestration over the geocoding, routing and station services.
///
/// Holds no per-request state; every call works only on its own arguments.
pub struct Engine {
    geocoder: DynGeocoder,
    router: DynRouter,
    station_finder: DynStationFinder,
    vehicles: Vec<EvModel>,
    station_radius_m: f64,
    station_sample_interval_km: f64,
    max_stations: usize,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config) -> Result<Self, Error> {
        let geocoder = Arc::new(NominatimClient::new(config)?);
        let router = Arc::new(OsrmClient::new(config)?);
        let station_finder = Arc::new(OverpassClient::new(config)?);

        tracing::info!(
            nominatim = %config.nominatim_url,
            osrm = %config.osrm_url,
            overpass = %config.overpass_url,
            "engine ready"
        );

        Ok(Self::with_services(config, geocoder, router, station_finder))
    }

    pub fn with_services(
        config: &Config,
        geocoder: DynGeocoder,
        router: DynRouter,
        station_finder: DynStationFinder,
    ) -> Self {
        Self {
            geocoder,
            router,
            station_finder,
            vehicles: catalog(),
            station_radius_m: config.station_radius_m,
            station_sample_interval_km: config.station_sample_interval_km,
            max_stations: config.max_stations,
        }
    }
}

impl API for Engine {}
