use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::Engine;
use crate::{
    config::Config,
    entities::{Coordinates, Location},
    error::{address_not_found_error, route_not_found_error, upstream_error, Error},
    external::{Geocoder, RouteGeometry, Router, StationFinder, StationNode},
};

pub struct FakeGeocoder;

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location, Error> {
        let (latitude, longitude, name) = match address {
            "Berlin" => (52.52, 13.405, "Berlin, Deutschland"),
            "Potsdam" => (52.3906, 13.0645, "Potsdam, Brandenburg"),
            "Munich" => (48.1351, 11.582, "München, Bayern"),
            "Sydney" => (-33.87, 151.21, "Sydney, Australia"),
            _ => return Err(address_not_found_error(address)),
        };

        Ok(Location::new(Coordinates::new(latitude, longitude), name.into()))
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, Error> {
        if coordinates.latitude < 0.0 {
            return Err(upstream_error());
        }

        Ok(format!("near {}, {}", coordinates.latitude, coordinates.longitude))
    }
}

/// Straight-line routes with a 20 % detour; nothing east of 100°E is reachable.
#[derive(Default)]
pub struct FakeRouter {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Router for FakeRouter {
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteGeometry, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if origin.longitude > 100.0 || destination.longitude > 100.0 {
            return Err(route_not_found_error());
        }

        let path = (0..=10)
            .map(|i| origin.lerp(&destination, i as f64 / 10.0))
            .collect();
        let distance_m = origin.haversine_km(&destination) * 1200.0;

        Ok(RouteGeometry {
            path,
            distance_m,
            duration_s: distance_m / 1000.0 / 80.0 * 3600.0,
        })
    }
}

/// Returns one station per queried point, each reported twice.
#[derive(Default)]
pub struct FakeStationFinder {
    pub queries: Mutex<Vec<(usize, f64)>>,
    pub unavailable: bool,
}

impl FakeStationFinder {
    /// A finder whose upstream is down.
    pub fn failing() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl StationFinder for FakeStationFinder {
    async fn stations_near(
        &self,
        points: &[Coordinates],
        radius_m: f64,
    ) -> Result<Vec<StationNode>, Error> {
        self.queries
            .lock()
            .map_err(|_| upstream_error())?
            .push((points.len(), radius_m));

        if self.unavailable {
            return Err(upstream_error());
        }

        let nodes: Vec<StationNode> = points
            .iter()
            .enumerate()
            .map(|(i, point)| StationNode {
                id: i as i64,
                name: format!("Station {}", i),
                coordinates: Coordinates::new(point.latitude + 0.01, point.longitude),
                operator: None,
                capacity: Some(2),
                socket_types: vec!["type2".into()],
            })
            .collect();

        Ok(nodes.iter().chain(nodes.iter()).cloned().rev().collect())
    }
}

pub fn config() -> Config {
    Config {
        station_sample_interval_km: 50.0,
        max_stations: 5,
        ..Config::default()
    }
}

pub fn engine() -> Engine {
    engine_with(Arc::new(FakeRouter::default()), Arc::new(FakeStationFinder::default()))
}

pub fn engine_with(router: Arc<FakeRouter>, station_finder: Arc<FakeStationFinder>) -> Engine {
    Engine::with_services(&config(), Arc::new(FakeGeocoder), router, station_finder)
}
