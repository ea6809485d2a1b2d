use super::Engine;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::{
    api::StationAPI,
    entities::{ChargingStation, Coordinates, Route},
    error::{invalid_input_error, Error},
    external::StationNode,
};

#[async_trait]
impl StationAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_stations(
        &self,
        coordinates: Coordinates,
        radius_m: Option<f64>,
    ) -> Result<Vec<ChargingStation>, Error> {
        let coordinates = coordinates.validate()?;
        let radius_m = radius_m.unwrap_or(self.station_radius_m);
        if !(radius_m > 0.0) {
            return Err(invalid_input_error());
        }

        let nodes = self
            .station_finder
            .stations_near(&[coordinates], radius_m)
            .await?;

        let mut stations: Vec<ChargingStation> = dedup(nodes)
            .map(|mut station| {
                station.locate_from(&coordinates);
                station
            })
            .collect();

        stations.sort_by(|a, b| a.distance_from_route_km.total_cmp(&b.distance_from_route_km));
        stations.truncate(self.max_stations);

        Ok(stations)
    }

    #[tracing::instrument(skip_all, fields(route = %route.id))]
    async fn find_stations_along(&self, route: &Route) -> Result<Vec<ChargingStation>, Error> {
        let samples = route.sample(self.station_sample_interval_km);
        if samples.is_empty() {
            return Ok(vec![]);
        }

        let nodes = self
            .station_finder
            .stations_near(&samples, self.station_radius_m)
            .await?;

        let cumulative = route.cumulative_km();
        let mut stations: Vec<ChargingStation> = dedup(nodes)
            .map(|mut station| {
                station.locate_on(route, &cumulative);
                station
            })
            .collect();

        stations.sort_by(|a, b| {
            a.distance_along_route_km
                .total_cmp(&b.distance_along_route_km)
                .then(a.distance_from_route_km.total_cmp(&b.distance_from_route_km))
        });
        stations.truncate(self.max_stations);

        tracing::info!(count = stations.len(), "charging stations along route");

        Ok(stations)
    }
}

fn dedup(nodes: Vec<StationNode>) -> impl Iterator<Item = ChargingStation> {
    let mut seen = HashSet::new();

    nodes
        .into_iter()
        .filter(move |node| seen.insert(node.id))
        .map(|node| {
            ChargingStation::new(
                node.id,
                node.name,
                node.coordinates,
                node.operator,
                node.capacity,
                node.socket_types,
            )
        })
}

#[test]
fn find_stations_test() {
    use tokio_test::block_on;

    let engine = super::fakes::engine();

    let stations = block_on(engine.find_stations(Coordinates::new(52.52, 13.405), None)).unwrap();
    assert_eq!(stations.len(), 1);
    assert!((stations[0].distance_from_route_km - 1.11).abs() < 0.05);

    let err = block_on(engine.find_stations(Coordinates::new(52.52, 13.405), Some(-1.0)))
        .unwrap_err();
    assert_eq!(err.code, 101);

    let err = block_on(engine.find_stations(Coordinates::new(0.0, 190.0), None)).unwrap_err();
    assert_eq!(err.code, 105);
}

#[test]
fn find_stations_along_test() {
    use crate::api::RouteAPI;
    use crate::entities::LocationSource;
    use std::sync::Arc;
    use tokio_test::block_on;

    let finder = Arc::new(super::fakes::FakeStationFinder::default());
    let engine = super::fakes::engine_with(Arc::default(), finder.clone());

    let route = block_on(engine.create_route(
        LocationSource::Address("Berlin".into()),
        LocationSource::Address("Munich".into()),
    ))
    .unwrap();

    let stations = block_on(engine.find_stations_along(&route)).unwrap();

    // capped by max_stations, unique, ordered along the route
    assert_eq!(stations.len(), 5);
    let ids: HashSet<i64> = stations.iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), 5);
    assert!(stations
        .windows(2)
        .all(|w| w[0].distance_along_route_km <= w[1].distance_along_route_km));
    assert_eq!(stations[0].distance_along_route_km, 0.0);

    let queries = finder.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].1, 5000.0);
    // ~50 km vertices, 50 km sample interval: every vertex is a sample
    assert_eq!(queries[0].0, 11);
}

#[test]
fn find_stations_stationary_route_test() {
    use crate::entities::Location;
    use tokio_test::block_on;

    let engine = super::fakes::engine();
    let here = Location::new(Coordinates::new(52.52, 13.405), "here".into());
    let route = Route::stationary(here.clone(), here);

    let stations = block_on(engine.find_stations_along(&route)).unwrap();
    assert_eq!(stations.len(), 1);
}
