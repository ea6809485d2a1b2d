use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{LocationAPI, RouteAPI},
    entities::{LocationSource, Route},
    error::Error,
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_route(
        &self,
        origin: LocationSource,
        destination: LocationSource,
    ) -> Result<Route, Error> {
        let (origin, destination) = futures::try_join!(
            self.resolve_location(origin),
            self.resolve_location(destination)
        )?;

        if origin.coordinates == destination.coordinates {
            tracing::info!("origin and destination coincide");
            return Ok(Route::stationary(origin, destination));
        }

        let geometry = self
            .router
            .route(origin.coordinates, destination.coordinates)
            .await?;

        let mut path = geometry.path;
        if path.len() < 2 {
            path = vec![origin.coordinates, destination.coordinates];
        }

        let route = Route::new(
            origin,
            destination,
            path,
            geometry.distance_m / 1000.0,
            geometry.duration_s / 3600.0,
        );

        tracing::info!(
            route = %route.id,
            distance_km = route.distance_km,
            points = route.path.len(),
            "route created"
        );

        Ok(route)
    }
}

#[test]
fn create_route_test() {
    use tokio_test::block_on;

    let engine = super::fakes::engine();

    let route = block_on(engine.create_route(
        LocationSource::Address("Berlin".into()),
        LocationSource::Address("Munich".into()),
    ))
    .unwrap();

    assert_eq!(route.origin.description, "Berlin, Deutschland");
    assert_eq!(route.destination.description, "München, Bayern");
    assert_eq!(route.path.len(), 11);
    assert!(route.distance_km > 590.0 && route.distance_km < 620.0);
    assert!((route.duration_hours - route.distance_km / 80.0).abs() < 1e-9);
}

#[test]
fn create_route_same_point_test() {
    use crate::entities::Coordinates;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tokio_test::block_on;

    let router = Arc::new(super::fakes::FakeRouter::default());
    let engine = super::fakes::engine_with(router.clone(), Arc::default());

    let route = block_on(engine.create_route(
        LocationSource::Address("Berlin".into()),
        LocationSource::Coordinates(Coordinates::new(52.52, 13.405)),
    ))
    .unwrap();

    assert_eq!(route.distance_km, 0.0);
    assert_eq!(router.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn create_route_failures_test() {
    use tokio_test::block_on;

    let engine = super::fakes::engine();

    let err = block_on(engine.create_route(
        LocationSource::Address("Berlin".into()),
        LocationSource::Address("Nowhere".into()),
    ))
    .unwrap_err();
    assert_eq!(err.code, 102);

    let err = block_on(engine.create_route(
        LocationSource::Address("Berlin".into()),
        LocationSource::Address("Sydney".into()),
    ))
    .unwrap_err();
    assert_eq!(err.code, 103);
}
