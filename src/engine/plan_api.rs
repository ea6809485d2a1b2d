use super::Engine;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    api::{PlanAPI, PlanParams, RouteAPI, StationAPI, VehicleAPI},
    entities::{validate_starting_charge, BatteryEstimate, RoutePlan, DEFAULT_VEHICLE_ID},
    error::Error,
};

#[async_trait]
impl PlanAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn plan_trip(&self, params: PlanParams) -> Result<RoutePlan, Error> {
        let vehicle_id = params.vehicle_id.as_deref().unwrap_or(DEFAULT_VEHICLE_ID);
        let vehicle = self.find_vehicle(vehicle_id).await?;
        let starting_charge = validate_starting_charge(params.starting_charge.unwrap_or(1.0))?;

        let departure_time = Utc::now();
        let route = self.create_route(params.origin, params.destination).await?;
        let battery = BatteryEstimate::new(&route, &vehicle, starting_charge)?;

        let stations = match self.find_stations_along(&route).await {
            Ok(stations) => stations,
            // the route alone is still worth showing
            Err(err) if !battery.needs_charging => {
                tracing::warn!(%err, "charging station lookup failed");
                vec![]
            }
            Err(err) => return Err(err),
        };

        tracing::info!(
            route = %route.id,
            vehicle = %vehicle.id,
            needs_charging = battery.needs_charging,
            stations = stations.len(),
            "trip planned"
        );

        Ok(RoutePlan::new(
            route,
            vehicle,
            battery,
            stations,
            departure_time,
        ))
    }
}

#[test]
fn plan_trip_test() {
    use crate::entities::LocationSource;
    use tokio_test::block_on;

    let engine = super::fakes::engine();

    let plan = block_on(engine.plan_trip(PlanParams {
        origin: LocationSource::Address("Berlin".into()),
        destination: LocationSource::Address("Potsdam".into()),
        vehicle_id: None,
        starting_charge: None,
    }))
    .unwrap();

    assert_eq!(plan.vehicle.id, DEFAULT_VEHICLE_ID);
    assert!(!plan.battery.needs_charging);
    assert!(!plan.stations.is_empty());
    assert!(plan.estimated_arrival_time > plan.departure_time);
}

#[test]
fn plan_trip_needs_charging_test() {
    use crate::entities::LocationSource;
    use tokio_test::block_on;

    let engine = super::fakes::engine();

    let plan = block_on(engine.plan_trip(PlanParams {
        origin: LocationSource::Address("Berlin".into()),
        destination: LocationSource::Address("Munich".into()),
        vehicle_id: Some("nissan-leaf".into()),
        starting_charge: Some(0.9),
    }))
    .unwrap();

    assert!(plan.battery.needs_charging);
    let low_at = plan.battery.low_battery_at_km.unwrap();
    assert!((low_at - 0.65 * 270.0).abs() < 1e-9);
    assert!(plan.battery.low_battery_point.is_some());
}

#[test]
fn plan_trip_rejects_input_test() {
    use crate::entities::LocationSource;
    use tokio_test::block_on;

    let engine = super::fakes::engine();

    let err = block_on(engine.plan_trip(PlanParams {
        origin: LocationSource::Address("Berlin".into()),
        destination: LocationSource::Address("Munich".into()),
        vehicle_id: Some("delorean".into()),
        starting_charge: None,
    }))
    .unwrap_err();
    assert_eq!(err.code, 104);
}

#[test]
fn plan_trip_rejects_charge_before_routing_test() {
    use crate::entities::LocationSource;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tokio_test::block_on;

    let router = Arc::new(super::fakes::FakeRouter::default());
    let engine = super::fakes::engine_with(router.clone(), Arc::default());

    for charge in [2.0, 0.0, -0.5, f64::NAN] {
        let err = block_on(engine.plan_trip(PlanParams {
            origin: LocationSource::Address("Berlin".into()),
            destination: LocationSource::Address("Munich".into()),
            vehicle_id: None,
            starting_charge: Some(charge),
        }))
        .unwrap_err();
        assert_eq!(err.code, 101);
    }

    assert_eq!(router.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn plan_trip_station_lookup_failure_test() {
    use crate::entities::LocationSource;
    use std::sync::Arc;
    use tokio_test::block_on;

    let finder = Arc::new(super::fakes::FakeStationFinder::failing());
    let engine = super::fakes::engine_with(Arc::default(), finder);

    // enough charge: the plan comes back without stations
    let plan = block_on(engine.plan_trip(PlanParams {
        origin: LocationSource::Address("Berlin".into()),
        destination: LocationSource::Address("Potsdam".into()),
        vehicle_id: None,
        starting_charge: None,
    }))
    .unwrap();
    assert!(!plan.battery.needs_charging);
    assert!(plan.stations.is_empty());

    // charging needed: the lookup failure is the answer
    let err = block_on(engine.plan_trip(PlanParams {
        origin: LocationSource::Address("Berlin".into()),
        destination: LocationSource::Address("Munich".into()),
        vehicle_id: Some("nissan-leaf".into()),
        starting_charge: Some(0.9),
    }))
    .unwrap_err();
    assert_eq!(err.code, 4);
}
