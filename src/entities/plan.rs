use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ChargingStation, Coordinates, EvModel, Route};
use crate::error::{invalid_input_error, Error};

pub const AVERAGE_SPEED_KMH: f64 = 50.0;
pub const LOW_BATTERY_THRESHOLD: f64 = 0.25;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatteryEstimate {
    pub starting_charge: f64,
    /// May go negative when the route exceeds the remaining range.
    pub charge_at_destination: f64,
    pub energy_kwh: f64,
    pub needs_charging: bool,
    pub low_battery_at_km: Option<f64>,
    pub low_battery_point: Option<Coordinates>,
}

/// Accepts a state of charge in (0, 1].
pub fn validate_starting_charge(starting_charge: f64) -> Result<f64, Error> {
    if !(starting_charge > 0.0 && starting_charge <= 1.0) {
        return Err(invalid_input_error());
    }

    Ok(starting_charge)
}

impl BatteryEstimate {
    pub fn new(route: &Route, vehicle: &EvModel, starting_charge: f64) -> Result<Self, Error> {
        let starting_charge = validate_starting_charge(starting_charge)?;
        let charge_at_destination = starting_charge - route.distance_km / vehicle.range_km;
        let needs_charging = charge_at_destination < LOW_BATTERY_THRESHOLD;

        let low_battery_at_km = if needs_charging {
            let km = ((starting_charge - LOW_BATTERY_THRESHOLD) * vehicle.range_km).max(0.0);
            Some(km.min(route.distance_km))
        } else {
            None
        };

        Ok(Self {
            starting_charge,
            charge_at_destination,
            energy_kwh: route.distance_km * vehicle.consumption_kwh_per_km(),
            needs_charging,
            low_battery_at_km,
            low_battery_point: low_battery_at_km.and_then(|km| route.point_at_km(km)),
        })
    }
}

pub fn estimate_travel_hours(distance_km: f64) -> f64 {
    distance_km / AVERAGE_SPEED_KMH
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoutePlan {
    pub route: Route,
    pub vehicle: EvModel,
    pub battery: BatteryEstimate,
    pub stations: Vec<ChargingStation>,
    pub estimated_duration_hours: f64,
    pub departure_time: DateTime<Utc>,
    pub estimated_arrival_time: DateTime<Utc>,
}

impl RoutePlan {
    pub fn new(
        route: Route,
        vehicle: EvModel,
        battery: BatteryEstimate,
        stations: Vec<ChargingStation>,
        departure_time: DateTime<Utc>,
    ) -> Self {
        let travel = Duration::seconds((route.duration_hours * 3600.0).round() as i64);

        Self {
            estimated_duration_hours: estimate_travel_hours(route.distance_km),
            estimated_arrival_time: departure_time + travel,
            departure_time,
            route,
            vehicle,
            battery,
            stations,
        }
    }
}

#[cfg(test)]
fn route_of(distance_km: f64) -> Route {
    use crate::entities::Location;

    let path = vec![Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 3.0)];
    Route::new(
        Location::new(path[0], "A".into()),
        Location::new(path[1], "B".into()),
        path,
        distance_km,
        distance_km / 80.0,
    )
}

#[test]
fn battery_within_range_test() {
    let vehicle = crate::entities::catalog().remove(0);
    let estimate = BatteryEstimate::new(&route_of(100.0), &vehicle, 1.0).unwrap();

    assert!((estimate.charge_at_destination - 2.0 / 3.0).abs() < 1e-9);
    assert!(!estimate.needs_charging);
    assert!(estimate.low_battery_at_km.is_none());
    assert!(estimate.low_battery_point.is_none());
    assert!((estimate.energy_kwh - 100.0 * 50.0 / 300.0).abs() < 1e-9);
}

#[test]
fn battery_needs_charging_test() {
    let vehicle = crate::entities::catalog().remove(0);
    let route = route_of(280.0);
    let estimate = BatteryEstimate::new(&route, &vehicle, 1.0).unwrap();

    assert!(estimate.needs_charging);
    assert_eq!(estimate.low_battery_at_km, Some(225.0));

    let point = estimate.low_battery_point.unwrap();
    assert!((point.longitude - 3.0 * 225.0 / 280.0).abs() < 1e-6);
}

#[test]
fn battery_already_low_test() {
    let vehicle = crate::entities::catalog().remove(0);
    let estimate = BatteryEstimate::new(&route_of(50.0), &vehicle, 0.2).unwrap();

    assert!(estimate.needs_charging);
    assert_eq!(estimate.low_battery_at_km, Some(0.0));
}

#[test]
fn battery_invalid_charge_test() {
    let vehicle = crate::entities::catalog().remove(0);

    assert!(BatteryEstimate::new(&route_of(50.0), &vehicle, 0.0).is_err());
    assert!(BatteryEstimate::new(&route_of(50.0), &vehicle, 1.5).is_err());
    assert!(BatteryEstimate::new(&route_of(50.0), &vehicle, f64::NAN).is_err());
}

#[test]
fn route_plan_times_test() {
    let vehicle = crate::entities::catalog().remove(0);
    let route = route_of(160.0);
    let battery = BatteryEstimate::new(&route, &vehicle, 1.0).unwrap();
    let departure = Utc::now();

    let plan = RoutePlan::new(route, vehicle, battery, vec![], departure);

    assert!((plan.estimated_duration_hours - 3.2).abs() < 1e-9);
    assert_eq!(plan.estimated_arrival_time - departure, Duration::hours(2));
}
