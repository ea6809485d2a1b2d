mod location;
mod plan;
mod route;
mod station;
mod vehicle;

pub use location::{Coordinates, Location, LocationSource};
pub use plan::{
    estimate_travel_hours, validate_starting_charge, BatteryEstimate, RoutePlan,
    AVERAGE_SPEED_KMH, LOW_BATTERY_THRESHOLD,
};
pub use route::Route;
pub use station::ChargingStation;
pub use vehicle::{catalog, EvModel, DEFAULT_EV_RANGE_KM, DEFAULT_VEHICLE_ID};
