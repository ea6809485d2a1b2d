use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::{
    ChargingStation, Coordinates, EvModel, Location, LocationSource, Route, RoutePlan,
};
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanParams {
    pub origin: LocationSource,
    pub destination: LocationSource,
    pub vehicle_id: Option<String>,
    /// Fraction of a full battery at departure, defaults to 1.0.
    pub starting_charge: Option<f64>,
}

#[async_trait]
pub trait LocationAPI {
    async fn resolve_location(&self, source: LocationSource) -> Result<Location, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn create_route(
        &self,
        origin: LocationSource,
        destination: LocationSource,
    ) -> Result<Route, Error>;
}

#[async_trait]
pub trait StationAPI {
    async fn find_stations(
        &self,
        coordinates: Coordinates,
        radius_m: Option<f64>,
    ) -> Result<Vec<ChargingStation>, Error>;
    async fn find_stations_along(&self, route: &Route) -> Result<Vec<ChargingStation>, Error>;
}

#[async_trait]
pub trait VehicleAPI {
    async fn list_vehicles(&self) -> Result<Vec<EvModel>, Error>;
    async fn find_vehicle(&self, id: &str) -> Result<EvModel, Error>;
}

#[async_trait]
pub trait PlanAPI {
    async fn plan_trip(&self, params: PlanParams) -> Result<RoutePlan, Error>;
}

pub trait API: LocationAPI + RouteAPI + StationAPI + VehicleAPI + PlanAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
