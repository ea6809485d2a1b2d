use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{ChargingStation, Coordinates};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct FindParams {
    latitude: f64,
    longitude: f64,
    radius_m: Option<f64>,
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<FindParams>,
) -> Result<Json<Vec<ChargingStation>>, Error> {
    let coordinates = Coordinates::new(params.latitude, params.longitude);
    let stations = api.find_stations(coordinates, params.radius_m).await?;

    Ok(stations.into())
}
