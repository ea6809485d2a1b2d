use axum::extract::{Extension, Json, Path};

use crate::api::DynAPI;
use crate::entities::EvModel;
use crate::error::Error;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<EvModel>>, Error> {
    let vehicles = api.list_vehicles().await?;

    Ok(vehicles.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<String>,
) -> Result<Json<EvModel>, Error> {
    let vehicle = api.find_vehicle(&id).await?;

    Ok(vehicle.into())
}
