use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{LocationSource, Route};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    origin: LocationSource,
    destination: LocationSource,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Route>, Error> {
    let route = api.create_route(params.origin, params.destination).await?;

    Ok(route.into())
}
