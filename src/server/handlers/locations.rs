use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{Location, LocationSource};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct ResolveParams {
    source: LocationSource,
}

pub async fn resolve(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<ResolveParams>,
) -> Result<Json<Location>, Error> {
    let location = api.resolve_location(params.source).await?;

    Ok(location.into())
}
