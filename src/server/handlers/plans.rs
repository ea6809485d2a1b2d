use axum::extract::{Extension, Json};
use serde_json::Value;

use crate::api::{DynAPI, PlanParams};
use crate::entities::RoutePlan;
use crate::error::Error;
use crate::map::feature_collection;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<PlanParams>,
) -> Result<Json<RoutePlan>, Error> {
    let plan = api.plan_trip(params).await?;

    Ok(plan.into())
}

pub async fn geojson(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<PlanParams>,
) -> Result<Json<Value>, Error> {
    let plan = api.plan_trip(params).await?;

    Ok(feature_collection(&plan).into())
}
