use axum::extract::{Extension, Query};
use axum::response::Html;
use serde::{Deserialize, Serialize};

use crate::api::{DynAPI, PlanParams};
use crate::entities::{Coordinates, LocationSource};
use crate::error::Error;
use crate::map::render_page;

#[derive(Serialize, Deserialize)]
pub struct PageParams {
    origin: String,
    destination: String,
    vehicle_id: Option<String>,
    starting_charge: Option<f64>,
}

pub async fn page(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, Error> {
    let plan = api
        .plan_trip(PlanParams {
            origin: parse_source(&params.origin),
            destination: parse_source(&params.destination),
            vehicle_id: params.vehicle_id,
            starting_charge: params.starting_charge,
        })
        .await?;

    Ok(Html(render_page(&plan)))
}

/// `"lat,lon"` is taken as a map point, anything else as an address.
fn parse_source(text: &str) -> LocationSource {
    let parsed = text.split_once(',').and_then(|(lat, lon)| {
        Some(Coordinates::new(
            lat.trim().parse().ok()?,
            lon.trim().parse().ok()?,
        ))
    });

    match parsed {
        Some(coordinates) => LocationSource::Coordinates(coordinates),
        None => LocationSource::Address(text.to_string()),
    }
}

#[test]
fn parse_source_test() {
    assert!(matches!(
        parse_source("12.97, 77.59"),
        LocationSource::Coordinates(c) if c == Coordinates::new(12.97, 77.59)
    ));
    assert!(matches!(
        parse_source("Berlin, Germany"),
        LocationSource::Address(ref a) if a == "Berlin, Germany"
    ));
    assert!(matches!(parse_source("Bengaluru"), LocationSource::Address(_)));
}
