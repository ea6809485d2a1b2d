use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{http_client, RouteGeometry, Router};
use crate::{
    config::Config,
    entities::Coordinates,
    error::{invalid_input_error, route_not_found_error, upstream_error, Error},
};

#[derive(Debug, Deserialize)]
struct Response {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: `[longitude, latitude]`.
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.osrm_url.clone(),
        })
    }
}

#[async_trait]
impl Router for OsrmClient {
    #[tracing::instrument(skip(self))]
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteGeometry, Error> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude
        );

        let res = self
            .client
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        // OSRM reports NoRoute with a 400, so the body decides before the status does
        let data = match serde_json::from_str::<Response>(&body) {
            Ok(data) => data,
            Err(_) if status.is_client_error() && status.as_u16() != 429 => {
                return Err(invalid_input_error())
            }
            Err(err) => {
                tracing::warn!(%status, %err, "unreadable routing response");
                return Err(upstream_error());
            }
        };

        into_geometry(data)
    }
}

fn into_geometry(data: Response) -> Result<RouteGeometry, Error> {
    match data.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(route_not_found_error()),
        "InvalidQuery" | "InvalidValue" | "InvalidOptions" => return Err(invalid_input_error()),
        other => {
            tracing::warn!(code = other, "routing service error");
            return Err(upstream_error());
        }
    }

    let route = data
        .routes
        .into_iter()
        .next()
        .ok_or_else(route_not_found_error)?;

    let path = route
        .geometry
        .coordinates
        .into_iter()
        .map(|[longitude, latitude]| Coordinates::new(latitude, longitude))
        .collect();

    Ok(RouteGeometry {
        path,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}

#[test]
fn into_geometry_swaps_axes_test() {
    let json = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 1523.4,
            "duration": 210.9,
            "geometry": {"type": "LineString", "coordinates": [[77.59, 12.97], [77.60, 12.98]]}
        }]
    }"#;

    let geometry = into_geometry(serde_json::from_str(json).unwrap()).unwrap();

    assert_eq!(geometry.path[0], Coordinates::new(12.97, 77.59));
    assert_eq!(geometry.path[1], Coordinates::new(12.98, 77.60));
    assert_eq!(geometry.distance_m, 1523.4);
}

#[test]
fn into_geometry_no_route_test() {
    let json = r#"{"code": "NoRoute", "message": "Impossible route"}"#;
    let data: Response = serde_json::from_str(json).unwrap();
    assert_eq!(into_geometry(data).unwrap_err().code, 103);

    let data: Response = serde_json::from_str(r#"{"code": "Ok", "routes": []}"#).unwrap();
    assert_eq!(into_geometry(data).unwrap_err().code, 103);

    let data: Response = serde_json::from_str(r#"{"code": "TooBig"}"#).unwrap();
    assert_eq!(into_geometry(data).unwrap_err().code, 4);
}
