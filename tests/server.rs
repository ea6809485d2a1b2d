//! HTTP API tests: the real engine and router against mocked upstream services.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use evnav::api::DynAPI;
use evnav::config::Config;
use evnav::engine::Engine;
use evnav::server::app;

async fn app_for(server: &MockServer) -> axum::Router {
    let config = Config {
        nominatim_url: server.uri(),
        osrm_url: server.uri(),
        overpass_url: server.uri(),
        http_timeout_secs: 5,
        ..Config::default()
    };

    let engine = Engine::new(&config).unwrap();
    app(Arc::new(engine) as DynAPI)
}

async fn mount_upstreams(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "52.52", "lon": "13.405", "display_name": "Berlin, Deutschland"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Potsdam"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "52.3906", "lon": "13.0645", "display_name": "Potsdam, Brandenburg"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [{
                "distance": 35210.0,
                "duration": 2460.0,
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[13.405, 52.52], [13.2, 52.45], [13.0645, 52.3906]]
                }
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                {"type": "node", "id": 7, "lat": 52.451, "lon": 13.201, "tags": {"name": "Wannsee"}},
                {"type": "node", "id": 3, "lat": 52.519, "lon": 13.404, "tags": {"name": "Mitte"}}
            ]
        })))
        .mount(server)
        .await;
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();

    (status, body.to_vec())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_and_vehicles() {
    let server = MockServer::start().await;
    let app = app_for(&server).await;

    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let (status, body) = send(app.clone(), get("/vehicles")).await;
    assert_eq!(status, StatusCode::OK);
    let vehicles: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(vehicles[0]["id"], "generic");
    assert_eq!(vehicles[0]["range_km"], 300.0);

    let (status, body) = send(app, get("/vehicles/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], 104);
}

#[tokio::test]
async fn plan_trip_end_to_end() {
    let server = MockServer::start().await;
    mount_upstreams(&server).await;
    let app = app_for(&server).await;

    let (status, body) = send(
        app,
        post_json(
            "/plans",
            json!({
                "origin": {"address": "Berlin"},
                "destination": {"address": "Potsdam"},
                "vehicle_id": "nissan-leaf",
                "starting_charge": 0.8
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let plan: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(plan["route"]["origin"]["description"], "Berlin, Deutschland");
    assert_eq!(plan["route"]["distance_km"], 35.21);
    assert_eq!(plan["route"]["path"].as_array().unwrap().len(), 3);
    assert_eq!(plan["vehicle"]["id"], "nissan-leaf");
    assert_eq!(plan["battery"]["needs_charging"], false);

    let stations = plan["stations"].as_array().unwrap();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0]["name"], "Mitte");
    assert_eq!(stations[1]["name"], "Wannsee");
}

#[tokio::test]
async fn plan_geojson() {
    let server = MockServer::start().await;
    mount_upstreams(&server).await;
    let app = app_for(&server).await;

    let (status, body) = send(
        app,
        post_json(
            "/plans/geojson",
            json!({
                "origin": {"address": "Berlin"},
                "destination": {"coordinates": {"latitude": 52.3906, "longitude": 13.0645}}
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let collection: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(collection["type"], "FeatureCollection");
    assert_eq!(collection["features"][0]["geometry"]["type"], "LineString");
}

#[tokio::test]
async fn unknown_address_is_not_found() {
    let server = MockServer::start().await;
    mount_upstreams(&server).await;
    let app = app_for(&server).await;

    let (status, body) = send(
        app,
        post_json(
            "/routes",
            json!({
                "origin": {"address": "Berlin"},
                "destination": {"address": "Atlantis"}
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], 102);
    assert!(error["error"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn invalid_coordinates_are_rejected() {
    let server = MockServer::start().await;
    let app = app_for(&server).await;

    let (status, _) = send(app.clone(), get("/stations?latitude=95.0&longitude=13.4")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app,
        post_json(
            "/locations",
            json!({"source": {"coordinates": {"latitude": 0.0, "longitude": 200.0}}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_outage_is_bad_gateway() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(504))
        .mount(&server)
        .await;

    let app = app_for(&server).await;
    let (status, _) = send(app, get("/stations?latitude=52.52&longitude=13.405")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn map_page() {
    let server = MockServer::start().await;
    mount_upstreams(&server).await;
    let app = app_for(&server).await;

    let (status, body) = send(app, get("/map?origin=Berlin&destination=52.3906,13.0645")).await;

    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("L.geoJSON"));
    assert!(page.contains("Berlin, Deutschland"));
}
