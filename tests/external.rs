//! Adapter tests against mocked OpenStreetMap services.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use evnav::config::Config;
use evnav::entities::Coordinates;
use evnav::external::{
    Geocoder, NominatimClient, OsrmClient, OverpassClient, Router, StationFinder,
};

fn config_for(uri: &str) -> Config {
    Config {
        nominatim_url: uri.to_string(),
        osrm_url: uri.to_string(),
        overpass_url: uri.to_string(),
        http_timeout_secs: 5,
        ..Config::default()
    }
}

#[tokio::test]
async fn geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Brandenburger Tor"))
        .and(query_param("format", "jsonv2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "52.5162746", "lon": "13.3777041", "display_name": "Brandenburger Tor, Berlin"}
        ])))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&config_for(&server.uri())).unwrap();
    let location = client.geocode("  Brandenburger Tor ").await.unwrap();

    assert_eq!(location.description, "Brandenburger Tor, Berlin");
    assert_eq!(location.coordinates, Coordinates::new(52.5162746, 13.3777041));
}

#[tokio::test]
async fn geocode_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&config_for(&server.uri())).unwrap();

    let err = client.geocode("Atlantis").await.unwrap_err();
    assert_eq!(err.code, 102);

    let err = client.geocode("   ").await.unwrap_err();
    assert_eq!(err.code, 101);
}

#[tokio::test]
async fn geocode_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&config_for(&server.uri())).unwrap();

    let err = client.geocode("Berlin").await.unwrap_err();
    assert_eq!(err.code, 4);
}

#[tokio::test]
async fn reverse_geocode_falls_back_to_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Unable to geocode"})),
        )
        .mount(&server)
        .await;

    let client = NominatimClient::new(&config_for(&server.uri())).unwrap();
    let name = client
        .reverse_geocode(Coordinates::new(0.5, -30.25))
        .await
        .unwrap();

    assert_eq!(name, "0.500000, -30.250000");
}

#[tokio::test]
async fn geocode_sends_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("user-agent", "evnav-tests/1.0 (ops@example.org)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "52.52", "lon": "13.405", "display_name": "Berlin"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        user_agent: "evnav-tests/1.0 (ops@example.org)".into(),
        ..config_for(&server.uri())
    };
    let client = NominatimClient::new(&config).unwrap();

    let location = client.geocode("Berlin").await.unwrap();
    assert_eq!(location.description, "Berlin");
}

#[tokio::test]
async fn geocode_spaces_concurrent_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "52.52", "lon": "13.405", "display_name": "Berlin"}
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let client = NominatimClient::new(&config_for(&server.uri())).unwrap();

    let started = Instant::now();
    let (first, second) = tokio::join!(client.geocode("Berlin"), client.geocode("Potsdam"));
    let elapsed = started.elapsed();

    first.unwrap();
    second.unwrap();
    assert!(elapsed >= Duration::from_millis(1100), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn route_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/13\.405,52\.52;11\.582,48\.1351$"))
        .and(query_param("overview", "full"))
        .and(query_param("geometries", "geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [{
                "distance": 584321.5,
                "duration": 20160.0,
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[13.405, 52.52], [12.1, 50.3], [11.582, 48.1351]]
                }
            }],
            "waypoints": []
        })))
        .mount(&server)
        .await;

    let client = OsrmClient::new(&config_for(&server.uri())).unwrap();
    let geometry = client
        .route(Coordinates::new(52.52, 13.405), Coordinates::new(48.1351, 11.582))
        .await
        .unwrap();

    assert_eq!(geometry.path.len(), 3);
    assert_eq!(geometry.path[1], Coordinates::new(50.3, 12.1));
    assert_eq!(geometry.distance_m, 584321.5);
    assert_eq!(geometry.duration_s, 20160.0);
}

#[tokio::test]
async fn route_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "NoRoute",
            "message": "Impossible route between points"
        })))
        .mount(&server)
        .await;

    let client = OsrmClient::new(&config_for(&server.uri())).unwrap();
    let err = client
        .route(Coordinates::new(52.52, 13.405), Coordinates::new(40.71, -74.0))
        .await
        .unwrap_err();

    assert_eq!(err.code, 103);
}

#[tokio::test]
async fn route_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = OsrmClient::new(&config_for(&server.uri())).unwrap();
    let err = client
        .route(Coordinates::new(52.52, 13.405), Coordinates::new(48.1351, 11.582))
        .await
        .unwrap_err();

    assert_eq!(err.code, 4);
}

#[tokio::test]
async fn stations_near_route() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .and(body_string_contains("charging_station"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": 0.6,
            "elements": [
                {
                    "type": "node",
                    "id": 101,
                    "lat": 52.1,
                    "lon": 13.2,
                    "tags": {"amenity": "charging_station", "name": "Autohof Nord", "socket:type2_combo": "4"}
                },
                {
                    "type": "node",
                    "id": 102,
                    "lat": 51.0,
                    "lon": 12.7,
                    "tags": {"amenity": "charging_station", "capacity": "2"}
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = OverpassClient::new(&config_for(&server.uri())).unwrap();
    let nodes = client
        .stations_near(
            &[Coordinates::new(52.52, 13.405), Coordinates::new(48.1351, 11.582)],
            5000.0,
        )
        .await
        .unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].name, "Autohof Nord");
    assert_eq!(nodes[0].socket_types, vec!["type2_combo".to_string()]);
    assert_eq!(nodes[1].name, "Charging station");
    assert_eq!(nodes[1].capacity, Some(2));
}

#[tokio::test]
async fn stations_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = OverpassClient::new(&config_for(&server.uri())).unwrap();
    let err = client
        .stations_near(&[Coordinates::new(52.52, 13.405)], 5000.0)
        .await
        .unwrap_err();

    assert_eq!(err.code, 4);
}
