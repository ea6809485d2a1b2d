//! GeoJSON and Leaflet rendering of a planned trip.

use serde_json::{json, Value};

use crate::entities::{ChargingStation, Coordinates, RoutePlan};

const ROUTE_COLOR: &str = "blue";
const ROUTE_WEIGHT: u32 = 5;

fn point(coordinates: &Coordinates, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [coordinates.longitude, coordinates.latitude],
        },
        "properties": properties,
    })
}

fn station_feature(station: &ChargingStation) -> Value {
    point(
        &station.coordinates,
        json!({
            "kind": "station",
            "popup": station.name,
            "color": "darkblue",
            "operator": station.operator,
            "capacity": station.capacity,
            "socket_types": station.socket_types,
            "distance_along_route_km": station.distance_along_route_km,
        }),
    )
}

pub fn feature_collection(plan: &RoutePlan) -> Value {
    let route = &plan.route;
    let line: Vec<[f64; 2]> = route.line_string().coords().map(|c| [c.x, c.y]).collect();

    let mut features = vec![
        json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": line },
            "properties": {
                "kind": "route",
                "color": ROUTE_COLOR,
                "weight": ROUTE_WEIGHT,
                "distance_km": route.distance_km,
                "duration_hours": route.duration_hours,
            },
        }),
        point(
            &route.origin.coordinates,
            json!({
                "kind": "start",
                "popup": "Start",
                "color": "green",
                "description": route.origin.description,
            }),
        ),
        point(
            &route.destination.coordinates,
            json!({
                "kind": "destination",
                "popup": "Destination",
                "color": "red",
                "description": route.destination.description,
            }),
        ),
    ];

    if let (Some(at), Some(km)) = (
        plan.battery.low_battery_point,
        plan.battery.low_battery_at_km,
    ) {
        features.push(point(
            &at,
            json!({
                "kind": "low_battery",
                "popup": format!("Battery low after {:.0} km", km),
                "color": "orange",
            }),
        ));
    }

    features.extend(plan.stations.iter().map(station_feature));

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Standalone Leaflet page showing the plan on OpenStreetMap tiles.
///
/// Clicking the map picks a new start, a second click the destination; the
/// page then reloads itself with both points as `"lat,lon"` query values.
pub fn render_page(plan: &RoutePlan) -> String {
    // `</` inside an inline script would end it early
    let geojson = feature_collection(plan).to_string().replace("</", "<\\/");
    let summary = format!(
        "{} &rarr; {}: {:.1} km, {:.1} h, {} charging stations{}",
        escape_html(&plan.route.origin.description),
        escape_html(&plan.route.destination.description),
        plan.route.distance_km,
        plan.route.duration_hours,
        plan.stations.len(),
        if plan.battery.needs_charging {
            " (charging needed)"
        } else {
            ""
        }
    );

    PAGE_TEMPLATE
        .replace("{{summary}}", &summary)
        .replace("{{geojson}}", &geojson)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>EV Navigator</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>body{margin:0;font-family:sans-serif}#summary{padding:8px}#map{height:calc(100vh - 40px)}</style>
</head>
<body>
<div id="summary">{{summary}}</div>
<div id="map"></div>
<script>
var plan = {{geojson}};
var map = L.map('map');
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
var layer = L.geoJSON(plan, {
  style: function (f) { return { color: f.properties.color, weight: f.properties.weight }; },
  pointToLayer: function (f, latlng) {
    return L.circleMarker(latlng, { radius: 7, color: f.properties.color, fillOpacity: 0.8 });
  },
  onEachFeature: function (f, l) { if (f.properties.popup) { l.bindPopup(String(f.properties.popup)); } }
}).addTo(map);
map.fitBounds(layer.getBounds(), { padding: [20, 20] });

var params = new URLSearchParams(window.location.search);
var picked = null;
map.on('click', function (e) {
  var point = e.latlng.lat.toFixed(6) + ',' + e.latlng.lng.toFixed(6);
  if (picked === null) {
    picked = L.circleMarker(e.latlng, { radius: 7, color: 'green' }).addTo(map);
    picked.bindPopup('Start set, click the destination').openPopup();
    params.set('origin', point);
    return;
  }
  params.set('destination', point);
  window.location.search = params.toString();
});
</script>
</body>
</html>
"#;

#[cfg(test)]
fn sample_plan() -> RoutePlan {
    use crate::entities::{catalog, BatteryEstimate, Location, Route};

    let path = vec![Coordinates::new(12.97, 77.59), Coordinates::new(13.5, 78.0)];
    let route = Route::new(
        Location::new(path[0], "Bengaluru".into()),
        Location::new(path[1], "<Kolar>".into()),
        path,
        350.0,
        5.0,
    );
    let vehicle = catalog().remove(0);
    let battery = BatteryEstimate::new(&route, &vehicle, 1.0).unwrap();
    let station = ChargingStation::new(
        9,
        "Highway charger".into(),
        Coordinates::new(13.2, 77.8),
        Some("Tata Power".into()),
        Some(2),
        vec!["ccs".into()],
    );

    RoutePlan::new(route, vehicle, battery, vec![station], chrono::Utc::now())
}

#[test]
fn feature_collection_test() {
    let collection = feature_collection(&sample_plan());
    let features = collection["features"].as_array().unwrap();

    let kinds: Vec<&str> = features
        .iter()
        .map(|f| f["properties"]["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["route", "start", "destination", "low_battery", "station"]);

    assert_eq!(features[0]["geometry"]["coordinates"][0], json!([77.59, 12.97]));
    assert_eq!(features[0]["properties"]["color"], "blue");
    assert_eq!(features[1]["properties"]["color"], "green");
    assert_eq!(features[2]["properties"]["color"], "red");
    assert_eq!(features[4]["properties"]["popup"], "Highway charger");
}

#[test]
fn render_page_test() {
    let page = render_page(&sample_plan());

    assert!(page.contains("Bengaluru &rarr; &lt;Kolar&gt;"));
    assert!(page.contains("(charging needed)"));
    assert!(page.contains("\"FeatureCollection\""));
    assert!(!page.contains("{{geojson}}"));
    // map clicks pick new endpoints and reload with them
    assert!(page.contains("map.on('click'"));
    assert!(page.contains("params.set('origin', point)"));
    assert!(page.contains("params.set('destination', point)"));
}
