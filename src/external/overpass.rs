//! Charging station lookup against the OpenStreetMap Overpass API.

use std::collections::HashMap;
use std::fmt::Write;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{check_status, http_client, StationFinder, StationNode};
use crate::{
    config::Config,
    entities::Coordinates,
    error::{invalid_input_error, Error},
};

const UNNAMED_STATION: &str = "Charging station";

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug)]
pub struct OverpassClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl OverpassClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.overpass_url.clone(),
            timeout_secs: config.http_timeout_secs,
        })
    }
}

#[async_trait]
impl StationFinder for OverpassClient {
    #[tracing::instrument(skip(self, points), fields(points = points.len()))]
    async fn stations_near(
        &self,
        points: &[Coordinates],
        radius_m: f64,
    ) -> Result<Vec<StationNode>, Error> {
        if points.is_empty() || !(radius_m > 0.0) {
            return Err(invalid_input_error());
        }

        let query = build_query(points, radius_m, self.timeout_secs);

        let res = self
            .client
            .post(format!("{}/api/interpreter", self.base_url))
            .form(&[("data", query)])
            .send()
            .await?;

        check_status(&res)?;

        let data: Response = res.json().await?;
        let nodes: Vec<StationNode> = data.elements.into_iter().filter_map(into_node).collect();

        tracing::debug!(count = nodes.len(), "charging stations found");

        Ok(nodes)
    }
}

/// Overpass QL for charging nodes within `radius_m` of the polyline through `points`.
fn build_query(points: &[Coordinates], radius_m: f64, timeout_secs: u64) -> String {
    let mut around = format!("{:.0}", radius_m);
    for point in points {
        let _ = write!(around, ",{:.6},{:.6}", point.latitude, point.longitude);
    }

    format!(
        "[out:json][timeout:{}];node[\"amenity\"=\"charging_station\"](around:{});out body;",
        timeout_secs, around
    )
}

fn into_node(element: Element) -> Option<StationNode> {
    let coordinates = Coordinates::new(element.lat?, element.lon?).validate().ok()?;
    let tags = element.tags;

    let mut socket_types: Vec<String> = tags
        .iter()
        .filter_map(|(key, value)| {
            let socket = key.strip_prefix("socket:")?;
            if socket.contains(':') || value == "0" || value == "no" {
                return None;
            }
            Some(socket.to_string())
        })
        .collect();
    socket_types.sort();

    Some(StationNode {
        id: element.id,
        name: tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| UNNAMED_STATION.to_string()),
        coordinates,
        operator: tags.get("operator").cloned(),
        capacity: tags.get("capacity").and_then(|c| c.trim().parse().ok()),
        socket_types,
    })
}

#[test]
fn build_query_test() {
    let query = build_query(
        &[Coordinates::new(12.5, 77.25), Coordinates::new(13.0, 77.5)],
        5000.0,
        25,
    );

    assert_eq!(
        query,
        "[out:json][timeout:25];node[\"amenity\"=\"charging_station\"]\
         (around:5000,12.500000,77.250000,13.000000,77.500000);out body;"
    );
}

#[test]
fn into_node_test() {
    let json = r#"{
        "type": "node",
        "id": 42,
        "lat": 12.97,
        "lon": 77.59,
        "tags": {
            "amenity": "charging_station",
            "operator": "Tata Power",
            "capacity": "4",
            "socket:type2": "2",
            "socket:type2:output": "22 kW",
            "socket:ccs": "1",
            "socket:chademo": "0"
        }
    }"#;

    let node = into_node(serde_json::from_str(json).unwrap()).unwrap();

    assert_eq!(node.id, 42);
    assert_eq!(node.name, UNNAMED_STATION);
    assert_eq!(node.operator.as_deref(), Some("Tata Power"));
    assert_eq!(node.capacity, Some(4));
    assert_eq!(node.socket_types, vec!["ccs".to_string(), "type2".to_string()]);
}

#[test]
fn into_node_without_position_test() {
    let element: Element = serde_json::from_str(r#"{"id": 1, "tags": {}}"#).unwrap();
    assert!(into_node(element).is_none());
}
