use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Route};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChargingStation {
    pub id: i64,
    pub name: String,
    pub coordinates: Coordinates,
    pub operator: Option<String>,
    pub capacity: Option<u32>,
    pub socket_types: Vec<String>,
    pub distance_from_route_km: f64,
    pub distance_along_route_km: f64,
}

impl ChargingStation {
    pub fn new(
        id: i64,
        name: String,
        coordinates: Coordinates,
        operator: Option<String>,
        capacity: Option<u32>,
        socket_types: Vec<String>,
    ) -> Self {
        Self {
            id,
            name,
            coordinates,
            operator,
            capacity,
            socket_types,
            distance_from_route_km: 0.0,
            distance_along_route_km: 0.0,
        }
    }

    /// Measures the station against the nearest route vertex.
    ///
    /// `cumulative` is [`Route::cumulative_km`] for `route`; it is passed in
    /// so a batch of stations shares one computation. The distance along the
    /// route is reported in router distance, like [`Route::point_at_km`].
    pub fn locate_on(&mut self, route: &Route, cumulative: &[f64]) {
        let scale = match cumulative.last() {
            Some(&path_length) if path_length > 0.0 && route.distance_km > 0.0 => {
                route.distance_km / path_length
            }
            _ => 1.0,
        };

        let nearest = route
            .path
            .iter()
            .zip(cumulative)
            .map(|(point, along)| (self.coordinates.haversine_km(point), *along))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        if let Some((from_route, along)) = nearest {
            self.distance_from_route_km = from_route;
            self.distance_along_route_km = along * scale;
        }
    }

    /// Measures the station from a single point, for area searches.
    pub fn locate_from(&mut self, point: &Coordinates) {
        self.distance_from_route_km = self.coordinates.haversine_km(point);
        self.distance_along_route_km = 0.0;
    }
}

#[test]
fn locate_on_route_test() {
    use crate::entities::Location;

    let path = vec![
        Coordinates::new(0.0, 0.0),
        Coordinates::new(0.5, 0.0),
        Coordinates::new(1.0, 0.0),
    ];
    let route = Route::new(
        Location::new(path[0], "A".into()),
        Location::new(path[2], "B".into()),
        path,
        111.2,
        1.5,
    );
    let cumulative = route.cumulative_km();

    let mut station = ChargingStation::new(
        7,
        "Fast charger".into(),
        Coordinates::new(0.5, 0.01),
        None,
        Some(4),
        vec![],
    );
    station.locate_on(&route, &cumulative);

    assert!((station.distance_from_route_km - 1.11).abs() < 0.05);
    assert!((station.distance_along_route_km - 55.6).abs() < 0.5);
}

#[test]
fn locate_on_scales_to_router_distance_test() {
    use crate::entities::Location;

    // the road is twice as long as the straight polyline
    let path = vec![Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0)];
    let path_km = path[0].haversine_km(&path[1]);
    let route = Route::new(
        Location::new(path[0], "A".into()),
        Location::new(path[1], "B".into()),
        path,
        2.0 * path_km,
        3.0,
    );
    let cumulative = route.cumulative_km();

    let mut station =
        ChargingStation::new(1, "End".into(), Coordinates::new(1.0, 0.0), None, None, vec![]);
    station.locate_on(&route, &cumulative);

    assert!((station.distance_along_route_km - route.distance_km).abs() < 1e-9);
    let point = route.point_at_km(station.distance_along_route_km).unwrap();
    assert!(point.haversine_km(&Coordinates::new(1.0, 0.0)) < 1e-6);
}
