use geo_types::LineString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, Location};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub origin: Location,
    pub destination: Location,
    pub path: Vec<Coordinates>,
    pub distance_km: f64,
    pub duration_hours: f64,
}

impl Route {
    pub fn new(
        origin: Location,
        destination: Location,
        path: Vec<Coordinates>,
        distance_km: f64,
        duration_hours: f64,
    ) -> Self {
        Route {
            id: Uuid::new_v4().to_string(),
            origin,
            destination,
            path,
            distance_km,
            duration_hours,
        }
    }

    /// Route between two identical points; no router call is needed.
    pub fn stationary(origin: Location, destination: Location) -> Self {
        let path = vec![origin.coordinates, destination.coordinates];
        Self::new(origin, destination, path, 0.0, 0.0)
    }

    pub fn line_string(&self) -> LineString<f64> {
        self.path.iter().map(|c| geo_types::Coord::from(*c)).collect()
    }

    /// Running great-circle length of the path at every vertex, starting at 0.
    ///
    /// The router's reported distance and this figure differ slightly, so
    /// callers that need a position for a router distance should scale with
    /// [`Route::point_at_km`] rather than compare directly.
    pub fn cumulative_km(&self) -> Vec<f64> {
        let mut total = 0.0;
        let mut cumulative = Vec::with_capacity(self.path.len());

        for (i, point) in self.path.iter().enumerate() {
            if i > 0 {
                total += self.path[i - 1].haversine_km(point);
            }
            cumulative.push(total);
        }

        cumulative
    }

    /// Coordinate `km` along the route, measured in router distance.
    pub fn point_at_km(&self, km: f64) -> Option<Coordinates> {
        let first = *self.path.first()?;
        let cumulative = self.cumulative_km();
        let path_length = *cumulative.last()?;

        if path_length <= 0.0 || self.distance_km <= 0.0 {
            return Some(first);
        }

        let target = (km / self.distance_km).clamp(0.0, 1.0) * path_length;

        for i in 1..self.path.len() {
            if cumulative[i] >= target {
                let segment = cumulative[i] - cumulative[i - 1];
                let fraction = if segment > 0.0 {
                    (target - cumulative[i - 1]) / segment
                } else {
                    0.0
                };
                return Some(self.path[i - 1].lerp(&self.path[i], fraction));
            }
        }

        self.path.last().copied()
    }

    /// Path vertices spaced at least `interval_km` apart, always keeping both ends.
    pub fn sample(&self, interval_km: f64) -> Vec<Coordinates> {
        let (first, last) = match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return vec![],
        };

        let mut samples = vec![first];
        let mut since_last = 0.0;

        for pair in self.path.windows(2) {
            since_last += pair[0].haversine_km(&pair[1]);
            if since_last >= interval_km {
                samples.push(pair[1]);
                since_last = 0.0;
            }
        }

        if samples.last() != Some(&last) {
            samples.push(last);
        }

        samples
    }
}

#[cfg(test)]
fn straight_route(points: Vec<Coordinates>, distance_km: f64) -> Route {
    let origin = Location::new(points[0], "A".into());
    let destination = Location::new(points[points.len() - 1], "B".into());
    Route::new(origin, destination, points, distance_km, distance_km / 80.0)
}

#[test]
fn cumulative_km_test() {
    let route = straight_route(
        vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(1.0, 0.0),
            Coordinates::new(2.0, 0.0),
        ],
        222.4,
    );

    let cumulative = route.cumulative_km();
    assert_eq!(cumulative.len(), 3);
    assert_eq!(cumulative[0], 0.0);
    assert!((cumulative[2] - 2.0 * cumulative[1]).abs() < 1e-6);
}

#[test]
fn point_at_km_test() {
    let route = straight_route(
        vec![Coordinates::new(0.0, 0.0), Coordinates::new(2.0, 0.0)],
        200.0,
    );

    let midpoint = route.point_at_km(100.0).unwrap();
    assert!((midpoint.latitude - 1.0).abs() < 1e-9);

    let past_end = route.point_at_km(500.0).unwrap();
    assert!((past_end.latitude - 2.0).abs() < 1e-9);

    let before_start = route.point_at_km(-5.0).unwrap();
    assert_eq!(before_start.latitude, 0.0);
}

#[test]
fn sample_keeps_endpoints_test() {
    let points: Vec<Coordinates> = (0..=10)
        .map(|i| Coordinates::new(i as f64 * 0.1, 0.0))
        .collect();
    let route = straight_route(points, 111.2);

    // vertices are ~11.1 km apart
    let samples = route.sample(30.0);
    assert_eq!(samples.first(), Some(&Coordinates::new(0.0, 0.0)));
    assert_eq!(samples.last(), route.path.last());
    assert!(samples.len() >= 4 && samples.len() <= 5);

    let dense = route.sample(1.0);
    assert_eq!(dense.len(), route.path.len());
}

#[test]
fn stationary_route_test() {
    let here = Location::new(Coordinates::new(10.0, 10.0), "here".into());
    let route = Route::stationary(here.clone(), here);

    assert_eq!(route.distance_km, 0.0);
    assert_eq!(route.point_at_km(10.0), Some(Coordinates::new(10.0, 10.0)));
    assert_eq!(route.sample(5.0).len(), 1);
    assert_eq!(route.line_string().0.len(), 2);
}
