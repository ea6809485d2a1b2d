use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_coordinates_error, Error};

const EARTH_RADIUS_KM: f64 = 6371.0088;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn validate(self) -> Result<Self, Error> {
        if !self.is_valid() {
            return Err(invalid_coordinates_error());
        }

        Ok(self)
    }

    /// Great-circle distance in kilometers.
    pub fn haversine_km(&self, other: &Coordinates) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }

    /// Point at `fraction` of the way towards `other`, linear in degrees.
    pub fn lerp(&self, other: &Coordinates, fraction: f64) -> Coordinates {
        Coordinates {
            latitude: self.latitude + (other.latitude - self.latitude) * fraction,
            longitude: self.longitude + (other.longitude - self.longitude) * fraction,
        }
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.longitude, coordinates.latitude)
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.longitude,
            y: coordinates.latitude,
        }
    }
}

impl From<Coord<f64>> for Coordinates {
    fn from(coord: Coord<f64>) -> Self {
        Coordinates {
            latitude: coord.y,
            longitude: coord.x,
        }
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{:.6}, {:.6}", coordinates.latitude, coordinates.longitude)
    }
}

/// Where a user-supplied endpoint comes from: typed text or a map click.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Address(String),
    Coordinates(Coordinates),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub description: String,
    pub coordinates: Coordinates,
}

impl Location {
    pub fn new(coordinates: Coordinates, description: String) -> Self {
        Self {
            description,
            coordinates,
        }
    }
}

#[test]
fn coordinates_validation_test() {
    assert!(Coordinates::new(52.52, 13.405).is_valid());
    assert!(Coordinates::new(-90.0, 180.0).is_valid());
    assert!(!Coordinates::new(90.1, 0.0).is_valid());
    assert!(!Coordinates::new(0.0, -180.5).is_valid());
    assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());

    let err = Coordinates::new(100.0, 0.0).validate().unwrap_err();
    assert_eq!(err.code, 105);
}

#[test]
fn haversine_test() {
    let a = Coordinates::new(0.0, 0.0);
    let b = Coordinates::new(1.0, 0.0);
    assert!((a.haversine_km(&b) - 111.19).abs() < 0.1);
    assert_eq!(a.haversine_km(&a), 0.0);

    // Berlin -> Munich is roughly 504 km as the crow flies
    let berlin = Coordinates::new(52.5200, 13.4050);
    let munich = Coordinates::new(48.1351, 11.5820);
    assert!((berlin.haversine_km(&munich) - 504.0).abs() < 3.0);
}

#[test]
fn geo_types_conversion_test() {
    let point: Point<f64> = Coordinates::new(12.9, 77.6).into();
    assert_eq!(point.x(), 77.6);
    assert_eq!(point.y(), 12.9);

    let back: Coordinates = Coord { x: 77.6, y: 12.9 }.into();
    assert_eq!(back, Coordinates::new(12.9, 77.6));
}

#[test]
fn location_source_serde_test() {
    let source: LocationSource = serde_json::from_str(r#"{"address": "Berlin Hbf"}"#).unwrap();
    assert!(matches!(source, LocationSource::Address(ref a) if a == "Berlin Hbf"));

    let source: LocationSource =
        serde_json::from_str(r#"{"coordinates": {"latitude": 1.5, "longitude": 2.5}}"#).unwrap();
    assert!(matches!(source, LocationSource::Coordinates(c) if c.latitude == 1.5));
}
