use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::{config_error, Error};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OSRM_URL: &str = "http://router.project-osrm.org";
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de";
pub const DEFAULT_USER_AGENT: &str = concat!("evnav/", env!("CARGO_PKG_VERSION"));

/// Runtime settings, read from the process environment (and `.env` if present).
#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub nominatim_url: String,
    pub osrm_url: String,
    pub overpass_url: String,
    pub user_agent: String,
    pub http_timeout_secs: u64,
    /// Radius around the route searched for charging stations, in meters.
    pub station_radius_m: f64,
    /// Spacing of the route sample points sent to the station lookup.
    pub station_sample_interval_km: f64,
    pub max_stations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            nominatim_url: DEFAULT_NOMINATIM_URL.into(),
            osrm_url: DEFAULT_OSRM_URL.into(),
            overpass_url: DEFAULT_OVERPASS_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            http_timeout_secs: 10,
            station_radius_m: 5000.0,
            station_sample_interval_km: 20.0,
            max_stations: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            listen_addr: parse_or(&lookup, "EVNAV_LISTEN_ADDR", defaults.listen_addr)?,
            nominatim_url: url_or(&lookup, "EVNAV_NOMINATIM_URL", defaults.nominatim_url),
            osrm_url: url_or(&lookup, "EVNAV_OSRM_URL", defaults.osrm_url),
            overpass_url: url_or(&lookup, "EVNAV_OVERPASS_URL", defaults.overpass_url),
            user_agent: lookup("EVNAV_USER_AGENT").unwrap_or(defaults.user_agent),
            http_timeout_secs: parse_or(
                &lookup,
                "EVNAV_HTTP_TIMEOUT_SECS",
                defaults.http_timeout_secs,
            )?,
            station_radius_m: parse_or(
                &lookup,
                "EVNAV_STATION_RADIUS_M",
                defaults.station_radius_m,
            )?,
            station_sample_interval_km: parse_or(
                &lookup,
                "EVNAV_STATION_SAMPLE_KM",
                defaults.station_sample_interval_km,
            )?,
            max_stations: parse_or(&lookup, "EVNAV_MAX_STATIONS", defaults.max_stations)?,
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.http_timeout_secs == 0 {
            return Err(config_error("EVNAV_HTTP_TIMEOUT_SECS"));
        }
        if !positive_finite(self.station_radius_m) {
            return Err(config_error("EVNAV_STATION_RADIUS_M"));
        }
        if !positive_finite(self.station_sample_interval_km) {
            return Err(config_error("EVNAV_STATION_SAMPLE_KM"));
        }
        if self.max_stations == 0 {
            return Err(config_error("EVNAV_MAX_STATIONS"));
        }

        Ok(())
    }
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| config_error(key)),
        None => Ok(default),
    }
}

// base URLs are joined with paths, so a trailing slash would double up
fn url_or<F>(lookup: &F, key: &str, default: String) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or(default)
}

#[test]
fn config_defaults_test() {
    let config = Config::from_lookup(|_| None).unwrap();

    assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
    assert_eq!(config.osrm_url, DEFAULT_OSRM_URL);
    assert_eq!(config.http_timeout_secs, 10);
    assert_eq!(config.max_stations, 50);
}

#[test]
fn config_overrides_test() {
    let config = Config::from_lookup(|key| match key {
        "EVNAV_LISTEN_ADDR" => Some("0.0.0.0:8080".into()),
        "EVNAV_OSRM_URL" => Some("http://localhost:5000/".into()),
        "EVNAV_STATION_RADIUS_M" => Some("2500".into()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.listen_addr.port(), 8080);
    assert_eq!(config.osrm_url, "http://localhost:5000");
    assert_eq!(config.station_radius_m, 2500.0);
}

#[test]
fn config_invalid_value_test() {
    let result = Config::from_lookup(|key| match key {
        "EVNAV_MAX_STATIONS" => Some("many".into()),
        _ => None,
    });
    assert_eq!(result.unwrap_err().code, 2);

    let result = Config::from_lookup(|key| match key {
        "EVNAV_HTTP_TIMEOUT_SECS" => Some("0".into()),
        _ => None,
    });
    assert!(result.is_err());
}

#[test]
fn config_rejects_unbounded_station_search_test() {
    for (key, value) in [
        ("EVNAV_STATION_RADIUS_M", "inf"),
        ("EVNAV_STATION_RADIUS_M", "NaN"),
        ("EVNAV_STATION_SAMPLE_KM", "-inf"),
        ("EVNAV_MAX_STATIONS", "0"),
    ] {
        let err = Config::from_lookup(|k| (k == key).then(|| value.to_string())).unwrap_err();
        assert_eq!(err.code, 2, "{}={}", key, value);
        assert!(err.message.contains(key));
    }
}
