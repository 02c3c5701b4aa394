use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{error::FailureKind, units::UnitPreference};

/// A latitude/longitude pair known to be within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Returns `None` unless latitude is in [-90, 90] and longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);

        (lat_ok && lon_ok).then_some(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Target of one lookup attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates(Coordinates),
}

impl Query {
    /// Builds a city query from raw user input, trimming it first.
    pub fn city(name: &str) -> Result<Self, FailureKind> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FailureKind::EmptyQuery);
        }
        Ok(Query::City(name.to_string()))
    }

    /// Label used in messages and logs.
    pub fn label(&self) -> String {
        match self {
            Query::City(name) => name.clone(),
            Query::Coordinates(coords) => coords.to_string(),
        }
    }
}

/// Current conditions returned by one successful fetch.
///
/// Numeric values are in the unit system recorded in `fetched_in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub place_name: String,
    pub country: String,
    pub description: String,
    /// Condition group such as "Clear" or "Rain".
    pub condition: String,
    pub icon_code: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub pressure_hpa: f64,
    /// Offset from UTC in seconds.
    pub timezone_offset_secs: i32,
    pub fetched_in: UnitPreference,
}

impl WeatherSnapshot {
    pub fn rounded_temperature(&self) -> i64 {
        self.temperature.round() as i64
    }

    pub fn rounded_feels_like(&self) -> i64 {
        self.feels_like.round() as i64
    }

    /// "Benoni, ZA", or just the place name when the country is missing.
    pub fn place_label(&self) -> String {
        if self.country.is_empty() {
            self.place_name.clone()
        } else {
            format!("{}, {}", self.place_name, self.country)
        }
    }
}

/// Terminal result of a single lookup invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Success(WeatherSnapshot),
    Failure { kind: FailureKind, message: String },
}

impl LookupOutcome {
    pub fn failure(kind: FailureKind) -> Self {
        let message = kind.user_message();
        LookupOutcome::Failure { kind, message }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success(_))
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            LookupOutcome::Success(snapshot) => Some(snapshot),
            LookupOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<&FailureKind> {
        match self {
            LookupOutcome::Success(_) => None,
            LookupOutcome::Failure { kind, .. } => Some(kind),
        }
    }
}
