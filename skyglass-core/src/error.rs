//! Failure types surfaced by the fetcher, the location resolver and the
//! session controller.

use thiserror::Error;

/// Why a weather fetch failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("no weather data found for '{0}'")]
    CityNotFound(String),

    #[error("weather service rejected the API key")]
    InvalidCredentials,

    #[error("weather service rate limit exceeded")]
    RateLimited,

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Generic(String),
}

/// Classified failure of the host's location capability.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationFailure {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("unknown location error")]
    Unknown,
}

impl LocationFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location access denied. Please enable location services or search by city name."
            }
            Self::PositionUnavailable => "Location information unavailable. Please try again.",
            Self::Timeout => "Location request timed out. Please try again.",
            Self::Unknown => "Failed to get location. Please try searching by city name.",
        }
    }
}

/// Every failure a lookup can end with, as shown to the display layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    #[error("empty query")]
    EmptyQuery,

    #[error("city not found: {0}")]
    CityNotFound(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("rate limited")]
    RateLimited,

    #[error("network error")]
    NetworkError,

    #[error("fetch failed: {0}")]
    GenericFetchError(String),

    #[error("geolocation unsupported")]
    GeolocationUnsupported,

    #[error("location failure: {0}")]
    LocationFailure(LocationFailure),

    /// A newer lookup was triggered before this one reached the weather
    /// service. Only ever returned to the caller, never published.
    #[error("superseded by a newer lookup")]
    Superseded,
}

impl FailureKind {
    /// Fixed, non-technical message for the error surface.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyQuery => "Please enter a city name".to_string(),
            Self::CityNotFound(query) => format!(
                "City \"{query}\" not found. Please check the spelling and try again."
            ),
            Self::InvalidCredentials => {
                "Invalid API key. Please check your configuration.".to_string()
            }
            Self::RateLimited => "API rate limit exceeded. Please try again in a moment.".to_string(),
            Self::NetworkError => "Network error. Please check your internet connection.".to_string(),
            Self::GenericFetchError(msg) => format!("Failed to fetch weather data: {msg}"),
            Self::GeolocationUnsupported => {
                "Geolocation is not supported on this device.".to_string()
            }
            Self::LocationFailure(kind) => kind.user_message().to_string(),
            Self::Superseded => "A newer search replaced this one.".to_string(),
        }
    }
}

impl From<FetchFailure> for FailureKind {
    fn from(failure: FetchFailure) -> Self {
        match failure {
            FetchFailure::CityNotFound(query) => Self::CityNotFound(query),
            FetchFailure::InvalidCredentials => Self::InvalidCredentials,
            FetchFailure::RateLimited => Self::RateLimited,
            FetchFailure::Network(_) => Self::NetworkError,
            FetchFailure::Generic(msg) => Self::GenericFetchError(msg),
        }
    }
}

impl From<LocationFailure> for FailureKind {
    fn from(failure: LocationFailure) -> Self {
        Self::LocationFailure(failure)
    }
}
