use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc, time::Duration};
use tracing::debug;

use crate::{
    config::{Config, LocationConfig},
    error::LocationFailure,
    model::Coordinates,
};

/// How long a position request may take before it counts as `Timeout`.
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// The host's location capability.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationFailure>;
}

/// Bounded wait on a [`Geolocator`]. Never retries.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    geolocator: Arc<dyn Geolocator>,
}

impl LocationResolver {
    pub fn new(geolocator: Arc<dyn Geolocator>) -> Self {
        Self { geolocator }
    }

    pub async fn resolve(&self, timeout: Duration) -> Result<Coordinates, LocationFailure> {
        match tokio::time::timeout(timeout, self.geolocator.current_position()).await {
            Ok(result) => result,
            Err(_) => {
                debug!(?timeout, "position request timed out");
                Err(LocationFailure::Timeout)
            }
        }
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator {
    coords: Coordinates,
}

impl FixedGeolocator {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationFailure> {
        Ok(self.coords)
    }
}

const IP_API_URL: &str = "http://ip-api.com/json";

/// Estimates the position from the public IP address via ip-api.com.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

impl IpGeolocator {
    pub fn new() -> Self {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: &str) -> Self {
        Self { url: url.to_string(), http: Client::new() }
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationFailure> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|err| {
                debug!(error = %err, "ip geolocation request failed");
                LocationFailure::PositionUnavailable
            })?;

        match res.status() {
            status if status.is_success() => {}
            StatusCode::FORBIDDEN => return Err(LocationFailure::PermissionDenied),
            status => {
                debug!(%status, "ip geolocation returned an error status");
                return Err(LocationFailure::Unknown);
            }
        }

        let body: IpApiResponse = res.json().await.map_err(|_| LocationFailure::Unknown)?;

        if body.status != "success" {
            debug!(message = ?body.message, "ip geolocation could not locate this host");
            return Err(LocationFailure::PositionUnavailable);
        }

        body.lat
            .zip(body.lon)
            .and_then(|(lat, lon)| Coordinates::new(lat, lon))
            .ok_or(LocationFailure::PositionUnavailable)
    }
}

/// Construct the configured geolocator; `None` means the host has no
/// location capability.
pub fn geolocator_from_config(config: &Config) -> anyhow::Result<Option<Arc<dyn Geolocator>>> {
    let geolocator: Arc<dyn Geolocator> = match config.location {
        LocationConfig::Off => return Ok(None),
        LocationConfig::Ip => Arc::new(IpGeolocator::new()),
        LocationConfig::Fixed { latitude, longitude } => {
            let coords = Coordinates::new(latitude, longitude).ok_or_else(|| {
                anyhow::anyhow!(
                    "Configured location ({latitude}, {longitude}) is out of range.\n\
                     Latitude must be within [-90, 90] and longitude within [-180, 180]."
                )
            })?;
            Arc::new(FixedGeolocator::new(coords))
        }
    };

    Ok(Some(geolocator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Never;

    #[async_trait]
    impl Geolocator for Never {
        async fn current_position(&self) -> Result<Coordinates, LocationFailure> {
            std::future::pending().await
        }
    }

    #[derive(Debug)]
    struct Denied;

    #[async_trait]
    impl Geolocator for Denied {
        async fn current_position(&self) -> Result<Coordinates, LocationFailure> {
            Err(LocationFailure::PermissionDenied)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn resolve_times_out() {
        let resolver = LocationResolver::new(Arc::new(Never));
        let err = resolver.resolve(LOCATION_TIMEOUT).await.unwrap_err();
        assert_eq!(err, LocationFailure::Timeout);
    }

    #[tokio::test]
    async fn resolve_passes_through_classified_failure() {
        let resolver = LocationResolver::new(Arc::new(Denied));
        let err = resolver.resolve(LOCATION_TIMEOUT).await.unwrap_err();
        assert_eq!(err, LocationFailure::PermissionDenied);
    }

    #[tokio::test]
    async fn fixed_geolocator_resolves() {
        let coords = Coordinates::new(-26.19, 28.32).unwrap();
        let resolver = LocationResolver::new(Arc::new(FixedGeolocator::new(coords)));
        assert_eq!(resolver.resolve(LOCATION_TIMEOUT).await.unwrap(), coords);
    }

    #[test]
    fn geolocator_from_config_off_is_unsupported() {
        let cfg = Config { location: LocationConfig::Off, ..Config::default() };
        assert!(geolocator_from_config(&cfg).unwrap().is_none());
    }

    #[test]
    fn geolocator_from_config_rejects_bad_fixed_coordinates() {
        let cfg = Config {
            location: LocationConfig::Fixed { latitude: 123.0, longitude: 0.0 },
            ..Config::default()
        };
        let err = geolocator_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
