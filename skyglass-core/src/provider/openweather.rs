use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

use crate::{
    error::FetchFailure,
    model::{Query, WeatherSnapshot},
    units::UnitPreference,
};

use super::WeatherFetcher;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Clone)]
pub struct OpenWeatherFetcher {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherFetcher {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the fetcher at another host, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{CURRENT_WEATHER_PATH}", self.base_url)
    }
}

impl fmt::Debug for OpenWeatherFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherFetcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    timezone: i32,
}

impl OwCurrentResponse {
    fn into_snapshot(self, units: UnitPreference) -> Result<WeatherSnapshot, FetchFailure> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| FetchFailure::Generic("response contained no weather entry".into()))?;

        Ok(WeatherSnapshot {
            place_name: self.name,
            country: self.sys.country,
            description: weather.description,
            condition: weather.main,
            icon_code: weather.icon,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity_pct: self.main.humidity,
            wind_speed: self.wind.speed,
            pressure_hpa: self.main.pressure,
            timezone_offset_secs: self.timezone,
            fetched_in: units,
        })
    }
}

/// Map a non-2xx status to a failure; `label` names the query for 404s.
fn classify_status(status: StatusCode, label: String) -> FetchFailure {
    match status {
        StatusCode::NOT_FOUND => FetchFailure::CityNotFound(label),
        StatusCode::UNAUTHORIZED => FetchFailure::InvalidCredentials,
        StatusCode::TOO_MANY_REQUESTS => FetchFailure::RateLimited,
        other => FetchFailure::Generic(format!("HTTP error! status: {}", other.as_u16())),
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn fetch(
        &self,
        query: &Query,
        units: UnitPreference,
    ) -> Result<WeatherSnapshot, FetchFailure> {
        let mut params: Vec<(&str, String)> = match query {
            Query::City(name) => vec![("q", name.clone())],
            Query::Coordinates(coords) => vec![
                ("lat", coords.latitude().to_string()),
                ("lon", coords.longitude().to_string()),
            ],
        };
        params.push(("units", units.provider_units().to_string()));
        params.push(("appid", self.api_key.clone()));

        debug!(query = %query.label(), units = units.provider_units(), "requesting current weather");

        let res = self
            .http
            .get(self.endpoint())
            .query(&params)
            .send()
            .await
            .map_err(|err| FetchFailure::Network(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            debug!(%status, "weather service returned an error status");
            return Err(classify_status(status, query.label()));
        }

        let body = res
            .text()
            .await
            .map_err(|err| FetchFailure::Network(err.to_string()))?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|err| FetchFailure::Generic(format!("unexpected response: {err}")))?;

        parsed.into_snapshot(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_statuses() {
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, "Atlantis".into()),
            FetchFailure::CityNotFound("Atlantis".into())
        );
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            FetchFailure::InvalidCredentials
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            FetchFailure::RateLimited
        );
        assert_eq!(
            classify_status(StatusCode::BAD_GATEWAY, String::new()),
            FetchFailure::Generic("HTTP error! status: 502".into())
        );
    }

    #[test]
    fn empty_weather_array_is_generic_failure() {
        let parsed: OwCurrentResponse = serde_json::from_str(
            r#"{"name":"X","sys":{},"main":{"temp":1,"feels_like":1,"humidity":1,"pressure":1},
                "weather":[],"wind":{"speed":0},"timezone":0}"#,
        )
        .unwrap();

        let err = parsed.into_snapshot(UnitPreference::Celsius).unwrap_err();
        assert!(matches!(err, FetchFailure::Generic(_)));
    }

    #[test]
    fn debug_hides_api_key() {
        let fetcher = OpenWeatherFetcher::new("SECRET".into());
        let dbg = format!("{fetcher:?}");
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("api.openweathermap.org"));
    }
}
