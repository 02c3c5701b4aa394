use crate::{
    Config, Query, UnitPreference, WeatherSnapshot, error::FetchFailure,
    provider::openweather::OpenWeatherFetcher,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// One request against a current-weather service.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(
        &self,
        query: &Query,
        units: UnitPreference,
    ) -> Result<WeatherSnapshot, FetchFailure>;
}

/// Construct the OpenWeatherMap fetcher from config.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherFetcher>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
                 Hint: run `skyglass configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let fetcher = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherFetcher::with_base_url(api_key, base_url),
        None => OpenWeatherFetcher::new(api_key),
    };

    Ok(Arc::new(fetcher))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetcher_from_config_works_when_key_configured() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        assert!(fetcher_from_config(&cfg).is_ok());
    }

    #[test]
    fn fetcher_from_config_honours_base_url() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: Some("http://localhost:8080/".into()),
            ..Config::default()
        };

        let fetcher = fetcher_from_config(&cfg).unwrap();
        assert!(format!("{fetcher:?}").contains("http://localhost:8080"));
    }
}
