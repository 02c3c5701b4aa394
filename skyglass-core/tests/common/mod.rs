//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use skyglass_core::{
    Coordinates, DisplaySink, FetchFailure, Geolocator, LocationFailure, Query, UnitPreference,
    WeatherFetcher, WeatherSnapshot,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

/// Place name the stub fetcher reports for coordinate queries.
pub const NEARBY_PLACE: &str = "Springs";

pub fn snapshot(place: &str, units: UnitPreference) -> WeatherSnapshot {
    WeatherSnapshot {
        place_name: place.to_string(),
        country: "ZA".into(),
        description: "clear sky".into(),
        condition: "Clear".into(),
        icon_code: "01d".into(),
        temperature: 22.4,
        feels_like: 21.9,
        humidity_pct: 40,
        wind_speed: 3.1,
        pressure_hpa: 1015.0,
        timezone_offset_secs: 7200,
        fetched_in: units,
    }
}

/// Answers every city with a snapshot named after it, unless told otherwise.
#[derive(Debug, Default)]
pub struct StubFetcher {
    calls: Mutex<Vec<(Query, UnitPreference)>>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, FetchFailure>,
    places: HashMap<String, String>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, city: &str, delay: Duration) -> Self {
        self.delays.insert(city.to_string(), delay);
        self
    }

    pub fn with_failure(mut self, city: &str, failure: FetchFailure) -> Self {
        self.failures.insert(city.to_string(), failure);
        self
    }

    /// Report `place` as the provider's name for `city`.
    pub fn with_place(mut self, city: &str, place: &str) -> Self {
        self.places.insert(city.to_string(), place.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(Query, UnitPreference)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl WeatherFetcher for StubFetcher {
    async fn fetch(
        &self,
        query: &Query,
        units: UnitPreference,
    ) -> Result<WeatherSnapshot, FetchFailure> {
        self.calls.lock().unwrap().push((query.clone(), units));

        let key = match query {
            Query::City(name) => name.clone(),
            Query::Coordinates(_) => NEARBY_PLACE.to_string(),
        };

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(failure) = self.failures.get(&key) {
            return Err(failure.clone());
        }

        let place = self.places.get(&key).unwrap_or(&key);
        Ok(snapshot(place, units))
    }
}

/// Fails every request with the same kind.
#[derive(Debug)]
pub struct FailingGeolocator(pub LocationFailure);

#[async_trait]
impl Geolocator for FailingGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationFailure> {
        Err(self.0)
    }
}

/// Never answers.
#[derive(Debug)]
pub struct HangingGeolocator;

#[async_trait]
impl Geolocator for HangingGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationFailure> {
        std::future::pending().await
    }
}

/// Answers with `answer` after `delay`.
#[derive(Debug)]
pub struct SlowGeolocator {
    pub delay: Duration,
    pub answer: Result<Coordinates, LocationFailure>,
}

#[async_trait]
impl Geolocator for SlowGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationFailure> {
        tokio::time::sleep(self.delay).await;
        self.answer
    }
}

pub fn benoni_coords() -> Coordinates {
    Coordinates::new(-26.19, 28.32).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Loading(bool),
    Weather { place: String, unit: UnitPreference },
    Error(String),
    ClearError,
    Recent(Vec<String>),
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    events: Mutex<Vec<Event>>,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn weather_places(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Weather { place, .. } => Some(place),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl DisplaySink for RecordingDisplay {
    fn loading(&self, active: bool) {
        self.push(Event::Loading(active));
    }

    fn weather(&self, snapshot: &WeatherSnapshot, unit: UnitPreference) {
        self.push(Event::Weather { place: snapshot.place_name.clone(), unit });
    }

    fn error(&self, message: &str, _window: Duration) {
        self.push(Event::Error(message.to_string()));
    }

    fn clear_error(&self) {
        self.push(Event::ClearError);
    }

    fn recent_searches(&self, cities: &[String]) {
        self.push(Event::Recent(cities.to_vec()));
    }
}
