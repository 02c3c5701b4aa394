//! Core library for the `skyglass` weather lookup.
//!
//! This crate defines:
//! - The lookup session controller and its display contract
//! - The OpenWeatherMap fetcher and the location resolver
//! - The recent-search ledger and its key-value storage
//! - Configuration, unit handling and rendering helpers
//!
//! It is used by `skyglass-cli`, but any front end implementing
//! [`DisplaySink`] can drive a [`SessionController`].

pub mod config;
pub mod display;
pub mod error;
pub mod icon;
pub mod ledger;
pub mod location;
pub mod model;
pub mod provider;
pub mod render;
pub mod session;
pub mod storage;
pub mod units;

pub use config::{Config, LocationConfig};
pub use display::DisplaySink;
pub use error::{FailureKind, FetchFailure, LocationFailure};
pub use icon::WeatherIcon;
pub use ledger::RecentSearchLedger;
pub use location::{FixedGeolocator, Geolocator, IpGeolocator, LocationResolver};
pub use model::{Coordinates, LookupOutcome, Query, WeatherSnapshot};
pub use provider::{WeatherFetcher, openweather::OpenWeatherFetcher};
pub use render::WeatherView;
pub use session::{RecordPolicy, SessionController, SessionSettings};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use units::UnitPreference;
