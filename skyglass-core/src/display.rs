use std::time::Duration;

use crate::{model::WeatherSnapshot, units::UnitPreference};

/// Receives everything the session publishes.
///
/// Implementations render; they never call back into the session.
pub trait DisplaySink: Send + Sync {
    /// Brackets each lookup: `true` when it starts, `false` when it settles.
    fn loading(&self, active: bool);

    /// Show `snapshot` labelled for `unit`. Also called on unit changes.
    fn weather(&self, snapshot: &WeatherSnapshot, unit: UnitPreference);

    /// Show `message` for `window`; held weather stays on screen.
    fn error(&self, message: &str, window: Duration);

    fn clear_error(&self);

    fn recent_searches(&self, cities: &[String]);
}
