//! The lookup session: turns user actions into fetches and publishes the
//! outcome of each one.
//!
//! Every lookup that reaches the network or the location capability takes a
//! sequence number when triggered. When it resumes and a newer lookup has
//! been triggered since, its outcome is handed back to the caller but not
//! published, so the most recently triggered lookup always owns the display.
//! A location lookup overtaken while its position is still resolving never
//! reaches the weather service.

use serde::{Deserialize, Serialize};
use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{
    display::DisplaySink,
    error::FailureKind,
    ledger::RecentSearchLedger,
    location::{Geolocator, LOCATION_TIMEOUT, LocationResolver},
    model::{Coordinates, LookupOutcome, Query, WeatherSnapshot},
    provider::WeatherFetcher,
    storage::KeyValueStore,
    units::UnitPreference,
};

/// City looked up when the current location can't be determined at startup.
pub const DEFAULT_CITY: &str = "Benoni";

/// How long an error stays on the error surface.
pub const ERROR_DISPLAY_WINDOW: Duration = Duration::from_secs(5);

/// Which name a successful lookup adds to the recent searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// The user's input for city lookups, the provider's place name for
    /// coordinate lookups.
    #[default]
    QueriedName,
    /// The provider's place name for every lookup.
    ProviderName,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub default_city: String,
    pub location_timeout: Duration,
    pub record_policy: RecordPolicy,
    pub unit: UnitPreference,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            location_timeout: LOCATION_TIMEOUT,
            record_policy: RecordPolicy::default(),
            unit: UnitPreference::default(),
        }
    }
}

#[derive(Debug)]
struct VisibleError {
    message: String,
    shown_at: Instant,
}

#[derive(Debug)]
struct SessionState {
    unit: UnitPreference,
    current: Option<WeatherSnapshot>,
    ledger: RecentSearchLedger,
    error: Option<VisibleError>,
}

/// A lookup that ended before reaching the weather service.
struct Rejected {
    seq: Option<u64>,
    kind: FailureKind,
}

pub struct SessionController {
    fetcher: Arc<dyn WeatherFetcher>,
    resolver: Option<LocationResolver>,
    display: Arc<dyn DisplaySink>,
    settings: SessionSettings,
    issued: AtomicU64,
    state: Mutex<SessionState>,
}

impl SessionController {
    /// `geolocator` is `None` when the host has no location capability.
    pub fn new(
        fetcher: Arc<dyn WeatherFetcher>,
        geolocator: Option<Arc<dyn Geolocator>>,
        store: Arc<dyn KeyValueStore>,
        display: Arc<dyn DisplaySink>,
        settings: SessionSettings,
    ) -> Self {
        let state = SessionState {
            unit: settings.unit,
            current: None,
            ledger: RecentSearchLedger::load(store),
            error: None,
        };

        Self {
            fetcher,
            resolver: geolocator.map(LocationResolver::new),
            display,
            settings,
            issued: AtomicU64::new(0),
            state: Mutex::new(state),
        }
    }

    /// Startup lookup: the current location, or the default city when the
    /// location can't be determined. Location problems are only logged.
    pub async fn initialize(&self) -> LookupOutcome {
        self.display.recent_searches(&self.recent_searches());

        match self.locate().await {
            Ok((seq, coords)) => self.run(seq, Query::Coordinates(coords)).await,
            Err(rejected) if rejected.seq.is_some_and(|seq| !self.is_latest(seq)) => {
                debug!(reason = %rejected.kind, "startup location lookup superseded");
                LookupOutcome::failure(rejected.kind)
            }
            Err(rejected) => {
                warn!(
                    reason = %rejected.kind,
                    city = %self.settings.default_city,
                    "current location unavailable; falling back to default city"
                );
                self.lookup_by_city(&self.settings.default_city).await
            }
        }
    }

    pub async fn lookup_by_city(&self, name: &str) -> LookupOutcome {
        let query = match Query::city(name) {
            Ok(query) => query,
            Err(kind) => return self.fail(None, kind),
        };

        let seq = self.begin();
        self.run(seq, query).await
    }

    /// Looks up the recent search at `index` as if the user had typed it.
    pub async fn lookup_recent(&self, index: usize) -> LookupOutcome {
        let city = self.state().ledger.get(index).map(str::to_string);

        match city {
            Some(city) => self.lookup_by_city(&city).await,
            None => self.fail(None, FailureKind::EmptyQuery),
        }
    }

    pub async fn lookup_by_current_location(&self) -> LookupOutcome {
        match self.locate().await {
            Ok((seq, coords)) => self.run(seq, Query::Coordinates(coords)).await,
            Err(Rejected { seq, kind }) => self.fail(seq, kind),
        }
    }

    /// Relabels the held snapshot for `unit`. Never fetches.
    pub fn change_unit(&self, unit: UnitPreference) {
        let held = {
            let mut state = self.state();
            if state.unit == unit {
                return;
            }
            state.unit = unit;
            state.current.clone()
        };

        debug!(%unit, "unit changed");
        if let Some(snapshot) = held {
            self.display.weather(&snapshot, unit);
        }
    }

    pub fn unit(&self) -> UnitPreference {
        self.state().unit
    }

    pub fn current(&self) -> Option<WeatherSnapshot> {
        self.state().current.clone()
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.state().ledger.entries().to_vec()
    }

    /// The error message, while it is still within its display window.
    pub fn visible_error(&self) -> Option<String> {
        self.state()
            .error
            .as_ref()
            .filter(|err| err.shown_at.elapsed() < ERROR_DISPLAY_WINDOW)
            .map(|err| err.message.clone())
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_seq(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }

    /// Opens a lookup: takes its sequence number and signals loading once.
    fn begin(&self) -> u64 {
        let seq = self.next_seq();
        self.display.loading(true);
        self.clear_error();
        seq
    }

    async fn locate(&self) -> Result<(u64, Coordinates), Rejected> {
        let Some(resolver) = &self.resolver else {
            return Err(Rejected { seq: None, kind: FailureKind::GeolocationUnsupported });
        };

        let seq = self.begin();

        match resolver.resolve(self.settings.location_timeout).await {
            Ok(coords) if self.is_latest(seq) => Ok((seq, coords)),
            Ok(coords) => {
                debug!(seq, %coords, "discarding superseded location lookup");
                Err(Rejected { seq: Some(seq), kind: FailureKind::Superseded })
            }
            Err(failure) => {
                if self.is_latest(seq) {
                    self.display.loading(false);
                }
                Err(Rejected { seq: Some(seq), kind: failure.into() })
            }
        }
    }

    /// Fetches for a lookup already opened by [`Self::begin`].
    async fn run(&self, seq: u64, query: Query) -> LookupOutcome {
        let unit = self.unit();
        debug!(seq, query = %query.label(), "lookup started");

        let result = self.fetcher.fetch(&query, unit).await;

        if !self.is_latest(seq) {
            debug!(seq, query = %query.label(), "discarding superseded lookup");
            return match result {
                Ok(snapshot) => LookupOutcome::Success(snapshot),
                Err(failure) => LookupOutcome::failure(failure.into()),
            };
        }

        self.display.loading(false);

        match result {
            Ok(snapshot) => {
                self.accept(&query, &snapshot);
                LookupOutcome::Success(snapshot)
            }
            Err(failure) => {
                warn!(query = %query.label(), error = %failure, "weather lookup failed");
                self.fail(Some(seq), failure.into())
            }
        }
    }

    fn accept(&self, query: &Query, snapshot: &WeatherSnapshot) {
        let name = match (query, self.settings.record_policy) {
            (Query::City(name), RecordPolicy::QueriedName) => name.as_str(),
            _ => snapshot.place_name.as_str(),
        };

        let (unit, recent) = {
            let mut state = self.state();
            state.ledger.record(name);
            state.current = Some(snapshot.clone());
            (state.unit, state.ledger.entries().to_vec())
        };

        debug!(place = %snapshot.place_label(), "lookup succeeded");
        self.display.weather(snapshot, unit);
        self.display.recent_searches(&recent);
    }

    /// Publishes `kind` unless a newer lookup has been triggered since `seq`.
    fn fail(&self, seq: Option<u64>, kind: FailureKind) -> LookupOutcome {
        let message = kind.user_message();

        if seq.is_none_or(|seq| self.is_latest(seq)) {
            self.state().error =
                Some(VisibleError { message: message.clone(), shown_at: Instant::now() });
            self.display.error(&message, ERROR_DISPLAY_WINDOW);
        }

        LookupOutcome::Failure { kind, message }
    }

    fn clear_error(&self) {
        self.state().error = None;
        self.display.clear_error();
    }
}
