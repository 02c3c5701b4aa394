use std::sync::Arc;

use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Maximum number of remembered cities.
pub const LEDGER_CAPACITY: usize = 5;

/// Storage key holding the ledger as a JSON array of strings.
pub const LEDGER_KEY: &str = "recent_searches";

/// Most-recent-first list of searched cities, unique ignoring case.
#[derive(Debug, Clone)]
pub struct RecentSearchLedger {
    entries: Vec<String>,
    store: Arc<dyn KeyValueStore>,
}

impl RecentSearchLedger {
    /// Loads the ledger from `store`.
    ///
    /// Missing, unreadable or malformed data yields an empty ledger.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let raw = match store.get(LEDGER_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "could not read recent searches; starting empty");
                None
            }
        };

        let stored: Vec<String> = match raw.as_deref().map(serde_json::from_str) {
            None => Vec::new(),
            Some(Ok(entries)) => entries,
            Some(Err(err)) => {
                warn!(error = %err, "recent searches are malformed; starting empty");
                Vec::new()
            }
        };

        // Oldest first so that the newest ends up at the front.
        let mut ledger = Self { entries: Vec::new(), store };
        for city in stored.iter().rev() {
            ledger.insert(city);
        }

        debug!(count = ledger.entries.len(), "loaded recent searches");
        ledger
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves `city` to the front, dropping any entry equal to it ignoring
    /// case, then persists. Blank names are ignored.
    pub fn record(&mut self, city: &str) {
        if !self.insert(city) {
            return;
        }
        self.persist();
    }

    fn insert(&mut self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() {
            return false;
        }

        let lower = city.to_lowercase();
        self.entries.retain(|existing| existing.to_lowercase() != lower);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(LEDGER_CAPACITY);
        true
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "could not serialize recent searches");
                return;
            }
        };

        if let Err(err) = self.store.set(LEDGER_KEY, &json) {
            warn!(error = %err, "could not persist recent searches");
        }
    }
}
