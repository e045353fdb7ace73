//! Bounded, most-recent-first history of past search queries.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{collections::HashMap, fs, io::ErrorKind, path::PathBuf};

/// Storage slot holding the JSON-encoded query list.
pub const HISTORY_KEY: &str = "recent_searches";

/// Cap on retained queries.
pub const MAX_ENTRIES: usize = 5;

/// Durable single-slot storage for small JSON blobs.
pub trait KeyValueStore: Send {
    /// # Errors
    ///
    /// I/O failures other than "slot absent".
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// # Errors
    ///
    /// I/O failures while persisting.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the slot entirely. Deleting an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// I/O failures other than "slot absent".
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// [`KeyValueStore`] backed by one JSON file per key in a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store under the platform data directory.
    ///
    /// # Errors
    ///
    /// Fails when the platform data directory cannot be determined.
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "zephyr", "zephyr")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(Self { dir: dirs.data_dir().to_path_buf() })
    }

    /// Store rooted at an explicit directory.
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read store slot: {}", path.display()))
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store directory: {}", self.dir.display()))?;

        let path = self.slot_path(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write store slot: {}", path.display()))
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to delete store slot: {}", path.display()))
            }
        }
    }
}

/// In-memory [`KeyValueStore`], for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// The recent-search ledger: at most [`MAX_ENTRIES`] queries, most recent
/// first, unique by case-sensitive equality.
#[derive(Debug)]
pub struct SearchHistory<S> {
    store: S,
    entries: Vec<String>,
}

impl<S: KeyValueStore> SearchHistory<S> {
    /// Read the persisted list. Absent or malformed persisted state yields
    /// an empty history; it is logged, never raised.
    pub fn load(store: S) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!("discarding malformed search history: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("could not read search history: {e}");
                Vec::new()
            }
        };

        Self { store, entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Move `query` to the front (removing any existing duplicate),
    /// truncate to [`MAX_ENTRIES`] and persist the full list.
    ///
    /// # Errors
    ///
    /// Persistence failures; the in-memory list is updated regardless.
    pub fn record(&mut self, query: &str) -> Result<()> {
        self.entries.retain(|q| q != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(MAX_ENTRIES);

        let blob = serde_json::to_string(&self.entries)
            .context("Failed to serialize search history")?;
        self.store.set(HISTORY_KEY, &blob)
    }

    /// Empty the list and remove the persisted slot entirely (not an
    /// empty-list write).
    ///
    /// # Errors
    ///
    /// Persistence failures.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.store.delete(HISTORY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> SearchHistory<MemoryStore> {
        SearchHistory::load(MemoryStore::default())
    }

    #[test]
    fn record_prepends_most_recent_first() {
        let mut h = history();
        h.record("London").unwrap();
        h.record("Paris").unwrap();

        assert_eq!(h.entries(), ["Paris", "London"]);
    }

    #[test]
    fn duplicate_moves_to_front_without_growing() {
        let mut h = history();
        h.record("London").unwrap();
        h.record("Paris").unwrap();
        h.record("London").unwrap();

        assert_eq!(h.entries(), ["London", "Paris"]);
    }

    #[test]
    fn dedup_is_case_sensitive() {
        let mut h = history();
        h.record("london").unwrap();
        h.record("London").unwrap();

        assert_eq!(h.entries(), ["London", "london"]);
    }

    #[test]
    fn six_distinct_records_keep_latest_five() {
        let mut h = history();
        for city in ["A", "B", "C", "D", "E", "F"] {
            h.record(city).unwrap();
        }

        assert_eq!(h.entries(), ["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn record_persists_and_reloads() {
        let mut h = history();
        h.record("London").unwrap();
        h.record("Paris").unwrap();

        let reloaded = SearchHistory::load(h.store);
        assert_eq!(reloaded.entries(), ["Paris", "London"]);
    }

    #[test]
    fn clear_removes_the_persisted_slot() {
        let mut h = history();
        h.record("London").unwrap();
        h.clear().unwrap();

        assert!(h.entries().is_empty());
        assert_eq!(h.store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn malformed_persisted_state_loads_as_empty() {
        let mut store = MemoryStore::default();
        store.set(HISTORY_KEY, "{not json").unwrap();

        let h = SearchHistory::load(store);
        assert!(h.entries().is_empty());
    }

    #[test]
    fn wrong_shape_persisted_state_loads_as_empty() {
        let mut store = MemoryStore::default();
        store.set(HISTORY_KEY, r#"{"queries": []}"#).unwrap();

        let h = SearchHistory::load(store);
        assert!(h.entries().is_empty());
    }
}
