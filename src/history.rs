//! Recently saved codes, persisted in a key-value store.
//!
//! The list lives as one JSON array under [`HISTORY_KEY`], newest first,
//! capped at [`MAX_ENTRIES`]. Saving the same content twice in a row keeps
//! a single entry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::epoch_millis;

/// Store key holding the serialized history list.
pub const HISTORY_KEY: &str = "qr_history";

/// Maximum number of entries kept.
pub const MAX_ENTRIES: usize = 10;

// ============================================================================
// Key-Value Stores
// ============================================================================

/// A string-to-string store, in the manner of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The file is read on every access and rewritten on every change. A
/// missing file reads as an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value);
        self.save(&values)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

// ============================================================================
// History
// ============================================================================

/// When an entry was saved.
///
/// New entries store epoch milliseconds. Lists written by the browser front
/// end carry a locale date string such as `"1/2/2026"`, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryDate {
    Millis(u64),
    Text(String),
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millis(ms) => write!(f, "{ms}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One saved code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Text shown in the list.
    pub label: String,

    /// The encoded payload.
    pub content: String,

    /// Payload category, e.g. `"url"`.
    #[serde(rename = "type")]
    pub kind: String,

    pub date: EntryDate,
}

impl HistoryEntry {
    pub fn new(label: impl Into<String>, content: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
            kind: kind.into(),
            date: EntryDate::Millis(epoch_millis()),
        }
    }
}

/// Most-recent-first list of saved codes.
#[derive(Debug, Clone, Default)]
pub struct History<S> {
    store: S,
}

impl<S: KeyValueStore> History<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the saved entries for display, newest first.
    ///
    /// A payload that fails to parse is logged and reads as empty. It is
    /// left in the store untouched.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        match self.load() {
            Err(Error::Json(e)) => {
                warn!("Ignoring unreadable history under {HISTORY_KEY:?}: {e}");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Records a new entry stamped with the current time.
    ///
    /// See [`push`](Self::push).
    pub fn record(&mut self, label: &str, content: &str, kind: &str) -> Result<bool> {
        self.push(HistoryEntry::new(label, content, kind))
    }

    /// Prepends `entry` unless its content equals the newest entry's.
    ///
    /// Only the newest entry is compared. The oldest entry is dropped when
    /// the list grows past [`MAX_ENTRIES`]. Returns false if the entry was
    /// suppressed as a duplicate.
    ///
    /// Fails with [`Error::Json`] instead of overwriting an unreadable payload.
    pub fn push(&mut self, entry: HistoryEntry) -> Result<bool> {
        let mut entries = self.load()?;
        if entries.first().is_some_and(|newest| newest.content == entry.content) {
            return Ok(false);
        }
        entries.insert(0, entry);
        entries.truncate(MAX_ENTRIES);
        self.write(&entries)?;
        Ok(true)
    }

    /// Deletes every entry with the given content. Returns how many were removed.
    ///
    /// Fails with [`Error::Json`] instead of overwriting an unreadable payload.
    pub fn remove(&mut self, content: &str) -> Result<usize> {
        let mut entries = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.content != content);
        let removed = before - entries.len();
        if removed > 0 {
            self.write(&entries)?;
        }
        Ok(removed)
    }

    /// Deletes the whole history.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(HISTORY_KEY)
    }

    fn load(&self) -> Result<Vec<HistoryEntry>> {
        match self.store.get(HISTORY_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write(&mut self, entries: &[HistoryEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.store.set(HISTORY_KEY, json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> History<MemoryStore> {
        History::new(MemoryStore::new())
    }

    #[test]
    fn newest_entry_comes_first() {
        let mut h = history();
        h.record("a", "a", "url").unwrap();
        h.record("b", "b", "url").unwrap();
        let contents: Vec<_> = h.entries().unwrap().into_iter().map(|e| e.content).collect();
        assert_eq!(contents, vec!["b", "a"]);
    }

    #[test]
    fn consecutive_duplicates_are_suppressed() {
        let mut h = history();
        assert!(h.record("x", "x", "url").unwrap());
        assert!(!h.record("x", "x", "url").unwrap());
        assert_eq!(h.entries().unwrap().len(), 1);
    }

    #[test]
    fn only_the_newest_entry_is_compared() {
        let mut h = history();
        h.record("x", "x", "url").unwrap();
        h.record("y", "y", "url").unwrap();
        assert!(h.record("x", "x", "url").unwrap());
        assert_eq!(h.entries().unwrap().len(), 3);
    }

    #[test]
    fn capped_with_oldest_evicted() {
        let mut h = history();
        for i in 0..=MAX_ENTRIES {
            h.record(&i.to_string(), &i.to_string(), "url").unwrap();
        }
        let entries = h.entries().unwrap();
        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries[0].content, MAX_ENTRIES.to_string());
        assert!(entries.iter().all(|e| e.content != "0"));
    }

    #[test]
    fn remove_and_clear() {
        let mut h = history();
        h.record("a", "a", "url").unwrap();
        h.record("b", "b", "url").unwrap();
        h.record("a", "a", "url").unwrap();

        assert_eq!(h.remove("a").unwrap(), 2);
        assert_eq!(h.remove("missing").unwrap(), 0);
        assert_eq!(h.entries().unwrap().len(), 1);

        h.clear().unwrap();
        assert!(h.entries().unwrap().is_empty());
        assert_eq!(h.store().get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_payload_reads_as_empty_but_is_not_overwritten() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{not json".to_string()).unwrap();
        let mut h = History::new(store);
        assert!(h.entries().unwrap().is_empty());

        assert!(matches!(h.record("a", "a", "url"), Err(Error::Json(_))));
        assert!(matches!(h.remove("a"), Err(Error::Json(_))));
        assert_eq!(
            h.store().get(HISTORY_KEY).unwrap().as_deref(),
            Some("{not json")
        );

        h.clear().unwrap();
        assert!(h.record("a", "a", "url").unwrap());
        assert_eq!(h.entries().unwrap().len(), 1);
    }

    #[test]
    fn string_dated_entries_survive_new_saves() {
        let mut store = MemoryStore::new();
        let legacy = r#"[
            {"label":"b","content":"b","type":"url","date":"1/2/2026"},
            {"label":"a","content":"a","type":"wifi","date":"12/31/2025"}
        ]"#;
        store.set(HISTORY_KEY, legacy.to_string()).unwrap();
        let mut h = History::new(store);

        assert!(h.record("c", "c", "url").unwrap());
        let entries = h.entries().unwrap();
        let contents: Vec<_> = entries.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["c", "b", "a"]);
        assert!(matches!(entries[0].date, EntryDate::Millis(_)));
        assert_eq!(entries[1].date, EntryDate::Text("1/2/2026".into()));
        assert_eq!(entries[2].date.to_string(), "12/31/2025");
        assert_eq!(entries[2].kind, "wifi");
    }

    #[test]
    fn entry_json_uses_type_key() {
        let entry = HistoryEntry {
            label: "Example".into(),
            content: "https://example.com".into(),
            kind: "url".into(),
            date: EntryDate::Millis(1_700_000_000_000),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"label":"Example","content":"https://example.com","type":"url","date":1700000000000}"#
        );
    }

    #[test]
    fn json_file_store_persists_across_instances() {
        let dir = std::env::temp_dir().join(format!("qr-pro-store-{}", std::process::id()));
        let path = dir.join("store.json");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v".to_string()).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("k").unwrap(), Some("v".to_string()));

        store.remove("k").unwrap();
        assert_eq!(reopened.get("k").unwrap(), None);

        let _ = fs::remove_dir_all(&dir);
    }
}
