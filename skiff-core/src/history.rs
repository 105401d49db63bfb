use chrono::{DateTime, Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{write_file, StoreError};

/// Entries older than this many days are dropped on every append.
pub const RETENTION_DAYS: i64 = 30;

/// Number of entries shown directly in the History menu.
pub const HISTORY_MENU_LIMIT: usize = 10;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A timestamped record of a visited URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    /// ISO-8601 local time, e.g. `2026-10-17T09:30:12.000123`.
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(url: impl Into<String>, at: NaiveDateTime) -> Self {
        HistoryEntry {
            url: url.into(),
            timestamp: format_timestamp(at),
        }
    }

    /// The parsed timestamp, or `None` when the stored string is malformed.
    pub fn visited_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp. Naive ISO-8601 is taken as local time; RFC 3339
/// strings with an offset are converted to local time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Some(naive);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

/// Keep only entries newer than `now - RETENTION_DAYS`. Entries whose
/// timestamp cannot be parsed are dropped. Returns how many were removed.
pub fn prune(entries: &mut Vec<HistoryEntry>, now: NaiveDateTime) -> usize {
    let cutoff = now - Duration::days(RETENTION_DAYS);
    let before = entries.len();
    entries.retain(|entry| match entry.visited_at() {
        Some(at) => at > cutoff,
        None => {
            log::warn!(
                "Dropping history entry for {} with bad timestamp {:?}",
                entry.url,
                entry.timestamp
            );
            false
        }
    });
    before - entries.len()
}

/// Visit history persisted as a JSON array at a fixed path.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Create a store and load whatever is already on disk.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = HistoryStore {
            path: path.into(),
            entries: Vec::new(),
        };
        store.entries = store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the history file. A missing or malformed file yields no entries;
    /// individual malformed elements are skipped.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("Failed to read history {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        let raw: Vec<serde_json::Value> = match serde_json::from_str(&contents) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!(
                    "Ignoring malformed history {}: {}",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        let entries: Vec<HistoryEntry> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping malformed history entry: {}", e);
                    None
                }
            })
            .collect();
        log::debug!(
            "Loaded {} history entries from {}",
            entries.len(),
            self.path.display()
        );
        entries
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a visit to `url` now, prune, and persist.
    pub fn append(&mut self, url: &str) -> Result<(), StoreError> {
        self.append_at(url, Local::now().naive_local())
    }

    /// Record a visit at `now`, drop everything outside the retention window,
    /// then write the pruned list.
    pub fn append_at(&mut self, url: &str, now: NaiveDateTime) -> Result<(), StoreError> {
        self.entries.push(HistoryEntry::new(url, now));
        let removed = prune(&mut self.entries, now);
        if removed > 0 {
            log::debug!("Pruned {} expired history entries", removed);
        }
        self.save()
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(&self.entries).map_err(|e| StoreError::json(&self.path, e))?;
        write_file(&self.path, &json)
    }

    /// Up to `limit` of the most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        let start = self.entries.len().saturating_sub(limit);
        self.entries[start..].iter().rev()
    }
}
