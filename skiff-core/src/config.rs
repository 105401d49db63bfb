use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{write_file, StoreError};

pub const DEFAULT_HOME_PAGE: &str = "https://www.tradingview.com/chart/";

/// User preferences, persisted to `browser_config.json`.
///
/// `#[serde(default)]` fills any key missing from an existing file with its
/// default, so a file holding only `bookmarks` still gets the default home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub home_page: String,
    pub bookmarks: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            home_page: String::from(DEFAULT_HOME_PAGE),
            bookmarks: Vec::new(),
        }
    }
}

impl Config {
    /// Append `url` unless it is already bookmarked. Returns whether it was added.
    pub fn add_bookmark(&mut self, url: &str) -> bool {
        if self.bookmarks.iter().any(|b| b == url) {
            return false;
        }
        self.bookmarks.push(url.to_string());
        true
    }
}

/// Reads and writes a [`Config`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, falling back to defaults when the file is missing or
    /// unreadable.
    pub fn load(&self) -> Config {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", self.path.display());
                return Config::default();
            }
            Err(e) => {
                log::warn!("Failed to read config {}: {}", self.path.display(), e);
                return Config::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Ignoring malformed config {}: {}",
                    self.path.display(),
                    e
                );
                self.set_aside();
                Config::default()
            }
        }
    }

    /// Where a malformed config is moved before defaults replace it.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Move the current file to [`backup_path`](Self::backup_path) so the next
    /// save cannot overwrite the user's bookmarks.
    fn set_aside(&self) {
        let backup = self.backup_path();
        match std::fs::rename(&self.path, &backup) {
            Ok(()) => log::warn!("Moved malformed config to {}", backup.display()),
            Err(e) => log::error!(
                "Failed to move malformed config {} aside: {}; it will be replaced on save",
                self.path.display(),
                e
            ),
        }
    }

    /// Overwrite the file with the full config.
    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(config).map_err(|e| StoreError::json(&self.path, e))?;
        write_file(&self.path, &json)?;
        log::debug!(
            "Saved config with {} bookmarks to {}",
            config.bookmarks.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("browser_config.json"))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = store_in(&tmp).load();
        assert_eq!(config, Config::default());
        assert_eq!(config.home_page, DEFAULT_HOME_PAGE);
        assert!(config.bookmarks.is_empty());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        std::fs::write(store.path(), r#"{"bookmarks": ["http://a.com"]}"#).unwrap();
        let config = store.load();
        assert_eq!(config.home_page, DEFAULT_HOME_PAGE);
        assert_eq!(config.bookmarks, vec!["http://a.com".to_string()]);

        std::fs::write(store.path(), r#"{"home_page": "https://start.example"}"#).unwrap();
        let config = store.load();
        assert_eq!(config.home_page, "https://start.example");
        assert!(config.bookmarks.is_empty());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_survives_next_save() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        let damaged = r#"{"bookmarks": ["http://keep.me"],"#;
        std::fs::write(store.path(), damaged).unwrap();

        let config = store.load();
        assert_eq!(config, Config::default());
        assert!(!store.path().exists());
        assert_eq!(
            store.backup_path(),
            tmp.path().join("browser_config.json.bak")
        );

        store.save(&config).unwrap();
        assert_eq!(std::fs::read_to_string(store.backup_path()).unwrap(), damaged);
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn missing_file_leaves_no_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        store.load();
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        std::fs::write(
            store.path(),
            r#"{"home_page": "http://h", "bookmarks": [], "history": []}"#,
        )
        .unwrap();
        assert_eq!(store.load().home_page, "http://h");
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        let config = Config {
            home_page: "https://home.example".to_string(),
            bookmarks: vec!["http://a.com".to_string(), "https://b.org/x".to_string()],
        };
        store.save(&config).unwrap();
        assert_eq!(store.load(), config);

        // Saving what was loaded keeps the same content.
        store.save(&store.load()).unwrap();
        assert_eq!(store.load(), config);
    }

    #[test]
    fn saved_file_uses_documented_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        store.save(&Config::default()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["home_page"], DEFAULT_HOME_PAGE);
        assert!(raw["bookmarks"].as_array().unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("a/b/browser_config.json"));
        store.save(&Config::default()).unwrap();
        assert!(store.path().is_file());
    }

    #[test]
    fn add_bookmark_skips_duplicates() {
        let mut config = Config::default();
        assert!(config.add_bookmark("http://a.com"));
        assert!(!config.add_bookmark("http://a.com"));
        assert!(config.add_bookmark("http://b.com"));
        assert_eq!(config.bookmarks, vec!["http://a.com", "http://b.com"]);
    }
}
