use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

pub const CONFIG_FILE_NAME: &str = "browser_config.json";
pub const HISTORY_FILE_NAME: &str = "browser_history.json";
pub const ENGINE_DATA_DIR_NAME: &str = "browser_data";
pub const COOKIE_FILE_NAME: &str = "cookies.sqlite";

/// Environment variable that overrides the profile directory.
pub const PROFILE_DIR_ENV: &str = "SKIFF_PROFILE_DIR";

/// Locations of every file the browser persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePaths {
    pub config_file: PathBuf,
    pub history_file: PathBuf,
    /// Persistent storage handed to the web engine (local storage, cookies).
    pub engine_data_dir: PathBuf,
    pub engine_cache_dir: PathBuf,
    /// SQLite cookie jar inside the engine data directory.
    pub cookie_file: PathBuf,
}

impl ProfilePaths {
    /// Lay out a profile inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let engine_data_dir = dir.join(ENGINE_DATA_DIR_NAME);
        ProfilePaths {
            config_file: dir.join(CONFIG_FILE_NAME),
            history_file: dir.join(HISTORY_FILE_NAME),
            engine_cache_dir: engine_data_dir.join("cache"),
            cookie_file: engine_data_dir.join(COOKIE_FILE_NAME),
            engine_data_dir,
        }
    }

    /// `~/.config/skiff` (platform equivalent), falling back to
    /// `$HOME/.config/skiff` and finally the working directory.
    pub fn default_location() -> Result<Self, StoreError> {
        if let Some(dir) = dirs::config_dir() {
            return Ok(Self::in_dir(dir.join("skiff")));
        }
        if let Some(home) = dirs::home_dir() {
            return Ok(Self::in_dir(home.join(".config").join("skiff")));
        }
        std::env::current_dir()
            .map(Self::in_dir)
            .map_err(|_| StoreError::NoProfileDir)
    }

    /// Resolve the profile from `SKIFF_PROFILE_DIR` or the default location.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::resolve(std::env::var_os(PROFILE_DIR_ENV))
    }

    /// An explicit, non-empty directory wins over the default location.
    pub fn resolve(override_dir: Option<OsString>) -> Result<Self, StoreError> {
        match override_dir {
            Some(dir) if !dir.is_empty() => Ok(Self::in_dir(PathBuf::from(dir))),
            _ => Self::default_location(),
        }
    }

    /// Create the profile directory and the engine directories.
    pub fn ensure_dirs(&self) -> Result<(), StoreError> {
        let mut to_create = vec![self.engine_data_dir.as_path(), self.engine_cache_dir.as_path()];
        if let Some(parent) = self.config_file.parent() {
            to_create.push(parent);
        }
        for dir in to_create {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_layout() {
        let paths = ProfilePaths::in_dir("/tmp/profile");
        assert_eq!(
            paths.config_file,
            PathBuf::from("/tmp/profile/browser_config.json")
        );
        assert_eq!(
            paths.history_file,
            PathBuf::from("/tmp/profile/browser_history.json")
        );
        assert_eq!(paths.engine_data_dir, PathBuf::from("/tmp/profile/browser_data"));
        assert_eq!(
            paths.engine_cache_dir,
            PathBuf::from("/tmp/profile/browser_data/cache")
        );
        assert_eq!(
            paths.cookie_file,
            PathBuf::from("/tmp/profile/browser_data/cookies.sqlite")
        );
    }

    #[test]
    fn ensure_dirs_creates_engine_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ProfilePaths::in_dir(tmp.path().join("nested"));
        paths.ensure_dirs().unwrap();
        assert!(paths.engine_data_dir.is_dir());
        assert!(paths.engine_cache_dir.is_dir());
        assert!(paths.config_file.parent().unwrap().is_dir());
    }

    #[test]
    fn override_dir_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ProfilePaths::resolve(Some(tmp.path().as_os_str().to_owned())).unwrap();
        assert_eq!(paths, ProfilePaths::in_dir(tmp.path()));
    }

    #[test]
    fn empty_override_falls_back_to_default_location() {
        let expected = ProfilePaths::default_location().unwrap();
        assert_eq!(ProfilePaths::resolve(Some(OsString::new())).unwrap(), expected);
        assert_eq!(ProfilePaths::resolve(None).unwrap(), expected);
    }

    #[test]
    fn from_env_reads_profile_dir_variable() {
        // Only this test touches SKIFF_PROFILE_DIR.
        let tmp = tempfile::tempdir().unwrap();
        std::env::set_var(PROFILE_DIR_ENV, tmp.path());
        let paths = ProfilePaths::from_env();
        std::env::remove_var(PROFILE_DIR_ENV);
        assert_eq!(paths.unwrap().config_file, tmp.path().join(CONFIG_FILE_NAME));
    }
}
