// YAML configuration for the tasklist binary

use crate::storage::{FileStorage, KeyValueStore, SqliteStorage};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "config.yaml";
const DB_FILE: &str = "tasklist.db";

/// Which durable medium backs the stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the database (sqlite) or key files (file)
    pub data_dir: PathBuf,
    pub backend: Backend,
    /// Maximum tracing level: error, warn, info, debug or trace
    pub log_level: String,
    /// File this config was read from; `None` when running on defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from(".tasklist")),
            backend: Backend::default(),
            log_level: "warn".to_string(),
            source: None,
        }
    }
}

impl Config {
    /// `<config_dir>/tasklist/config.yaml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Ok(Self::default()),
        };

        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).wrap_err_with(|| format!("Failed to read config {:?}", path))?;
        let mut config = Self::from_yaml(&content).wrap_err_with(|| format!("Failed to parse config {:?}", path))?;
        config.source = Some(path);
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes as null rather than an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .wrap_err_with(|| format!("Invalid log_level: {}", self.log_level))
    }

    /// Open the configured backend under `data_dir`
    pub fn open_storage(&self) -> Result<Box<dyn KeyValueStore>> {
        let storage: Box<dyn KeyValueStore> = match self.backend {
            Backend::Sqlite => Box::new(SqliteStorage::open(self.data_dir.join(DB_FILE))?),
            Backend::File => Box::new(FileStorage::open(&self.data_dir)?),
        };
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.log_level, "warn");
        assert!(config.data_dir.ends_with(APP_DIR) || config.data_dir.ends_with(".tasklist"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("backend: file\n").unwrap();
        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_full_yaml() {
        let config = Config::from_yaml("data_dir: /tmp/tl\nbackend: sqlite\nlog_level: debug\n").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tl"));
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.log_level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_yaml() {
        assert!(Config::from_yaml("backend: floppy\n").is_err());
    }

    #[test]
    fn test_bad_log_level() {
        let config = Config::from_yaml("log_level: loud\n").unwrap();
        assert!(config.log_level().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(Some(temp.path().join("nope.yaml").as_path())).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.source, None);
    }

    #[test]
    fn test_load_file_and_open_storage() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(
            &config_path,
            format!("data_dir: {}\nbackend: file\n", data_dir.display()),
        )
        .unwrap();

        let config = Config::load(Some(config_path.as_path())).unwrap();
        assert_eq!(config.data_dir, data_dir);
        assert_eq!(config.source.as_deref(), Some(config_path.as_path()));

        let mut storage = config.open_storage().unwrap();
        storage.set("theme", "dark").unwrap();
        assert!(data_dir.join("theme").exists());
    }

    #[test]
    fn test_open_sqlite_storage() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp.path().to_path_buf(),
            ..Config::default()
        };

        let mut storage = config.open_storage().unwrap();
        storage.set("todos", "[]").unwrap();
        assert!(temp.path().join(DB_FILE).exists());
    }
}
