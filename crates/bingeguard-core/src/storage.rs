//! Persisted-store abstraction.
//!
//! The extension sees two key-value namespaces: a locally-scoped store
//! holding the `watchStats` record and a synced store holding the
//! `netflixSettings` record. The [`Store`] trait models exactly those
//! four operations. Missing records are `Ok(None)`, not errors; I/O and
//! decode failures propagate.
//!
//! [`FileStore`] is the on-disk implementation: stats as JSON, settings
//! as pretty TOML, both under `~/.config/bingeguard[-dev]/`.

use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::settings::Settings;
use crate::stats::WatchStats;

/// Local-scope record filename (key `watchStats`).
const STATS_FILE: &str = "watch_stats.json";
/// Synced-scope record filename (key `netflixSettings`).
const SETTINGS_FILE: &str = "settings.toml";

/// The two persisted namespaces, as simple gets/sets.
pub trait Store {
    fn load_stats(&self) -> Result<Option<WatchStats>, StorageError>;
    fn save_stats(&mut self, stats: &WatchStats) -> Result<(), StorageError>;
    fn load_settings(&self) -> Result<Option<Settings>, StorageError>;
    fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError>;
}

/// In-process store, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    stats: Option<WatchStats>,
    settings: Option<Settings>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            stats: None,
            settings: Some(settings),
        }
    }

    pub fn with_records(stats: WatchStats, settings: Settings) -> Self {
        Self {
            stats: Some(stats),
            settings: Some(settings),
        }
    }
}

impl Store for MemoryStore {
    fn load_stats(&self) -> Result<Option<WatchStats>, StorageError> {
        Ok(self.stats.clone())
    }

    fn save_stats(&mut self, stats: &WatchStats) -> Result<(), StorageError> {
        self.stats = Some(stats.clone());
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<Settings>, StorageError> {
        Ok(self.settings.clone())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.settings = Some(settings.clone());
        Ok(())
    }
}

/// Returns `~/.config/bingeguard[-dev]/` based on BINGEGUARD_ENV.
///
/// Set BINGEGUARD_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BINGEGUARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("bingeguard-dev")
    } else {
        base_dir.join("bingeguard")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::WriteFailed {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// On-disk store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store at the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Open the store at an explicit directory (tests, embedders).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn stats_path(&self) -> PathBuf {
        self.dir.join(STATS_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }
}

fn read_record(path: &Path) -> Result<Option<String>, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_record(path: &Path, content: &str) -> Result<(), StorageError> {
    std::fs::write(path, content).map_err(|source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

impl Store for FileStore {
    fn load_stats(&self) -> Result<Option<WatchStats>, StorageError> {
        let path = self.stats_path();
        let Some(content) = read_record(&path)? else {
            return Ok(None);
        };
        let stats = serde_json::from_str(&content).map_err(|e| StorageError::DecodeFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(Some(stats))
    }

    fn save_stats(&mut self, stats: &WatchStats) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(stats)
            .map_err(|e| StorageError::EncodeFailed(e.to_string()))?;
        write_record(&self.stats_path(), &content)
    }

    fn load_settings(&self) -> Result<Option<Settings>, StorageError> {
        let path = self.settings_path();
        let Some(content) = read_record(&path)? else {
            return Ok(None);
        };
        let settings = toml::from_str(&content).map_err(|e| StorageError::DecodeFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(Some(settings))
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(settings)
            .map_err(|e| StorageError::EncodeFailed(e.to_string()))?;
        write_record(&self.settings_path(), &content)
    }
}
