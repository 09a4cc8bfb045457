use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::TimeBudget;

/// Saved preferences. Session results are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub time_budget_secs: u32,
    pub voice_enabled: bool,
    pub speech_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_budget_secs: TimeBudget::default().secs(),
            voice_enabled: false,
            speech_command: None,
        }
    }
}

impl Config {
    /// The saved budget, or the default when the file holds an unsupported value.
    pub fn time_budget(&self) -> TimeBudget {
        TimeBudget::new(self.time_budget_secs).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring configured time budget");
            TimeBudget::default()
        })
    }
}

impl From<&crate::RuntimeSettings> for Config {
    fn from(rs: &crate::RuntimeSettings) -> Self {
        Self {
            time_budget_secs: rs.budget.secs(),
            voice_enabled: rs.voice_enabled,
            speech_command: rs.speech_command.clone(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };

        serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), %err, "unreadable config, using defaults");
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            time_budget_secs: 120,
            voice_enabled: true,
            speech_command: Some("espeak -v en-gb".into()),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
        assert_eq!(loaded.time_budget().secs(), 120);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "voice_enabled": true }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert!(cfg.voice_enabled);
        assert_eq!(cfg.time_budget_secs, 60);
    }

    #[test]
    fn unsupported_budget_falls_back() {
        let cfg = Config {
            time_budget_secs: 7,
            ..Config::default()
        };
        assert_eq!(cfg.time_budget(), TimeBudget::default());
    }
}
