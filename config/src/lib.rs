//! Configuration for Charter.
//!
//! Read from `~/.charter/config.toml`. Every setting is optional; a missing
//! file means defaults.
//!
//! ```toml
//! [app]
//! data_dir = "/var/lib/charter"
//! grace_period_ms = 300
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;
use toml::de;

/// Environment variable overriding `[app].data_dir`.
pub const DATA_DIR_ENV: &str = "CHARTER_DATA_DIR";

pub const DEFAULT_GRACE_PERIOD_MS: u64 = 300;

#[derive(Debug, Default, Deserialize)]
pub struct CharterConfig {
    pub app: Option<AppConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Directory holding the durable key files.
    pub data_dir: Option<PathBuf>,
    /// Delay between bootstrap and the first rendered step.
    pub grace_period_ms: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl CharterConfig {
    /// Load from the default location. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map(Some).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Storage directory: env override, then config, then `~/.charter/data`.
    #[must_use]
    pub fn data_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Some(PathBuf::from(dir));
        }
        self.app
            .as_ref()
            .and_then(|app| app.data_dir.clone())
            .or_else(default_data_dir)
    }

    #[must_use]
    pub fn grace_period(&self) -> Duration {
        let millis = self
            .app
            .as_ref()
            .and_then(|app| app.grace_period_ms)
            .unwrap_or(DEFAULT_GRACE_PERIOD_MS);
        Duration::from_millis(millis)
    }
}

#[must_use]
pub fn charter_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".charter"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    charter_home().map(|home| home.join("config.toml"))
}

#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    charter_home().map(|home| home.join("data"))
}
