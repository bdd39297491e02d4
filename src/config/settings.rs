//! Application settings and paths.
//!
//! Settings live in a JSON file in the XDG config directory
//! (`~/.config/portscan/settings.json` on Linux). A missing file means
//! built-in defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::pipeline::{DEFAULT_PORTS, DEFAULT_TIMEOUT};
use crate::scanner::pool::DEFAULT_THREADS;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portscan)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created on disk.
    pub fn resolve() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portscan", "portscan")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Defaults applied when the command line leaves a value unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Number of concurrent workers.
    pub threads: usize,
    /// Per-port timeout in milliseconds.
    pub timeout_ms: u64,
    /// Report failed ports too.
    pub verbose: bool,
    /// Range tokens scanned when none are given.
    pub ports: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            verbose: false,
            ports: vec![DEFAULT_PORTS.to_string()],
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if there is none.
    pub fn load() -> ConfigResult<Self> {
        let file = match Paths::resolve() {
            Ok(paths) => paths.settings_file(),
            Err(e) => {
                debug!(error = %e, "no configuration directory, using defaults");
                return Ok(Self::default());
            }
        };

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}
