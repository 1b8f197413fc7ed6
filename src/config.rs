//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/qs-recolor/config.json`.  Every field is optional, so a
//! minimal `{}` file is valid and a missing file means "all defaults".
//! A default file that exists but cannot be parsed is reported with a
//! warning and the defaults are used.
//!
//! # Example
//!
//! ```json
//! {
//!   "palette_path": "~/.local/state/quickshell/user/generated/material_colors.scss",
//!   "target_path": "~/.config/quickshell/ii/modules/common/Appearance.qml",
//!   "executable": "quickshell",
//!   "backup": true,
//!   "wait": { "timeout_ms": 5000, "poll_ms": 100 },
//!   "restart": {
//!     "enabled": true,
//!     "grace_ms": 2000,
//!     "kill_wait_ms": 1000,
//!     "relaunch": true,
//!     "verify_ms": 1000
//!   }
//! }
//! ```
//!
//! A leading `~/` in either path is expanded to the home directory.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Palette written by the generator.
    pub palette_path: PathBuf,
    /// Shell color file that gets patched.
    pub target_path: PathBuf,
    /// Name of the shell executable to restart.
    pub executable: String,
    /// Copy the target to `<target>.backup` before the first rewrite.
    pub backup: bool,
    /// How long to wait for the palette file to appear.
    pub wait: WaitConfig,
    /// Shell restart behaviour.
    pub restart: RestartConfig,
}

/// Bounded polling for the palette file.  Durations are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Give up after this long.  `0` checks exactly once.
    pub timeout_ms: u64,
    /// Delay between checks.
    pub poll_ms: u64,
}

/// Shell restart behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    /// Restart the shell after patching.
    pub enabled: bool,
    /// Grace period between `SIGTERM` and the second listing (ms).
    pub grace_ms: u64,
    /// Pause after `SIGKILL` before relaunching (ms).
    pub kill_wait_ms: u64,
    /// Launch a new instance once the old one is gone.
    pub relaunch: bool,
    /// Delay before checking that the relaunched shell is running (ms).
    pub verify_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let state = dirs::state_dir().unwrap_or_else(|| home().join(".local").join("state"));
        let config = dirs::config_dir().unwrap_or_else(|| home().join(".config"));
        Self {
            palette_path: state.join("quickshell/user/generated/material_colors.scss"),
            target_path: config.join("quickshell/ii/modules/common/Appearance.qml"),
            executable: "quickshell".into(),
            backup: true,
            wait: WaitConfig::default(),
            restart: RestartConfig::default(),
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            poll_ms: 100,
        }
    }
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            grace_ms: 2000,
            kill_wait_ms: 1000,
            relaunch: true,
            verify_ms: 1000,
        }
    }
}

impl WaitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load `path` if it exists, otherwise use the defaults.  A file that
    /// exists but cannot be loaded is logged as a warning and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("no config file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.palette_path = expand_home(&config.palette_path);
        config.target_path = expand_home(&config.target_path);
        Ok(config)
    }
}

/// Default location of the config file (`$XDG_CONFIG_HOME/qs-recolor/config.json`).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| home().join(".config"))
        .join("qs-recolor")
        .join("config.json")
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"))
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
