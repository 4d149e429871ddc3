//! Layered settings: built-in defaults, then the JSON config file, then
//! command-line flags.
use super::args::AppArgs;
use crate::console::{DeviceInfo, DEFAULT_MAX_ENTRIES};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "device-console.json";
pub const DEFAULT_LOG_FILE_NAME: &str = "idevice_log.txt";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

/// Device fields that replace the detected values when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceOverrides {
    pub os_version: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
}

impl DeviceOverrides {
    fn apply(&self, mut device: DeviceInfo) -> DeviceInfo {
        if let Some(os_version) = &self.os_version {
            device.os_version = os_version.clone();
        }
        if let Some(name) = &self.name {
            device.name = name.clone();
        }
        if let Some(model) = &self.model {
            device.model = model.clone();
        }
        device
    }
}

/// Contents of `device-console.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    pub log_file: Option<PathBuf>,
    pub poll_interval_secs: Option<u64>,
    pub max_entries: Option<usize>,
    pub auto_scroll: Option<bool>,
    pub device: DeviceOverrides,
}

impl ConsoleConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the config named on the command line, or the one in the data
    /// directory if it exists. An explicitly named file must exist.
    pub fn discover(args: &AppArgs) -> Result<Self, ConfigError> {
        if let Some(path) = &args.config {
            return Self::load(path);
        }

        let implicit = args.data_dir.join(CONFIG_FILE_NAME);
        if implicit.is_file() {
            Self::load(&implicit)
        } else {
            Ok(Self::default())
        }
    }
}

/// The resolved settings every mode runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_file: PathBuf,
    pub data_dir: PathBuf,
    pub poll_interval: Duration,
    pub max_entries: usize,
    pub auto_scroll: bool,
    pub device: DeviceInfo,
    pub color: bool,
}

impl Settings {
    pub fn resolve(args: &AppArgs, config: ConsoleConfig) -> Result<Self, ConfigError> {
        Self::resolve_with_device(args, config, DeviceInfo::detect())
    }

    fn resolve_with_device(
        args: &AppArgs,
        config: ConsoleConfig,
        detected: DeviceInfo,
    ) -> Result<Self, ConfigError> {
        let log_file = args
            .log_file
            .clone()
            .or(config.log_file)
            .unwrap_or_else(|| args.data_dir.join(DEFAULT_LOG_FILE_NAME));

        let interval_secs = args
            .interval
            .or(config.poll_interval_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll interval must be at least 1 second".to_string(),
            ));
        }

        let max_entries = args
            .max_entries
            .or(config.max_entries)
            .unwrap_or(DEFAULT_MAX_ENTRIES);
        if max_entries == 0 {
            return Err(ConfigError::Invalid(
                "max entries must be at least 1".to_string(),
            ));
        }

        let auto_scroll = !args.no_auto_scroll && config.auto_scroll.unwrap_or(true);

        Ok(Self {
            log_file,
            data_dir: args.data_dir.clone(),
            poll_interval: Duration::from_secs(interval_secs),
            max_entries,
            auto_scroll,
            device: config.device.apply(detected),
            color: !args.no_color,
        })
    }
}
