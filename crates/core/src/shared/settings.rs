use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::request_builder::{SpeechOptions, TimeoutPolicy};
use crate::shared::constants::{
    CLOUD_STORAGE_TIMEOUT_SECS, DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL_SECS,
    LOCAL_TIMEOUT_FLOOR_SECS, LOCAL_TIMEOUT_PER_MIB_SECS, SPEECH_LANGUAGE_CODE,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent tool configuration. Every field has a default, so a partial
/// file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub quota_project: Option<String>,
    pub poll_interval_secs: u64,
    pub cloud_storage_timeout_secs: u64,
    pub local_timeout_floor_secs: u64,
    pub local_timeout_per_mib_secs: u64,
    pub language_code: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            quota_project: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            cloud_storage_timeout_secs: CLOUD_STORAGE_TIMEOUT_SECS,
            local_timeout_floor_secs: LOCAL_TIMEOUT_FLOOR_SECS,
            local_timeout_per_mib_secs: LOCAL_TIMEOUT_PER_MIB_SECS,
            language_code: SPEECH_LANGUAGE_CODE.to_string(),
        }
    }
}

impl Settings {
    /// `<config dir>/Video Annotate/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Video Annotate").join("settings.json"))
    }

    /// Loads settings from the default location, falling back to defaults
    /// when there is no config directory or no file.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&json).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn cloud_storage_timeout(&self) -> TimeoutPolicy {
        TimeoutPolicy::Fixed(Duration::from_secs(self.cloud_storage_timeout_secs))
    }

    pub fn local_file_timeout(&self) -> TimeoutPolicy {
        TimeoutPolicy::SizeScaled {
            floor: Duration::from_secs(self.local_timeout_floor_secs),
            per_mib: Duration::from_secs(self.local_timeout_per_mib_secs),
        }
    }

    pub fn speech_options(&self) -> SpeechOptions {
        SpeechOptions {
            language_code: self.language_code.clone(),
            ..SpeechOptions::default()
        }
    }
}
