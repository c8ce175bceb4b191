//! Viewer configuration.
//!
//! Values come from an optional JSON file; every field has a default so a
//! partial file (or none at all) is valid. Binaries apply command-line
//! overrides on top and call [`ViewerConfig::validate`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::curve::{validate_weight, DEFAULT_WEIGHT};
use crate::error::{Error, Result};
use crate::pipeline::{RefreshRate, TriggerKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// CSV log written by the training process.
    pub log_path: PathBuf,
    /// Address the dashboard binds to.
    pub addr: String,
    /// Initial refresh cadence.
    pub refresh: RefreshRate,
    /// Scheduling strategy for ticks.
    pub trigger: TriggerKind,
    /// Initial smoothing slider value.
    pub default_weight: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            log_path: PathBuf::from("run_log.csv"),
            addr: "127.0.0.1:8050".to_owned(),
            refresh: RefreshRate::default(),
            trigger: TriggerKind::default(),
            default_weight: DEFAULT_WEIGHT,
        }
    }
}

impl ViewerConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// File config if given, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_weight(self.default_weight)
            .map_err(|_| Error::Config(format!("default_weight {} is outside [0, 1]", self.default_weight)))?;
        if self.log_path.as_os_str().is_empty() {
            return Err(Error::Config("log_path must not be empty".into()));
        }
        if self.addr.trim().is_empty() {
            return Err(Error::Config("addr must not be empty".into()));
        }
        Ok(())
    }
}
