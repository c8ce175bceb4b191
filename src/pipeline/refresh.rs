use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Dashboard refresh cadence.
///
/// `Paused` still ticks, once a day, so a stream never goes fully idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshRate {
    Fast,
    #[default]
    Regular,
    Slow,
    #[serde(alias = "no")]
    Paused,
}

impl RefreshRate {
    pub const ALL: [RefreshRate; 4] = [
        RefreshRate::Paused,
        RefreshRate::Slow,
        RefreshRate::Regular,
        RefreshRate::Fast,
    ];

    pub fn interval_ms(self) -> u64 {
        match self {
            RefreshRate::Fast    => 500,
            RefreshRate::Regular => 1_000,
            RefreshRate::Slow    => 5 * 1_000,
            RefreshRate::Paused  => 24 * 60 * 60 * 1_000,
        }
    }

    pub fn interval(self) -> Duration {
        Duration::from_millis(self.interval_ms())
    }

    /// Query-string value.
    pub fn key(self) -> &'static str {
        match self {
            RefreshRate::Fast    => "fast",
            RefreshRate::Regular => "regular",
            RefreshRate::Slow    => "slow",
            RefreshRate::Paused  => "no",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RefreshRate::Fast    => "Fast Updates",
            RefreshRate::Regular => "Regular Updates",
            RefreshRate::Slow    => "Slow Updates",
            RefreshRate::Paused  => "No Updates",
        }
    }
}

impl fmt::Display for RefreshRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RefreshRate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(RefreshRate::Fast),
            "regular" => Ok(RefreshRate::Regular),
            "slow" => Ok(RefreshRate::Slow),
            "no" | "paused" => Ok(RefreshRate::Paused),
            other => Err(Error::Config(format!("unknown refresh rate '{other}'"))),
        }
    }
}
