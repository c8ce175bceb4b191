use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ViewerConfig;
use crate::curve::{family_curves, FamilyCurves, MetricFamily, SmoothingOptions};
use crate::error::{Error, Result};
use crate::log::{load, MetricTable};

/// Per-chart smoothing choices for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewRequest {
    pub accuracy: SmoothingOptions,
    pub cross_entropy: SmoothingOptions,
}

impl ViewRequest {
    pub fn options(&self, family: MetricFamily) -> &SmoothingOptions {
        match family {
            MetricFamily::Accuracy     => &self.accuracy,
            MetricFamily::CrossEntropy => &self.cross_entropy,
        }
    }

    pub fn options_mut(&mut self, family: MetricFamily) -> &mut SmoothingOptions {
        match family {
            MetricFamily::Accuracy     => &mut self.accuracy,
            MetricFamily::CrossEntropy => &mut self.cross_entropy,
        }
    }

    /// No smoothing applied, both sliders at `weight`.
    pub fn with_weight(weight: f64) -> Self {
        let options = SmoothingOptions { weight, ..SmoothingOptions::default() };
        ViewRequest { accuracy: options, cross_entropy: options }
    }
}

/// Everything the presentation layer needs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: usize,
    pub latest_step: Option<u64>,
    pub accuracy: FamilyCurves,
    pub cross_entropy: FamilyCurves,
}

impl Snapshot {
    /// Builds the snapshot for an already-loaded table.
    pub fn from_table(table: &MetricTable, request: &ViewRequest) -> Result<Self> {
        Ok(Snapshot {
            rows: table.len(),
            latest_step: table.last().map(|r| r.step),
            accuracy: family_curves(table, MetricFamily::Accuracy, &request.accuracy)?,
            cross_entropy: family_curves(table, MetricFamily::CrossEntropy, &request.cross_entropy)?,
        })
    }

    pub fn family(&self, family: MetricFamily) -> &FamilyCurves {
        match family {
            MetricFamily::Accuracy     => &self.accuracy,
            MetricFamily::CrossEntropy => &self.cross_entropy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
    /// The log file does not exist yet.
    Missing,
    /// The log file exists but holds no rows.
    Empty,
}

impl NoDataReason {
    pub fn message(self) -> &'static str {
        match self {
            NoDataReason::Missing => "Run log not found yet. Is the training process writing to the configured path?",
            NoDataReason::Empty   => "Run log is empty. Waiting for the first step.",
        }
    }
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickOutcome {
    NoData { reason: NoDataReason },
    Ready(Snapshot),
}

/// Process-wide load → transform context, built once at startup.
///
/// Holds configuration only; every [`Pipeline::tick`] reads the log afresh
/// and keeps nothing afterwards, so ticks may run at any frequency and from
/// any thread.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ViewerConfig,
}

impl Pipeline {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Pipeline { config })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn log_path(&self) -> &Path {
        &self.config.log_path
    }

    /// A request with the configured default weight and no smoothing.
    pub fn default_request(&self) -> ViewRequest {
        ViewRequest::with_weight(self.config.default_weight)
    }

    /// Runs one load → transform pass.
    ///
    /// A missing or empty log is [`TickOutcome::NoData`]; parse and smoothing
    /// errors are returned to the caller.
    pub fn tick(&self, request: &ViewRequest) -> Result<TickOutcome> {
        let table = match load(self.log_path()) {
            Ok(table) => table,
            Err(Error::NotFound(path)) => {
                debug!(path = %path.display(), "no run log yet");
                return Ok(TickOutcome::NoData { reason: NoDataReason::Missing });
            }
            Err(e) => return Err(e),
        };

        if table.is_empty() {
            return Ok(TickOutcome::NoData { reason: NoDataReason::Empty });
        }

        Snapshot::from_table(&table, request).map(TickOutcome::Ready)
    }
}
