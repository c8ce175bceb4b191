use serde::{Deserialize, Serialize};

use crate::curve::select::select_and_optionally_smooth;
use crate::curve::smooth::DEFAULT_WEIGHT;
use crate::error::Result;
use crate::log::{Column, MetricTable};

/// A pair of train/validation columns plotted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    Accuracy,
    CrossEntropy,
}

impl MetricFamily {
    pub const ALL: [MetricFamily; 2] = [MetricFamily::Accuracy, MetricFamily::CrossEntropy];

    pub fn title(self) -> &'static str {
        match self {
            MetricFamily::Accuracy     => "Prediction Accuracy",
            MetricFamily::CrossEntropy => "Cross Entropy Loss",
        }
    }

    /// Short identifier used in query strings and element ids.
    pub fn key(self) -> &'static str {
        match self {
            MetricFamily::Accuracy     => "accuracy",
            MetricFamily::CrossEntropy => "cross-entropy",
        }
    }

    pub fn train_column(self) -> Column {
        match self {
            MetricFamily::Accuracy     => Column::TrainAccuracy,
            MetricFamily::CrossEntropy => Column::TrainLoss,
        }
    }

    pub fn val_column(self) -> Column {
        match self {
            MetricFamily::Accuracy     => Column::ValAccuracy,
            MetricFamily::CrossEntropy => Column::ValLoss,
        }
    }
}

/// Which curves of a family to smooth, and how hard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingOptions {
    pub train: bool,
    pub val: bool,
    /// History share in `[0, 1]`; only checked when a curve is smoothed.
    pub weight: f64,
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        SmoothingOptions { train: false, val: false, weight: DEFAULT_WEIGHT }
    }
}

/// Plot-ready series for one metric family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyCurves {
    pub family: MetricFamily,
    pub title: String,
    pub step: Vec<u64>,
    pub train: Vec<f64>,
    pub val: Vec<f64>,
    pub train_smoothed: bool,
    pub val_smoothed: bool,
    /// Last raw (train, val) values, for the "current value" read-out.
    pub latest: Option<(f64, f64)>,
}

/// Builds the train and validation curves of `family` from `table`.
///
/// On an empty table the series are empty and no smoothing is attempted.
pub fn family_curves(
    table: &MetricTable,
    family: MetricFamily,
    options: &SmoothingOptions,
) -> Result<FamilyCurves> {
    let has_rows = !table.is_empty();
    let train_smoothed = options.train && has_rows;
    let val_smoothed = options.val && has_rows;

    let train = select_and_optionally_smooth(
        table,
        family.train_column().name(),
        train_smoothed,
        options.weight,
    )?;
    let val = select_and_optionally_smooth(
        table,
        family.val_column().name(),
        val_smoothed,
        options.weight,
    )?;

    let latest = table
        .last()
        .map(|r| (r.get(family.train_column()), r.get(family.val_column())));

    Ok(FamilyCurves {
        family,
        title: family.title().to_owned(),
        step: table.steps(),
        train,
        val,
        train_smoothed,
        val_smoothed,
        latest,
    })
}
