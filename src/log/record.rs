use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// One row of the run log.
///
/// Column identity is positional: the writer emits
/// `step,train_accuracy,val_accuracy,train_cross_entropy,val_cross_entropy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRecord {
    /// Training step; expected to be non-decreasing down the file.
    pub step: u64,
    pub train_accuracy: f64,
    pub val_accuracy: f64,
    /// Training cross-entropy.
    pub train_loss: f64,
    /// Validation cross-entropy.
    pub val_loss: f64,
}

impl MetricRecord {
    /// Value of `column` for this row. The step is widened to `f64`.
    pub fn get(&self, column: Column) -> f64 {
        match column {
            Column::Step          => self.step as f64,
            Column::TrainAccuracy => self.train_accuracy,
            Column::ValAccuracy   => self.val_accuracy,
            Column::TrainLoss     => self.train_loss,
            Column::ValLoss       => self.val_loss,
        }
    }
}

/// The five positional columns of the run log, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Step,
    TrainAccuracy,
    ValAccuracy,
    TrainLoss,
    ValLoss,
}

impl Column {
    /// All columns in file order.
    pub const ALL: [Column; 5] = [
        Column::Step,
        Column::TrainAccuracy,
        Column::ValAccuracy,
        Column::TrainLoss,
        Column::ValLoss,
    ];

    /// Display name used in error messages and the dashboard.
    pub fn name(self) -> &'static str {
        match self {
            Column::Step          => "step",
            Column::TrainAccuracy => "train accuracy",
            Column::ValAccuracy   => "val accuracy",
            Column::TrainLoss     => "train cross entropy",
            Column::ValLoss       => "val cross entropy",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = Error;

    /// Accepts the display names plus snake_case aliases
    /// (`train_accuracy`, `train_loss`, `train_cross_entropy`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match key.as_str() {
            "step" => Ok(Column::Step),
            "train accuracy" => Ok(Column::TrainAccuracy),
            "val accuracy" => Ok(Column::ValAccuracy),
            "train cross entropy" | "train loss" => Ok(Column::TrainLoss),
            "val cross entropy" | "val loss" => Ok(Column::ValLoss),
            _ => Err(Error::UnknownColumn(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_parse_back() {
        for c in Column::ALL {
            assert_eq!(c.name().parse::<Column>().unwrap(), c);
        }
    }

    #[test]
    fn snake_case_aliases() {
        assert_eq!("train_accuracy".parse::<Column>().unwrap(), Column::TrainAccuracy);
        assert_eq!("val_cross_entropy".parse::<Column>().unwrap(), Column::ValLoss);
        assert_eq!("train_loss".parse::<Column>().unwrap(), Column::TrainLoss);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = "learning rate".parse::<Column>().unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(ref s) if s == "learning rate"));
    }
}
