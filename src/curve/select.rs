use crate::curve::smooth::smooth;
use crate::error::Result;
use crate::log::{Column, MetricTable};

/// Extracts `column_name` from `table` and smooths it when asked.
///
/// This is the unit a chart consumes per curve (training or validation),
/// so each curve can be toggled independently. When `apply_smoothing` is
/// false the weight is ignored and an empty table yields an empty series.
pub fn select_and_optionally_smooth(
    table: &MetricTable,
    column_name: &str,
    apply_smoothing: bool,
    weight: f64,
) -> Result<Vec<f64>> {
    let column: Column = column_name.parse()?;
    let series = table.column(column);
    if apply_smoothing {
        smooth(&series, weight)
    } else {
        Ok(series)
    }
}
