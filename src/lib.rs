pub mod error;
pub mod log;
pub mod curve;
pub mod pipeline;
pub mod config;

// Convenience re-exports
pub use error::{Error, Result};
pub use crate::log::{load, parse_log, Column, MetricRecord, MetricTable};
pub use curve::{family_curves, select_and_optionally_smooth, smooth, FamilyCurves, MetricFamily, SmoothingOptions};
pub use pipeline::{make_trigger, NoDataReason, Pipeline, RefreshRate, RefreshTrigger, Snapshot, TickOutcome, TriggerKind, ViewRequest};
pub use config::ViewerConfig;
