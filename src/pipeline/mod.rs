pub mod refresh;
pub mod trigger;
pub mod pipeline;

pub use refresh::RefreshRate;
pub use trigger::{make_trigger, ChangeTrigger, IntervalTrigger, RefreshTrigger, TriggerKind};
pub use pipeline::{NoDataReason, Pipeline, Snapshot, TickOutcome, ViewRequest};
