pub mod smooth;
pub mod select;
pub mod family;

pub use smooth::{smooth, validate_weight, DEFAULT_WEIGHT};
pub use select::select_and_optionally_smooth;
pub use family::{family_curves, FamilyCurves, MetricFamily, SmoothingOptions};
