pub mod record;
pub mod table;
pub mod loader;

pub use record::{Column, MetricRecord};
pub use table::MetricTable;
pub use loader::{load, parse_log};
