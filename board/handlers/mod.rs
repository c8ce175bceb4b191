pub mod dashboard;
pub mod snapshot;
pub mod events;
