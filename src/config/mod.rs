pub mod viewer_config;

pub use viewer_config::ViewerConfig;
