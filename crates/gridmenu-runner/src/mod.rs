mod host;
pub mod config;
pub mod logging;

pub use config::{ConfigLoadError, GridMenuConfig, ProjectPaths};
pub use host::{MainThread, TokioHost, DEFAULT_TICK_INTERVAL};
pub use logging::init_logging;
