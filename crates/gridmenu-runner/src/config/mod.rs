pub mod gridmenu_config;
pub mod paths;

pub use gridmenu_config::{ConfigLoadError, GridMenuConfig};
pub use paths::ProjectPaths;
