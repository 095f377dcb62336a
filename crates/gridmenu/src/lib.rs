//! Grid menu runtime
//!
//! gridmenu sits between a host's raw container event stream and the menus a
//! host application builds. It provides:
//!
//! - [`InventoryListener`]: turns click/drag/open/close events into menu
//!   callbacks, cancelling interactions unless a handler allows them
//! - [`Updater`]: a background pass that refreshes auto-updating menus on the
//!   host's main context when their interval has elapsed
//! - [`InventoryScheme`]: compiles row masks and character bindings into slot
//!   assignments
//!
//! Everything is wired up by [`register`], once per host module.

pub mod error;
pub mod host;
pub mod listener;
pub mod manager;
pub mod registry;
pub mod scheme;
pub mod scheme_config;
pub mod updater;

pub use error::{Error, Result};
pub use host::{Host, RepeatingTask, Task};
pub use listener::InventoryListener;
pub use manager::{disable_update, enable_update, register, InventoryManager};
pub use registry::UpdateRegistry;
pub use scheme::{InventoryScheme, SchemeLayout, SlotAssignment, ROW_WIDTH};
pub use scheme_config::SchemeConfig;
pub use updater::Updater;

// Re-export the capability surface so hosts only need one import path
pub use gridmenu_api as api;
