//! Capability surface shared by gridmenu and its hosts
//!
//! This crate holds the types both sides agree on: the `Menu` trait callers
//! implement, the interaction events a host delivers, and the listener trait
//! the core installs on the host's event bus. Keeping them here lets the core
//! and host integrations depend on each other's vocabulary without cycles.
use std::fmt;

pub mod events;
pub mod item;
pub mod menu;

pub use events::{
    Cancellable, ClickEvent, ClickType, CloseEvent, DragEvent, HostEvent, Inventory,
    ModuleDisableEvent, OpenEvent,
};
pub use item::ItemStack;
pub use menu::{click_handler, ClickHandler, Menu, MenuRef, PaginatedMenu};

/// Host time unit. One tick is the smallest cadence the host schedules at.
pub type Tick = u64;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifies a connected viewer (a player looking at a menu)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(pub u64);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}

/// Identifies a host-side container (the inventory a menu renders into)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u64);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

/// A host module (plugin) that owns listeners and scheduled tasks.
///
/// Modules are compared by name. The host tears down everything a module
/// registered when that module is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Module {
    name: String,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Event Listener Trait
// ============================================================================

/// Trait for components subscribed to the host's interaction event stream.
///
/// The host delivers events on its main context, one at a time, in the order
/// they happened. Listeners may mutate cancellable events in place.
pub trait EventListener: Send + Sync + 'static {
    /// Handle a host event
    fn handle_event(&self, event: &mut HostEvent);
}
