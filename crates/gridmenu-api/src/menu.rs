use std::collections::HashSet;
use std::sync::Arc;

use crate::events::{ClickEvent, CloseEvent, DragEvent, OpenEvent};
use crate::item::ItemStack;
use crate::{ContainerId, Tick, ViewerId};

/// Per-slot click callback registered alongside an item
pub type ClickHandler = Arc<dyn Fn(&mut ClickEvent) + Send + Sync>;

/// Shared handle to a menu. Menus are identified by allocation, not by value.
pub type MenuRef = Arc<dyn Menu>;

/// Wrap a closure as a [`ClickHandler`]
pub fn click_handler<F>(f: F) -> ClickHandler
where
    F: Fn(&mut ClickEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Trait that menus must implement to be driven by gridmenu.
///
/// gridmenu owns none of a menu's state. It only calls back into these
/// methods, always on the host's main context except for the read-only
/// accessors the refresh scheduler uses during its background scan
/// (`auto_update_interval`, `last_update_tick`, `viewers`). Implementors
/// therefore use interior mutability and must be `Send + Sync`.
pub trait Menu: Send + Sync + 'static {
    /// Container this menu renders into
    fn container(&self) -> ContainerId;

    /// Viewers currently looking at this menu
    fn viewers(&self) -> HashSet<ViewerId>;

    fn has_viewers(&self) -> bool {
        !self.viewers().is_empty()
    }

    /// Refresh cadence in ticks. Zero or negative disables auto-update.
    fn auto_update_interval(&self) -> i64;

    /// Tick at which `refresh_dynamic_items` last completed
    fn last_update_tick(&self) -> Tick;

    fn set_last_update_tick(&self, tick: Tick);

    /// Place `item` in `slot`, replacing any handler there with `handler`
    fn set_item(&self, slot: usize, item: ItemStack, handler: Option<ClickHandler>);

    /// Called for clicks inside the menu's view. The event arrives cancelled;
    /// leave it uncancelled (`set_cancelled(false)`) to let the host proceed.
    fn handle_click(&self, event: &mut ClickEvent);

    /// Called for drags inside the menu's view, with the same cancellation
    /// contract as `handle_click`
    fn handle_drag(&self, event: &mut DragEvent);

    fn handle_open(&self, event: &OpenEvent);

    /// Return true to have the menu reopened for the closing viewer
    fn handle_close(&self, event: &CloseEvent) -> bool;

    /// Re-render dynamic content. Runs on the host's main context.
    fn refresh_dynamic_items(&self);

    /// Show this menu to `viewer`
    fn open(&self, viewer: ViewerId);

    /// Pagination capability, for menus that lay out paged content
    fn as_paginated(&self) -> Option<&dyn PaginatedMenu> {
        None
    }
}

/// Optional capability of menus that spread content across pages
pub trait PaginatedMenu: Menu {
    /// Slots that paged content is placed into, in fill order
    fn set_content_slots(&self, slots: Vec<usize>);
}
