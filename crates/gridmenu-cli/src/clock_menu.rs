use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use gridmenu_api::{
    ClickEvent, ClickHandler, CloseEvent, ContainerId, DragEvent, ItemStack, Menu, OpenEvent,
    PaginatedMenu, Tick, ViewerId,
};
use tracing::{debug, info};

#[derive(Default)]
struct Slots {
    items: BTreeMap<usize, ItemStack>,
    handlers: BTreeMap<usize, ClickHandler>,
    content: Vec<usize>,
}

/// Menu with a clock item that re-renders on every refresh.
///
/// Closing it the first time reopens it, as a stand-in for menus that must
/// stay up until the viewer picks something.
pub struct ClockMenu {
    container: ContainerId,
    interval: i64,
    clock_slot: usize,
    clock_material: String,
    started: Instant,
    viewers: Mutex<HashSet<ViewerId>>,
    slots: Mutex<Slots>,
    last_tick: AtomicU64,
    refreshes: AtomicUsize,
    closes: AtomicUsize,
}

impl ClockMenu {
    /// `clock_material` is used only if the clock slot is empty on refresh;
    /// otherwise the laid-out item is kept and relabelled
    pub fn new(
        container: ContainerId,
        interval: i64,
        clock_slot: usize,
        clock_material: impl Into<String>,
    ) -> Self {
        Self {
            container,
            interval,
            clock_slot,
            clock_material: clock_material.into(),
            started: Instant::now(),
            viewers: Mutex::new(HashSet::new()),
            slots: Mutex::new(Slots::default()),
            last_tick: AtomicU64::new(0),
            refreshes: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        }
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::Acquire)
    }

    pub fn item_at(&self, slot: usize) -> Option<ItemStack> {
        self.slots().items.get(&slot).cloned()
    }

    pub fn content_slots(&self) -> Vec<usize> {
        self.slots().content.clone()
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn viewer_set(&self) -> MutexGuard<'_, HashSet<ViewerId>> {
        self.viewers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Menu for ClockMenu {
    fn container(&self) -> ContainerId {
        self.container
    }

    fn viewers(&self) -> HashSet<ViewerId> {
        self.viewer_set().clone()
    }

    fn auto_update_interval(&self) -> i64 {
        self.interval
    }

    fn last_update_tick(&self) -> Tick {
        self.last_tick.load(Ordering::Acquire)
    }

    fn set_last_update_tick(&self, tick: Tick) {
        self.last_tick.store(tick, Ordering::Release);
    }

    fn set_item(&self, slot: usize, item: ItemStack, handler: Option<ClickHandler>) {
        let mut slots = self.slots();
        slots.items.insert(slot, item);
        match handler {
            Some(handler) => slots.handlers.insert(slot, handler),
            None => slots.handlers.remove(&slot),
        };
    }

    fn handle_click(&self, event: &mut ClickEvent) {
        if !event.clicked_top() {
            return;
        }
        // release the lock before calling out
        let handler = self.slots().handlers.get(&event.slot).cloned();
        if let Some(handler) = handler {
            handler(event);
        }
    }

    fn handle_drag(&self, event: &mut DragEvent) {
        debug!(target: "demo", "{} dragged across {:?}", event.viewer, event.raw_slots);
    }

    fn handle_open(&self, event: &OpenEvent) {
        self.viewer_set().insert(event.viewer);
        info!(target: "demo", "{} opened {}", event.viewer, self.container);
    }

    fn handle_close(&self, event: &CloseEvent) -> bool {
        self.viewer_set().remove(&event.viewer);
        let first = self.closes.fetch_add(1, Ordering::AcqRel) == 0;
        info!(target: "demo", "{} closed {} (reopen: {})", event.viewer, self.container, first);
        first
    }

    fn refresh_dynamic_items(&self) {
        let label = format!("Uptime {:.1}s", self.started.elapsed().as_secs_f32());

        let mut slots = self.slots();
        let clock = match slots.items.get(&self.clock_slot) {
            Some(item) => item.clone(),
            None => ItemStack::new(self.clock_material.as_str()),
        };
        slots.items.insert(self.clock_slot, clock.with_display_name(label));
        drop(slots);

        let n = self.refreshes.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(target: "demo", "Refresh #{} of {}", n, self.container);
    }

    fn open(&self, viewer: ViewerId) {
        self.viewer_set().insert(viewer);
        info!(target: "demo", "Reopened {} for {}", self.container, viewer);
    }

    fn as_paginated(&self) -> Option<&dyn PaginatedMenu> {
        Some(self)
    }
}

impl PaginatedMenu for ClockMenu {
    fn set_content_slots(&self, slots: Vec<usize>) {
        self.slots().content = slots;
    }
}
