//! Test helpers shared by the integration tests: a host whose main context
//! and timers are driven by hand, and a menu that records every callback.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use gridmenu::api::{
    Cancellable, ClickEvent, ClickHandler, CloseEvent, ContainerId, DragEvent, EventListener, HostEvent,
    Inventory, ItemStack, Menu, MenuRef, Module, ModuleDisableEvent, OpenEvent, PaginatedMenu,
    Tick, ViewerId,
};
use gridmenu::{Host, RepeatingTask, Task};

// ============ ManualHost ============

struct Timer {
    module: Module,
    task: RepeatingTask,
}

/// Host double: nothing runs until the test says so
#[derive(Default)]
pub struct ManualHost {
    listeners: Mutex<Vec<(Module, Arc<dyn EventListener>)>>,
    main_queue: Mutex<VecDeque<(Module, Task)>>,
    timers: Mutex<Vec<Timer>>,
}

impl ManualHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Deliver an event to every listener, as the host's main context would
    pub fn call_event(&self, event: &mut HostEvent) {
        let listeners: Vec<_> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener.handle_event(event);
        }
    }

    /// Run everything queued on the main context. Returns how many tasks ran.
    pub fn run_main(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.main_queue.lock().unwrap().pop_front();
            match next {
                Some((_, task)) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    pub fn pending_main(&self) -> usize {
        self.main_queue.lock().unwrap().len()
    }

    /// Fire every repeating timer once
    pub fn tick_timers(&self) {
        for timer in self.timers.lock().unwrap().iter_mut() {
            (timer.task)();
        }
    }

    /// One host tick: timers fire, then the main context catches up
    pub fn tick(&self) {
        self.tick_timers();
        self.run_main();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.lock().unwrap().len()
    }

    /// Publish the disable event, then tear down the module's registrations
    pub fn disable_module(&self, module: &Module) {
        let mut event = HostEvent::ModuleDisable(ModuleDisableEvent::new(module.clone()));
        self.call_event(&mut event);

        self.listeners.lock().unwrap().retain(|(m, _)| m != module);
        self.timers.lock().unwrap().retain(|t| &t.module != module);
        self.main_queue.lock().unwrap().retain(|(m, _)| m != module);
    }
}

impl Host for ManualHost {
    fn register_listener(&self, module: &Module, listener: Arc<dyn EventListener>) {
        self.listeners.lock().unwrap().push((module.clone(), listener));
    }

    fn run_task(&self, module: &Module, task: Task) {
        self.main_queue.lock().unwrap().push_back((module.clone(), task));
    }

    fn run_task_timer_async(&self, module: &Module, _delay: Tick, _period: Tick, task: RepeatingTask) {
        self.timers.lock().unwrap().push(Timer {
            module: module.clone(),
            task,
        });
    }
}

// ============ TestMenu ============

/// What `TestMenu::handle_click`/`handle_drag` do to the event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verdict {
    /// Leave the event as received
    #[default]
    Ignore,
    Allow,
    Cancel,
}

#[derive(Default)]
pub struct TestMenuState {
    pub viewers: HashSet<ViewerId>,
    pub last_update_tick: Tick,
    pub refreshes: usize,
    pub items: BTreeMap<usize, ItemStack>,
    pub handlers: HashMap<usize, ClickHandler>,
    pub clicks: usize,
    pub drags: usize,
    pub opens: Vec<ViewerId>,
    pub closes: Vec<ViewerId>,
    pub reopened: Vec<ViewerId>,
    pub content_slots: Option<Vec<usize>>,
    pub verdict: Verdict,
    pub reopen_on_close: bool,
    pub panic_on_refresh: bool,
}

pub struct TestMenu {
    container: ContainerId,
    interval: i64,
    paginated: bool,
    state: Mutex<TestMenuState>,
}

impl TestMenu {
    pub fn new(container: u64, interval: i64) -> Arc<Self> {
        Arc::new(Self::build(container, interval, false))
    }

    pub fn paginated(container: u64) -> Arc<Self> {
        Arc::new(Self::build(container, 0, true))
    }

    fn build(container: u64, interval: i64, paginated: bool) -> Self {
        Self {
            container: ContainerId(container),
            interval,
            paginated,
            state: Mutex::new(TestMenuState::default()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, TestMenuState> {
        self.state.lock().unwrap()
    }

    pub fn add_viewer(&self, viewer: u64) {
        self.state().viewers.insert(ViewerId(viewer));
    }

    pub fn refreshes(&self) -> usize {
        self.state().refreshes
    }
}

impl Menu for TestMenu {
    fn container(&self) -> ContainerId {
        self.container
    }

    fn viewers(&self) -> HashSet<ViewerId> {
        self.state().viewers.clone()
    }

    fn auto_update_interval(&self) -> i64 {
        self.interval
    }

    fn last_update_tick(&self) -> Tick {
        self.state().last_update_tick
    }

    fn set_last_update_tick(&self, tick: Tick) {
        self.state().last_update_tick = tick;
    }

    fn set_item(&self, slot: usize, item: ItemStack, handler: Option<ClickHandler>) {
        let mut state = self.state();
        state.items.insert(slot, item);
        match handler {
            Some(handler) => {
                state.handlers.insert(slot, handler);
            }
            None => {
                state.handlers.remove(&slot);
            }
        }
    }

    fn handle_click(&self, event: &mut ClickEvent) {
        let (verdict, handler) = {
            let mut state = self.state();
            state.clicks += 1;
            let handler = if event.clicked_top() {
                state.handlers.get(&event.slot).cloned()
            } else {
                None
            };
            (state.verdict, handler)
        };

        if let Some(handler) = handler {
            handler(event);
        }
        apply_verdict(verdict, event);
    }

    fn handle_drag(&self, event: &mut DragEvent) {
        let verdict = {
            let mut state = self.state();
            state.drags += 1;
            state.verdict
        };
        apply_verdict(verdict, event);
    }

    fn handle_open(&self, event: &OpenEvent) {
        let mut state = self.state();
        state.opens.push(event.viewer);
        state.viewers.insert(event.viewer);
    }

    fn handle_close(&self, event: &CloseEvent) -> bool {
        let mut state = self.state();
        state.closes.push(event.viewer);
        state.viewers.remove(&event.viewer);
        state.reopen_on_close
    }

    fn refresh_dynamic_items(&self) {
        let mut state = self.state();
        if state.panic_on_refresh {
            drop(state);
            panic!("refresh failed for {}", self.container);
        }
        state.refreshes += 1;
    }

    fn open(&self, viewer: ViewerId) {
        let mut state = self.state();
        state.reopened.push(viewer);
        state.viewers.insert(viewer);
    }

    fn as_paginated(&self) -> Option<&dyn PaginatedMenu> {
        if self.paginated {
            Some(self)
        } else {
            None
        }
    }
}

impl PaginatedMenu for TestMenu {
    fn set_content_slots(&self, slots: Vec<usize>) {
        self.state().content_slots = Some(slots);
    }
}

fn apply_verdict<E: Cancellable>(verdict: Verdict, event: &mut E) {
    match verdict {
        Verdict::Ignore => {}
        Verdict::Allow => event.set_cancelled(false),
        Verdict::Cancel => event.set_cancelled(true),
    }
}

// ============ Helpers ============

pub fn as_menu(menu: &Arc<TestMenu>) -> MenuRef {
    Arc::clone(menu) as MenuRef
}

pub fn inventory_of(menu: &Arc<TestMenu>) -> Inventory {
    Inventory::held_by(menu.container(), as_menu(menu))
}

pub fn test_module() -> Module {
    Module::new("test-module")
}

/// Deliver a click through `host` and hand back the event as listeners left it
pub fn dispatch_click(host: &ManualHost, event: ClickEvent) -> ClickEvent {
    let mut event = HostEvent::Click(event);
    host.call_event(&mut event);
    match event {
        HostEvent::Click(event) => event,
        other => panic!("listener replaced the event: {:?}", other),
    }
}

pub fn dispatch_drag(host: &ManualHost, event: DragEvent) -> DragEvent {
    let mut event = HostEvent::Drag(event);
    host.call_event(&mut event);
    match event {
        HostEvent::Drag(event) => event,
        other => panic!("listener replaced the event: {:?}", other),
    }
}
