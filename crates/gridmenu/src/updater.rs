use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use gridmenu_api::{MenuRef, Module, Tick};
use tracing::{error, trace};

use crate::host::Host;
use crate::registry::{menu_key, UpdateRegistry};

/// Periodic refresh pass over auto-updating menus.
///
/// One `Updater` runs per registration, off the host's main context, once per
/// tick. The scan only reads menu accessors; the refresh itself is handed to
/// the main context and never awaited.
pub struct Updater {
    module: Module,
    host: Arc<dyn Host>,
    registry: Arc<UpdateRegistry>,
    current_tick: Tick,
    /// Menus with a refresh queued on the main context but not yet run
    in_flight: Arc<Mutex<HashSet<usize>>>,
}

impl Updater {
    pub fn new(module: Module, host: Arc<dyn Host>, registry: Arc<UpdateRegistry>) -> Self {
        Self {
            module,
            host,
            registry,
            current_tick: 0,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Advance one tick and queue refreshes for every due, viewed menu.
    ///
    /// Returns how many refreshes were queued.
    pub fn run(&mut self) -> usize {
        self.current_tick += 1;
        let tick = self.current_tick;
        let mut queued = 0;

        for menu in self.registry.snapshot() {
            let interval = menu.auto_update_interval();
            if interval <= 0 {
                continue;
            }

            let elapsed = tick.saturating_sub(menu.last_update_tick());
            if elapsed < interval as Tick || !menu.has_viewers() {
                continue;
            }

            let key = menu_key(&menu);
            if !self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key)
            {
                // previous refresh still waiting for the main context
                continue;
            }

            let in_flight = Arc::clone(&self.in_flight);
            self.host.run_task(
                &self.module,
                Box::new(move || {
                    refresh_menu(&menu, tick);
                    in_flight
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .remove(&key);
                }),
            );
            queued += 1;
        }

        if queued > 0 {
            trace!(target: "updater", "Tick {}: queued {} menu refresh(es)", tick, queued);
        }

        queued
    }

    /// Hand this updater to the host as a one-tick repeating task
    pub(crate) fn start(mut self) {
        let host = Arc::clone(&self.host);
        let module = self.module.clone();
        host.run_task_timer_async(&module, 1, 1, Box::new(move || {
            self.run();
        }));
    }
}

/// Refresh one menu on the main context. A panicking menu is logged and left
/// unstamped so it is retried on a later tick.
fn refresh_menu(menu: &MenuRef, tick: Tick) {
    match catch_unwind(AssertUnwindSafe(|| menu.refresh_dynamic_items())) {
        Ok(()) => menu.set_last_update_tick(tick),
        Err(e) => {
            error!(target: "updater",
                "Menu {} panicked while refreshing at tick {}: {}",
                menu.container(),
                tick,
                panic_message(e.as_ref())
            );
        }
    }
}

/// Best-effort text of a caught panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
