use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gridmenu_api::{
    Cancellable, ClickEvent, CloseEvent, DragEvent, EventListener, HostEvent, ModuleDisableEvent,
    Module, OpenEvent,
};
use tracing::{debug, info};

use crate::host::Host;
use crate::manager::HostClaim;
use crate::registry::UpdateRegistry;

/// Routes host container events to the menus that own them.
///
/// Clicks and drags inside a menu are cancelled by default: the menu's
/// handler sees an already-cancelled event and must uncancel it to let the
/// host's default action through.
pub struct InventoryListener {
    module: Module,
    host: Arc<dyn Host>,
    registered: Arc<AtomicBool>,
    claim: HostClaim,
    registry: Arc<UpdateRegistry>,
}

impl InventoryListener {
    pub(crate) fn new(
        module: Module,
        host: Arc<dyn Host>,
        registered: Arc<AtomicBool>,
        claim: HostClaim,
        registry: Arc<UpdateRegistry>,
    ) -> Self {
        Self {
            module,
            host,
            registered,
            claim,
            registry,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn on_click(&self, event: &mut ClickEvent) {
        let Some(menu) = event.inventory.holder().cloned() else {
            return;
        };
        if event.clicked_inventory.is_none() {
            debug!(target: "gridmenu", "Ignoring click outside of {} by {}", menu.container(), event.viewer);
            return;
        }

        deny_by_default(event, |event| menu.handle_click(event));
    }

    pub fn on_drag(&self, event: &mut DragEvent) {
        let Some(menu) = event.inventory.holder().cloned() else {
            return;
        };

        deny_by_default(event, |event| menu.handle_drag(event));
    }

    pub fn on_open(&self, event: &OpenEvent) {
        let Some(menu) = event.inventory.holder() else {
            return;
        };

        menu.handle_open(event);

        if menu.auto_update_interval() > 0 && self.registry.insert(menu) {
            debug!(target: "gridmenu", "Tracking {} for auto-update", menu.container());
        }
    }

    pub fn on_close(&self, event: &CloseEvent) {
        let Some(menu) = event.inventory.holder() else {
            return;
        };

        if menu.handle_close(event) {
            // never reopen from inside the close callback itself
            let menu = Arc::clone(menu);
            let viewer = event.viewer;
            debug!(target: "gridmenu", "Scheduling reopen of {} for {}", menu.container(), viewer);
            self.host
                .run_task(&self.module, Box::new(move || menu.open(viewer)));
        }
    }

    pub fn on_module_disable(&self, event: &ModuleDisableEvent) {
        if event.module == self.module {
            self.claim.release();
            self.registered.store(false, Ordering::Release);
            info!(target: "gridmenu", "Module {} disabled, registration released", self.module);
        }
    }
}

impl EventListener for InventoryListener {
    fn handle_event(&self, event: &mut HostEvent) {
        match event {
            HostEvent::Click(e) => self.on_click(e),
            HostEvent::Drag(e) => self.on_drag(e),
            HostEvent::Open(e) => self.on_open(e),
            HostEvent::Close(e) => self.on_close(e),
            HostEvent::ModuleDisable(e) => self.on_module_disable(e),
        }
    }
}

/// Run `handle` against a cancelled `event`, then let it through only if it
/// was not cancelled on arrival and the handler uncancelled it.
fn deny_by_default<E, F>(event: &mut E, handle: F)
where
    E: Cancellable,
    F: FnOnce(&mut E),
{
    let was_cancelled = event.is_cancelled();
    event.set_cancelled(true);

    handle(event);

    let allowed = !was_cancelled && !event.is_cancelled();
    event.set_cancelled(!allowed);
}
