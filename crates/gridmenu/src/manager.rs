use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use gridmenu_api::{MenuRef, Module};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::host::Host;
use crate::listener::InventoryListener;
use crate::registry::UpdateRegistry;
use crate::updater::Updater;

static GLOBAL: OnceLock<InventoryManager> = OnceLock::new();

/// Live registrations across every manager, as (host allocation, module name)
static CLAIMS: Mutex<BTreeSet<(usize, String)>> = Mutex::new(BTreeSet::new());

/// A module's exclusive registration on one host.
///
/// At most one listener and one updater exist per module and host in the
/// whole process, whichever manager installed them.
pub(crate) struct HostClaim {
    host: usize,
    module: String,
}

impl HostClaim {
    fn acquire(host: &Arc<dyn Host>, module: &Module) -> Option<Self> {
        let claim = Self {
            host: Arc::as_ptr(host) as *const () as usize,
            module: module.name().to_string(),
        };
        let fresh = CLAIMS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((claim.host, claim.module.clone()));
        fresh.then_some(claim)
    }

    pub(crate) fn release(&self) {
        CLAIMS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(self.host, self.module.clone()));
    }
}

/// Registration state and auto-update registry.
///
/// The process normally uses the single [`InventoryManager::global`]
/// instance through the free functions [`register`], [`enable_update`] and
/// [`disable_update`]. Separate instances keep their own registry, but a
/// module can only be registered once per host across all of them.
pub struct InventoryManager {
    registered: Arc<AtomicBool>,
    registry: Arc<UpdateRegistry>,
}

impl InventoryManager {
    pub fn new() -> Self {
        Self {
            registered: Arc::new(AtomicBool::new(false)),
            registry: Arc::new(UpdateRegistry::new()),
        }
    }

    /// The process-wide manager
    pub fn global() -> &'static InventoryManager {
        GLOBAL.get_or_init(InventoryManager::new)
    }

    /// Install the event listener and start the refresh task for `module`.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if the module name is blank
    /// - [`Error::AlreadyRegistered`] if this manager is registered, or any
    ///   manager registered `module` on `host`, and the owning module has not
    ///   been disabled since
    pub fn register(&self, host: Arc<dyn Host>, module: &Module) -> Result<()> {
        if module.name().trim().is_empty() {
            return Err(Error::InvalidArgument(
                "module name must not be blank".to_string(),
            ));
        }

        if self
            .registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyRegistered);
        }

        let Some(claim) = HostClaim::acquire(&host, module) else {
            self.registered.store(false, Ordering::Release);
            return Err(Error::AlreadyRegistered);
        };

        let listener = InventoryListener::new(
            module.clone(),
            Arc::clone(&host),
            Arc::clone(&self.registered),
            claim,
            Arc::clone(&self.registry),
        );
        host.register_listener(module, Arc::new(listener));

        Updater::new(module.clone(), Arc::clone(&host), Arc::clone(&self.registry)).start();

        info!(target: "gridmenu", "Registered menu listeners for module {}", module);
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Start refreshing `menu` on its auto-update interval
    pub fn enable_update(&self, menu: &MenuRef) {
        if self.registry.insert(menu) {
            debug!(target: "gridmenu", "Auto-update enabled for {}", menu.container());
        }
    }

    /// Stop refreshing `menu`
    pub fn disable_update(&self, menu: &MenuRef) {
        if self.registry.remove(menu) {
            debug!(target: "gridmenu", "Auto-update disabled for {}", menu.container());
        }
    }

    pub fn registry(&self) -> &Arc<UpdateRegistry> {
        &self.registry
    }
}

impl Default for InventoryManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Register gridmenu with `host` on behalf of `module`, using the global manager
pub fn register(host: Arc<dyn Host>, module: &Module) -> Result<()> {
    InventoryManager::global().register(host, module)
}

pub fn enable_update(menu: &MenuRef) {
    InventoryManager::global().enable_update(menu);
}

pub fn disable_update(menu: &MenuRef) {
    InventoryManager::global().disable_update(menu);
}
