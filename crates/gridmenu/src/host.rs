use std::sync::Arc;

use gridmenu_api::{EventListener, Module, Tick};

/// Unit of work run once on the host's main context
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Unit of work run repeatedly off the main context
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

/// What gridmenu needs from the host environment.
///
/// Everything registered through a `Host` is owned by a [`Module`]; when that
/// module is disabled the host is expected to publish a
/// [`ModuleDisableEvent`](gridmenu_api::ModuleDisableEvent) to listeners and
/// then drop the module's listeners and cancel its timers.
pub trait Host: Send + Sync + 'static {
    /// Subscribe `listener` to the host's interaction event stream
    fn register_listener(&self, module: &Module, listener: Arc<dyn EventListener>);

    /// Queue `task` to run on the main context. Must not run it inline.
    fn run_task(&self, module: &Module, task: Task);

    /// Run `task` off the main context after `delay` ticks, then every
    /// `period` ticks
    fn run_task_timer_async(&self, module: &Module, delay: Tick, period: Tick, task: RepeatingTask);
}
