use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use gridmenu::updater::panic_message;
use gridmenu::{Host, RepeatingTask, Task};
use gridmenu_api::{EventListener, HostEvent, Module, ModuleDisableEvent, Tick};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Default tick length (50ms = 20 ticks per second)
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

struct MainTask {
    module: Module,
    task: Task,
}

struct ModuleTimer {
    module: Module,
    handle: JoinHandle<()>,
}

/// Host backed by a tokio runtime.
///
/// The "main context" is whoever owns the paired [`MainThread`]: tasks queued
/// with `run_task` only run when it drains its queue, and events should only
/// be delivered from that same place. Async timers run as tokio tasks.
///
/// Registered listeners and timers hold the host themselves, so dropping the
/// last outside handle does not stop them. Tear a module down with
/// [`TokioHost::disable_module`].
pub struct TokioHost {
    runtime: Handle,
    tick_interval: Duration,
    main_tx: mpsc::UnboundedSender<MainTask>,
    listeners: RwLock<Vec<(Module, Arc<dyn EventListener>)>>,
    timers: Mutex<Vec<ModuleTimer>>,
}

impl TokioHost {
    /// Create a host on `runtime` and the main-context queue that serves it
    pub fn new(runtime: Handle, tick_interval: Duration) -> (Arc<Self>, MainThread) {
        let (main_tx, main_rx) = mpsc::unbounded_channel();
        let host = Arc::new(Self {
            runtime,
            tick_interval,
            main_tx,
            listeners: RwLock::new(Vec::new()),
            timers: Mutex::new(Vec::new()),
        });
        let main = MainThread {
            rx: main_rx,
            tick_interval,
        };
        (host, main)
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Deliver `event` to every listener. Call from the main context.
    pub fn call_event(&self, event: &mut HostEvent) {
        let listeners: Vec<_> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(module, listener)| (module.clone(), Arc::clone(listener)))
            .collect();

        for (module, listener) in listeners {
            if let Err(e) = catch_unwind(AssertUnwindSafe(|| listener.handle_event(event))) {
                error!(target: "host",
                    "Listener of module {} panicked while handling event: {}",
                    module,
                    panic_message(e.as_ref())
                );
            }
        }
    }

    /// Announce that `module` is going away, then drop its listeners and
    /// stop its timers
    pub fn disable_module(&self, module: &Module) {
        let mut event = HostEvent::ModuleDisable(ModuleDisableEvent::new(module.clone()));
        self.call_event(&mut event);

        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(m, _)| m != module);

        let mut timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
        timers.retain(|timer| {
            if &timer.module == module {
                timer.handle.abort();
                false
            } else {
                true
            }
        });

        info!(target: "host", "Disabled module {}", module);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn ticks(&self, n: Tick) -> Duration {
        self.tick_interval
            .saturating_mul(u32::try_from(n).unwrap_or(u32::MAX))
    }
}

impl Host for TokioHost {
    fn register_listener(&self, module: &Module, listener: Arc<dyn EventListener>) {
        debug!(target: "host", "Registering listener for module {}", module);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((module.clone(), listener));
    }

    fn run_task(&self, module: &Module, task: Task) {
        let task = MainTask {
            module: module.clone(),
            task,
        };
        if self.main_tx.send(task).is_err() {
            debug!(target: "host", "Main context is gone, dropping task from {}", module);
        }
    }

    fn run_task_timer_async(&self, module: &Module, delay: Tick, period: Tick, mut task: RepeatingTask) {
        let delay = self.ticks(delay);
        let period = self.ticks(period.max(1));
        let owner = module.clone();

        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if let Err(e) = catch_unwind(AssertUnwindSafe(|| task())) {
                    error!(target: "host",
                        "Timer of module {} panicked: {}",
                        owner,
                        panic_message(e.as_ref())
                    );
                }
            }
        });

        self.timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ModuleTimer {
                module: module.clone(),
                handle,
            });
    }
}

/// Receiving end of the host's main-context queue
pub struct MainThread {
    rx: mpsc::UnboundedReceiver<MainTask>,
    tick_interval: Duration,
}

impl MainThread {
    /// Run every task queued so far. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(MainTask { module, task }) = self.rx.try_recv() {
            if let Err(e) = catch_unwind(AssertUnwindSafe(task)) {
                error!(target: "host",
                    "Task from module {} panicked on the main context: {}",
                    module,
                    panic_message(e.as_ref())
                );
            }
            ran += 1;
        }
        ran
    }

    /// Drain the queue once per tick until `shutdown` flips to true
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.run_pending();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        // Anything queued before shutdown still gets its turn
        self.run_pending();
        debug!(target: "host", "Main context stopped");
    }
}
