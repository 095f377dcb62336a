use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use gridmenu::{Host, InventoryScheme, SchemeConfig};
use gridmenu_api::{
    Cancellable, ClickEvent, ClickType, CloseEvent, ContainerId, DragEvent, HostEvent, Inventory,
    ItemStack, Menu, MenuRef, Module, OpenEvent, ViewerId,
};
use gridmenu_runner::{init_logging, ConfigLoadError, GridMenuConfig, TokioHost};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tracing::info;

mod clock_menu;

use clock_menu::ClockMenu;

const CLOCK_MATERIAL: &str = "CLOCK";

#[derive(Parser)]
#[command(name = "gridmenu-demo", version = env!("VERSION_STRING"), about, long_about = None)]
pub struct Args {
    /// How many host ticks the scripted session lasts
    #[arg(short, long, default_value = "100")]
    ticks: u32,

    /// Auto-update interval of the demo menu, in ticks (0 disables)
    #[arg(short, long, default_value = "10")]
    interval: i64,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Named scheme from the config to lay the menu out with
    #[arg(short, long)]
    scheme: Option<String>,

    /// Also log to a file in the data directory
    #[arg(long)]
    log_file: bool,

    /// Write a sample config (to --config or the default location) and exit
    #[arg(long)]
    init_config: bool,
}

fn default_scheme() -> InventoryScheme {
    InventoryScheme::new()
        .masks(["#########", "#ppppppp#", "####t####"])
        .bind_item(
            '#',
            ItemStack::new("GRAY_STAINED_GLASS_PANE").with_display_name(" "),
        )
        .bind_item_with_handler('t', ItemStack::new(CLOCK_MATERIAL), |event| {
            info!(target: "demo", "{} checked the clock", event.viewer);
            event.set_cancelled(false);
        })
        .bind_pagination('p')
}

fn sample_config() -> GridMenuConfig {
    let main = SchemeConfig {
        masks: vec!["#########".into(), "#ppppppp#".into(), "####t####".into()],
        pagination: Some('p'),
        items: BTreeMap::from([
            (
                "#".to_string(),
                ItemStack::new("GRAY_STAINED_GLASS_PANE").with_display_name(" "),
            ),
            ("t".to_string(), ItemStack::new(CLOCK_MATERIAL)),
        ]),
    };

    let mut config = GridMenuConfig::default();
    config.schemes.insert("main".to_string(), main);
    config
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GridMenuConfig> {
    let loaded = match path {
        Some(path) => GridMenuConfig::load_from(path),
        None => GridMenuConfig::load(),
    };

    match loaded {
        Ok(config) => Ok(config),
        Err(ConfigLoadError::NotFound(_)) if path.is_none() => Ok(GridMenuConfig::default()),
        Err(e) => Err(e.into()),
    }
}

/// Queue `event` on the main context and hand it back once every listener
/// has seen it
fn inject(host: &Arc<TokioHost>, module: &Module, event: HostEvent) -> oneshot::Receiver<HostEvent> {
    let (tx, rx) = oneshot::channel();
    let target = Arc::clone(host);
    host.run_task(
        module,
        Box::new(move || {
            let mut event = event;
            target.call_event(&mut event);
            let _ = tx.send(event);
        }),
    );
    rx
}

async fn deliver(host: &Arc<TokioHost>, module: &Module, event: HostEvent) -> anyhow::Result<HostEvent> {
    inject(host, module, event)
        .await
        .context("main context stopped before delivering the event")
}

fn verdict(event: &HostEvent) -> &'static str {
    match event.is_cancelled() {
        Some(true) => "denied",
        Some(false) => "allowed",
        None => "n/a",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => GridMenuConfig::config_path()?,
        };
        sample_config().save_to(&path)?;
        eprintln!("Config file created at: {}", path.display());
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let _guard = init_logging("demo", args.log_file || config.log_to_file)?;
    info!("Starting gridmenu-demo {}", env!("VERSION_STRING"));

    let scheme = match &args.scheme {
        Some(name) => config.scheme(name)?,
        None => default_scheme(),
    };

    let (host, main_thread) = TokioHost::new(Handle::current(), config.tick_interval());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let main_task = tokio::spawn(main_thread.run(shutdown_rx));

    let module = Module::new("gridmenu-demo");
    gridmenu::register(Arc::clone(&host) as Arc<dyn Host>, &module)?;

    let layout = scheme.compile();
    let clock_slot = layout
        .assignments
        .iter()
        .find(|a| a.item.material == CLOCK_MATERIAL)
        .map(|a| a.slot)
        .unwrap_or(0);
    let border_slot = layout
        .assignments
        .iter()
        .map(|a| a.slot)
        .find(|slot| *slot != clock_slot);

    let menu = Arc::new(ClockMenu::new(
        ContainerId(1),
        args.interval,
        clock_slot,
        CLOCK_MATERIAL,
    ));
    scheme.apply(&*menu);
    let menu_ref: MenuRef = menu.clone();
    let inventory = Inventory::held_by(menu.container(), menu_ref);
    let viewer = ViewerId(1);
    let phase: Duration = config.tick_interval() * (args.ticks / 4).max(1);

    deliver(&host, &module, HostEvent::Open(OpenEvent::new(viewer, inventory.clone()))).await?;
    tokio::time::sleep(phase).await;

    let mut slots = vec![clock_slot];
    slots.extend(border_slot);
    for slot in slots {
        let click = ClickEvent::new(
            viewer,
            inventory.clone(),
            Some(menu.container()),
            slot,
            ClickType::Left,
        );
        let result = deliver(&host, &module, HostEvent::Click(click)).await?;
        info!(target: "demo", "Click on slot {}: {}", slot, verdict(&result));
    }

    let dragged: BTreeMap<usize, ItemStack> = menu
        .content_slots()
        .into_iter()
        .take(2)
        .map(|slot| (slot, ItemStack::new("DIRT")))
        .collect();
    if !dragged.is_empty() {
        let drag = DragEvent::new(viewer, inventory.clone(), dragged);
        let result = deliver(&host, &module, HostEvent::Drag(drag)).await?;
        info!(target: "demo", "Drag over content slots: {}", verdict(&result));
    }
    tokio::time::sleep(phase).await;

    // first close gets reopened, the second one sticks
    for _ in 0..2 {
        deliver(&host, &module, HostEvent::Close(CloseEvent::new(viewer, inventory.clone()))).await?;
        tokio::time::sleep(phase).await;
        info!(target: "demo", "Viewers after close: {}", menu.viewers().len());
    }

    let refreshes = menu.refreshes();
    let clock = menu
        .item_at(clock_slot)
        .and_then(|item| item.display_name)
        .unwrap_or_else(|| "-".to_string());

    let disabler = Arc::clone(&host);
    let disabled = module.clone();
    host.run_task(&module, Box::new(move || disabler.disable_module(&disabled)));

    shutdown_tx.send(true)?;
    main_task.await?;

    println!("refreshes:      {}", refreshes);
    println!("clock:          {}", clock);
    println!("content slots:  {:?}", menu.content_slots());
    Ok(())
}
