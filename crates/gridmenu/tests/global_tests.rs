//! The process-wide manager behind `gridmenu::register`, `enable_update` and
//! `disable_update`. Kept to a single test so nothing else in this binary
//! touches the global state concurrently.

mod support;

use std::sync::Arc;

use gridmenu::InventoryManager;
use support::{as_menu, test_module, ManualHost, TestMenu};

#[test]
fn test_global_entry_points() {
    let host = ManualHost::new();
    let module = test_module();
    let global = InventoryManager::global();

    gridmenu::register(Arc::clone(&host) as _, &module).unwrap();
    assert!(global.is_registered());
    assert_eq!(host.listener_count(), 1);
    assert_eq!(host.timer_count(), 1);

    let err = gridmenu::register(Arc::clone(&host) as _, &module).unwrap_err();
    assert!(matches!(err, gridmenu::Error::AlreadyRegistered));
    assert_eq!(host.listener_count(), 1);

    // a different host does not unlock the already-registered global manager
    let other = ManualHost::new();
    let err = gridmenu::register(Arc::clone(&other) as _, &module).unwrap_err();
    assert!(matches!(err, gridmenu::Error::AlreadyRegistered));
    assert_eq!(other.listener_count(), 0);

    let menu = TestMenu::new(1, 1);
    menu.add_viewer(1);
    let handle = as_menu(&menu);

    gridmenu::enable_update(&handle);
    assert!(global.registry().contains(&handle));
    host.tick();
    assert_eq!(menu.refreshes(), 1);

    gridmenu::disable_update(&handle);
    assert!(!global.registry().contains(&handle));
    host.tick();
    assert_eq!(menu.refreshes(), 1);

    host.disable_module(&module);
    assert!(!global.is_registered());
    assert_eq!(host.listener_count(), 0);

    gridmenu::register(Arc::clone(&host) as _, &module).unwrap();
    assert!(global.is_registered());
    assert_eq!(host.listener_count(), 1);
}
