use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use gridmenu_api::{Menu, MenuRef};

/// Identity key of a menu: the address of its shared allocation.
///
/// A `Weak` keeps the allocation (not the menu) alive, so an address cannot
/// be reused while an entry for it is still present.
pub(crate) fn menu_key(menu: &MenuRef) -> usize {
    Arc::as_ptr(menu) as *const () as usize
}

/// Set of menus that want periodic refreshes.
///
/// Membership is weak: the registry never keeps a menu alive, and entries
/// whose menu was dropped disappear on the next snapshot or insert.
#[derive(Default)]
pub struct UpdateRegistry {
    menus: Mutex<HashMap<usize, Weak<dyn Menu>>>,
}

impl UpdateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<usize, Weak<dyn Menu>>> {
        self.menus.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `menu`. Returns false if it was already present.
    pub fn insert(&self, menu: &MenuRef) -> bool {
        let mut menus = self.lock();
        menus.retain(|_, weak| weak.strong_count() > 0);
        menus.insert(menu_key(menu), Arc::downgrade(menu)).is_none()
    }

    /// Remove `menu`. Returns false if it was not present.
    pub fn remove(&self, menu: &MenuRef) -> bool {
        self.lock().remove(&menu_key(menu)).is_some()
    }

    pub fn contains(&self, menu: &MenuRef) -> bool {
        self.lock()
            .get(&menu_key(menu))
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Live members at this instant, pruning dropped menus.
    ///
    /// The returned handles are independent of the registry, so callers can
    /// iterate while other threads insert or remove.
    pub fn snapshot(&self) -> Vec<MenuRef> {
        let mut menus = self.lock();
        let mut live = Vec::with_capacity(menus.len());
        menus.retain(|_, weak| match weak.upgrade() {
            Some(menu) => {
                live.push(menu);
                true
            }
            None => false,
        });
        live
    }

    /// Number of live members
    pub fn len(&self) -> usize {
        let mut menus = self.lock();
        menus.retain(|_, weak| weak.strong_count() > 0);
        menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
