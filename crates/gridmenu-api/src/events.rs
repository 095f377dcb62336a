use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::item::ItemStack;
use crate::menu::Menu;
use crate::{ContainerId, Module, ViewerId};

// ============================================================================
// Cancellation
// ============================================================================

/// Events whose default host behaviour can be vetoed by a listener
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;
    fn set_cancelled(&mut self, cancelled: bool);
}

// ============================================================================
// Inventory Handle
// ============================================================================

/// A host container as seen by an event, together with its holder.
///
/// The holder is the menu that renders into this container, if any. Events
/// whose inventory has no menu holder do not belong to gridmenu.
#[derive(Clone)]
pub struct Inventory {
    id: ContainerId,
    holder: Option<Arc<dyn Menu>>,
}

impl Inventory {
    /// A container not backed by any menu (e.g. a viewer's own inventory)
    pub fn unmanaged(id: ContainerId) -> Self {
        Self { id, holder: None }
    }

    /// A container rendered by `menu`
    pub fn held_by(id: ContainerId, menu: Arc<dyn Menu>) -> Self {
        Self {
            id,
            holder: Some(menu),
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn holder(&self) -> Option<&Arc<dyn Menu>> {
        self.holder.as_ref()
    }
}

impl fmt::Debug for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inventory")
            .field("id", &self.id)
            .field("managed", &self.holder.is_some())
            .finish()
    }
}

// ============================================================================
// Interaction Events
// ============================================================================

/// How a slot was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickType {
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    Middle,
    /// Number key pressed while hovering a slot (hotbar index 0-8)
    NumberKey(u8),
    Drop,
    ControlDrop,
    DoubleClick,
}

impl ClickType {
    pub fn is_shift_click(&self) -> bool {
        matches!(self, ClickType::ShiftLeft | ClickType::ShiftRight)
    }
}

/// A viewer clicked somewhere in an open container view
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub viewer: ViewerId,
    /// Top inventory of the view the viewer has open
    pub inventory: Inventory,
    /// Container that was actually clicked; `None` when clicking outside the window
    pub clicked_inventory: Option<ContainerId>,
    pub slot: usize,
    pub click: ClickType,
    pub current_item: Option<ItemStack>,
    cancelled: bool,
}

impl ClickEvent {
    pub fn new(
        viewer: ViewerId,
        inventory: Inventory,
        clicked_inventory: Option<ContainerId>,
        slot: usize,
        click: ClickType,
    ) -> Self {
        Self {
            viewer,
            inventory,
            clicked_inventory,
            slot,
            click,
            current_item: None,
            cancelled: false,
        }
    }

    pub fn with_current_item(mut self, item: ItemStack) -> Self {
        self.current_item = Some(item);
        self
    }

    /// Whether the click landed inside the top (menu) inventory rather than
    /// the viewer's own inventory below it
    pub fn clicked_top(&self) -> bool {
        self.clicked_inventory == Some(self.inventory.id())
    }
}

impl Cancellable for ClickEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// A viewer dragged an item stack across one or more slots
#[derive(Debug, Clone)]
pub struct DragEvent {
    pub viewer: ViewerId,
    pub inventory: Inventory,
    /// Slots affected by the drag, in view coordinates
    pub raw_slots: BTreeSet<usize>,
    pub new_items: BTreeMap<usize, ItemStack>,
    cancelled: bool,
}

impl DragEvent {
    pub fn new(
        viewer: ViewerId,
        inventory: Inventory,
        new_items: BTreeMap<usize, ItemStack>,
    ) -> Self {
        Self {
            viewer,
            inventory,
            raw_slots: new_items.keys().copied().collect(),
            new_items,
            cancelled: false,
        }
    }
}

impl Cancellable for DragEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// A viewer opened a container
#[derive(Debug, Clone)]
pub struct OpenEvent {
    pub viewer: ViewerId,
    pub inventory: Inventory,
}

impl OpenEvent {
    pub fn new(viewer: ViewerId, inventory: Inventory) -> Self {
        Self { viewer, inventory }
    }
}

/// A viewer closed a container
#[derive(Debug, Clone)]
pub struct CloseEvent {
    pub viewer: ViewerId,
    pub inventory: Inventory,
}

impl CloseEvent {
    pub fn new(viewer: ViewerId, inventory: Inventory) -> Self {
        Self { viewer, inventory }
    }
}

/// A host module is being disabled
#[derive(Debug, Clone)]
pub struct ModuleDisableEvent {
    pub module: Module,
}

impl ModuleDisableEvent {
    pub fn new(module: Module) -> Self {
        Self { module }
    }
}

/// Unified host event delivered to listeners
#[derive(Debug, Clone)]
pub enum HostEvent {
    Click(ClickEvent),
    Drag(DragEvent),
    Open(OpenEvent),
    Close(CloseEvent),
    ModuleDisable(ModuleDisableEvent),
}

impl HostEvent {
    /// The container this event concerns, if it is a container event
    pub fn inventory(&self) -> Option<&Inventory> {
        match self {
            HostEvent::Click(e) => Some(&e.inventory),
            HostEvent::Drag(e) => Some(&e.inventory),
            HostEvent::Open(e) => Some(&e.inventory),
            HostEvent::Close(e) => Some(&e.inventory),
            HostEvent::ModuleDisable(_) => None,
        }
    }

    /// Cancellation state, for the event kinds that can be cancelled
    pub fn is_cancelled(&self) -> Option<bool> {
        match self {
            HostEvent::Click(e) => Some(e.is_cancelled()),
            HostEvent::Drag(e) => Some(e.is_cancelled()),
            _ => None,
        }
    }
}
