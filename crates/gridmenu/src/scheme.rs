use std::collections::HashMap;
use std::fmt;

use gridmenu_api::{click_handler, ClickEvent, ClickHandler, ItemStack, Menu};
use tracing::trace;

/// Slots per menu row
pub const ROW_WIDTH: usize = 9;

/// Masks longer than a row keep this many characters
const MASK_KEEP: usize = ROW_WIDTH + 1;

/// Declarative menu layout: rows of characters plus what each character means.
///
/// ```
/// # use gridmenu::InventoryScheme;
/// # use gridmenu::api::ItemStack;
/// let scheme = InventoryScheme::new()
///     .masks(["111111111", "1ppppppp1", "111111111"])
///     .bind_item('1', ItemStack::new("GRAY_STAINED_GLASS_PANE"))
///     .bind_pagination('p');
/// assert_eq!(scheme.compile().pagination_slots.len(), 7);
/// ```
#[derive(Clone, Default)]
pub struct InventoryScheme {
    masks: Vec<String>,
    items: HashMap<char, ItemStack>,
    handlers: HashMap<char, ClickHandler>,
    pagination_char: Option<char>,
}

/// One compiled slot: an item and the handler bound with it
#[derive(Clone)]
pub struct SlotAssignment {
    pub slot: usize,
    pub item: ItemStack,
    pub handler: Option<ClickHandler>,
}

impl fmt::Debug for SlotAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotAssignment")
            .field("slot", &self.slot)
            .field("item", &self.item)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// A scheme expanded into absolute slots
#[derive(Clone, Debug, Default)]
pub struct SchemeLayout {
    pub assignments: Vec<SlotAssignment>,
    /// Slots reserved for paged content, in row-major order
    pub pagination_slots: Vec<usize>,
}

impl InventoryScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. Rows longer than 9 characters keep their first 10.
    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        let mask = mask.into();
        let row = if mask.chars().count() > ROW_WIDTH {
            mask.chars().take(MASK_KEEP).collect()
        } else {
            mask
        };
        self.masks.push(row);
        self
    }

    pub fn masks<I, S>(self, masks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        masks.into_iter().fold(self, |scheme, mask| scheme.mask(mask))
    }

    /// Bind `character` to `item`, keeping any handler already bound to it
    pub fn bind_item(self, character: char, item: ItemStack) -> Self {
        self.bind(character, item, None)
    }

    /// Bind `character` to `item` and a click handler
    pub fn bind_item_with_handler<F>(self, character: char, item: ItemStack, handler: F) -> Self
    where
        F: Fn(&mut ClickEvent) + Send + Sync + 'static,
    {
        self.bind(character, item, Some(click_handler(handler)))
    }

    pub(crate) fn bind(
        mut self,
        character: char,
        item: ItemStack,
        handler: Option<ClickHandler>,
    ) -> Self {
        self.items.insert(character, item);
        if let Some(handler) = handler {
            self.handlers.insert(character, handler);
        }
        self
    }

    /// Reserve `character` for paged content. Replaces any previous choice.
    pub fn bind_pagination(mut self, character: char) -> Self {
        self.pagination_char = Some(character);
        self
    }

    pub fn unbind_item(mut self, character: char) -> Self {
        self.items.remove(&character);
        self.handlers.remove(&character);
        self
    }

    pub fn rows(&self) -> &[String] {
        &self.masks
    }

    pub fn pagination_char(&self) -> Option<char> {
        self.pagination_char
    }

    /// Expand rows into slot assignments and pagination slots.
    ///
    /// Slot numbers assume a 9-wide grid: `9 * row + column`. Characters
    /// with no bound item are skipped.
    pub fn compile(&self) -> SchemeLayout {
        let mut layout = SchemeLayout::default();

        for (row, mask) in self.masks.iter().enumerate() {
            for (column, character) in mask.chars().enumerate() {
                let slot = ROW_WIDTH * row + column;

                if self.pagination_char == Some(character) {
                    layout.pagination_slots.push(slot);
                    continue;
                }

                if let Some(item) = self.items.get(&character) {
                    layout.assignments.push(SlotAssignment {
                        slot,
                        item: item.clone(),
                        handler: self.handlers.get(&character).cloned(),
                    });
                }
            }
        }

        layout
    }

    /// Write this layout into `menu`
    pub fn apply(&self, menu: &dyn Menu) {
        let layout = self.compile();
        trace!(target: "scheme",
            "Applying scheme to {}: {} item(s), {} pagination slot(s)",
            menu.container(),
            layout.assignments.len(),
            layout.pagination_slots.len()
        );

        for assignment in layout.assignments {
            menu.set_item(assignment.slot, assignment.item, assignment.handler);
        }

        if layout.pagination_slots.is_empty() {
            return;
        }
        if let Some(paginated) = menu.as_paginated() {
            paginated.set_content_slots(layout.pagination_slots);
        }
    }
}

impl fmt::Debug for InventoryScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<_> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("InventoryScheme")
            .field("masks", &self.masks)
            .field("items", &self.items)
            .field("handlers", &handlers)
            .field("pagination_char", &self.pagination_char)
            .finish()
    }
}
