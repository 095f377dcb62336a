use serde::{Deserialize, Serialize};

/// An item shown in a menu slot.
///
/// gridmenu never inspects items; they are handed through to the menu as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: String,
    #[serde(default = "default_amount")]
    pub amount: u32,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub lore: Vec<String>,
}

fn default_amount() -> u32 {
    1
}

impl ItemStack {
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            amount: default_amount(),
            display_name: None,
            lore: Vec::new(),
        }
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_lore(mut self, line: impl Into<String>) -> Self {
        self.lore.push(line.into());
        self
    }
}
