use std::collections::BTreeMap;

use gridmenu_api::ItemStack;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scheme::InventoryScheme;

/// Serializable form of an [`InventoryScheme`].
///
/// ```toml
/// masks = ["=========", "=ppppppp=", "====c===="]
/// pagination = "p"
///
/// [items."="]
/// material = "BLACK_STAINED_GLASS_PANE"
///
/// [items.c]
/// material = "BARRIER"
/// display_name = "Close"
/// ```
///
/// Handlers cannot be expressed in configuration; attach them to the built
/// scheme with [`InventoryScheme::bind_item_with_handler`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemeConfig {
    #[serde(default)]
    pub masks: Vec<String>,

    /// Character reserved for paged content
    #[serde(default)]
    pub pagination: Option<char>,

    /// Character (as a one-character string key) -> item
    #[serde(default)]
    pub items: BTreeMap<String, ItemStack>,
}

impl SchemeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::InvalidArgument(e.to_string()))
    }

    /// Build the scheme this configuration describes
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if an item key is not exactly one character
    pub fn to_scheme(&self) -> Result<InventoryScheme> {
        let mut scheme = InventoryScheme::new().masks(self.masks.iter().cloned());

        for (key, item) in &self.items {
            let mut chars = key.chars();
            let character = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "item key {:?} must be a single character",
                        key
                    )))
                }
            };
            scheme = scheme.bind(character, item.clone(), None);
        }

        if let Some(character) = self.pagination {
            scheme = scheme.bind_pagination(character);
        }

        Ok(scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BORDERED: &str = r#"
masks = ["=========", "=ppppppp=", "====c===="]
pagination = "p"

[items."="]
material = "BLACK_STAINED_GLASS_PANE"

[items.c]
material = "BARRIER"
display_name = "Close"
"#;

    #[test]
    fn test_parse_and_build() {
        let config = SchemeConfig::from_toml_str(BORDERED).unwrap();
        assert_eq!(config.pagination, Some('p'));
        assert_eq!(config.items["c"].amount, 1);

        let layout = config.to_scheme().unwrap().compile();
        assert_eq!(layout.pagination_slots, (10..=16).collect::<Vec<_>>());
        // 9 + 2 border panes, 8 + close button on the last row
        assert_eq!(layout.assignments.len(), 20);

        let close = layout.assignments.iter().find(|a| a.slot == 22).unwrap();
        assert_eq!(close.item.display_name.as_deref(), Some("Close"));
    }

    #[test]
    fn test_multi_char_key_rejected() {
        let config = SchemeConfig {
            masks: vec!["ab".to_string()],
            pagination: None,
            items: BTreeMap::from([("ab".to_string(), ItemStack::new("STONE"))]),
        };

        assert!(matches!(config.to_scheme(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_key_rejected() {
        let config = SchemeConfig {
            items: BTreeMap::from([(String::new(), ItemStack::new("STONE"))]),
            ..Default::default()
        };

        assert!(matches!(config.to_scheme(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_item_without_material_rejected() {
        let result = SchemeConfig::from_toml_str("masks = [\"a\"]\n[items.a]\namount = 2\n");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
