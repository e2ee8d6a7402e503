//! Loot awarded by rooms and accumulated over a run.

use serde::{Deserialize, Serialize};

/// A stack of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    pub item_id: String,
    pub quantity: u32,
}

impl LootItem {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Currency, experience and items.
///
/// `Loot::default()` is the empty bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loot {
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub experience: u64,
    #[serde(default)]
    pub items: Vec<LootItem>,
}

impl Loot {
    pub fn gold(gold: u64) -> Self {
        Self {
            gold,
            ..Self::default()
        }
    }

    pub fn with_experience(mut self, experience: u64) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_item(mut self, item_id: impl Into<String>, quantity: u32) -> Self {
        self.items.push(LootItem::new(item_id, quantity));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.experience == 0 && self.items.is_empty()
    }

    /// Adds `other` into `self`. Items with the same id stack.
    pub fn merge(&mut self, other: &Loot) {
        self.gold = self.gold.saturating_add(other.gold);
        self.experience = self.experience.saturating_add(other.experience);
        for item in &other.items {
            match self.items.iter_mut().find(|i| i.item_id == item.item_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity)
                }
                None => self.items.push(item.clone()),
            }
        }
    }
}
