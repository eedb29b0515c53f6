//! Character inventory and equipment flags.

use std::collections::BTreeMap;

use crate::env::{EquipSlot, ItemDefinition, ItemOracle};
use crate::state::ItemId;

/// One stack of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryEntry {
    pub item: ItemId,
    pub quantity: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipped: bool,
}

/// Stacks keyed by item id. Empty stacks are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = InventoryEntry>) -> Self {
        let mut inventory = Self::new();
        for entry in entries {
            inventory.add(entry.item, entry.quantity);
            if entry.equipped {
                inventory.set_equipped(entry.item, true);
            }
        }
        inventory
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn quantity(&self, item: ItemId) -> u32 {
        self.entry(item).map_or(0, |e| e.quantity)
    }

    pub fn has(&self, item: ItemId) -> bool {
        self.quantity(item) > 0
    }

    pub fn is_equipped(&self, item: ItemId) -> bool {
        self.entry(item).is_some_and(|e| e.equipped)
    }

    pub fn add(&mut self, item: ItemId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.entries.iter_mut().find(|e| e.item == item) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
            None => self.entries.push(InventoryEntry {
                item,
                quantity,
                equipped: false,
            }),
        }
    }

    /// Removes up to `quantity` units. Returns how many were removed.
    pub fn remove(&mut self, item: ItemId, quantity: u32) -> u32 {
        let Some(index) = self.entries.iter().position(|e| e.item == item) else {
            return 0;
        };
        let entry = &mut self.entries[index];
        let removed = quantity.min(entry.quantity);
        entry.quantity -= removed;
        if entry.quantity == 0 {
            self.entries.remove(index);
        }
        removed
    }

    /// Returns false when the item is not carried.
    pub fn set_equipped(&mut self, item: ItemId, equipped: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.item == item) {
            Some(entry) => {
                entry.equipped = equipped;
                true
            }
            None => false,
        }
    }

    /// Equipped definition in `slot`, if any.
    pub fn equipped_in<'o, O>(&self, items: &'o O, slot: EquipSlot) -> Option<&'o ItemDefinition>
    where
        O: ItemOracle + ?Sized,
    {
        self.entries
            .iter()
            .filter(|e| e.equipped)
            .filter_map(|e| items.item(e.item))
            .find(|def| def.slot() == Some(slot))
    }

    pub fn equipped(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.entries.iter().filter(|e| e.equipped).map(|e| e.item)
    }

    fn entry(&self, item: ItemId) -> Option<&InventoryEntry> {
        self.entries.iter().find(|e| e.item == item)
    }

    /// Changes needed to turn `before` into `after`.
    pub fn diff(before: &Inventory, after: &Inventory) -> InventoryDelta {
        let mut items: BTreeMap<ItemId, (u32, u32)> = BTreeMap::new();
        for entry in &before.entries {
            items.entry(entry.item).or_default().0 = entry.quantity;
        }
        for entry in &after.entries {
            items.entry(entry.item).or_default().1 = entry.quantity;
        }

        let mut delta = InventoryDelta::default();
        for (item, (old, new)) in items {
            if new > old {
                delta.added.push((item, new - old));
            } else if old > new {
                delta.removed.push((item, old - new));
            }
            let was = before.is_equipped(item);
            let now = after.is_equipped(item);
            if was != now && new > 0 {
                delta.equipment.push((item, now));
            }
        }
        delta
    }
}

/// Inventory operations produced by one turn, in persistence terms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryDelta {
    pub added: Vec<(ItemId, u32)>,
    pub removed: Vec<(ItemId, u32)>,
    pub equipment: Vec<(ItemId, bool)>,
}

impl InventoryDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.equipment.is_empty()
    }
}
