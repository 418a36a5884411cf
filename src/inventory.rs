//! Loot rolling, the inventory ledger and equipment slots.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::constants::INVENTORY_CAPACITY;
use crate::data::items::ItemDef;
use crate::errors::ActionError;
use crate::monster::DropTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory,
}

/// The three equipment slots, each holding an item id from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub accessory: Option<String>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> &Option<String> {
        match slot {
            EquipSlot::Weapon => &self.weapon,
            EquipSlot::Armor => &self.armor,
            EquipSlot::Accessory => &self.accessory,
        }
    }

    pub fn set(&mut self, slot: EquipSlot, item_id: Option<String>) {
        match slot {
            EquipSlot::Weapon => self.weapon = item_id,
            EquipSlot::Armor => self.armor = item_id,
            EquipSlot::Accessory => self.accessory = item_id,
        }
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &String> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .filter_map(|item| item.as_ref())
    }
}

/// Ordered item list with a hard capacity of 99 entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= INVENTORY_CAPACITY
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|i| i == item_id)
    }

    pub fn count(&self, item_id: &str) -> usize {
        self.items.iter().filter(|i| *i == item_id).count()
    }

    /// Appends an item. Fails without mutating when at capacity.
    pub fn add_item(&mut self, item_id: &str) -> Result<(), ActionError> {
        if self.is_full() {
            return Err(ActionError::InventoryFull);
        }
        self.items.push(item_id.to_string());
        Ok(())
    }

    /// Removes exactly one matching entry. Returns false if none matched.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        if let Some(pos) = self.items.iter().position(|i| i == item_id) {
            self.items.remove(pos);
            return true;
        }
        false
    }
}

/// Everything a defeated monster yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootDrop {
    pub items: Vec<String>,
    pub exp: u64,
    pub gold: u32,
}

/// Rolls a drop table: each entry is an independent `[0, 100)` draw against
/// its percent rate, so one entry can fail while a rarer one succeeds.
pub fn roll_loot(table: &DropTable, rng: &mut impl Rng) -> LootDrop {
    let mut items = Vec::new();
    for entry in &table.entries {
        let draw: f64 = rng.gen_range(0.0..100.0);
        if draw < entry.chance {
            items.push(entry.item_id.clone());
        }
    }
    LootDrop {
        items,
        exp: table.exp,
        gold: table.gold,
    }
}

impl Character {
    /// Equips an item from the inventory into its slot, returning any
    /// previously equipped item to the inventory and applying the stat
    /// bonuses. The swap can never overflow the inventory because the new
    /// item's slot is freed first.
    pub fn equip(&mut self, item: &ItemDef) -> Result<(), ActionError> {
        let slot = item
            .slot
            .ok_or_else(|| ActionError::ItemNotEquippable(item.id.to_string()))?;
        if !self.inventory.contains(item.id) {
            return Err(ActionError::ItemNotOwned(item.id.to_string()));
        }

        self.inventory.remove_item(item.id);
        if let Some(previous_id) = self.equipment.get(slot).clone() {
            self.remove_item_bonuses(&previous_id);
            // Cannot fail: removing the new item freed a slot.
            let _ = self.inventory.add_item(&previous_id);
        }
        self.equipment.set(slot, Some(item.id.to_string()));
        self.stats.add(&item.bonuses);
        self.clamp_current();
        Ok(())
    }

    /// Unequips the slot back into the inventory, removing the item's stat
    /// bonuses. Fails without mutating when the inventory is full.
    pub fn unequip(&mut self, slot: EquipSlot) -> Result<(), ActionError> {
        let Some(item_id) = self.equipment.get(slot).clone() else {
            return Ok(());
        };
        if self.inventory.is_full() {
            return Err(ActionError::InventoryFull);
        }
        self.equipment.set(slot, None);
        self.remove_item_bonuses(&item_id);
        let _ = self.inventory.add_item(&item_id);
        Ok(())
    }

    fn remove_item_bonuses(&mut self, item_id: &str) {
        if let Some(item) = crate::data::items::get_item(item_id) {
            self.stats.subtract(&item.bonuses);
            self.clamp_current();
        }
    }

    /// Consumes one matching inventory entry and applies the item's heal
    /// values. Nothing is removed on failure.
    pub fn use_consumable(&mut self, item: &ItemDef) -> Result<(u32, u32), ActionError> {
        if item.slot.is_some() || (item.heal_hp == 0 && item.heal_mp == 0) {
            return Err(ActionError::ItemNotUsable(item.id.to_string()));
        }
        if !self.inventory.remove_item(item.id) {
            return Err(ActionError::ItemNotOwned(item.id.to_string()));
        }
        let hp = self.heal(item.heal_hp);
        let mp = self.restore_mp(item.heal_mp);
        Ok((hp, mp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classes::get_class;
    use crate::data::items::get_item;
    use crate::monster::DropEntry;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_character() -> Character {
        Character::new("Test Dev", &get_class("junior_dev").unwrap())
    }

    #[test]
    fn test_inventory_capacity_is_hard() {
        let mut inv = Inventory::new();
        for _ in 0..INVENTORY_CAPACITY {
            inv.add_item("coffee").unwrap();
        }
        assert!(inv.is_full());
        assert_eq!(inv.add_item("coffee"), Err(ActionError::InventoryFull));
        assert_eq!(inv.len(), INVENTORY_CAPACITY);
    }

    #[test]
    fn test_remove_exactly_one() {
        let mut inv = Inventory::new();
        inv.add_item("coffee").unwrap();
        inv.add_item("coffee").unwrap();
        assert!(inv.remove_item("coffee"));
        assert_eq!(inv.count("coffee"), 1);
        assert!(!inv.remove_item("pizza"));
    }

    #[test]
    fn test_roll_loot_entries_are_independent() {
        let table = DropTable {
            entries: vec![
                DropEntry { item_id: "coffee".to_string(), chance: 100.0 },
                DropEntry { item_id: "rubber_duck".to_string(), chance: 0.0 },
            ],
            exp: 40,
            gold: 12,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let drop = roll_loot(&table, &mut rng);
        assert_eq!(drop.items, vec!["coffee".to_string()]);
        assert_eq!(drop.exp, 40);
        assert_eq!(drop.gold, 12);
    }

    #[test]
    fn test_equip_applies_bonuses() {
        let mut c = test_character();
        let keyboard = get_item("mechanical_keyboard").unwrap();
        c.inventory.add_item(keyboard.id).unwrap();

        let base_atk = c.stats.atk;
        c.equip(&keyboard).unwrap();
        assert_eq!(c.stats.atk, base_atk + keyboard.bonuses.atk);
        assert_eq!(c.equipment.weapon.as_deref(), Some("mechanical_keyboard"));
        assert!(!c.inventory.contains("mechanical_keyboard"));
    }

    #[test]
    fn test_equip_swaps_previous_back_to_inventory() {
        let mut c = test_character();
        let keyboard = get_item("mechanical_keyboard").unwrap();
        let monitor = get_item("split_keyboard").unwrap();
        c.inventory.add_item(keyboard.id).unwrap();
        c.inventory.add_item(monitor.id).unwrap();

        let base_atk = c.stats.atk;
        c.equip(&keyboard).unwrap();
        c.equip(&monitor).unwrap();

        assert_eq!(c.equipment.weapon.as_deref(), Some("split_keyboard"));
        assert!(c.inventory.contains("mechanical_keyboard"));
        // Old bonuses removed, new ones applied
        assert_eq!(c.stats.atk, base_atk + monitor.bonuses.atk);
    }

    #[test]
    fn test_unequip_fails_on_full_inventory_without_mutation() {
        let mut c = test_character();
        let keyboard = get_item("mechanical_keyboard").unwrap();
        c.inventory.add_item(keyboard.id).unwrap();
        c.equip(&keyboard).unwrap();

        for _ in 0..INVENTORY_CAPACITY {
            c.inventory.add_item("coffee").unwrap();
        }
        let atk_before = c.stats.atk;
        assert_eq!(c.unequip(EquipSlot::Weapon), Err(ActionError::InventoryFull));
        assert_eq!(c.equipment.weapon.as_deref(), Some("mechanical_keyboard"));
        assert_eq!(c.stats.atk, atk_before);
    }

    #[test]
    fn test_unequip_removes_bonuses_and_clamps() {
        let mut c = test_character();
        let chair = get_item("ergonomic_chair").unwrap();
        c.inventory.add_item(chair.id).unwrap();
        c.equip(&chair).unwrap();
        c.restore_full();

        c.unequip(EquipSlot::Armor).unwrap();
        assert!(c.inventory.contains("ergonomic_chair"));
        // Max HP shrank back; current HP is re-clamped to it
        assert!(c.current_hp <= c.stats.hp);
    }

    #[test]
    fn test_use_consumable_removes_exactly_one() {
        let mut c = test_character();
        let coffee = get_item("coffee").unwrap();
        c.inventory.add_item(coffee.id).unwrap();
        c.inventory.add_item(coffee.id).unwrap();
        c.spend_mp(c.current_mp);

        let (_, mp) = c.use_consumable(&coffee).unwrap();
        assert!(mp > 0);
        assert_eq!(c.inventory.count("coffee"), 1);
    }

    #[test]
    fn test_use_consumable_failure_mutates_nothing() {
        let mut c = test_character();
        let coffee = get_item("coffee").unwrap();
        assert_eq!(
            c.use_consumable(&coffee),
            Err(ActionError::ItemNotOwned("coffee".to_string()))
        );

        let keyboard = get_item("mechanical_keyboard").unwrap();
        c.inventory.add_item(keyboard.id).unwrap();
        assert_eq!(
            c.use_consumable(&keyboard),
            Err(ActionError::ItemNotUsable("mechanical_keyboard".to_string()))
        );
        assert!(c.inventory.contains("mechanical_keyboard"));
    }
}
