//! Item catalog: equipment and consumables.

use crate::character::StatBlock;
use crate::inventory::EquipSlot;

#[derive(Debug, Clone)]
pub struct ItemDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// `Some` for equipment, `None` for consumables.
    pub slot: Option<EquipSlot>,
    /// Flat stat bonuses while equipped.
    pub bonuses: StatBlock,
    pub heal_hp: u32,
    pub heal_mp: u32,
}

impl ItemDef {
    pub fn is_consumable(&self) -> bool {
        self.slot.is_none() && (self.heal_hp > 0 || self.heal_mp > 0)
    }
}

/// Returns every item in the game.
pub fn get_all_items() -> Vec<ItemDef> {
    vec![
        // Consumables
        ItemDef {
            id: "coffee",
            name: "Coffee",
            description: "Restores focus. The fuel of all software.",
            slot: None,
            bonuses: StatBlock::zero(),
            heal_hp: 0,
            heal_mp: 15,
        },
        ItemDef {
            id: "energy_drink",
            name: "Energy Drink",
            description: "Tastes like battery acid, works like magic.",
            slot: None,
            bonuses: StatBlock::zero(),
            heal_hp: 30,
            heal_mp: 0,
        },
        ItemDef {
            id: "pizza",
            name: "Cold Pizza",
            description: "Breakfast of champions. Restores body and soul.",
            slot: None,
            bonuses: StatBlock::zero(),
            heal_hp: 20,
            heal_mp: 10,
        },
        // Weapons
        ItemDef {
            id: "mechanical_keyboard",
            name: "Mechanical Keyboard",
            description: "Every keystroke lands with authority.",
            slot: Some(EquipSlot::Weapon),
            bonuses: StatBlock::new(0, 5, 0, 0, 0),
            heal_hp: 0,
            heal_mp: 0,
        },
        ItemDef {
            id: "split_keyboard",
            name: "Split Ergo Keyboard",
            description: "Twice the keyboard, twice the damage output.",
            slot: Some(EquipSlot::Weapon),
            bonuses: StatBlock::new(0, 8, 0, 1, 0),
            heal_hp: 0,
            heal_mp: 0,
        },
        // Armor
        ItemDef {
            id: "ergonomic_chair",
            name: "Ergonomic Chair",
            description: "Proper lumbar support hardens the whole body.",
            slot: Some(EquipSlot::Armor),
            bonuses: StatBlock::new(10, 0, 4, 0, 0),
            heal_hp: 0,
            heal_mp: 0,
        },
        ItemDef {
            id: "standing_desk",
            name: "Standing Desk",
            description: "You can't be caught sitting down.",
            slot: Some(EquipSlot::Armor),
            bonuses: StatBlock::new(15, 0, 6, 0, 0),
            heal_hp: 0,
            heal_mp: 0,
        },
        // Accessories
        ItemDef {
            id: "rubber_duck",
            name: "Rubber Duck",
            description: "Explains the problem back to you. Deepens your reserves.",
            slot: Some(EquipSlot::Accessory),
            bonuses: StatBlock::new(0, 0, 0, 2, 10),
            heal_hp: 0,
            heal_mp: 0,
        },
        ItemDef {
            id: "second_monitor",
            name: "Second Monitor",
            description: "See the bug and the docs at the same time.",
            slot: Some(EquipSlot::Accessory),
            bonuses: StatBlock::new(0, 2, 0, 3, 0),
            heal_hp: 0,
            heal_mp: 0,
        },
    ]
}

pub fn get_item(item_id: &str) -> Option<ItemDef> {
    get_all_items().into_iter().find(|i| i.id == item_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_lookup() {
        assert!(get_item("coffee").is_some());
        assert!(get_item("jira_license").is_none());
    }

    #[test]
    fn test_consumable_classification() {
        assert!(get_item("coffee").unwrap().is_consumable());
        assert!(!get_item("mechanical_keyboard").unwrap().is_consumable());
    }

    #[test]
    fn test_equipment_carries_bonuses() {
        for item in get_all_items() {
            if item.slot.is_some() {
                let b = item.bonuses;
                assert!(
                    b.hp + b.atk + b.def + b.spd + b.mp > 0,
                    "equipment {} has no bonuses",
                    item.id
                );
            }
        }
    }
}
