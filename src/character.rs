//! The player character: stats, clamped HP/MP mutators, experience and
//! level growth.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::*;
use crate::data::classes::ClassDef;
use crate::inventory::{Equipment, Inventory};

/// The five combat stats shared by characters and monsters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spd,
    Mp,
}

impl Stat {
    pub fn all() -> [Stat; 5] {
        [Stat::Hp, Stat::Atk, Stat::Def, Stat::Spd, Stat::Mp]
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Atk => "ATK",
            Stat::Def => "DEF",
            Stat::Spd => "SPD",
            Stat::Mp => "MP",
        }
    }
}

/// A full block of the five stats. Used both as maxima (`hp`/`mp` are the
/// caps for current HP/MP) and as per-level growth vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spd: u32,
    pub mp: u32,
}

impl StatBlock {
    pub fn new(hp: u32, atk: u32, def: u32, spd: u32, mp: u32) -> Self {
        Self { hp, atk, def, spd, mp }
    }

    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0, 0)
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spd => self.spd,
            Stat::Mp => self.mp,
        }
    }

    pub fn add(&mut self, other: &StatBlock) {
        self.hp += other.hp;
        self.atk += other.atk;
        self.def += other.def;
        self.spd += other.spd;
        self.mp += other.mp;
    }

    pub fn subtract(&mut self, other: &StatBlock) {
        self.hp = self.hp.saturating_sub(other.hp);
        self.atk = self.atk.saturating_sub(other.atk);
        self.def = self.def.saturating_sub(other.def);
        self.spd = self.spd.saturating_sub(other.spd);
        self.mp = self.mp.saturating_sub(other.mp);
    }
}

/// Result of an `add_exp` call that gained at least one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpResult {
    pub levels_gained: u32,
    pub new_level: u32,
    pub stat_gains: StatBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub level: u32,
    /// Lifetime experience total. Monotonic non-decreasing below the cap;
    /// level thresholds are cumulative sums of `exp_for_level`.
    pub exp: u64,
    pub stats: StatBlock,
    pub current_hp: u32,
    pub current_mp: u32,
    /// Per-level stat growth, copied from the class at creation.
    pub growth: StatBlock,
    pub skills: Vec<String>,
    pub equipment: Equipment,
    pub inventory: Inventory,
    pub gold: u32,
}

/// Experience needed to go from level `l - 1` to level `l`.
pub fn exp_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    BASE_EXP_TO_LEVEL + (level as u64 - 2) * EXP_STEP_PER_LEVEL
}

/// Cumulative lifetime experience required to hold `level`.
pub fn exp_threshold(level: u32) -> u64 {
    (2..=level).map(exp_for_level).sum()
}

impl Character {
    pub fn new(name: &str, class: &ClassDef) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            class_id: class.id.to_string(),
            level: 1,
            exp: 0,
            stats: class.base_stats,
            current_hp: class.base_stats.hp,
            current_mp: class.base_stats.mp,
            growth: class.growth,
            skills: class.skills.iter().map(|s| s.to_string()).collect(),
            equipment: Equipment::new(),
            inventory: Inventory::new(),
            gold: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn knows_skill(&self, skill_id: &str) -> bool {
        self.skills.iter().any(|s| s == skill_id)
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    /// Heals up to the HP cap. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.stats.hp - self.current_hp);
        self.current_hp += applied;
        applied
    }

    pub fn spend_mp(&mut self, amount: u32) {
        self.current_mp = self.current_mp.saturating_sub(amount);
    }

    /// Restores up to the MP cap. Returns the amount actually restored.
    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.stats.mp - self.current_mp);
        self.current_mp += applied;
        applied
    }

    pub fn restore_full(&mut self) {
        self.current_hp = self.stats.hp;
        self.current_mp = self.stats.mp;
    }

    /// Re-clamps current HP/MP after the maxima changed (equip/unequip).
    pub fn clamp_current(&mut self) {
        self.current_hp = self.current_hp.min(self.stats.hp);
        self.current_mp = self.current_mp.min(self.stats.mp);
    }

    /// Adds experience and applies every level-up it pays for, stopping at
    /// the level cap (surplus experience is retained, not convertible).
    /// Any level gained fully restores HP and MP. Callers must not assume
    /// at most one level per call.
    pub fn add_exp(&mut self, amount: u64) -> Option<LevelUpResult> {
        self.exp += amount;

        let mut levels_gained = 0;
        let mut stat_gains = StatBlock::zero();
        while self.level < LEVEL_CAP && self.exp >= exp_threshold(self.level + 1) {
            self.level += 1;
            self.stats.add(&self.growth);
            stat_gains.add(&self.growth);
            levels_gained += 1;
        }

        if levels_gained == 0 {
            return None;
        }
        self.restore_full();
        Some(LevelUpResult {
            levels_gained,
            new_level: self.level,
            stat_gains,
        })
    }
}
