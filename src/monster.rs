//! Monsters: the bugs (and bosses) fought in each stage encounter.
//!
//! A monster is created fresh from the static catalog for every encounter
//! and destroyed when the encounter ends; it is never persisted.

use serde::{Deserialize, Serialize};

use crate::character::StatBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterKind {
    Bug,
    Boss,
}

/// A condition in a monster's behavior table.
///
/// Non-phase conditions must all hold (AND) for the special action table to
/// be used. `PhaseChange` conditions combine OR and advance the boss's
/// phase as a side effect of evaluation; each threshold fires at most once
/// per encounter and the phase never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiCondition {
    /// Current HP strictly below this percentage of max.
    HpBelow(u32),
    /// Current HP at or above this percentage of max.
    HpAbove(u32),
    /// At least this many AI decisions taken this encounter.
    TurnCount(u32),
    /// Boss escalation threshold: HP at or below `hp_below` percent moves
    /// the boss to `to_phase`.
    PhaseChange { hp_below: u32, to_phase: u8 },
}

/// What a monster does with its turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterActionKind {
    Attack,
    Skill(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedAction {
    pub action: MonsterActionKind,
    pub weight: u32,
    /// Minimum boss phase for this entry to be drawable. 1 for always.
    pub min_phase: u8,
}

impl WeightedAction {
    pub fn new(action: MonsterActionKind, weight: u32) -> Self {
        Self { action, weight, min_phase: 1 }
    }

    pub fn from_phase(action: MonsterActionKind, weight: u32, min_phase: u8) -> Self {
        Self { action, weight, min_phase }
    }
}

/// Conditions plus weighted actions; the whole behavior specification of a
/// monster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BehaviorSpec {
    pub conditions: Vec<AiCondition>,
    pub actions: Vec<WeightedAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    pub item_id: String,
    /// Percent chance in `[0, 100]`, rolled independently per entry.
    pub chance: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DropTable {
    pub entries: Vec<DropEntry>,
    pub exp: u64,
    pub gold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: String,
    pub name: String,
    pub kind: MonsterKind,
    pub stats: StatBlock,
    pub current_hp: u32,
    /// Escalation phase, bosses only. 1..=4, monotonically increasing.
    pub phase: Option<u8>,
    pub behavior: BehaviorSpec,
    pub drops: DropTable,
}

impl Monster {
    pub fn new(
        id: &str,
        name: &str,
        kind: MonsterKind,
        stats: StatBlock,
        behavior: BehaviorSpec,
        drops: DropTable,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            stats,
            current_hp: stats.hp,
            phase: match kind {
                MonsterKind::Boss => Some(1),
                MonsterKind::Bug => None,
            },
            behavior,
            drops,
        }
    }

    /// A monster with no special behavior and no drops. Used for fallbacks
    /// and tests.
    pub fn basic(id: &str, name: &str, kind: MonsterKind, stats: StatBlock) -> Self {
        Self::new(id, name, kind, stats, BehaviorSpec::default(), DropTable::default())
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
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

    /// Current HP as a percentage of max, rounded down.
    pub fn hp_percent(&self) -> u32 {
        if self.stats.hp == 0 {
            return 0;
        }
        self.current_hp * 100 / self.stats.hp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> StatBlock {
        StatBlock::new(80, 12, 6, 8, 0)
    }

    #[test]
    fn test_monster_creation() {
        let m = Monster::basic("null_pointer", "Null Pointer", MonsterKind::Bug, stats());
        assert_eq!(m.current_hp, 80);
        assert!(m.is_alive());
        assert_eq!(m.phase, None);
    }

    #[test]
    fn test_boss_starts_in_phase_one() {
        let b = Monster::basic("heisenbug", "Heisenbug", MonsterKind::Boss, stats());
        assert_eq!(b.phase, Some(1));
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut m = Monster::basic("x", "X", MonsterKind::Bug, stats());
        m.take_damage(200);
        assert_eq!(m.current_hp, 0);
        assert!(!m.is_alive());
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut m = Monster::basic("x", "X", MonsterKind::Bug, stats());
        m.take_damage(30);
        assert_eq!(m.heal(100), 30);
        assert_eq!(m.current_hp, 80);
    }

    #[test]
    fn test_hp_percent() {
        let mut m = Monster::basic("x", "X", MonsterKind::Bug, stats());
        assert_eq!(m.hp_percent(), 100);
        m.take_damage(40);
        assert_eq!(m.hp_percent(), 50);
    }
}
