//! Monster catalog: the bugs and bosses of every stage, their behavior
//! tables, drop tables and skills.

use crate::character::StatBlock;
use crate::effects::StatusCondition;
use crate::monster::{
    AiCondition, BehaviorSpec, DropEntry, DropTable, Monster, MonsterActionKind, MonsterKind,
    WeightedAction,
};

/// A monster skill: flat damage as a percentage of the monster's ATK, with
/// an optional status infliction. Inflictions are authored only on boss
/// skills; that is data, not a rule of the engine.
#[derive(Debug, Clone)]
pub struct MonsterSkillDef {
    pub id: &'static str,
    pub name: &'static str,
    /// Damage as percent of the monster's effective ATK.
    pub power: u32,
    pub inflicts: Option<(StatusCondition, u32)>,
}

pub fn get_all_monster_skills() -> Vec<MonsterSkillDef> {
    vec![
        MonsterSkillDef { id: "null_grasp", name: "Null Grasp", power: 130, inflicts: None },
        MonsterSkillDef { id: "data_race", name: "Data Race", power: 130, inflicts: None },
        MonsterSkillDef { id: "heap_drain", name: "Heap Drain", power: 120, inflicts: None },
        MonsterSkillDef { id: "segfault_slam", name: "Segfault Slam", power: 150, inflicts: None },
        MonsterSkillDef {
            id: "hard_crash",
            name: "Hard Crash",
            power: 140,
            inflicts: Some((StatusCondition::Stun, 1)),
        },
        MonsterSkillDef {
            id: "scope_creep",
            name: "Scope Creep",
            power: 110,
            inflicts: Some((StatusCondition::Confusion, 2)),
        },
        MonsterSkillDef {
            id: "quantum_flicker",
            name: "Quantum Flicker",
            power: 160,
            inflicts: Some((StatusCondition::Confusion, 2)),
        },
        MonsterSkillDef {
            id: "cascade_failure",
            name: "Cascade Failure",
            power: 180,
            inflicts: None,
        },
    ]
}

pub fn get_monster_skill(skill_id: &str) -> Option<MonsterSkillDef> {
    get_all_monster_skills().into_iter().find(|s| s.id == skill_id)
}

fn skill(id: &str) -> MonsterActionKind {
    MonsterActionKind::Skill(id.to_string())
}

fn boss_phase_conditions() -> Vec<AiCondition> {
    vec![
        AiCondition::PhaseChange { hp_below: 75, to_phase: 2 },
        AiCondition::PhaseChange { hp_below: 50, to_phase: 3 },
        AiCondition::PhaseChange { hp_below: 25, to_phase: 4 },
    ]
}

struct MonsterDef {
    id: &'static str,
    name: &'static str,
    kind: MonsterKind,
    stats: StatBlock,
    behavior: BehaviorSpec,
    drops: DropTable,
}

fn drop_table(entries: Vec<(&str, f64)>, exp: u64, gold: u32) -> DropTable {
    DropTable {
        entries: entries
            .into_iter()
            .map(|(item_id, chance)| DropEntry { item_id: item_id.to_string(), chance })
            .collect(),
        exp,
        gold,
    }
}

fn get_all_monster_defs() -> Vec<MonsterDef> {
    vec![
        // Chapter 1 bugs
        MonsterDef {
            id: "null_pointer",
            name: "Null Pointer",
            kind: MonsterKind::Bug,
            stats: StatBlock::new(60, 12, 5, 8, 0),
            behavior: BehaviorSpec {
                conditions: vec![AiCondition::HpBelow(50)],
                actions: vec![
                    WeightedAction::new(MonsterActionKind::Attack, 3),
                    WeightedAction::new(skill("null_grasp"), 2),
                ],
            },
            drops: drop_table(vec![("coffee", 30.0)], 30, 10),
        },
        MonsterDef {
            id: "type_mismatch",
            name: "Type Mismatch",
            kind: MonsterKind::Bug,
            stats: StatBlock::new(70, 14, 6, 10, 0),
            behavior: BehaviorSpec::default(),
            drops: drop_table(vec![("energy_drink", 25.0)], 35, 12),
        },
        MonsterDef {
            id: "off_by_one",
            name: "Off By One",
            kind: MonsterKind::Bug,
            stats: StatBlock::new(65, 13, 5, 16, 0),
            behavior: BehaviorSpec::default(),
            drops: drop_table(vec![("coffee", 30.0), ("pizza", 15.0)], 35, 12),
        },
        // Chapter 1 boss
        MonsterDef {
            id: "stack_overflow",
            name: "Stack Overflow",
            kind: MonsterKind::Boss,
            stats: StatBlock::new(220, 16, 8, 8, 0),
            behavior: BehaviorSpec {
                conditions: boss_phase_conditions(),
                actions: vec![
                    WeightedAction::new(MonsterActionKind::Attack, 4),
                    WeightedAction::new(skill("segfault_slam"), 3),
                    WeightedAction::from_phase(skill("hard_crash"), 2, 2),
                    WeightedAction::from_phase(skill("cascade_failure"), 2, 3),
                ],
            },
            drops: drop_table(
                vec![("mechanical_keyboard", 60.0), ("pizza", 40.0)],
                120,
                60,
            ),
        },
        // Chapter 2 bugs
        MonsterDef {
            id: "memory_leak",
            name: "Memory Leak",
            kind: MonsterKind::Bug,
            stats: StatBlock::new(95, 14, 9, 6, 0),
            behavior: BehaviorSpec {
                conditions: vec![AiCondition::TurnCount(2)],
                actions: vec![
                    WeightedAction::new(MonsterActionKind::Attack, 2),
                    WeightedAction::new(skill("heap_drain"), 3),
                ],
            },
            drops: drop_table(vec![("coffee", 30.0), ("rubber_duck", 10.0)], 50, 18),
        },
        MonsterDef {
            id: "race_condition",
            name: "Race Condition",
            kind: MonsterKind::Bug,
            stats: StatBlock::new(85, 16, 7, 18, 0),
            behavior: BehaviorSpec {
                conditions: vec![AiCondition::HpAbove(30)],
                actions: vec![
                    WeightedAction::new(MonsterActionKind::Attack, 3),
                    WeightedAction::new(skill("data_race"), 2),
                ],
            },
            drops: drop_table(vec![("energy_drink", 25.0)], 55, 20),
        },
        MonsterDef {
            id: "deadlock",
            name: "Deadlock",
            kind: MonsterKind::Bug,
            stats: StatBlock::new(110, 15, 12, 4, 0),
            behavior: BehaviorSpec::default(),
            drops: drop_table(vec![("ergonomic_chair", 20.0)], 55, 20),
        },
        // Chapter 2 boss
        MonsterDef {
            id: "heisenbug",
            name: "Heisenbug",
            kind: MonsterKind::Boss,
            stats: StatBlock::new(300, 20, 10, 14, 0),
            behavior: BehaviorSpec {
                conditions: boss_phase_conditions(),
                actions: vec![
                    WeightedAction::new(MonsterActionKind::Attack, 3),
                    WeightedAction::new(skill("quantum_flicker"), 3),
                    WeightedAction::from_phase(skill("scope_creep"), 2, 2),
                    WeightedAction::from_phase(skill("cascade_failure"), 3, 3),
                ],
            },
            drops: drop_table(
                vec![("split_keyboard", 60.0), ("second_monitor", 40.0)],
                250,
                120,
            ),
        },
        // Chapter 3 bugs
        MonsterDef {
            id: "infinite_loop",
            name: "Infinite Loop",
            kind: MonsterKind::Bug,
            stats: StatBlock::new(120, 18, 10, 10, 0),
            behavior: BehaviorSpec {
                conditions: vec![AiCondition::TurnCount(3)],
                actions: vec![
                    WeightedAction::new(MonsterActionKind::Attack, 1),
                    WeightedAction::new(skill("cascade_failure"), 1),
                ],
            },
            drops: drop_table(vec![("pizza", 30.0)], 80, 30),
        },
        MonsterDef {
            id: "buffer_overflow",
            name: "Buffer Overflow",
            kind: MonsterKind::Bug,
            stats: StatBlock::new(130, 20, 9, 8, 0),
            behavior: BehaviorSpec {
                conditions: vec![AiCondition::HpBelow(60)],
                actions: vec![
                    WeightedAction::new(MonsterActionKind::Attack, 2),
                    WeightedAction::new(skill("segfault_slam"), 3),
                ],
            },
            drops: drop_table(vec![("standing_desk", 20.0)], 85, 32),
        },
        MonsterDef {
            id: "merge_conflict",
            name: "Merge Conflict",
            kind: MonsterKind::Bug,
            stats: StatBlock::new(125, 19, 11, 12, 0),
            behavior: BehaviorSpec::default(),
            drops: drop_table(vec![("coffee", 40.0), ("energy_drink", 25.0)], 85, 32),
        },
        // Chapter 3 final boss
        MonsterDef {
            id: "legacy_monolith",
            name: "The Legacy Monolith",
            kind: MonsterKind::Boss,
            stats: StatBlock::new(420, 24, 14, 6, 0),
            behavior: BehaviorSpec {
                conditions: boss_phase_conditions(),
                actions: vec![
                    WeightedAction::new(MonsterActionKind::Attack, 3),
                    WeightedAction::new(skill("segfault_slam"), 2),
                    WeightedAction::from_phase(skill("hard_crash"), 2, 2),
                    WeightedAction::from_phase(skill("scope_creep"), 2, 3),
                    WeightedAction::from_phase(skill("cascade_failure"), 3, 4),
                ],
            },
            drops: drop_table(vec![("split_keyboard", 100.0)], 500, 300),
        },
    ]
}

/// Spawns a fresh monster for an encounter. The instance is independent of
/// the catalog and is destroyed when the encounter ends.
pub fn spawn(monster_id: &str) -> Option<Monster> {
    get_all_monster_defs()
        .into_iter()
        .find(|d| d.id == monster_id)
        .map(|d| Monster::new(d.id, d.name, d.kind, d.stats, d.behavior, d.drops))
}

/// Spawns a monster, degrading to a default bug with a warning on a miss.
pub fn spawn_or_fallback(monster_id: &str) -> Monster {
    spawn(monster_id).unwrap_or_else(|| {
        tracing::warn!(monster_id, "unknown monster id, spawning fallback bug");
        Monster::basic(
            "undefined_behavior",
            "Undefined Behavior",
            MonsterKind::Bug,
            StatBlock::new(50, 10, 5, 5, 0),
        )
    })
}
