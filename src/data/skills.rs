//! Player skill catalog.

use crate::character::Stat;
use crate::skills::{SkillDef, SkillEffect};

/// Returns every player skill in the game.
pub fn get_all_skills() -> Vec<SkillDef> {
    vec![
        SkillDef {
            id: "debug_strike",
            name: "Debug Strike",
            description: "A focused strike at the bug's weak point.",
            mp_cost: 5,
            cooldown: 0,
            effects: vec![SkillEffect::Damage { percent: 120 }],
        },
        SkillDef {
            id: "hotfix",
            name: "Hotfix",
            description: "Patch yourself up. It'll hold until the next release.",
            mp_cost: 8,
            cooldown: 2,
            effects: vec![SkillEffect::Heal { percent: 30 }],
        },
        SkillDef {
            id: "unit_test",
            name: "Unit Test",
            description: "A safety net that blunts incoming damage.",
            mp_cost: 6,
            cooldown: 2,
            effects: vec![SkillEffect::Buff { stat: Stat::Def, amount: 5, duration: 3 }],
        },
        SkillDef {
            id: "refactor",
            name: "Refactor",
            description: "Pay down the debt before it pays you back.",
            mp_cost: 12,
            cooldown: 3,
            effects: vec![SkillEffect::ReduceTechDebt { amount: 15 }],
        },
        SkillDef {
            id: "pair_programming",
            name: "Pair Programming",
            description: "Two keyboards, one bug. Sharpens your attack and steadies your nerves.",
            mp_cost: 10,
            cooldown: 3,
            effects: vec![
                SkillEffect::Buff { stat: Stat::Atk, amount: 5, duration: 3 },
                SkillEffect::Heal { percent: 10 },
            ],
        },
        SkillDef {
            id: "static_analysis",
            name: "Static Analysis",
            description: "Expose the bug's flaws before it even runs.",
            mp_cost: 9,
            cooldown: 2,
            effects: vec![SkillEffect::Debuff { stat: Stat::Atk, amount: 4, duration: 3 }],
        },
        SkillDef {
            id: "memory_profiler",
            name: "Memory Profiler",
            description: "Attach a profiler and watch the bug leak to death.",
            mp_cost: 10,
            cooldown: 3,
            effects: vec![SkillEffect::Dot { damage: 6, duration: 3 }],
        },
        SkillDef {
            id: "full_rewrite",
            name: "Full Rewrite",
            description: "Throw it all away and start clean. Devastating, and cathartic.",
            mp_cost: 20,
            cooldown: 4,
            effects: vec![
                SkillEffect::Damage { percent: 200 },
                SkillEffect::ReduceTechDebt { amount: 5 },
            ],
        },
    ]
}

pub fn get_skill(skill_id: &str) -> Option<SkillDef> {
    get_all_skills().into_iter().find(|s| s.id == skill_id)
}
