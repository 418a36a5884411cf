//! Character class definitions and their unlock conditions.

use crate::character::StatBlock;

/// Condition for unlocking a class, evaluated against cumulative run
/// statistics. Unlocks are one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockCondition {
    /// Available from the start.
    Default,
    /// Deal at least this much damage within the burst window.
    BurstDamage { amount: u64 },
    /// Accumulate this much play time across the run.
    PlayTime { seconds: u64 },
    /// Clear the given chapter within the time limit.
    ChapterClearTime { chapter: u32, within_seconds: u64 },
    /// Complete any chapter with tech debt at exactly zero.
    ZeroDebtChapter,
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_stats: StatBlock,
    pub growth: StatBlock,
    pub skills: &'static [&'static str],
    pub unlock: UnlockCondition,
}

/// Returns every class in the game, starter first.
pub fn get_all_classes() -> Vec<ClassDef> {
    vec![
        ClassDef {
            id: "junior_dev",
            name: "Junior Developer",
            description: "Fresh out of bootcamp. Eager, balanced, slightly caffeinated.",
            base_stats: StatBlock::new(100, 20, 10, 10, 30),
            growth: StatBlock::new(10, 3, 2, 1, 5),
            skills: &["debug_strike", "hotfix", "unit_test"],
            unlock: UnlockCondition::Default,
        },
        ClassDef {
            id: "senior_dev",
            name: "Senior Developer",
            description: "Ships fast and hits hard. Unlocked by a burst of raw output.",
            base_stats: StatBlock::new(110, 26, 10, 12, 35),
            growth: StatBlock::new(10, 4, 2, 1, 5),
            skills: &["debug_strike", "refactor", "pair_programming", "full_rewrite"],
            unlock: UnlockCondition::BurstDamage { amount: 150 },
        },
        ClassDef {
            id: "architect",
            name: "Architect",
            description: "Keeps the debt at zero and the defenses high.",
            base_stats: StatBlock::new(120, 18, 16, 8, 45),
            growth: StatBlock::new(12, 2, 3, 1, 7),
            skills: &["debug_strike", "unit_test", "static_analysis", "refactor"],
            unlock: UnlockCondition::ZeroDebtChapter,
        },
        ClassDef {
            id: "devops",
            name: "DevOps Engineer",
            description: "Fast pipelines, faster chapter clears.",
            base_stats: StatBlock::new(105, 22, 12, 16, 30),
            growth: StatBlock::new(10, 3, 2, 2, 4),
            skills: &["debug_strike", "hotfix", "memory_profiler"],
            unlock: UnlockCondition::ChapterClearTime { chapter: 1, within_seconds: 600 },
        },
        ClassDef {
            id: "tech_lead",
            name: "Tech Lead",
            description: "Seen everything. Earned over a long career.",
            base_stats: StatBlock::new(115, 24, 13, 12, 40),
            growth: StatBlock::new(11, 3, 2, 1, 6),
            skills: &["debug_strike", "pair_programming", "static_analysis", "full_rewrite"],
            unlock: UnlockCondition::PlayTime { seconds: 7200 },
        },
    ]
}

pub fn get_class(class_id: &str) -> Option<ClassDef> {
    get_all_classes().into_iter().find(|c| c.id == class_id)
}

/// Looks up a class, degrading to the starter with a warning on a miss.
pub fn get_class_or_fallback(class_id: &str) -> ClassDef {
    get_class(class_id).unwrap_or_else(|| {
        tracing::warn!(class_id, "unknown class id, falling back to starter class");
        get_all_classes().into_iter().next().expect("catalog has classes")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_class_is_default_unlocked() {
        let starter = &get_all_classes()[0];
        assert_eq!(starter.id, "junior_dev");
        assert_eq!(starter.unlock, UnlockCondition::Default);
    }

    #[test]
    fn test_class_skills_exist_in_skill_catalog() {
        for class in get_all_classes() {
            for skill_id in class.skills {
                assert!(
                    crate::data::skills::get_skill(skill_id).is_some(),
                    "class {} references unknown skill {}",
                    class.id,
                    skill_id
                );
            }
        }
    }

    #[test]
    fn test_unknown_class_falls_back_to_starter() {
        let class = get_class_or_fallback("quantum_intern");
        assert_eq!(class.id, "junior_dev");
    }
}
