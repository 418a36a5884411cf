//! Tech debt: the bounded meta-resource that scales enemy aggression and
//! decides the run's ending.
//!
//! The counter lives for a whole playthrough (it is part of the save
//! snapshot) and is only reset by an explicit run restart.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::progression::ProgressionLedger;

/// Severity band for the current debt value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtLevel {
    Clean,
    Warning,
    Danger,
    Crisis,
}

impl DebtLevel {
    pub fn name(&self) -> &'static str {
        match self {
            DebtLevel::Clean => "clean",
            DebtLevel::Warning => "warning",
            DebtLevel::Danger => "danger",
            DebtLevel::Crisis => "crisis",
        }
    }

    /// Multiplier applied to enemy base attack before mitigation.
    pub fn enemy_multiplier(&self) -> f64 {
        match self {
            DebtLevel::Clean => 0.8,
            DebtLevel::Warning => 1.0,
            DebtLevel::Danger => 1.3,
            DebtLevel::Crisis => 1.5,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            DebtLevel::Clean => "#6A9955",
            DebtLevel::Warning => "#DCDCAA",
            DebtLevel::Danger => "#CE9178",
            DebtLevel::Crisis => "#F44747",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DebtLevel::Clean => "The codebase is healthy. Bugs are sluggish.",
            DebtLevel::Warning => "Shortcuts are piling up. Bugs fight at full strength.",
            DebtLevel::Danger => "The codebase is creaking. Bugs hit noticeably harder.",
            DebtLevel::Crisis => "Everything is on fire. Bugs are at their most vicious.",
        }
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtStatus {
    pub value: u32,
    pub level: DebtLevel,
    pub enemy_multiplier: f64,
    pub description: &'static str,
    pub color: &'static str,
}

/// How the run ends, classified once at run completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    Good,
    Normal,
    Bad,
    Secret,
}

/// Bounded tech debt counter in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechDebt {
    current: u32,
}

impl Default for TechDebt {
    fn default() -> Self {
        Self::new()
    }
}

impl TechDebt {
    pub fn new() -> Self {
        Self { current: 0 }
    }

    /// Starts the counter at an arbitrary value, clamped to bounds.
    pub fn with_value(value: u32) -> Self {
        Self {
            current: value.min(TECH_DEBT_MAX),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// Raises the counter, clamping at the upper bound. Returns the delta
    /// actually applied, which may be less than requested near the bound.
    pub fn increase(&mut self, amount: u32) -> u32 {
        let applied = amount.min(TECH_DEBT_MAX - self.current);
        self.current += applied;
        applied
    }

    /// Lowers the counter, clamping at zero. Returns the applied delta.
    pub fn decrease(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    /// One combat turn elapsed.
    pub fn turn_passed(&mut self) -> u32 {
        self.increase(DEBT_PER_TURN)
    }

    /// The player fled an encounter.
    pub fn flee(&mut self) -> u32 {
        self.increase(DEBT_PER_FLEE)
    }

    /// The player skipped a stage outright.
    pub fn skip(&mut self) -> u32 {
        self.increase(DEBT_PER_SKIP)
    }

    pub fn level(&self) -> DebtLevel {
        match self.current {
            0..=20 => DebtLevel::Clean,
            21..=50 => DebtLevel::Warning,
            51..=80 => DebtLevel::Danger,
            _ => DebtLevel::Crisis,
        }
    }

    pub fn enemy_multiplier(&self) -> f64 {
        self.level().enemy_multiplier()
    }

    /// Enemy base attack scaled by the current band, before mitigation.
    pub fn scaled_enemy_attack(&self, base_atk: u32) -> u32 {
        (base_atk as f64 * self.enemy_multiplier()).floor() as u32
    }

    pub fn status(&self) -> DebtStatus {
        let level = self.level();
        DebtStatus {
            value: self.current,
            level,
            enemy_multiplier: level.enemy_multiplier(),
            description: level.description(),
            color: level.color(),
        }
    }
}

/// Classifies the run's ending from final state. Pure: nothing is tracked
/// during play beyond the debt counter and the ledger's skip/flee history.
pub fn classify_ending(debt: &TechDebt, ledger: &ProgressionLedger) -> Ending {
    if debt.current() < 20
        && ledger.all_stages_completed()
        && ledger.stats.skips_used == 0
        && ledger.stats.flees_used == 0
    {
        return Ending::Secret;
    }
    match debt.current() {
        0..=39 => Ending::Good,
        40..=70 => Ending::Normal,
        _ => Ending::Bad,
    }
}
