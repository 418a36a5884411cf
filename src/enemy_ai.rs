//! Enemy decision engine: condition-gated weighted action choice with
//! multi-phase boss escalation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::monster::{AiCondition, Monster, MonsterActionKind, MonsterKind};

/// The outcome of one AI decision. A phase transition is reported
/// distinctly so the orchestrator can insert an escalation interlude; the
/// chosen action still executes right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiDecision {
    pub action: MonsterActionKind,
    pub phase_transition: Option<u8>,
}

/// Per-encounter AI state. `turn_count` increments once per decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyAi {
    pub turn_count: u32,
    fired_phases: Vec<u8>,
}

impl EnemyAi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the monster's next action. Mutates `monster.phase` when a boss
    /// escalation threshold fires (monotonic, at most once per threshold).
    pub fn decide(&mut self, monster: &mut Monster, rng: &mut impl Rng) -> AiDecision {
        self.turn_count += 1;

        let phase_transition = self.evaluate_phase_changes(monster);

        if !self.non_phase_conditions_met(monster) {
            // Fail-safe: never a no-op turn.
            return AiDecision {
                action: MonsterActionKind::Attack,
                phase_transition,
            };
        }

        AiDecision {
            action: self.pick_weighted(monster, rng),
            phase_transition,
        }
    }

    /// Phase-change conditions combine OR; any that holds advances the
    /// phase. Each HP threshold fires at most once and the phase never
    /// regresses, even if HP swings back above a threshold.
    fn evaluate_phase_changes(&mut self, monster: &mut Monster) -> Option<u8> {
        if monster.kind != MonsterKind::Boss {
            return None;
        }
        let hp_pct = monster.hp_percent();
        let mut new_phase = None;

        for condition in &monster.behavior.conditions {
            if let AiCondition::PhaseChange { hp_below, to_phase } = condition {
                let current = monster.phase.unwrap_or(1);
                if hp_pct <= *hp_below && *to_phase > current && !self.fired_phases.contains(to_phase)
                {
                    self.fired_phases.push(*to_phase);
                    monster.phase = Some(*to_phase);
                    new_phase = Some(*to_phase);
                }
            }
        }
        new_phase
    }

    /// Non-phase conditions must all hold for the special action table to
    /// apply. An empty condition list is vacuously satisfied.
    fn non_phase_conditions_met(&self, monster: &Monster) -> bool {
        let hp_pct = monster.hp_percent();
        monster.behavior.conditions.iter().all(|c| match c {
            AiCondition::HpBelow(pct) => hp_pct < *pct,
            AiCondition::HpAbove(pct) => hp_pct >= *pct,
            AiCondition::TurnCount(min) => self.turn_count >= *min,
            AiCondition::PhaseChange { .. } => true,
        })
    }

    /// Weighted random choice: draw in `[0, total)`, walk the list
    /// subtracting weights until the remainder is <= 0. Entries gated above
    /// the current phase are excluded; an empty or all-zero-weight table
    /// falls back to the first action, or a basic attack if there is none.
    fn pick_weighted(&self, monster: &Monster, rng: &mut impl Rng) -> MonsterActionKind {
        let phase = monster.phase.unwrap_or(1);
        let available: Vec<_> = monster
            .behavior
            .actions
            .iter()
            .filter(|a| a.min_phase <= phase)
            .collect();

        let total: u32 = available.iter().map(|a| a.weight).sum();
        if total == 0 {
            return monster
                .behavior
                .actions
                .first()
                .map(|a| a.action.clone())
                .unwrap_or(MonsterActionKind::Attack);
        }

        let mut remainder = rng.gen_range(0..total) as i64;
        for entry in &available {
            remainder -= entry.weight as i64;
            if remainder <= 0 {
                return entry.action.clone();
            }
        }
        // Unreachable with a positive total, but the fail-safe stands.
        MonsterActionKind::Attack
    }
}
