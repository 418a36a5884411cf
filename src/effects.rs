//! Timed buffs, debuffs, status conditions and damage-over-time.
//!
//! The `EffectManager` owns every active effect for the duration of one
//! encounter. Effect lists are tiny, so matching is a plain linear scan.

use serde::{Deserialize, Serialize};

use crate::character::{Character, Stat};
use crate::monster::Monster;

/// Boolean-presence conditions. Applying one twice extends its duration
/// instead of stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Stun,
    Confusion,
}

impl StatusCondition {
    pub fn name(&self) -> &'static str {
        match self {
            StatusCondition::Stun => "stunned",
            StatusCondition::Confusion => "confused",
        }
    }
}

/// Which side of the encounter an effect applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    Player,
    Monster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Additive stat modifier; negative magnitudes are debuffs.
    StatModifier(Stat),
    Status(StatusCondition),
    DamageOverTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub magnitude: i32,
    pub turns_remaining: i32,
    pub target: EffectTarget,
}

/// Owns the active effects of the current encounter. Created fresh per
/// battle and discarded with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectManager {
    effects: Vec<ActiveEffect>,
}

impl EffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a timed stat modifier. No dedup: the same stat/target pair
    /// can carry several simultaneous modifiers, their magnitudes sum.
    pub fn apply_buff(&mut self, stat: Stat, magnitude: i32, duration: u32, target: EffectTarget) {
        self.effects.push(ActiveEffect {
            kind: EffectKind::StatModifier(stat),
            magnitude,
            turns_remaining: duration as i32,
            target,
        });
    }

    /// Registers a status condition. Re-applying extends the duration to
    /// the longer of the two; presence stays boolean.
    pub fn apply_status(&mut self, condition: StatusCondition, duration: u32, target: EffectTarget) {
        let existing = self.effects.iter_mut().find(|e| {
            e.kind == EffectKind::Status(condition) && e.target == target && e.turns_remaining > 0
        });
        if let Some(effect) = existing {
            effect.turns_remaining = effect.turns_remaining.max(duration as i32);
            return;
        }
        self.effects.push(ActiveEffect {
            kind: EffectKind::Status(condition),
            magnitude: 0,
            turns_remaining: duration as i32,
            target,
        });
    }

    /// Registers a damage-over-time effect dealing `damage` per boundary.
    pub fn apply_dot(&mut self, damage: u32, duration: u32, target: EffectTarget) {
        self.effects.push(ActiveEffect {
            kind: EffectKind::DamageOverTime,
            magnitude: damage as i32,
            turns_remaining: duration as i32,
            target,
        });
    }

    /// Base stat plus every matching active modifier, floored at zero.
    pub fn effective_stat(&self, base: u32, stat: Stat, target: EffectTarget) -> u32 {
        let sum: i32 = self
            .effects
            .iter()
            .filter(|e| {
                e.kind == EffectKind::StatModifier(stat)
                    && e.target == target
                    && e.turns_remaining > 0
            })
            .map(|e| e.magnitude)
            .sum();
        (base as i32 + sum).max(0) as u32
    }

    pub fn has_status(&self, condition: StatusCondition, target: EffectTarget) -> bool {
        self.effects.iter().any(|e| {
            e.kind == EffectKind::Status(condition) && e.target == target && e.turns_remaining > 0
        })
    }

    /// Decrements every effect and purges the expired ones. Must run exactly
    /// once per full turn cycle; the battle orchestrator is the single call
    /// site.
    pub fn tick(&mut self) {
        for effect in &mut self.effects {
            effect.turns_remaining -= 1;
        }
        self.effects.retain(|e| e.turns_remaining > 0);
    }

    /// Sum of active damage-over-time magnitudes on `target`.
    pub fn dot_total(&self, target: EffectTarget) -> u32 {
        self.effects
            .iter()
            .filter(|e| {
                e.kind == EffectKind::DamageOverTime && e.target == target && e.turns_remaining > 0
            })
            .map(|e| e.magnitude.max(0) as u32)
            .sum()
    }

    /// Applies every active DoT targeting the monster, flooring HP at 0.
    /// Returns the damage dealt.
    pub fn apply_dot_effects(&self, monster: &mut Monster) -> u32 {
        let total = self.dot_total(EffectTarget::Monster);
        monster.take_damage(total);
        total
    }

    /// Applies every active DoT targeting the player, flooring HP at 0.
    /// Returns the damage dealt.
    pub fn apply_player_dot_effects(&self, character: &mut Character) -> u32 {
        let total = self.dot_total(EffectTarget::Player);
        character.take_damage(total);
        total
    }

    /// Active-effect list snapshot for the presentation layer.
    pub fn active(&self) -> &[ActiveEffect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
