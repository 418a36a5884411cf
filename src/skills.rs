//! Skill definitions, cooldown tracking and the skill resolver.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::character::{Character, Stat};
use crate::effects::{EffectManager, EffectTarget};
use crate::errors::ActionError;
use crate::formulas;
use crate::monster::Monster;
use crate::tech_debt::TechDebt;

/// One typed effect in a skill's ordered effect list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    /// Damage as a percentage of the caster's effective ATK, run through
    /// the normal evasion/crit/defense pipeline.
    Damage { percent: u32 },
    /// Heal as a percentage of the caster's max HP.
    Heal { percent: u32 },
    /// Timed stat buff on the caster.
    Buff { stat: Stat, amount: i32, duration: u32 },
    /// Timed stat debuff on the target.
    Debuff { stat: Stat, amount: u32, duration: u32 },
    /// Damage-over-time on the target.
    Dot { damage: u32, duration: u32 },
    /// Pays down the tech debt counter.
    ReduceTechDebt { amount: u32 },
}

#[derive(Debug, Clone)]
pub struct SkillDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mp_cost: u32,
    /// Turns before the skill can be used again; 0 for none. The value on
    /// the definition is authoritative.
    pub cooldown: u32,
    pub effects: Vec<SkillEffect>,
}

/// Per-encounter cooldown bookkeeping, keyed by skill id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownTracker {
    remaining: HashMap<String, u32>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self, skill_id: &str) -> bool {
        self.turns_left(skill_id) == 0
    }

    pub fn turns_left(&self, skill_id: &str) -> u32 {
        self.remaining.get(skill_id).copied().unwrap_or(0)
    }

    pub fn set(&mut self, skill_id: &str, turns: u32) {
        if turns > 0 {
            self.remaining.insert(skill_id.to_string(), turns);
        }
    }

    /// Decrements every cooldown by one turn. Not called for a side whose
    /// turn was skipped by stun.
    pub fn tick(&mut self) {
        for turns in self.remaining.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.remaining.retain(|_, turns| *turns > 0);
    }
}

/// Structured result of a successful skill resolution. The totals are the
/// contract; the messages are presentation text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillOutcome {
    pub total_damage: u32,
    pub total_healing: u32,
    pub crit: bool,
    pub evaded: bool,
    pub messages: Vec<String>,
}

/// Applies a skill's effect list in declared order.
///
/// Precondition failures (MP, cooldown) are reported as `ActionError` and
/// mutate nothing. On success MP is deducted and the cooldown set before
/// any effect applies.
pub fn resolve_skill(
    skill: &SkillDef,
    character: &mut Character,
    monster: &mut Monster,
    effects: &mut EffectManager,
    tech_debt: &mut TechDebt,
    cooldowns: &mut CooldownTracker,
    rng: &mut impl Rng,
) -> Result<SkillOutcome, ActionError> {
    if character.current_mp < skill.mp_cost {
        return Err(ActionError::NotEnoughMp {
            needed: skill.mp_cost,
            available: character.current_mp,
        });
    }
    if !cooldowns.is_ready(skill.id) {
        return Err(ActionError::SkillOnCooldown {
            skill_id: skill.id.to_string(),
            turns_left: cooldowns.turns_left(skill.id),
        });
    }

    character.spend_mp(skill.mp_cost);
    cooldowns.set(skill.id, skill.cooldown);

    let mut outcome = SkillOutcome::default();
    for effect in &skill.effects {
        match *effect {
            SkillEffect::Damage { percent } => {
                let eff_atk =
                    effects.effective_stat(character.stats.atk, Stat::Atk, EffectTarget::Player);
                let eff_spd =
                    effects.effective_stat(character.stats.spd, Stat::Spd, EffectTarget::Player);
                let monster_def =
                    effects.effective_stat(monster.stats.def, Stat::Def, EffectTarget::Monster);
                let monster_spd =
                    effects.effective_stat(monster.stats.spd, Stat::Spd, EffectTarget::Monster);

                let base = eff_atk * percent / 100;
                let roll = formulas::attack_roll(base, monster_def, eff_spd, monster_spd, rng);
                monster.take_damage(roll.damage);
                outcome.total_damage += roll.damage;
                outcome.crit |= roll.crit;
                outcome.evaded |= roll.evaded;
                if roll.evaded {
                    outcome.messages.push(format!("{} dodges {}!", monster.name, skill.name));
                } else if roll.crit {
                    outcome.messages.push(format!(
                        "{} crits {} for {} damage!",
                        skill.name, monster.name, roll.damage
                    ));
                } else {
                    outcome.messages.push(format!(
                        "{} hits {} for {} damage.",
                        skill.name, monster.name, roll.damage
                    ));
                }
            }
            SkillEffect::Heal { percent } => {
                let amount = character.stats.hp * percent / 100;
                let applied = character.heal(amount);
                outcome.total_healing += applied;
                outcome.messages.push(format!("{} restores {} HP.", skill.name, applied));
            }
            SkillEffect::Buff { stat, amount, duration } => {
                effects.apply_buff(stat, amount, duration, EffectTarget::Player);
                outcome.messages.push(format!(
                    "{} raises {} by {} for {} turns.",
                    skill.name,
                    stat.abbrev(),
                    amount,
                    duration
                ));
            }
            SkillEffect::Debuff { stat, amount, duration } => {
                effects.apply_buff(stat, -(amount as i32), duration, EffectTarget::Monster);
                outcome.messages.push(format!(
                    "{} lowers {}'s {} by {} for {} turns.",
                    skill.name,
                    monster.name,
                    stat.abbrev(),
                    amount,
                    duration
                ));
            }
            SkillEffect::Dot { damage, duration } => {
                effects.apply_dot(damage, duration, EffectTarget::Monster);
                outcome.messages.push(format!(
                    "{} will take {} damage per turn for {} turns.",
                    monster.name, damage, duration
                ));
            }
            SkillEffect::ReduceTechDebt { amount } => {
                let applied = tech_debt.decrease(amount);
                outcome.messages.push(format!("Tech debt reduced by {}.", applied));
            }
        }
    }

    Ok(outcome)
}
