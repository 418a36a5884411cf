//! Pure combat formulas: mitigation, critical hits, evasion.
//!
//! Nothing in here holds state; every function is deterministic given its
//! inputs and (for the rolls) the caller-supplied random source.

use rand::Rng;

use crate::constants::*;

/// Result of a single attack pipeline roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    pub damage: u32,
    pub crit: bool,
    pub evaded: bool,
}

/// Defense-mitigated damage. Always at least 1, regardless of how much
/// defense the target stacks.
pub fn mitigated_damage(base: u32, defense: u32) -> u32 {
    let raw = (base as f64 * 100.0) / (100.0 + defense as f64 * DEFENSE_SOFTNESS);
    (raw.floor() as u32).max(1)
}

/// Critical hit chance in percent, driven by attacker speed.
pub fn crit_chance(attacker_spd: u32) -> f64 {
    (CRIT_CHANCE_BASE + attacker_spd as f64 * CRIT_CHANCE_PER_SPD).min(CRIT_CHANCE_CAP)
}

/// Evasion chance in percent, driven by the speed difference.
pub fn evasion_chance(defender_spd: u32, attacker_spd: u32) -> f64 {
    ((defender_spd as f64 - attacker_spd as f64) * EVASION_PER_SPD_DIFF).clamp(0.0, EVASION_CAP)
}

/// Runs the full attack pipeline: evasion first, then crit, then mitigation.
/// An evaded attack deals exactly 0 and never rolls for a critical hit.
pub fn attack_roll(
    base_atk: u32,
    defense: u32,
    attacker_spd: u32,
    defender_spd: u32,
    rng: &mut impl Rng,
) -> AttackRoll {
    let evade_draw: f64 = rng.gen_range(0.0..100.0);
    if evade_draw < evasion_chance(defender_spd, attacker_spd) {
        return AttackRoll {
            damage: 0,
            crit: false,
            evaded: true,
        };
    }

    let crit_draw: f64 = rng.gen_range(0.0..100.0);
    let crit = crit_draw < crit_chance(attacker_spd);

    let mut damage = mitigated_damage(base_atk, defense);
    if crit {
        damage = (damage as f64 * CRIT_MULTIPLIER).floor() as u32;
    }

    AttackRoll {
        damage,
        crit,
        evaded: false,
    }
}
