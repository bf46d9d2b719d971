use crate::model::{Creature, Move, MoveCategory};
use crate::types::type_effectiveness;
use log::debug;
use rand::Rng;

pub const CRIT_CHANCE_PERCENT: f32 = 4.0;
pub const CRIT_MULTIPLIER: f32 = 1.5;
pub const STAB_MULTIPLIER: f32 = 1.5;
pub const MIN_RANDOM_FACTOR: f32 = 0.85;
pub const MAX_RANDOM_FACTOR: f32 = 1.0;

/// The random parts of one damage calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub critical: bool,
    pub random_factor: f32,
}

impl DamageRoll {
    /// No critical hit, maximum roll.
    pub fn fixed() -> Self {
        DamageRoll {
            critical: false,
            random_factor: MAX_RANDOM_FACTOR,
        }
    }

    /// Draws the critical-hit check first, then the damage roll.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let critical = rng.gen_range(0.0..100.0) < CRIT_CHANCE_PERCENT;
        let random_factor = rng.gen_range(MIN_RANDOM_FACTOR..=MAX_RANDOM_FACTOR);
        DamageRoll {
            critical,
            random_factor,
        }
    }
}

/// `((2 * level / 5 + 2) * power * atk / def) / 50 + 2`, unfloored.
pub fn base_damage(level: u32, power: u32, atk: u32, def: u32) -> f32 {
    let level = level as f32;
    ((2.0 * level / 5.0 + 2.0) * power as f32 * (atk as f32 / def as f32)) / 50.0 + 2.0
}

/// Deterministic part of the formula. Status moves deal nothing; every
/// damaging move deals at least 1, even into a 0x matchup.
pub fn damage_with_roll(attacker: &Creature, defender: &Creature, move_def: &Move, roll: DamageRoll) -> u32 {
    let (atk, def) = match move_def.category() {
        MoveCategory::Physical => (attacker.stats().atk, defender.stats().def),
        MoveCategory::Special => (attacker.stats().spa, defender.stats().spd),
        MoveCategory::Status => return 0,
    };
    let mut damage = base_damage(attacker.level(), move_def.power(), atk, def);
    if roll.critical {
        damage *= CRIT_MULTIPLIER;
    }
    if attacker.has_type(move_def.move_type()) {
        damage *= STAB_MULTIPLIER;
    }
    damage *= type_effectiveness(move_def.move_type(), defender.types());
    damage *= roll.random_factor;
    (damage.floor() as u32).max(1)
}

pub fn compute_damage<R: Rng + ?Sized>(
    attacker: &Creature,
    defender: &Creature,
    move_index: usize,
    rng: &mut R,
) -> u32 {
    let Some(move_def) = attacker.moves().get(move_index) else {
        return 0;
    };
    if !move_def.is_damaging() {
        return 0;
    }
    let roll = DamageRoll::sample(rng);
    let damage = damage_with_roll(attacker, defender, move_def, roll);
    debug!(
        "{} -> {} with {}: critical={} roll={:.3} damage={}",
        attacker.name(),
        defender.name(),
        move_def.name(),
        roll.critical,
        roll.random_factor,
        damage
    );
    damage
}
