//! Opponent decision policies.
//!
//! [`HeuristicAi`] is the engine's default opponent: it considers a switch
//! when its active creature is low on HP and otherwise picks the move with
//! the best estimated damage. [`RandomAi`] picks uniformly among legal
//! actions and is mostly useful as a baseline for simulations.

use crate::command::Command;
use crate::model::{Creature, MoveCategory};
use crate::team::Team;
use crate::types::type_effectiveness;
use log::debug;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub trait BattleAi {
    /// Picks the next command for `own` while `foe` is the opposing team.
    /// Called with both active creatures as they stand before the turn.
    fn choose_command(&mut self, own: &Team, foe: &Team) -> Command;
}

#[derive(Clone, Debug)]
pub struct AiParams {
    /// Switching is only considered at or below this fraction of max HP.
    pub switch_hp_ratio: f32,
    /// A candidate must beat the current matchup score by more than this.
    pub switch_margin: f32,
    /// Comparison value given to status moves.
    pub status_move_value: f32,
}

impl Default for AiParams {
    fn default() -> Self {
        Self {
            switch_hp_ratio: 0.3,
            switch_margin: 50.0,
            status_move_value: 20.0,
        }
    }
}

/// Higher is better for `pokemon1`.
pub fn matchup_score(pokemon1: &Creature, pokemon2: &Creature) -> f32 {
    let offense: f32 = pokemon1
        .moves()
        .iter()
        .filter(|m| m.is_damaging())
        .map(|m| (type_effectiveness(m.move_type(), pokemon2.types()) - 1.0) * 100.0)
        .sum();
    let defense: f32 = pokemon2
        .moves()
        .iter()
        .filter(|m| m.is_damaging())
        .map(|m| (type_effectiveness(m.move_type(), pokemon1.types()) - 1.0) * 100.0)
        .sum();
    let health = pokemon1.hp_fraction() * 50.0;
    let speed = if pokemon1.stats().spe > pokemon2.stats().spe {
        30.0
    } else {
        -30.0
    };
    offense - defense + health + speed
}

/// Index of the roster member to switch to, if any.
pub fn decide_switch(own: &Team, foe: &Creature, params: &AiParams) -> Option<usize> {
    let current = own.active();
    if current.current_hp() as f32 > current.max_hp() as f32 * params.switch_hp_ratio {
        return None;
    }
    let current_score = matchup_score(current, foe);
    let mut best: Option<(usize, f32)> = None;
    for (idx, candidate) in own.members().iter().enumerate() {
        if idx == own.active_index() || candidate.is_fainted() {
            continue;
        }
        let score = matchup_score(candidate, foe);
        debug!(
            "switch candidate {} scores {:.1} against {} (current {:.1})",
            candidate.name(),
            score,
            foe.name(),
            current_score
        );
        if score <= current_score + params.switch_margin {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Falls back to index 0 when no move has PP left.
pub fn select_move(attacker: &Creature, foe: &Creature, params: &AiParams) -> usize {
    let mut best_value = -1.0f32;
    let mut best_index = 0usize;
    for (idx, mv) in attacker.moves().iter().enumerate() {
        if !mv.has_pp() {
            continue;
        }
        match mv.category() {
            MoveCategory::Physical | MoveCategory::Special => {
                let mut expected = mv.power() as f32 * type_effectiveness(mv.move_type(), foe.types());
                if attacker.has_type(mv.move_type()) {
                    expected *= 1.5;
                }
                if expected > best_value {
                    best_value = expected;
                    best_index = idx;
                }
            }
            MoveCategory::Status => {
                if best_value < params.status_move_value {
                    best_value = params.status_move_value;
                    best_index = idx;
                }
            }
        }
    }
    best_index
}

#[derive(Clone, Debug, Default)]
pub struct HeuristicAi {
    pub params: AiParams,
}

impl HeuristicAi {
    pub fn new(params: AiParams) -> Self {
        Self { params }
    }
}

impl BattleAi for HeuristicAi {
    fn choose_command(&mut self, own: &Team, foe: &Team) -> Command {
        let foe_active = foe.active();
        if let Some(index) = decide_switch(own, foe_active, &self.params) {
            debug!("{} retreats for slot {}", own.active().name(), index);
            return Command::Switch { index };
        }
        let index = select_move(own.active(), foe_active, &self.params);
        Command::Move { index }
    }
}

pub struct RandomAi {
    rng: SmallRng,
}

impl RandomAi {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl BattleAi for RandomAi {
    fn choose_command(&mut self, own: &Team, _foe: &Team) -> Command {
        let mut options: Vec<Command> = own
            .active()
            .moves()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.has_pp())
            .map(|(index, _)| Command::Move { index })
            .collect();
        options.extend(
            (0..own.len())
                .filter(|&index| own.check_switch_target(index).is_ok())
                .map(|index| Command::Switch { index }),
        );
        *options
            .choose(&mut self.rng)
            .unwrap_or(&Command::Move { index: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Move, Stats};
    use crate::types::PokemonType;

    fn stats(spe: u32) -> Stats {
        Stats {
            hp: 100,
            atk: 80,
            def: 80,
            spa: 80,
            spd: 80,
            spe,
        }
    }

    fn mv(name: &str, move_type: PokemonType, category: MoveCategory, power: u32) -> Move {
        Move::new(1, name, move_type, category, power, 100, 10).unwrap()
    }

    #[test]
    fn stab_and_effectiveness_drive_move_choice() {
        let attacker = Creature::new(
            1,
            "Sparky",
            vec![PokemonType::Electric],
            stats(90),
            vec![
                mv("Body Slam", PokemonType::Normal, MoveCategory::Physical, 85),
                mv("Thunderbolt", PokemonType::Electric, MoveCategory::Special, 90),
                mv("Surf", PokemonType::Water, MoveCategory::Special, 90),
            ],
            50,
        )
        .unwrap();
        let water = Creature::new(
            2,
            "Splash",
            vec![PokemonType::Water],
            stats(50),
            vec![mv("Surf", PokemonType::Water, MoveCategory::Special, 90)],
            50,
        )
        .unwrap();
        let ground = Creature::new(
            3,
            "Digger",
            vec![PokemonType::Ground],
            stats(50),
            vec![mv("Earthquake", PokemonType::Ground, MoveCategory::Physical, 100)],
            50,
        )
        .unwrap();
        let params = AiParams::default();
        assert_eq!(select_move(&attacker, &water, &params), 1);
        // Thunderbolt is 0x, Surf is 2x: 180 beats Body Slam's 85.
        assert_eq!(select_move(&attacker, &ground, &params), 2);
    }

    #[test]
    fn status_move_is_a_default_only() {
        let attacker = Creature::new(
            1,
            "Support",
            vec![PokemonType::Psychic],
            stats(90),
            vec![
                mv("Calm Mind", PokemonType::Psychic, MoveCategory::Status, 0),
                mv("Tackle", PokemonType::Normal, MoveCategory::Physical, 40),
            ],
            50,
        )
        .unwrap();
        let ghost = Creature::new(
            2,
            "Spooky",
            vec![PokemonType::Ghost],
            stats(50),
            vec![mv("Lick", PokemonType::Ghost, MoveCategory::Physical, 30)],
            50,
        )
        .unwrap();
        let normal = Creature::new(
            3,
            "Plain",
            vec![PokemonType::Normal],
            stats(50),
            vec![mv("Tackle", PokemonType::Normal, MoveCategory::Physical, 40)],
            50,
        )
        .unwrap();
        let params = AiParams::default();
        assert_eq!(select_move(&attacker, &ghost, &params), 0);
        assert_eq!(select_move(&attacker, &normal, &params), 1);
    }

    #[test]
    fn matchup_score_counts_types_health_and_speed() {
        let fire = Creature::new(
            1,
            "Blaze",
            vec![PokemonType::Fire],
            stats(100),
            vec![mv("Ember", PokemonType::Fire, MoveCategory::Special, 40)],
            50,
        )
        .unwrap();
        let grass = Creature::new(
            2,
            "Leafy",
            vec![PokemonType::Grass],
            stats(50),
            vec![mv("Vine Whip", PokemonType::Grass, MoveCategory::Physical, 45)],
            50,
        )
        .unwrap();
        // +100 offense, +50 from the resisted Vine Whip, +50 health, +30 speed.
        assert_eq!(matchup_score(&fire, &grass), 230.0);
        // -50 offense, -100 from Ember, +50 health, -30 speed.
        assert_eq!(matchup_score(&grass, &fire), -130.0);
    }

    fn spent(mut mv: Move) -> Move {
        while mv.has_pp() {
            mv.consume_pp();
        }
        mv
    }

    #[test]
    fn random_ai_only_picks_legal_actions() {
        let tackle = || mv("Tackle", PokemonType::Normal, MoveCategory::Physical, 40);
        let lead = Creature::new(1, "Lead", vec![PokemonType::Normal], stats(50), vec![spent(tackle()), tackle()], 50).unwrap();
        let down = Creature::new(2, "Down", vec![PokemonType::Normal], stats(50), vec![tackle()], 50)
            .unwrap()
            .with_current_hp(0);
        let bench = Creature::new(3, "Bench", vec![PokemonType::Normal], stats(50), vec![tackle()], 50).unwrap();
        let own = Team::new("Own", vec![lead, down, bench]).unwrap();
        let foe = Team::new(
            "Foe",
            vec![Creature::new(4, "Foe", vec![PokemonType::Normal], stats(50), vec![tackle()], 50).unwrap()],
        )
        .unwrap();

        let mut ai = RandomAi::new(17);
        let picks: Vec<Command> = (0..200).map(|_| ai.choose_command(&own, &foe)).collect();
        assert!(picks
            .iter()
            .all(|c| matches!(c, Command::Move { index: 1 } | Command::Switch { index: 2 })));
        assert!(picks.contains(&Command::Move { index: 1 }));
        assert!(picks.contains(&Command::Switch { index: 2 }));
    }

    #[test]
    fn random_ai_falls_back_to_first_move() {
        let lone = Creature::new(
            1,
            "Lone",
            vec![PokemonType::Normal],
            stats(50),
            vec![spent(mv("Tackle", PokemonType::Normal, MoveCategory::Physical, 40))],
            50,
        )
        .unwrap();
        let own = Team::new("Own", vec![lone.clone()]).unwrap();
        let foe = Team::new("Foe", vec![lone]).unwrap();
        let mut ai = RandomAi::new(3);
        assert_eq!(ai.choose_command(&own, &foe), Command::Move { index: 0 });
    }
}
