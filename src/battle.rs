use crate::ai::{BattleAi, HeuristicAi};
use crate::command::Command;
use crate::damage::compute_damage;
use crate::error::{BattleError, MoveRejection, RosterError};
use crate::model::{Creature, MoveCategory};
use crate::team::Team;
use crate::types::{type_effectiveness, PokemonType};
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Winner {
    Player,
    Ai,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Player => f.write_str("Player"),
            Winner::Ai => f.write_str("AI"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum BattlePhase {
    AwaitingAction,
    /// The player's active creature fainted; only a switch is accepted.
    AwaitingPlayerSwitch,
    Finished(Winner),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum AiPlan {
    Switch(usize),
    Move(usize),
    NoMoves,
    Idle,
}

/// Result of one attacker-to-defender move use.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveOutcome {
    pub damage: u32,
    pub message: String,
    pub effectiveness: f32,
}

impl MoveOutcome {
    fn skipped() -> Self {
        MoveOutcome {
            damage: 0,
            message: String::new(),
            effectiveness: 0.0,
        }
    }
}

fn effectiveness_phrase(multiplier: f32) -> Option<&'static str> {
    if multiplier > 1.5 {
        Some("It's super effective!")
    } else if multiplier == 0.0 {
        Some("It has no effect...")
    } else if multiplier < 0.5 {
        Some("It's not very effective...")
    } else {
        None
    }
}

/// Uses `attacker`'s move at `move_index` on `defender`.
///
/// A fainted attacker does nothing. Otherwise one PP is spent whether the
/// move hits or misses, and the accuracy check draws from `rng` before any
/// damage roll.
pub fn apply_move<R: Rng + ?Sized>(
    attacker: &mut Creature,
    defender: &mut Creature,
    move_index: usize,
    rng: &mut R,
) -> MoveOutcome {
    if attacker.is_fainted() {
        return MoveOutcome::skipped();
    }
    let Some(move_def) = attacker.move_mut(move_index) else {
        return MoveOutcome::skipped();
    };
    move_def.consume_pp();
    let move_def = move_def.clone();

    let accuracy_roll: f32 = rng.gen_range(0.0..100.0);
    if accuracy_roll > move_def.accuracy() as f32 {
        debug!(
            "{}'s {} missed (rolled {:.2} against {})",
            attacker.name(),
            move_def.name(),
            accuracy_roll,
            move_def.accuracy()
        );
        return MoveOutcome {
            damage: 0,
            message: format!("{}'s {} missed!", attacker.name(), move_def.name()),
            effectiveness: 0.0,
        };
    }

    let mut message = format!("{} used {}!", attacker.name(), move_def.name());
    if matches!(move_def.category(), MoveCategory::Status) {
        return MoveOutcome {
            damage: 0,
            message,
            effectiveness: 1.0,
        };
    }

    let damage = compute_damage(attacker, defender, move_index, rng);
    defender.take_damage(damage);
    let effectiveness = type_effectiveness(move_def.move_type(), defender.types());
    if let Some(phrase) = effectiveness_phrase(effectiveness) {
        message.push(' ');
        message.push_str(phrase);
    }
    if damage > 0 {
        message.push_str(&format!(" {} lost {} HP!", defender.name(), damage));
    }
    MoveOutcome {
        damage,
        message,
        effectiveness,
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MoveView {
    pub id: u32,
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u32,
    pub accuracy: u8,
    pub pp: u8,
    pub max_pp: u8,
}

#[derive(Clone, Debug, Serialize)]
pub struct ActiveView {
    pub slot: usize,
    pub id: u32,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub speed: u32,
    pub fainted: bool,
    pub moves: Vec<MoveView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MemberView {
    pub slot: usize,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub fainted: bool,
    pub active: bool,
}

/// Owned snapshot of a battle for rendering.
#[derive(Clone, Debug, Serialize)]
pub struct BattleStatus {
    pub turn: u32,
    pub phase: BattlePhase,
    pub player_active: ActiveView,
    pub ai_active: ActiveView,
    pub player_team: Vec<MemberView>,
    pub ai_team: Vec<MemberView>,
}

fn active_view(team: &Team) -> ActiveView {
    let active = team.active();
    ActiveView {
        slot: team.active_index(),
        id: active.id(),
        name: active.name().to_string(),
        types: active.types().to_vec(),
        level: active.level(),
        hp: active.current_hp(),
        max_hp: active.max_hp(),
        speed: active.stats().spe,
        fainted: active.is_fainted(),
        moves: active
            .moves()
            .iter()
            .map(|m| MoveView {
                id: m.id(),
                name: m.name().to_string(),
                move_type: m.move_type(),
                category: m.category(),
                power: m.power(),
                accuracy: m.accuracy(),
                pp: m.current_pp(),
                max_pp: m.max_pp(),
            })
            .collect(),
    }
}

fn member_views(team: &Team) -> Vec<MemberView> {
    team.members()
        .iter()
        .enumerate()
        .map(|(slot, m)| MemberView {
            slot,
            name: m.name().to_string(),
            hp: m.current_hp(),
            max_hp: m.max_hp(),
            fainted: m.is_fainted(),
            active: slot == team.active_index(),
        })
        .collect()
}

/// One human-vs-AI match. Owns both teams; every mutation goes through
/// [`Battle::process_turn`].
pub struct Battle {
    player: Team,
    ai: Team,
    turn: u32,
    log: Vec<String>,
    opponent: Box<dyn BattleAi + Send>,
    rng: SmallRng,
}

impl Battle {
    /// Creates a battle against the default [`HeuristicAi`].
    pub fn new(player: Team, ai: Team, seed: u64) -> Result<Self, RosterError> {
        Self::with_opponent(
            player,
            ai,
            SmallRng::seed_from_u64(seed),
            Box::new(HeuristicAi::default()),
        )
    }

    pub fn with_opponent(
        player: Team,
        ai: Team,
        rng: SmallRng,
        opponent: Box<dyn BattleAi + Send>,
    ) -> Result<Self, RosterError> {
        for team in [&player, &ai] {
            if team.is_defeated() {
                return Err(RosterError::AllFainted(team.label().to_string()));
            }
        }
        info!("battle started: {} vs {}", player, ai);
        Ok(Battle {
            player,
            ai,
            turn: 0,
            log: Vec::new(),
            opponent,
            rng,
        })
    }

    fn team(&self, side: Side) -> &Team {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    /// Both active creatures plus the RNG, attacker first.
    fn combatants_mut(&mut self, side: Side) -> (&mut Creature, &mut Creature, &mut SmallRng) {
        match side {
            Side::Player => (self.player.active_mut(), self.ai.active_mut(), &mut self.rng),
            Side::Ai => (self.ai.active_mut(), self.player.active_mut(), &mut self.rng),
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn player_team(&self) -> &Team {
        &self.player
    }

    pub fn ai_team(&self) -> &Team {
        &self.ai
    }

    pub fn is_battle_over(&self) -> bool {
        self.player.is_defeated() || self.ai.is_defeated()
    }

    pub fn winner(&self) -> Option<Winner> {
        if self.player.is_defeated() {
            Some(Winner::Ai)
        } else if self.ai.is_defeated() {
            Some(Winner::Player)
        } else {
            None
        }
    }

    pub fn winner_label(&self) -> String {
        self.winner()
            .map(|w| w.to_string())
            .unwrap_or_else(|| "undecided".to_string())
    }

    pub fn phase(&self) -> BattlePhase {
        if let Some(winner) = self.winner() {
            BattlePhase::Finished(winner)
        } else if self.player.active().is_fainted() {
            BattlePhase::AwaitingPlayerSwitch
        } else {
            BattlePhase::AwaitingAction
        }
    }

    pub fn status(&self) -> BattleStatus {
        BattleStatus {
            turn: self.turn,
            phase: self.phase(),
            player_active: active_view(&self.player),
            ai_active: active_view(&self.ai),
            player_team: member_views(&self.player),
            ai_team: member_views(&self.ai),
        }
    }

    /// Parses a text command and resolves the turn. Rejections come back as
    /// a single explanatory line and leave the battle untouched.
    pub fn process_input(&mut self, input: &str) -> Vec<String> {
        match input
            .parse::<Command>()
            .and_then(|command| self.process_turn(command))
        {
            Ok(events) => events,
            Err(err) => vec![err.to_string()],
        }
    }

    /// Resolves one turn and returns the lines it produced, which are also
    /// appended to [`Battle::log`].
    pub fn process_turn(&mut self, command: Command) -> Result<Vec<String>, BattleError> {
        if self.is_battle_over() {
            return Err(BattleError::BattleOver);
        }
        let forced_replacement = self.player.active().is_fainted();
        self.validate_player_command(command, forced_replacement)?;

        self.turn += 1;
        info!("turn {}: player chose {}", self.turn, command);
        let mut events = Vec::new();

        let ai_command = self.opponent.choose_command(&self.ai, &self.player);
        let ai_plan = self.plan_ai_action(ai_command);

        let mut player_move = None;
        match command {
            Command::Switch { index } => {
                self.player.send_in(index);
                events.push(format!("You switched to {}!", self.player.active().name()));
            }
            Command::Move { index } => player_move = Some(index),
        }
        if let AiPlan::Switch(index) = ai_plan {
            self.ai.send_in(index);
            events.push(format!("Opponent switched to {}!", self.ai.active().name()));
        }

        // `None` marks an AI that has nothing left to use.
        let mut queue: Vec<(Side, Option<usize>)> = Vec::with_capacity(2);
        if let Some(index) = player_move {
            queue.push((Side::Player, Some(index)));
        }
        if !forced_replacement {
            match ai_plan {
                AiPlan::Move(index) => queue.push((Side::Ai, Some(index))),
                AiPlan::NoMoves => queue.push((Side::Ai, None)),
                AiPlan::Switch(_) | AiPlan::Idle => {}
            }
        }
        if queue.len() == 2 && self.player.active().stats().spe < self.ai.active().stats().spe {
            queue.swap(0, 1);
        }
        for (side, move_index) in queue {
            let active = self.team(side).active();
            if active.is_fainted() {
                debug!("{} fainted before acting", active.name());
                continue;
            }
            let stuck = format!("{} has no moves left!", active.name());
            match move_index {
                Some(index) => self.run_move(side, index, &mut events),
                None => events.push(stuck),
            }
        }

        self.cleanup_fainted(&mut events);
        self.log.extend(events.iter().cloned());
        Ok(events)
    }

    fn validate_player_command(&self, command: Command, forced: bool) -> Result<(), BattleError> {
        let active = self.player.active();
        match command {
            Command::Move { .. } if forced => Err(BattleError::ForcedSwitchRequired {
                name: active.name().to_string(),
            }),
            Command::Move { index } => {
                let mv = active
                    .moves()
                    .get(index)
                    .ok_or(MoveRejection::OutOfRange(index))?;
                if !mv.has_pp() {
                    return Err(MoveRejection::NoPp(mv.name().to_string()).into());
                }
                Ok(())
            }
            Command::Switch { index } => Ok(self.player.check_switch_target(index)?),
        }
    }

    /// Checks the AI's command against its own team.
    fn plan_ai_action(&self, command: Command) -> AiPlan {
        let active = self.ai.active();
        match command {
            Command::Switch { index } => match self.ai.check_switch_target(index) {
                Ok(()) => AiPlan::Switch(index),
                Err(err) => {
                    warn!("AI chose an illegal switch to slot {}: {}", index, err);
                    AiPlan::Idle
                }
            },
            Command::Move { index } => {
                if active.moves().get(index).is_some_and(|m| m.has_pp()) {
                    debug!("AI {} picked move slot {}", active.name(), index);
                    AiPlan::Move(index)
                } else {
                    warn!("AI {} has no usable move", active.name());
                    AiPlan::NoMoves
                }
            }
        }
    }

    fn run_move(&mut self, side: Side, move_index: usize, events: &mut Vec<String>) {
        let (attacker, defender, rng) = self.combatants_mut(side);
        let outcome = apply_move(attacker, defender, move_index, rng);
        if !outcome.message.is_empty() {
            events.push(outcome.message);
        }
        let defender = self.team(side.opponent()).active();
        if outcome.damage > 0 && defender.is_fainted() {
            events.push(format!("{} fainted!", defender.name()));
        }
    }

    fn cleanup_fainted(&mut self, events: &mut Vec<String>) {
        if self.ai.active().is_fainted() {
            match self.ai.first_non_fainted() {
                Some(index) => {
                    self.ai.send_in(index);
                    events.push(format!("Opponent sent out {}!", self.ai.active().name()));
                }
                None => {
                    info!("battle over after {} turns: player wins", self.turn);
                    events.push("You defeated all of the opponent's Pokemon! You win!".to_string());
                }
            }
        }
        if self.player.active().is_fainted() {
            if self.player.first_non_fainted().is_some() {
                events.push("Choose your next Pokemon!".to_string());
            } else {
                info!("battle over after {} turns: AI wins", self.turn);
                events.push("All your Pokemon have fainted! You lose!".to_string());
            }
        }
    }
}
