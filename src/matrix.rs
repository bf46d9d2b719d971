use crate::ai::{AiParams, BattleAi, HeuristicAi, RandomAi};
use crate::battle::{Battle, Winner};
use crate::command::Command;
use crate::error::RosterError;
use crate::team::Team;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BattlePolicy {
    Heuristic,
    Random,
}

#[derive(Clone, Debug)]
pub struct SimulationOptions {
    /// Drives the player's side, which has no human at the keyboard here.
    pub player_policy: BattlePolicy,
    pub ai_policy: BattlePolicy,
    pub ai_params: AiParams,
    pub max_turns: u32,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            player_policy: BattlePolicy::Heuristic,
            ai_policy: BattlePolicy::Heuristic,
            ai_params: AiParams::default(),
            max_turns: 500,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BattleOutcome {
    PlayerWins,
    AiWins,
    Draw,
}

fn make_ai(policy: &BattlePolicy, params: &AiParams, seed: u64) -> Box<dyn BattleAi + Send> {
    match policy {
        BattlePolicy::Heuristic => Box::new(HeuristicAi::new(params.clone())),
        BattlePolicy::Random => Box::new(RandomAi::new(seed)),
    }
}

/// Plays one battle to the end with both sides on autopilot. Both teams
/// start at full HP and PP whatever state they are passed in.
///
/// A rejected autopilot command (nothing left with PP) or hitting
/// `max_turns` ends the battle as a draw.
pub fn simulate_battle(
    player: &Team,
    ai: &Team,
    seed: u64,
    options: &SimulationOptions,
) -> Result<BattleOutcome, RosterError> {
    let mut seeds = SmallRng::seed_from_u64(seed);
    let mut autopilot = make_ai(&options.player_policy, &options.ai_params, seeds.gen());
    let opponent = make_ai(&options.ai_policy, &options.ai_params, seeds.gen());
    let mut player = player.clone();
    let mut ai = ai.clone();
    player.restore_all();
    ai.restore_all();
    let mut battle = Battle::with_opponent(
        player,
        ai,
        SmallRng::seed_from_u64(seeds.gen()),
        opponent,
    )?;

    while battle.turn() < options.max_turns {
        if let Some(winner) = battle.winner() {
            return Ok(match winner {
                Winner::Player => BattleOutcome::PlayerWins,
                Winner::Ai => BattleOutcome::AiWins,
            });
        }
        let own = battle.player_team();
        let command = if own.active().is_fainted() {
            match own.first_non_fainted() {
                Some(index) => Command::Switch { index },
                None => break,
            }
        } else {
            autopilot.choose_command(own, battle.ai_team())
        };
        if let Err(err) = battle.process_turn(command) {
            debug!("autopilot stalled on turn {}: {}", battle.turn(), err);
            return Ok(BattleOutcome::Draw);
        }
    }
    Ok(match battle.winner() {
        Some(Winner::Player) => BattleOutcome::PlayerWins,
        Some(Winner::Ai) => BattleOutcome::AiWins,
        None => BattleOutcome::Draw,
    })
}

struct CellResult {
    row: usize,
    col: usize,
    win_rate: f64,
}

/// Win rate of `teams[row]` (player side) against `teams[col]` (AI side),
/// draws counting half.
pub fn compute_matrix(
    teams: &[Team],
    sims_per_cell: usize,
    seed: u64,
    options: &SimulationOptions,
) -> Result<Vec<Vec<f64>>, RosterError> {
    let tasks: Vec<(usize, usize)> = (0..teams.len())
        .flat_map(|row| (0..teams.len()).map(move |col| (row, col)))
        .collect();
    let cells: Vec<CellResult> = tasks
        .par_iter()
        .map(|&(row, col)| {
            let mut cell_rng =
                SmallRng::seed_from_u64(seed ^ ((row as u64) << 32) ^ (col as u64));
            let mut wins = 0u64;
            let mut draws = 0u64;
            for _ in 0..sims_per_cell {
                match simulate_battle(&teams[row], &teams[col], cell_rng.gen(), options)? {
                    BattleOutcome::PlayerWins => wins += 1,
                    BattleOutcome::AiWins => {}
                    BattleOutcome::Draw => draws += 1,
                }
            }
            let total = sims_per_cell.max(1) as f64;
            Ok(CellResult {
                row,
                col,
                win_rate: (wins as f64 + 0.5 * draws as f64) / total,
            })
        })
        .collect::<Result<_, RosterError>>()?;

    let mut matrix = vec![vec![0.0; teams.len()]; teams.len()];
    for cell in cells {
        matrix[cell.row][cell.col] = cell.win_rate;
    }
    Ok(matrix)
}

pub fn write_csv(matrix: &[Vec<f64>], labels: &[&str], path: &std::path::Path) -> anyhow::Result<()> {
    let mut out = String::new();
    out.push_str("team");
    for label in labels {
        out.push(',');
        out.push_str(label);
    }
    for (row_idx, row) in matrix.iter().enumerate() {
        out.push('\n');
        out.push_str(labels.get(row_idx).copied().unwrap_or(""));
        for value in row {
            out.push_str(&format!(",{value:.4}"));
        }
    }
    out.push('\n');
    std::fs::write(path, out)?;
    Ok(())
}
