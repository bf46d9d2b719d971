//! Turn-based Pokémon battles between a human-controlled team and an AI.
//!
//! [`battle::Battle`] is the engine: it owns both teams, resolves one turn
//! per [`battle::Battle::process_turn`] call and keeps an append-only event
//! log. Everything else feeds it teams ([`roster`]) or renders its output
//! ([`terminal`]).

pub mod ai;
pub mod battle;
pub mod command;
pub mod damage;
pub mod error;
pub mod matrix;
pub mod model;
pub mod roster;
pub mod team;
pub mod terminal;
pub mod types;

pub use crate::battle::{Battle, BattlePhase, BattleStatus, Winner};
pub use crate::command::Command;
pub use crate::error::{BattleError, RosterError};
pub use crate::matrix::{BattlePolicy, SimulationOptions};
pub use crate::roster::{Roster, RosterProvider};

use crate::matrix::compute_matrix;
use anyhow::Context;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub team: Option<String>,
    pub pick: Vec<String>,
    pub opponent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub sims_per_cell: usize,
    pub output_path: PathBuf,
    pub policy: BattlePolicy,
    pub max_turns: u32,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            sims_per_cell: 100,
            output_path: PathBuf::from("matrix.csv"),
            policy: BattlePolicy::Heuristic,
            max_turns: SimulationOptions::default().max_turns,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Mode {
    Play(PlayOptions),
    Simulate(SimulateOptions),
    ListTeams,
    ListSpecies,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub mode: Mode,
    pub roster_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub verbose: bool,
}

pub fn load_roster(path: Option<&Path>) -> anyhow::Result<Roster> {
    match path {
        Some(path) => Roster::load(path)
            .with_context(|| format!("Failed to load roster from {}", path.display())),
        None => Roster::embedded().context("Embedded roster is invalid"),
    }
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let roster = load_roster(opts.roster_path.as_deref())?;
    let seed = opts.seed.unwrap_or_else(|| rand::thread_rng().gen());
    match opts.mode {
        Mode::ListTeams => {
            for team in roster.all_presets()? {
                println!("{team}");
            }
            Ok(())
        }
        Mode::ListSpecies => {
            for name in roster.species_names() {
                println!("{name}");
            }
            Ok(())
        }
        Mode::Play(play) => run_play(&roster, &play, seed),
        Mode::Simulate(sim) => run_simulate(&roster, &sim, seed),
    }
}

fn run_play(roster: &Roster, play: &PlayOptions, seed: u64) -> anyhow::Result<()> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    println!("====================================");
    println!("    POKEMON BATTLE SIMULATOR");
    println!("====================================");
    println!("Battle seed: {seed}");

    let player = if let Some(name) = &play.team {
        roster.preset_team(name)?
    } else if !play.pick.is_empty() {
        roster.build_team("Player's Team", play.pick.as_slice())?
    } else {
        terminal::prompt_team(roster, &mut input, &mut output)?
    };
    let ai = match &play.opponent {
        Some(name) => roster.preset_team(name)?,
        None => roster.random_preset(&mut rng)?,
    };
    let mut battle = Battle::new(player, ai, rng.gen())?;
    let winner = terminal::play(&mut battle, &mut input, &mut output)?;
    info!(
        "battle finished after {} turns, winner: {}",
        battle.turn(),
        winner.map(|w| w.to_string()).unwrap_or_else(|| "none".to_string())
    );
    Ok(())
}

fn run_simulate(roster: &Roster, sim: &SimulateOptions, seed: u64) -> anyhow::Result<()> {
    if sim.sims_per_cell == 0 {
        anyhow::bail!("--sims-per-cell must be > 0");
    }
    let teams = roster.all_presets()?;
    if teams.is_empty() {
        anyhow::bail!("The roster has no preset teams to simulate");
    }
    let options = SimulationOptions {
        player_policy: sim.policy.clone(),
        ai_policy: sim.policy.clone(),
        max_turns: sim.max_turns,
        ..SimulationOptions::default()
    };
    info!(
        "simulating {} pairings x {} battles (seed {})",
        teams.len() * teams.len(),
        sim.sims_per_cell,
        seed
    );
    let matrix = compute_matrix(&teams, sim.sims_per_cell, seed, &options)?;
    let labels: Vec<&str> = teams.iter().map(|t| t.label()).collect();
    matrix::write_csv(&matrix, &labels, &sim.output_path)
        .with_context(|| format!("Failed to write {}", sim.output_path.display()))?;
    println!(
        "Wrote {}x{} matrix to {} (seed {})",
        matrix.len(),
        matrix.first().map(|r| r.len()).unwrap_or(0),
        sim.output_path.display(),
        seed
    );
    Ok(())
}
