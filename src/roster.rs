//! Roster provider: turns species/move data into battle-ready creatures.
//!
//! The crate ships an embedded dex (`data/roster.json`) with a set of preset
//! championship teams. Other rosters with the same layout can be loaded
//! from disk with [`Roster::load`].

use crate::error::RosterError;
use crate::model::{Creature, Move, MoveCategory, Stats, DEFAULT_LEVEL};
use crate::team::Team;
use crate::types::PokemonType;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const EMBEDDED_ROSTER: &str = include_str!("../data/roster.json");

fn default_accuracy() -> u8 {
    100
}

fn default_level() -> u32 {
    DEFAULT_LEVEL
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveEntry {
    pub id: u32,
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u32,
    #[serde(default = "default_accuracy")]
    pub accuracy: u8,
    pub pp: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesEntry {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Stats,
    pub moves: Vec<String>,
    #[serde(default = "default_level")]
    pub level: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresetTeam {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RosterFile {
    pub moves: HashMap<String, MoveEntry>,
    pub species: Vec<SpeciesEntry>,
    #[serde(default)]
    pub teams: Vec<PresetTeam>,
}

/// Anything that can hand out fully populated creatures by name.
pub trait RosterProvider {
    fn creature(&self, name: &str) -> Result<Creature, RosterError>;

    fn build_team<S: AsRef<str>>(&self, label: &str, names: &[S]) -> Result<Team, RosterError>
    where
        Self: Sized,
    {
        let members = names
            .iter()
            .map(|n| self.creature(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Team::new(label, members)
    }
}

/// `"landorus-therian"` -> `"Landorus-Therian"`, `"air-slash"` -> `"Air Slash"`.
fn display_name(key: &str, separator: &str) -> String {
    key.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace([' ', '_'], "-")
}

pub struct Roster {
    moves: HashMap<String, MoveEntry>,
    species: HashMap<String, SpeciesEntry>,
    teams: Vec<PresetTeam>,
}

impl Roster {
    pub fn embedded() -> Result<Self, RosterError> {
        Self::from_json(EMBEDDED_ROSTER, "<embedded roster>")
    }

    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let raw = std::fs::read_to_string(path).map_err(|error| RosterError::Io {
            error,
            path: path.to_path_buf(),
        })?;
        Self::from_json(&raw, &path.display().to_string())
    }

    /// Parses a roster and builds every species and preset once, so bad
    /// data fails here rather than mid-battle.
    pub fn from_json(raw: &str, origin: &str) -> Result<Self, RosterError> {
        let file: RosterFile = serde_json::from_str(raw).map_err(|error| RosterError::Parse {
            error,
            path: origin.to_string(),
        })?;
        let roster = Roster {
            moves: file
                .moves
                .into_iter()
                .map(|(name, entry)| (normalize(&name), entry))
                .collect(),
            species: file
                .species
                .into_iter()
                .map(|entry| (normalize(&entry.name), entry))
                .collect(),
            teams: file.teams,
        };
        for name in roster.species.keys() {
            roster.creature(name)?;
        }
        for preset in &roster.teams {
            roster.build_team(&preset.name, &preset.members)?;
        }
        debug!(
            "loaded roster from {}: {} species, {} moves, {} preset teams",
            origin,
            roster.species.len(),
            roster.moves.len(),
            roster.teams.len()
        );
        Ok(roster)
    }

    pub fn species_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.species.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn preset_names(&self) -> Vec<&str> {
        self.teams.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn preset_team(&self, name: &str) -> Result<Team, RosterError> {
        let preset = self
            .teams
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| RosterError::UnknownTeam(name.to_string()))?;
        self.build_team(&preset.name, &preset.members)
    }

    pub fn all_presets(&self) -> Result<Vec<Team>, RosterError> {
        self.teams
            .iter()
            .map(|preset| self.build_team(&preset.name, &preset.members))
            .collect()
    }

    pub fn random_preset<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Team, RosterError> {
        let preset = self
            .teams
            .choose(rng)
            .ok_or_else(|| RosterError::UnknownTeam("<any>".to_string()))?;
        self.build_team(&preset.name, &preset.members)
    }

    fn build_move(&self, species: &str, key: &str) -> Result<Move, RosterError> {
        let entry = self
            .moves
            .get(&normalize(key))
            .ok_or_else(|| RosterError::UnknownMove {
                species: species.to_string(),
                move_name: key.to_string(),
            })?;
        let move_type = entry
            .move_type
            .parse::<PokemonType>()
            .map_err(RosterError::UnknownType)?;
        Move::new(
            entry.id,
            display_name(key, " "),
            move_type,
            entry.category,
            entry.power,
            entry.accuracy,
            entry.pp,
        )
    }
}

impl RosterProvider for Roster {
    fn creature(&self, name: &str) -> Result<Creature, RosterError> {
        let entry = self
            .species
            .get(&normalize(name))
            .ok_or_else(|| RosterError::UnknownSpecies(name.to_string()))?;
        let display = display_name(&normalize(&entry.name), "-");
        let types = entry
            .types
            .iter()
            .map(|t| t.parse::<PokemonType>().map_err(RosterError::UnknownType))
            .collect::<Result<Vec<_>, _>>()?;
        let moves = entry
            .moves
            .iter()
            .map(|m| self.build_move(&display, m))
            .collect::<Result<Vec<_>, _>>()?;
        Creature::new(entry.id, display, types, entry.stats, moves, entry.level)
    }
}
