use crate::error::RosterError;
use crate::types::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone)]
pub struct Move {
    id: u32,
    name: String,
    move_type: PokemonType,
    category: MoveCategory,
    power: u32,
    accuracy: u8,
    max_pp: u8,
    current_pp: u8,
}

impl Move {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        move_type: PokemonType,
        category: MoveCategory,
        power: u32,
        accuracy: u8,
        pp: u8,
    ) -> Result<Self, RosterError> {
        let name = name.into();
        let invalid = |message: &str| RosterError::InvalidMove {
            name: name.clone(),
            message: message.to_string(),
        };
        if accuracy > 100 {
            return Err(invalid("accuracy must be between 0 and 100"));
        }
        if pp == 0 {
            return Err(invalid("max PP must be at least 1"));
        }
        match category {
            MoveCategory::Status if power != 0 => {
                return Err(invalid("status moves have no power"));
            }
            MoveCategory::Physical | MoveCategory::Special if power == 0 => {
                return Err(invalid("damaging moves need power"));
            }
            _ => {}
        }
        Ok(Move {
            id,
            name,
            move_type,
            category,
            power,
            accuracy,
            max_pp: pp,
            current_pp: pp,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn move_type(&self) -> PokemonType {
        self.move_type
    }

    pub fn category(&self) -> MoveCategory {
        self.category
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn accuracy(&self) -> u8 {
        self.accuracy
    }

    pub fn max_pp(&self) -> u8 {
        self.max_pp
    }

    pub fn current_pp(&self) -> u8 {
        self.current_pp
    }

    pub fn has_pp(&self) -> bool {
        self.current_pp > 0
    }

    pub fn is_damaging(&self) -> bool {
        !matches!(self.category, MoveCategory::Status)
    }

    pub(crate) fn consume_pp(&mut self) {
        self.current_pp = self.current_pp.saturating_sub(1);
    }

    pub fn restore_pp(&mut self) {
        self.current_pp = self.max_pp;
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {:?}) - Power: {} - Accuracy: {} - PP: {}/{}",
            self.name,
            self.move_type,
            self.category,
            self.power,
            self.accuracy,
            self.current_pp,
            self.max_pp
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

impl Stats {
    fn first_zero(&self) -> Option<&'static str> {
        [
            ("hp", self.hp),
            ("attack", self.atk),
            ("defense", self.def),
            ("special-attack", self.spa),
            ("special-defense", self.spd),
            ("speed", self.spe),
        ]
        .into_iter()
        .find(|(_, value)| *value == 0)
        .map(|(stat, _)| stat)
    }
}

pub const DEFAULT_LEVEL: u32 = 50;

#[derive(Debug, Clone)]
pub struct Creature {
    id: u32,
    name: String,
    types: Vec<PokemonType>,
    stats: Stats,
    moves: Vec<Move>,
    level: u32,
    current_hp: u32,
}

impl Creature {
    /// Builds a creature at full HP after checking its types, stats and move list.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        types: Vec<PokemonType>,
        stats: Stats,
        moves: Vec<Move>,
        level: u32,
    ) -> Result<Self, RosterError> {
        let name = name.into();
        if types.is_empty() || types.len() > 2 {
            return Err(RosterError::InvalidTypeCount {
                name,
                count: types.len(),
            });
        }
        if types.len() == 2 && types[0] == types[1] {
            return Err(RosterError::DuplicateType(name));
        }
        if let Some(stat) = stats.first_zero() {
            return Err(RosterError::ZeroStat { name, stat });
        }
        if level == 0 {
            return Err(RosterError::ZeroLevel(name));
        }
        if moves.is_empty() {
            return Err(RosterError::NoMoves(name));
        }
        if moves.len() > 4 {
            return Err(RosterError::TooManyMoves {
                name,
                count: moves.len(),
            });
        }
        Ok(Creature {
            id,
            name,
            types,
            current_hp: stats.hp,
            stats,
            moves,
            level,
        })
    }

    /// Starts the creature at `hp`, clamped to its maximum.
    pub fn with_current_hp(mut self, hp: u32) -> Self {
        self.current_hp = hp.min(self.stats.hp);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[PokemonType] {
        &self.types
    }

    pub fn has_type(&self, t: PokemonType) -> bool {
        self.types.contains(&t)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.hp
    }

    pub fn hp_fraction(&self) -> f32 {
        self.current_hp as f32 / self.stats.hp as f32
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub(crate) fn move_mut(&mut self, idx: usize) -> Option<&mut Move> {
        self.moves.get_mut(idx)
    }

    /// Returns the HP actually removed.
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.stats.hp);
        self.current_hp - before
    }

    pub fn restore_pp(&mut self) {
        for mv in &mut self.moves {
            mv.restore_pp();
        }
    }

    pub fn type_label(&self) -> String {
        self.types
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn detailed_info(&self) -> String {
        let mut lines = vec![
            format!("{} (Lv.{}) - {}", self.name, self.level, self.type_label()),
            format!("HP: {}/{}", self.current_hp, self.stats.hp),
            format!("Attack: {}", self.stats.atk),
            format!("Defense: {}", self.stats.def),
            format!("Special Attack: {}", self.stats.spa),
            format!("Special Defense: {}", self.stats.spd),
            format!("Speed: {}", self.stats.spe),
            "Moves:".to_string(),
        ];
        for (i, mv) in self.moves.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, mv));
        }
        lines.join("\n")
    }
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Lv.{}) - {} - HP: {}/{}",
            self.name,
            self.level,
            self.type_label(),
            self.current_hp,
            self.stats.hp
        )
    }
}
