use std::path::PathBuf;
use thiserror::Error;

/// Why a switch target was refused.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SwitchRejection {
    #[error("Invalid switch index!")]
    OutOfRange(usize),
    #[error("{0} has fainted! Choose another.")]
    Fainted(String),
    #[error("{0} is already in battle!")]
    AlreadyActive(String),
}

/// Why a move choice was refused.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MoveRejection {
    #[error("Invalid move selection!")]
    OutOfRange(usize),
    #[error("No PP left for {0}!")]
    NoPp(String),
}

/// A command refused at the turn boundary. The engine state is untouched
/// whenever one of these is returned.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BattleError {
    #[error("Invalid command! Enter a move number or 'switch X'")]
    InvalidCommand(String),
    #[error(transparent)]
    InvalidSwitchTarget(#[from] SwitchRejection),
    #[error(transparent)]
    InvalidMoveSelection(#[from] MoveRejection),
    #[error("{name} has fainted! You must switch to another Pokémon.")]
    ForcedSwitchRequired { name: String },
    #[error("The battle is already over!")]
    BattleOver,
}

/// Errors raised while building creatures, teams or rosters.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Team '{0}' has no Pokémon")]
    EmptyTeam(String),
    #[error("Team '{team}' has {count} Pokémon (max 6)")]
    TeamTooLarge { team: String, count: usize },
    #[error("Every Pokémon on team '{0}' has fainted")]
    AllFainted(String),
    #[error("{0} has no moves")]
    NoMoves(String),
    #[error("{name} has {count} moves (max 4)")]
    TooManyMoves { name: String, count: usize },
    #[error("{name} must have one or two types (got {count})")]
    InvalidTypeCount { name: String, count: usize },
    #[error("{0} lists the same type twice")]
    DuplicateType(String),
    #[error("{name} has a zero {stat} stat")]
    ZeroStat { name: String, stat: &'static str },
    #[error("{0} has level 0")]
    ZeroLevel(String),
    #[error("Invalid move {name}: {message}")]
    InvalidMove { name: String, message: String },
    #[error("Unknown species: {0}")]
    UnknownSpecies(String),
    #[error("Unknown move '{move_name}' for {species}")]
    UnknownMove { species: String, move_name: String },
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("Unknown team: {0}")]
    UnknownTeam(String),
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: serde_json::Error,
        path: String,
    },
}
