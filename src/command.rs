use crate::error::BattleError;
use std::fmt;
use std::str::FromStr;

/// A validated player action. Indices are 0-based.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Command {
    Move { index: usize },
    Switch { index: usize },
}

/// Text form used by front-ends: `"2"` picks the second move, `"switch 3"`
/// sends in the third roster member. Both are 1-based.
impl FromStr for Command {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let invalid = || BattleError::InvalidCommand(s.to_string());
        let slot_index = |raw: &str| -> Result<usize, BattleError> {
            let slot: usize = raw.parse().map_err(|_| invalid())?;
            slot.checked_sub(1).ok_or_else(invalid)
        };
        match input.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["switch", slot] => Ok(Command::Switch {
                index: slot_index(*slot)?,
            }),
            [slot] => Ok(Command::Move {
                index: slot_index(*slot)?,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { index } => write!(f, "{}", index + 1),
            Command::Switch { index } => write!(f, "switch {}", index + 1),
        }
    }
}
