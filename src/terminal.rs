//! Line-oriented terminal front-end. Reads commands from any `BufRead` and
//! writes to any `Write`, so the same loop serves stdin/stdout and tests.

use crate::battle::{Battle, BattleStatus, Winner};
use crate::roster::{Roster, RosterProvider};
use crate::team::{Team, MAX_TEAM_SIZE};
use anyhow::Context;
use std::io::{BufRead, Write};

pub const INSTRUCTIONS: &str = "\
- Battle against an AI opponent with a team of up to 6 Pokemon
- Select a move by its number (1-4)
- Switch Pokemon with 'switch X', where X is the Pokemon's number in your team
- Type 'info' to see your active Pokemon's stats and moves
- Type 'quit' to leave the battle
- The battle continues until one team is defeated";

pub fn render_status(status: &BattleStatus) -> String {
    let you = &status.player_active;
    let foe = &status.ai_active;
    let mut lines = vec![
        format!("--- Turn {} ---", status.turn + 1),
        format!("Opponent's {}: HP {}/{}", foe.name, foe.hp, foe.max_hp),
        format!("Your {}: HP {}/{}", you.name, you.hp, you.max_hp),
        String::new(),
        "Available moves:".to_string(),
    ];
    for (i, mv) in you.moves.iter().enumerate() {
        lines.push(format!(
            "{}. {} [{}] (PP: {}/{})",
            i + 1,
            mv.name,
            mv.move_type,
            mv.pp,
            mv.max_pp
        ));
    }
    lines.push(String::new());
    lines.push("Your team:".to_string());
    for member in &status.player_team {
        let state = if member.fainted {
            "FAINTED".to_string()
        } else {
            format!("HP {}/{}", member.hp, member.max_hp)
        };
        let marker = if member.active { " (active)" } else { "" };
        lines.push(format!("{}. {} - {}{}", member.slot + 1, member.name, state, marker));
    }
    lines.join("\n")
}

fn read_command<R: BufRead>(input: &mut R) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read from input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Runs the battle until it ends or the player quits. Returns the winner,
/// `None` when the player left early.
pub fn play<R: BufRead, W: Write>(
    battle: &mut Battle,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<Option<Winner>> {
    writeln!(output, "BATTLE STARTED!")?;
    writeln!(output, "{} vs {}", battle.player_team(), battle.ai_team())?;
    while !battle.is_battle_over() {
        writeln!(output)?;
        writeln!(output, "{}", render_status(&battle.status()))?;
        write!(output, "\nChoose a move (1-4) or 'switch X' to switch Pokemon: ")?;
        output.flush()?;
        let Some(choice) = read_command(input)? else {
            writeln!(output)?;
            return Ok(None);
        };
        match choice.to_ascii_lowercase().as_str() {
            "" => continue,
            "quit" | "q" | "exit" => {
                writeln!(output, "You ran away from the battle.")?;
                return Ok(None);
            }
            "help" | "?" => {
                writeln!(output, "{INSTRUCTIONS}")?;
                continue;
            }
            "info" => {
                writeln!(output, "{}", battle.player_team().active().detailed_info())?;
                continue;
            }
            _ => {}
        }
        for line in battle.process_input(&choice) {
            writeln!(output, "{line}")?;
        }
    }
    let winner = battle.winner();
    match winner {
        Some(Winner::Player) => writeln!(output, "\nCONGRATULATIONS! You won the battle!")?,
        _ => writeln!(output, "\nYou lost the battle. Better luck next time!")?,
    }
    Ok(winner)
}

/// Asks for species names until the team is full or the player types `done`.
pub fn prompt_team<R: BufRead, W: Write>(
    roster: &Roster,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<Team> {
    writeln!(output, "\nLet's build your team!")?;
    writeln!(output, "You can have up to {MAX_TEAM_SIZE} Pokemon in your team.")?;
    let mut members = Vec::new();
    while members.len() < MAX_TEAM_SIZE {
        write!(output, "\nEnter a Pokemon name (or 'done' to finish): ")?;
        output.flush()?;
        let Some(name) = read_command(input)? else {
            break;
        };
        if name.eq_ignore_ascii_case("done") {
            if members.is_empty() {
                writeln!(output, "You need at least one Pokemon in your team!")?;
                continue;
            }
            break;
        }
        match roster.creature(&name) {
            Ok(creature) => {
                writeln!(output, "{} added to your team!", creature.name())?;
                members.push(creature);
            }
            Err(err) => writeln!(output, "Error: {err}. Please try another one.")?,
        }
        writeln!(output, "Team size: {}/{}", members.len(), MAX_TEAM_SIZE)?;
    }
    Ok(Team::new("Player's Team", members)?)
}
