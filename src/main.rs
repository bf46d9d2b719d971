use pokemon_battle_sim::{run, BattlePolicy, CliOptions, Mode, PlayOptions, SimulateOptions};
use std::env;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!(
        "Usage: pokemon-battle-sim [--verbose] [--roster roster.json] [--seed SEED] <command>\n\
\n\
Commands:\n\
  play [--team NAME | --pick a,b,c] [--opponent NAME]\n\
  simulate [--sims-per-cell N] [--output matrix.csv] [--policy heuristic|random] [--max-turns N]\n\
  list-teams\n\
  list-species"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut mode_name: Option<String> = None;
    let mut roster_path = None;
    let mut seed = None;
    let mut verbose = false;
    let mut play = PlayOptions::default();
    let mut sim = SimulateOptions::default();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            "--roster" => {
                roster_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--roster requires a path (e.g. --roster roster.json)")
                })?);
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = Some(val.parse()?);
            }
            "--team" => {
                play.team = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--team requires a preset team name"))?,
                );
            }
            "--pick" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--pick requires species names (e.g. --pick charizard,gengar)"))?;
                play.pick = val
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "--opponent" => {
                play.opponent = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--opponent requires a preset team name"))?,
                );
            }
            "--sims-per-cell" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--sims-per-cell requires a number"))?;
                sim.sims_per_cell = val.parse()?;
            }
            "--output" => {
                sim.output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output matrix.csv)")
                })?;
            }
            "--policy" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--policy requires heuristic or random"))?;
                sim.policy = match val.to_ascii_lowercase().as_str() {
                    "heuristic" => BattlePolicy::Heuristic,
                    "random" => BattlePolicy::Random,
                    other => anyhow::bail!("Unknown policy {other} (use heuristic or random)"),
                };
            }
            "--max-turns" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-turns requires a number"))?;
                sim.max_turns = val.parse()?;
            }
            "--help" | "-h" => usage(),
            other if !other.starts_with('-') && mode_name.is_none() => {
                mode_name = Some(other.to_string());
            }
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    let mode = match mode_name.as_deref().unwrap_or("play") {
        "play" => Mode::Play(play),
        "simulate" => Mode::Simulate(sim),
        "list-teams" => Mode::ListTeams,
        "list-species" => Mode::ListSpecies,
        other => anyhow::bail!("Unknown command {other} (use play, simulate, list-teams or list-species)"),
    };

    Ok(CliOptions {
        mode,
        roster_path,
        seed,
        verbose,
    })
}

fn main() -> anyhow::Result<()> {
    let opts = parse_args()?;
    let default_filter = if opts.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    run(opts)
}
