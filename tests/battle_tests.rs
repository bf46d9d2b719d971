use pokemon_battle_sim::battle::{Battle, BattlePhase, Winner};
use pokemon_battle_sim::command::Command;
use pokemon_battle_sim::damage::{damage_with_roll, DamageRoll};
use pokemon_battle_sim::error::{BattleError, MoveRejection, SwitchRejection};
use pokemon_battle_sim::model::{Creature, Move, MoveCategory, Stats};
use pokemon_battle_sim::team::Team;
use pokemon_battle_sim::types::PokemonType;

fn make_move(name: &str, move_type: PokemonType, power: u32, pp: u8) -> Move {
    Move::new(1, name, move_type, MoveCategory::Physical, power, 100, pp).unwrap()
}

fn make_mon(name: &str, types: &[PokemonType], hp: u32, atk: u32, speed: u32, mv: Move) -> Creature {
    let stats = Stats {
        hp,
        atk,
        def: 100,
        spa: 100,
        spd: 100,
        spe: speed,
    };
    Creature::new(1, name, types.to_vec(), stats, vec![mv], 50).unwrap()
}

fn strike() -> Move {
    make_move("Strike", PokemonType::Normal, 40, 10)
}

fn normal(name: &str, speed: u32) -> Creature {
    make_mon(name, &[PokemonType::Normal], 100, 100, speed, strike())
}

fn team(label: &str, members: Vec<Creature>) -> Team {
    Team::new(label, members).unwrap()
}

#[test]
fn worked_damage_example() {
    let attacker = make_mon("Attacker", &[PokemonType::Water], 100, 100, 50, make_move("Tackle", PokemonType::Normal, 80, 35));
    let defender = make_mon("Defender", &[PokemonType::Normal], 100, 100, 50, strike());
    let damage = damage_with_roll(&attacker, &defender, &attacker.moves()[0], DamageRoll::fixed());
    assert_eq!(damage, 37);
}

#[test]
fn speed_tie_goes_to_player() {
    let mut battle = Battle::new(
        team("Player", vec![normal("Lead", 80)]),
        team("AI", vec![normal("Rival", 80)]),
        11,
    )
    .unwrap();
    let events = battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert_eq!(events.len(), 2);
    assert!(events[0].starts_with("Lead used Strike!"));
    assert!(events[1].starts_with("Rival used Strike!"));
    assert_eq!(battle.turn(), 1);
}

#[test]
fn faster_side_moves_first() {
    let mut battle = Battle::new(
        team("Player", vec![normal("Slow", 30)]),
        team("AI", vec![normal("Quick", 120)]),
        4,
    )
    .unwrap();
    let events = battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert!(events[0].starts_with("Quick used Strike!"));
    assert!(events[1].starts_with("Slow used Strike!"));
}

fn switch_scenario(current_hp: u32) -> Battle {
    let weak = make_mon("Weak", &[PokemonType::Normal], 200, 100, 50, strike()).with_current_hp(current_hp);
    let counter = make_mon(
        "Counter",
        &[PokemonType::Fighting],
        100,
        100,
        100,
        make_move("Karate Chop", PokemonType::Fighting, 50, 25),
    );
    Battle::new(
        team("Player", vec![normal("Target", 60)]),
        team("AI", vec![weak, counter]),
        8,
    )
    .unwrap()
}

#[test]
fn ai_retreats_when_low() {
    let mut battle = switch_scenario(50);
    let events = battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert_eq!(events[0], "Opponent switched to Counter!");
    assert!(events[1].starts_with("Target used Strike!"));
    assert!(events[1].ends_with(&format!(
        "Counter lost {} HP!",
        100 - battle.ai_team().active().current_hp()
    )));
    assert_eq!(battle.ai_team().active().name(), "Counter");
    assert_eq!(battle.ai_team().members()[0].current_hp(), 50);
}

#[test]
fn ai_stays_in_above_threshold() {
    let mut battle = switch_scenario(80);
    let events = battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert!(events.iter().all(|e| !e.contains("switched")));
    assert_eq!(battle.ai_team().active_index(), 0);
    assert!(events[0].starts_with("Target used Strike!"));
    assert!(events[1].starts_with("Weak used Strike!"));
}

#[test]
fn rejected_commands_leave_state_untouched() {
    let bench = normal("Resting", 40).with_current_hp(0);
    let player = team(
        "Player",
        vec![make_mon("Lead", &[PokemonType::Normal], 100, 100, 90, make_move("Last Gasp", PokemonType::Normal, 40, 1)), bench],
    );
    let mut battle = Battle::new(player, team("AI", vec![normal("Rival", 50)]), 21).unwrap();

    let cases = [
        (
            Command::Switch { index: 5 },
            BattleError::InvalidSwitchTarget(SwitchRejection::OutOfRange(5)),
        ),
        (
            Command::Switch { index: 1 },
            BattleError::InvalidSwitchTarget(SwitchRejection::Fainted("Resting".into())),
        ),
        (
            Command::Switch { index: 0 },
            BattleError::InvalidSwitchTarget(SwitchRejection::AlreadyActive("Lead".into())),
        ),
        (
            Command::Move { index: 3 },
            BattleError::InvalidMoveSelection(MoveRejection::OutOfRange(3)),
        ),
    ];
    for (command, expected) in cases {
        assert_eq!(battle.process_turn(command).unwrap_err(), expected);
        assert_eq!(battle.turn(), 0);
        assert!(battle.log().is_empty());
        assert_eq!(battle.player_team().active().current_hp(), 100);
        assert_eq!(battle.ai_team().active().current_hp(), 100);
        assert_eq!(battle.player_team().active().moves()[0].current_pp(), 1);
    }

    battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert_eq!(battle.player_team().active().moves()[0].current_pp(), 0);
    let hp_before = battle.player_team().active().current_hp();
    let log_before = battle.log().len();
    assert_eq!(
        battle.process_turn(Command::Move { index: 0 }).unwrap_err(),
        BattleError::InvalidMoveSelection(MoveRejection::NoPp("Last Gasp".into()))
    );
    assert_eq!(battle.turn(), 1);
    assert_eq!(battle.log().len(), log_before);
    assert_eq!(battle.player_team().active().current_hp(), hp_before);
}

#[test]
fn each_use_spends_one_pp() {
    let mut battle = Battle::new(
        team("Player", vec![normal("Lead", 90)]),
        team("AI", vec![normal("Rival", 50)]),
        3,
    )
    .unwrap();
    battle.process_turn(Command::Move { index: 0 }).unwrap();
    battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert_eq!(battle.player_team().active().moves()[0].current_pp(), 8);
    assert_eq!(battle.ai_team().active().moves()[0].current_pp(), 8);
}

#[test]
fn voluntary_switch_takes_the_turn() {
    let player = team("Player", vec![normal("Lead", 90), normal("Bench", 40)]);
    let mut battle = Battle::new(player, team("AI", vec![normal("Rival", 50)]), 6).unwrap();
    let events = battle.process_turn(Command::Switch { index: 1 }).unwrap();
    assert_eq!(events[0], "You switched to Bench!");
    assert!(events[1].starts_with("Rival used Strike! Bench lost"));
    assert_eq!(battle.player_team().active_index(), 1);
    assert_eq!(battle.player_team().members()[0].current_hp(), 100);
    assert_eq!(battle.player_team().members()[0].moves()[0].current_pp(), 10);
}

#[test]
fn knocking_out_the_last_foe_wins() {
    let hero = make_mon("Hero", &[PokemonType::Normal], 100, 100, 100, strike());
    let rival = normal("Rival", 50).with_current_hp(1);
    let mut battle = Battle::new(team("Player", vec![hero]), team("AI", vec![rival]), 2).unwrap();

    let events = battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert_eq!(events.len(), 3);
    assert!(events[0].starts_with("Hero used Strike!"));
    assert_eq!(events[1], "Rival fainted!");
    assert_eq!(events[2], "You defeated all of the opponent's Pokemon! You win!");
    assert!(battle.is_battle_over());
    assert_eq!(battle.winner(), Some(Winner::Player));
    assert_eq!(battle.winner_label(), "Player");
    assert_eq!(battle.phase(), BattlePhase::Finished(Winner::Player));
    assert_eq!(battle.ai_team().active().moves()[0].current_pp(), 10);

    assert_eq!(
        battle.process_turn(Command::Move { index: 0 }).unwrap_err(),
        BattleError::BattleOver
    );
    assert_eq!(battle.turn(), 1);
}

#[test]
fn losing_the_last_creature_loses() {
    let hero = normal("Hero", 20).with_current_hp(1);
    let mut battle = Battle::new(team("Player", vec![hero]), team("AI", vec![normal("Rival", 90)]), 2).unwrap();
    assert_eq!(battle.winner_label(), "undecided");
    let events = battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert_eq!(events.last().unwrap(), "All your Pokemon have fainted! You lose!");
    assert_eq!(battle.winner(), Some(Winner::Ai));
    assert_eq!(battle.winner_label(), "AI");
}

#[test]
fn fainted_ai_is_replaced_in_roster_order() {
    let player = team("Player", vec![make_mon("Hero", &[PokemonType::Normal], 100, 100, 100, strike())]);
    let ai = team(
        "AI",
        vec![
            normal("First", 50).with_current_hp(1),
            normal("Gone", 50).with_current_hp(0),
            normal("Third", 50),
        ],
    );
    let mut battle = Battle::new(player, ai, 5).unwrap();
    let events = battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert_eq!(events.last().unwrap(), "Opponent sent out Third!");
    assert_eq!(battle.ai_team().active_index(), 2);
    assert!(!battle.is_battle_over());
}

#[test]
fn log_is_the_concatenation_of_turn_events() {
    let mut battle = Battle::new(
        team("Player", vec![normal("Lead", 90)]),
        team("AI", vec![normal("Rival", 50)]),
        13,
    )
    .unwrap();
    let first = battle.process_turn(Command::Move { index: 0 }).unwrap();
    let snapshot = battle.log().to_vec();
    let second = battle.process_turn(Command::Move { index: 0 }).unwrap();
    assert_eq!(&battle.log()[..snapshot.len()], snapshot.as_slice());
    let expected: Vec<String> = first.into_iter().chain(second).collect();
    assert_eq!(battle.log(), expected.as_slice());
}

#[test]
fn text_commands_are_one_based() {
    let player = team("Player", vec![normal("Lead", 90), normal("Bench", 40)]);
    let mut battle = Battle::new(player, team("AI", vec![normal("Rival", 50)]), 17).unwrap();

    assert_eq!(
        battle.process_input("fly away"),
        vec!["Invalid command! Enter a move number or 'switch X'".to_string()]
    );
    assert_eq!(battle.process_input("switch 1"), vec!["Lead is already in battle!".to_string()]);
    assert_eq!(battle.process_input("5"), vec!["Invalid move selection!".to_string()]);
    assert_eq!(battle.turn(), 0);

    let events = battle.process_input("switch 2");
    assert_eq!(events[0], "You switched to Bench!");
    let events = battle.process_input("1");
    assert!(events[0].starts_with("Rival used Strike!"));
    assert!(events[1].starts_with("Bench used Strike!"));
    assert_eq!(battle.turn(), 2);
}

#[test]
fn status_snapshot_reflects_battle() {
    let player = team("Player", vec![normal("Lead", 90), normal("Bench", 40)]);
    let mut battle = Battle::new(player, team("AI", vec![normal("Rival", 50)]), 19).unwrap();
    battle.process_turn(Command::Move { index: 0 }).unwrap();

    let status = battle.status();
    assert_eq!(status.turn, 1);
    assert_eq!(status.phase, BattlePhase::AwaitingAction);
    assert_eq!(status.player_active.name, "Lead");
    assert_eq!(status.player_active.hp, battle.player_team().active().current_hp());
    assert_eq!(status.player_active.moves[0].pp, 9);
    assert_eq!(status.player_active.moves[0].max_pp, 10);
    assert_eq!(status.player_active.speed, 90);
    assert_eq!(status.ai_active.name, "Rival");
    assert_eq!(status.player_team.len(), 2);
    assert!(status.player_team[0].active);
    assert!(!status.player_team[1].active);
    assert_eq!(status.player_team[1].hp, 100);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["phase"], "AwaitingAction");
    assert_eq!(json["player_active"]["types"][0], "normal");
    assert_eq!(json["ai_team"][0]["name"], "Rival");
    assert_eq!(json["player_active"]["id"], 1);
    assert_eq!(status.player_active.moves[0].id, battle.player_team().active().moves()[0].id());
}

#[test]
fn starting_with_a_beaten_team_is_refused() {
    let beaten = team("Player", vec![normal("Down", 50).with_current_hp(0)]);
    assert!(Battle::new(beaten, team("AI", vec![normal("Rival", 50)]), 1).is_err());
}

#[test]
fn seeded_battles_replay_identically() {
    let build = || {
        Battle::new(
            team("Player", vec![normal("Lead", 70), normal("Bench", 60)]),
            team("AI", vec![normal("Rival", 65), normal("Reserve", 55)]),
            99,
        )
        .unwrap()
    };
    let mut a = build();
    let mut b = build();
    for _ in 0..3 {
        assert_eq!(
            a.process_turn(Command::Move { index: 0 }),
            b.process_turn(Command::Move { index: 0 })
        );
    }
    assert_eq!(a.log(), b.log());
}
