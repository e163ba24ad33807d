//! End-to-end scenarios through the public `Environment` API.

use std::sync::Arc;

use pacman_rl::domain::ai::RandomPolicy;
use pacman_rl::domain::entity::Ghost;
use pacman_rl::{
    make, Config, ConfigError, Direction, Environment, GameEvent, GhostPolicy, Outcome,
    PolicyKind, Position, StepError, WorldView,
};
use rand::RngCore;

struct Always(Direction);

impl GhostPolicy for Always {
    fn next_direction(&mut self, _: &Ghost, _: &WorldView, _: &mut dyn RngCore) -> Direction {
        self.0
    }
}

/// Turns clockwise through the ordinals, one step per call.
struct Cycle(usize);

impl GhostPolicy for Cycle {
    fn next_direction(&mut self, _: &Ghost, _: &WorldView, _: &mut dyn RngCore) -> Direction {
        self.0 += 1;
        Direction::ALL[self.0 % 4]
    }

    fn reset(&mut self) {
        self.0 = 0;
    }
}

fn config(rows: &[&str]) -> Config {
    Config::from_map(rows)
}

#[test]
fn single_pellet_next_to_spawn_wins_in_one_step() {
    let mut env = make(config(&[
        "#####",
        "#P. #",
        "#   #",
        "#   #",
        "#####",
    ])).unwrap();
    let s = env.step(Direction::Right).unwrap();
    assert!(s.completed);
    assert!(s.won);
    assert_eq!(s.outcome, Outcome::Won);
    assert_eq!(s.score, 10);
    assert_eq!(s.pellets_remaining, 0);
    assert_eq!(s.lives_remaining, 3);
    assert_eq!(s.steps_taken, 1);
}

#[test]
fn moving_into_wall_only_counts_the_step() {
    let mut env = make(config(&[
        "#####",
        "#P..#",
        "#####",
    ])).unwrap();
    let s = env.step(Direction::Up).unwrap();
    assert_eq!(s.pacman_location, Position::new(1, 1));
    assert_eq!(s.steps_taken, 1);
    assert_eq!(s.score, 0);
    assert!(!s.completed);
}

#[test]
fn one_step_budget_truncates() {
    let mut cfg = config(&[
        "#####",
        "#P..#",
        "#####",
    ]);
    cfg.max_episode_steps = 1;
    let mut env = make(cfg).unwrap();
    let s = env.step(Direction::Right).unwrap();
    assert!(s.completed);
    assert!(!s.won);
    assert_eq!(s.outcome, Outcome::Truncated);
    assert_eq!(s.lives_remaining, 3);
    assert_eq!(s.pellets_remaining, 1);
}

#[test]
fn life_loss_returns_everyone_to_spawn() {
    let cfg = config(&[
        "########",
        "#P. .0 #",
        "#1######",
        "########",
    ]);
    let mut env = Environment::with_policy(cfg, Box::new(Always(Direction::Left))).unwrap();
    let start = env.state();

    // ghost 0 meets Pac-Man on (3,1) at the second tick
    let mut caught = false;
    for _ in 0..2 {
        let s = env.step(Direction::Right).unwrap();
        if s.lives_remaining < start.lives_remaining {
            caught = true;
            assert_eq!(s.pacman_location, start.pacman_location);
            assert_eq!(s.ghost_locations, start.ghost_locations);
            assert_eq!(s.ghost_modes, start.ghost_modes);
            assert!(env.events().contains(&GameEvent::LifeLost { lives_remaining: 2 }));
            break;
        }
    }
    assert!(caught);
}

#[test]
fn completed_environment_is_stale() {
    let mut env = make(config(&[
        "####",
        "#P.#",
        "####",
    ])).unwrap();
    assert!(!env.is_done());
    env.step(Direction::Right).unwrap();
    assert!(env.is_done());
    let done = env.state();
    for d in Direction::ALL {
        assert_eq!(env.step(d), Err(StepError::StaleEnvironment));
    }
    assert_eq!(env.state(), done);

    let fresh = env.reset();
    assert!(!fresh.completed);
    assert_eq!(fresh.steps_taken, 0);
    assert_eq!(fresh.pellets_remaining, 1);
}

#[test]
fn invalid_ordinal_is_rejected() {
    let mut env = make(Config::default()).unwrap();
    assert_eq!(env.step_ordinal(7), Err(StepError::InvalidAction(7)));
    assert_eq!(env.state().steps_taken, 0);
}

#[test]
fn same_seed_and_actions_replay_identically() {
    for kind in [PolicyKind::Random, PolicyKind::Pursuit] {
        let cfg = Config { seed: 1234, ghost_policy: kind, ..Config::default() };
        let actions: Vec<u8> = (0..400u32).map(|i| ((i * 7 + i / 5) % 4) as u8).collect();

        let run = || {
            let mut env = make(cfg.clone()).unwrap();
            let mut frames = vec![serde_json::to_string(&env.state()).unwrap()];
            for &a in &actions {
                match env.step_ordinal(a) {
                    Ok(s) => frames.push(serde_json::to_string(&s).unwrap()),
                    Err(StepError::StaleEnvironment) => break,
                    Err(e) => panic!("unexpected {e}"),
                }
            }
            frames
        };
        assert_eq!(run(), run());
    }
}

#[test]
fn reset_replays_the_first_episode() {
    let mut env = make(Config { seed: 9, ..Config::default() }).unwrap();
    let first: Vec<_> = (0..60).map(|i| env.step_ordinal(i % 4)).collect();
    env.reset();
    let second: Vec<_> = (0..60).map(|i| env.step_ordinal(i % 4)).collect();
    assert_eq!(first, second);
}

#[test]
fn stateful_policy_restarts_with_episode() {
    let cfg = config(&[
        "#######",
        "#P...0#",
        "#.....#",
        "#.....#",
        "#######",
    ]);
    let mut env = Environment::with_policy(cfg, Box::new(Cycle(0))).unwrap();
    let actions = [3u8, 1, 2, 0, 3, 3, 1];
    let first: Vec<_> = actions.iter().map(|&a| env.step_ordinal(a)).collect();
    env.reset();
    let second: Vec<_> = actions.iter().map(|&a| env.step_ordinal(a)).collect();
    assert_eq!(first, second);
}

#[test]
fn environments_share_one_parsed_map() {
    let a = make(Config::default()).unwrap();
    let map = a.parsed_map();
    let mut b = Environment::from_parsed(Arc::new(a.config().clone()), Arc::clone(&map), Box::new(RandomPolicy));
    assert!(Arc::ptr_eq(&map, &b.parsed_map()));

    b.step(Direction::Left).unwrap();
    assert_eq!(a.state().steps_taken, 0);
    assert_eq!(b.state().steps_taken, 1);
}

#[test]
fn classic_board_fresh_state() {
    let env = make(Config::default()).unwrap();
    let s = env.state();
    assert_eq!(s.pacman_location, Position::new(9, 11));
    assert_eq!(s.ghost_ids, vec![0, 1, 2, 3]);
    assert_eq!(s.lives_remaining, 3);
    assert_eq!(env.grid().width(), 19);
    assert_eq!(env.grid().height(), 21);
}

#[test]
fn toml_config_builds_environment() {
    let cfg = Config::from_toml_str(r#"
        [board]
        max_episode_steps = 3
        pacman_lives = 1
        map = ['#####', '#P. #', '#####']
    "#).unwrap();
    let mut env = make(cfg).unwrap();
    let s = env.step(Direction::Right).unwrap();
    assert!(s.won);
}

#[test]
fn mismatched_dimensions_are_config_errors() {
    let mut cfg = config(&["#####", "#P. #", "#####"]);
    cfg.cols = 6;
    assert_eq!(
        make(cfg).err(),
        Some(ConfigError::RowLength { row: 0, expected: 6, actual: 5 })
    );
}
