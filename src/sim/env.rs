/// The agent-facing environment.
///
/// ```text
///   make(config) ──▶ parse_map (once) ──▶ Arc<ParsedMap>
///                                            │
///            reset() / reset_with_seed() ◀───┤  rebuilds WorldState, no reparse
///                                            │
///            step(action) ──▶ step::step ──▶ State
/// ```
///
/// Single writer: every mutation goes through `&mut self`. The parsed map
/// is `Send + Sync` and can back any number of environments.

use std::io::Write;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::ai::GhostPolicy;
use crate::domain::entity::Direction;
use crate::domain::rules::Grid;
use crate::error::{ConfigError, RenderError, StepError};
use crate::ui::renderer::{self, RenderMode};
use super::event::GameEvent;
use super::level::{parse_map, ParsedMap};
use super::lifecycle::Outcome;
use super::snapshot::State;
use super::step;
use super::world::WorldState;

/// Build an environment from `config`. The map is parsed and validated here.
pub fn make(config: Config) -> Result<Environment, ConfigError> {
    make_with_render(config, RenderMode::default())
}

/// Same as `make`; `render_mode` only affects `Environment::render`.
pub fn make_with_render(config: Config, render_mode: RenderMode) -> Result<Environment, ConfigError> {
    let policy = config.ghost_policy.build();
    let mut env = Environment::with_policy(config, policy)?;
    env.render_mode = render_mode;
    Ok(env)
}

pub struct Environment {
    world: WorldState,
    render_mode: RenderMode,
    last_events: Vec<GameEvent>,
}

impl Environment {
    /// Build with a caller-supplied ghost policy instead of `config.ghost_policy`.
    pub fn with_policy(config: Config, policy: Box<dyn GhostPolicy>) -> Result<Self, ConfigError> {
        let map = parse_map(&config)?;
        tracing::debug!(
            rows = config.rows,
            cols = config.cols,
            ghosts = map.ghost_spawns.len(),
            pellets = map.pellets.remaining(),
            "environment built"
        );
        Ok(Self::from_parsed(Arc::new(config), Arc::new(map), policy))
    }

    /// Build on an already parsed map. `map` must come from `parse_map(&config)`.
    pub fn from_parsed(config: Arc<Config>, map: Arc<ParsedMap>, policy: Box<dyn GhostPolicy>) -> Self {
        Environment {
            world: WorldState::new(config, map, policy),
            render_mode: RenderMode::default(),
            last_events: Vec::new(),
        }
    }

    // ── Stepping ──

    /// Advance one tick. Fails with `StaleEnvironment` once the episode is
    /// over; nothing changes in that case.
    pub fn step(&mut self, action: Direction) -> Result<State, StepError> {
        self.last_events = step::step(&mut self.world, action)?;
        Ok(self.state())
    }

    /// `step` with an action ordinal: 0 = Up, 1 = Down, 2 = Left, 3 = Right.
    pub fn step_ordinal(&mut self, action: u8) -> Result<State, StepError> {
        let dir = Direction::try_from(action)?;
        self.step(dir)
    }

    /// New episode from the cached map, RNG reseeded from `Config::seed`.
    pub fn reset(&mut self) -> State {
        let seed = self.world.config.seed;
        self.reset_with_seed(seed)
    }

    pub fn reset_with_seed(&mut self, seed: u64) -> State {
        self.world.reset(seed);
        self.last_events.clear();
        self.state()
    }

    // ── Queries ──

    pub fn state(&self) -> State {
        State::capture(&self.world)
    }

    pub fn grid(&self) -> &Grid {
        self.world.grid()
    }

    /// Shared handle to the parsed map, for building sibling environments.
    pub fn parsed_map(&self) -> Arc<ParsedMap> {
        Arc::clone(&self.world.map)
    }

    pub fn config(&self) -> &Config {
        &self.world.config
    }

    /// Events of the last successful step. Empty after a reset.
    pub fn events(&self) -> &[GameEvent] {
        &self.last_events
    }

    pub fn outcome(&self) -> Outcome {
        self.world.outcome
    }

    pub fn is_done(&self) -> bool {
        self.world.outcome.is_terminal()
    }

    /// Seed the current episode started with.
    pub fn seed(&self) -> u64 {
        self.world.seed
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Write the current frame in this environment's render mode.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<(), RenderError> {
        match self.render_mode {
            RenderMode::Text => {
                renderer::write_frame(out, &self.state(), self.grid())?;
                Ok(())
            }
            mode @ RenderMode::Graphical => Err(RenderError::Unsupported(mode)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Position;

    fn small() -> Config {
        Config::from_map(&[
            "#######",
            "#P...0#",
            "#######",
        ])
    }

    #[test]
    fn make_reports_config_errors() {
        let bad = Config::from_map(&["###", "#.#", "###"]);
        assert_eq!(make(bad).err(), Some(ConfigError::MissingPacman));
    }

    #[test]
    fn step_ordinal_rejects_out_of_range() {
        let mut env = make(small()).unwrap();
        assert_eq!(env.step_ordinal(4).unwrap_err(), StepError::InvalidAction(4));
        assert_eq!(env.step_ordinal(255).unwrap_err(), StepError::InvalidAction(255));
        assert_eq!(env.state().steps_taken, 0);
        let s = env.step_ordinal(3).unwrap();
        assert_eq!(s.pacman_location, Position::new(2, 1));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut env = make(small()).unwrap();
        let initial = env.state();
        env.step(Direction::Right).unwrap();
        assert!(!env.events().is_empty());
        assert_ne!(env.state(), initial);
        let s = env.reset();
        assert_eq!(s, initial);
        assert!(env.events().is_empty());
    }

    #[test]
    fn reset_with_seed_records_seed() {
        let mut env = make(small()).unwrap();
        env.reset_with_seed(42);
        assert_eq!(env.seed(), 42);
        env.reset();
        assert_eq!(env.seed(), env.config().seed);
    }

    #[test]
    fn render_mode_never_changes_simulation() {
        let mut a = make(small()).unwrap();
        let mut b = make_with_render(small(), RenderMode::Graphical).unwrap();
        for d in [Direction::Right, Direction::Right, Direction::Up, Direction::Right] {
            assert_eq!(a.step(d), b.step(d));
        }
    }

    #[test]
    fn graphical_render_is_unsupported() {
        let env = make_with_render(small(), RenderMode::Graphical).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            env.render(&mut out),
            Err(RenderError::Unsupported(RenderMode::Graphical))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn text_render_writes_board() {
        let env = make(small()).unwrap();
        let mut out = Vec::new();
        env.render(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("Lives: 3  Step: 0  Score: 0"));
        assert!(text.contains('P'));
    }

    #[test]
    fn environment_is_send() {
        fn assert_send<T: Send>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send::<Environment>();
        assert_send_sync::<ParsedMap>();
    }
}
