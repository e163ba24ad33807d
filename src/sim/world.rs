/// WorldState: the complete mutable state of one episode.
///
/// ## Layers
///
///   - `map`: the parsed board (`Grid`, spawns, initial items). **Never
///     mutated**; shared by `Arc` with every episode and environment built
///     from the same config.
///   - `pellets`: remaining items, cloned from `map.pellets` on reset and
///     shrinking as Pac-Man eats.
///
/// Entities, counters, outcome and the ghost RNG are owned here and only
/// changed through `step::step` and `WorldState::reset`.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::domain::ai::GhostPolicy;
use crate::domain::entity::{Ghost, Pacman};
use crate::domain::physics::PelletMap;
use crate::domain::rules::Grid;
use super::level::ParsedMap;
use super::lifecycle::Outcome;

pub struct WorldState {
    // ── Static ──
    pub config: Arc<Config>,
    pub map: Arc<ParsedMap>,

    // ── Items ──
    pub pellets: PelletMap,

    // ── Entities ──
    pub pacman: Pacman,
    /// Ascending id order. Ghosts move in this order every tick.
    pub ghosts: Vec<Ghost>,

    // ── Episode tracking ──
    pub score: u32,
    pub steps_taken: u32,
    pub outcome: Outcome,

    // ── Ghost control ──
    pub policy: Box<dyn GhostPolicy>,
    pub rng: StdRng,
    pub seed: u64,
}

impl WorldState {
    pub fn new(config: Arc<Config>, map: Arc<ParsedMap>, policy: Box<dyn GhostPolicy>) -> Self {
        let seed = config.seed;
        let mut world = WorldState {
            pellets: map.pellets.clone(),
            pacman: Pacman::new(map.pacman_spawn, config.pacman_lives),
            ghosts: Vec::with_capacity(map.ghost_spawns.len()),
            score: 0,
            steps_taken: 0,
            outcome: Outcome::Running,
            policy,
            rng: StdRng::seed_from_u64(seed),
            seed,
            config,
            map,
        };
        world.reset(seed);
        world
    }

    /// Start a fresh episode from the cached map.
    pub fn reset(&mut self, seed: u64) {
        self.pellets = self.map.pellets.clone();
        self.pacman = Pacman::new(self.map.pacman_spawn, self.config.pacman_lives);
        self.ghosts = self.map.ghost_spawns
            .iter()
            .enumerate()
            .map(|(order, &(id, spawn))| Ghost::new(id, spawn, self.config.release_delay(order)))
            .collect();
        self.settle_den_flags();
        self.score = 0;
        self.steps_taken = 0;
        self.outcome = Outcome::Running;
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.policy.reset();
        tracing::debug!(seed, ghosts = self.ghosts.len(), pellets = self.pellets.remaining(), "episode reset");
    }

    /// Death reset: everyone back to spawn. Items, score and counters stay.
    pub fn respawn_entities(&mut self) {
        self.pacman.respawn();
        for g in &mut self.ghosts {
            g.respawn();
        }
        self.settle_den_flags();
    }

    /// A released ghost that already stands outside the den is not "leaving".
    pub fn settle_den_flags(&mut self) {
        let grid = &self.map.grid;
        for g in &mut self.ghosts {
            if g.leaving_den && !grid.is_den(g.position) && !grid.cell(g.position).is_door() {
                g.leaving_den = false;
            }
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.map.grid
    }
}
