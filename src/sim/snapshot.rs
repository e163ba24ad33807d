/// Immutable per-tick snapshot handed to the agent.
///
/// Built fresh from `WorldState` after every step and reset. Owns all of
/// its data, so holding a `State` never borrows the environment.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{GhostMode, Position};
use crate::domain::physics::PelletMap;
use super::lifecycle::Outcome;
use super::world::WorldState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub pacman_location: Position,
    /// Ascending ghost id.
    pub ghost_locations: Vec<Position>,
    /// Parallel to `ghost_locations`.
    pub ghost_ids: Vec<u8>,
    pub ghost_modes: Vec<GhostMode>,
    pub lives_remaining: u32,
    pub score: u32,
    pub steps_taken: u32,
    pub completed: bool,
    pub won: bool,
    pub outcome: Outcome,
    pub pellets: PelletMap,
    pub pellets_remaining: usize,
}

impl State {
    pub fn capture(world: &WorldState) -> Self {
        State {
            pacman_location: world.pacman.position,
            ghost_locations: world.ghosts.iter().map(|g| g.position).collect(),
            ghost_ids: world.ghosts.iter().map(|g| g.id).collect(),
            ghost_modes: world.ghosts.iter().map(|g| g.mode).collect(),
            lives_remaining: world.pacman.lives_remaining,
            score: world.score,
            steps_taken: world.steps_taken,
            completed: world.outcome.is_terminal(),
            won: world.outcome.is_won(),
            outcome: world.outcome,
            pellets: world.pellets.clone(),
            pellets_remaining: world.pellets.remaining(),
        }
    }

    /// Ghost ids currently frightened, in id order.
    pub fn frightened_ghosts(&self) -> impl Iterator<Item = u8> + '_ {
        self.ghost_ids
            .iter()
            .zip(&self.ghost_modes)
            .filter(|(_, m)| **m == GhostMode::Frightened)
            .map(|(&id, _)| id)
    }
}
