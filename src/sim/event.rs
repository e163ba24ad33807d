/// Events emitted during a simulation step.
/// Callers may use these for reward shaping or logging; the engine never reads them back.

use serde::{Deserialize, Serialize};

use crate::domain::entity::Position;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PelletEaten { x: usize, y: usize },
    PowerPelletEaten { x: usize, y: usize },
    GhostsFrightened { ticks: u32 },
    GhostReleased { id: u8 },
    PacmanCaught { ghost: u8, at: Position },
    LifeLost { lives_remaining: u32 },
    /// The last item was eaten this tick.
    BoardCleared,
    EpisodeWon,
    EpisodeLost,
    EpisodeTruncated,
}
