/// Board vocabulary, split in two.
///
/// `Cell` is terrain and is fixed once the map is parsed. `Item` is what
/// Pac-Man can eat off a floor cell; items live in `physics::PelletMap`
/// and are the only part of the board that changes during an episode.

use serde::{Deserialize, Serialize};

/// Static terrain. Resolved once at load time, never mutated.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Floor,
    Wall,
    DenDoor, // ghosts only, and only while leaving the den
}

impl Cell {
    pub fn is_wall(self) -> bool {
        matches!(self, Cell::Wall)
    }

    pub fn is_door(self) -> bool {
        matches!(self, Cell::DenDoor)
    }

    /// Passable for Pac-Man.
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Floor)
    }
}

/// A consumable sitting on a floor cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Item {
    Pellet,
    PowerPellet,
}

impl Item {
    pub fn is_power(self) -> bool {
        matches!(self, Item::PowerPellet)
    }
}
