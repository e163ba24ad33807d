/// Entities: Pac-Man and ghosts, plus the value types they move with.
/// Ghost mode machine is small: Den → Chase ⇄ Scatter, any → Frightened → Chase.

use serde::{Deserialize, Serialize};

use crate::error::StepError;

/// Grid coordinate. `x` is the column, `y` the row.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// One cell in `dir`, or `None` when that would leave the top/left edge.
    /// The right/bottom edges are checked by the grid.
    pub fn step(self, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        Some(Position { x, y })
    }

    pub fn manhattan(self, other: Position) -> u32 {
        (self.x.abs_diff(other.x) + self.y.abs_diff(other.y)) as u32
    }
}

/// Movement action. Ordinals are stable: Up=0, Down=1, Left=2, Right=3.
/// Serialised as the ordinal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in ordinal order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Tie-break order for target steering.
    pub const PRECEDENCE: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

impl From<Direction> for u8 {
    fn from(d: Direction) -> u8 {
        d.ordinal()
    }
}

impl TryFrom<u8> for Direction {
    type Error = StepError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(value as usize)
            .copied()
            .ok_or(StepError::InvalidAction(value))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GhostMode {
    /// Waiting in the den for its release delay.
    Den,
    Chase,
    Scatter,
    /// Armed by a power pellet. Slowed, flees at random.
    Frightened,
}

#[derive(Clone, Debug)]
pub struct Pacman {
    pub position: Position,
    pub heading: Direction,
    pub lives_remaining: u32,
    pub spawn: Position,
}

impl Pacman {
    pub fn new(spawn: Position, lives: u32) -> Self {
        Pacman {
            position: spawn,
            heading: Direction::Left,
            lives_remaining: lives,
            spawn,
        }
    }

    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.heading = Direction::Left;
    }
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub id: u8,
    pub position: Position,
    pub heading: Direction,
    pub mode: GhostMode,
    pub mode_ticks: u32,         // ticks spent in the current Chase/Scatter phase
    pub frightened_remaining: u32,
    pub release_remaining: u32,  // ticks left in the den
    pub leaving_den: bool,       // may cross den doors
    pub spawn: Position,
    release_delay: u32,
}

impl Ghost {
    pub fn new(id: u8, spawn: Position, release_delay: u32) -> Self {
        let mut g = Ghost {
            id,
            position: spawn,
            heading: Direction::Left,
            mode: GhostMode::Den,
            mode_ticks: 0,
            frightened_remaining: 0,
            release_remaining: 0,
            leaving_den: false,
            spawn,
            release_delay,
        };
        g.respawn();
        g
    }

    /// Back to spawn with the den timer restarted.
    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.heading = Direction::Left;
        self.mode_ticks = 0;
        self.frightened_remaining = 0;
        self.release_remaining = self.release_delay;
        if self.release_delay == 0 {
            self.mode = GhostMode::Chase;
            self.leaving_den = true;
        } else {
            self.mode = GhostMode::Den;
            self.leaving_den = false;
        }
    }

    pub fn is_frightened(&self) -> bool {
        self.mode == GhostMode::Frightened
    }

    pub fn in_den(&self) -> bool {
        self.mode == GhostMode::Den
    }

    /// Power pellet effect. Ghosts still waiting in the den are immune.
    /// Re-arming an already frightened ghost restarts its timer.
    pub fn frighten(&mut self, ticks: u32) {
        if ticks == 0 || self.in_den() { return; }
        if !self.is_frightened() {
            self.heading = self.heading.opposite();
        }
        self.mode = GhostMode::Frightened;
        self.frightened_remaining = ticks;
    }

    /// Advance mode timers by one tick.
    pub fn tick_mode(&mut self, chase_ticks: u32, scatter_ticks: u32) {
        match self.mode {
            GhostMode::Den => {
                self.release_remaining = self.release_remaining.saturating_sub(1);
                if self.release_remaining == 0 {
                    self.mode = GhostMode::Chase;
                    self.mode_ticks = 0;
                    self.leaving_den = true;
                }
            }
            GhostMode::Frightened => {
                self.frightened_remaining = self.frightened_remaining.saturating_sub(1);
                if self.frightened_remaining == 0 {
                    self.mode = GhostMode::Chase;
                    self.mode_ticks = 0;
                }
            }
            GhostMode::Chase => {
                self.mode_ticks += 1;
                if scatter_ticks > 0 && self.mode_ticks >= chase_ticks {
                    self.mode = GhostMode::Scatter;
                    self.mode_ticks = 0;
                    self.heading = self.heading.opposite();
                }
            }
            GhostMode::Scatter => {
                self.mode_ticks += 1;
                if self.mode_ticks >= scatter_ticks {
                    self.mode = GhostMode::Chase;
                    self.mode_ticks = 0;
                    self.heading = self.heading.opposite();
                }
            }
        }
    }
}
