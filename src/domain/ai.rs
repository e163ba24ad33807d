/// Ghost AI: one direction per ghost per tick.
///
/// Two policies behind `GhostPolicy`:
///   1. **Random**: uniform among legal moves, no reversal unless forced.
///   2. **Pursuit**: target-tile steering with per-ghost chase targets
///      and a chase/scatter cycle.
///
/// Shared rules, whatever the policy:
///   - Frightened ghosts wander at random.
///   - A ghost leaving the den steers for the door exit first.
///
/// Randomness comes only from the `RngCore` passed in by the caller, so an
/// episode replays exactly from its seed.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::entity::{Direction, Ghost, GhostMode, Pacman, Position};
use super::rules::{self, Grid, Mover};

/// Cells ahead of Pac-Man that ghost 1 aims for.
const AMBUSH_LOOKAHEAD: i64 = 4;
/// Ghost 3 gives up the chase inside this distance.
const SHY_DISTANCE: u32 = 8;

/// Read-only view of the world handed to a policy.
pub struct WorldView<'a> {
    pub grid: &'a Grid,
    pub pacman: &'a Pacman,
    pub ghosts: &'a [Ghost],
    /// Floor cell just outside the den door, if the map has a den.
    pub den_exit: Option<Position>,
}

pub trait GhostPolicy: Send {
    fn next_direction(&mut self, ghost: &Ghost, world: &WorldView, rng: &mut dyn RngCore) -> Direction;

    /// Called at the start of every episode. Policies that keep state
    /// between ticks clear it here.
    fn reset(&mut self) {}
}

/// Built-in policy selector (config-facing).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Random,
    Pursuit,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn GhostPolicy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy),
            PolicyKind::Pursuit => Box::new(PursuitPolicy),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl GhostPolicy for RandomPolicy {
    fn next_direction(&mut self, ghost: &Ghost, world: &WorldView, rng: &mut dyn RngCore) -> Direction {
        if let Some(dir) = leave_den(ghost, world) {
            return dir;
        }
        wander(ghost, world.grid, rng)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PursuitPolicy;

impl GhostPolicy for PursuitPolicy {
    fn next_direction(&mut self, ghost: &Ghost, world: &WorldView, rng: &mut dyn RngCore) -> Direction {
        if let Some(dir) = leave_den(ghost, world) {
            return dir;
        }
        match ghost.mode {
            GhostMode::Frightened => wander(ghost, world.grid, rng),
            GhostMode::Scatter => steer(ghost, world.grid, corner(ghost.id, world.grid)),
            GhostMode::Chase | GhostMode::Den => steer(ghost, world.grid, chase_target(ghost, world)),
        }
    }
}

fn mover(ghost: &Ghost) -> Mover {
    Mover::Ghost { through_door: ghost.leaving_den }
}

/// Legal moves minus the reversal, unless reversing is the only way out.
fn candidates(ghost: &Ghost, grid: &Grid) -> rules::DirSet {
    let mut set = rules::legal_moves(grid, ghost.position, mover(ghost));
    if set.len() > 1 {
        set.remove(ghost.heading.opposite());
    }
    set
}

/// Uniform choice among candidate moves. Keeps heading when boxed in.
pub fn wander(ghost: &Ghost, grid: &Grid, rng: &mut dyn RngCore) -> Direction {
    let set = candidates(ghost, grid);
    if set.is_empty() {
        return ghost.heading;
    }
    let k = rng.gen_range(0..set.len());
    set.iter().nth(k).unwrap_or(ghost.heading)
}

/// Candidate move closest (Manhattan) to `target`; ties go to `Direction::PRECEDENCE`.
pub fn steer(ghost: &Ghost, grid: &Grid, target: (i64, i64)) -> Direction {
    let set = candidates(ghost, grid);
    let mut best = ghost.heading;
    let mut best_dist = i64::MAX;
    for d in Direction::PRECEDENCE {
        if !set.contains(d) { continue; }
        let Some(next) = ghost.position.step(d) else { continue };
        let dist = (next.x as i64 - target.0).abs() + (next.y as i64 - target.1).abs();
        if dist < best_dist {
            best_dist = dist;
            best = d;
        }
    }
    best
}

/// Steering toward the door exit while in the den or on a door.
fn leave_den(ghost: &Ghost, world: &WorldView) -> Option<Direction> {
    if !ghost.leaving_den { return None; }
    let here = world.grid.cell(ghost.position);
    if !world.grid.is_den(ghost.position) && !here.is_door() { return None; }
    let exit = world.den_exit?;
    Some(steer(ghost, world.grid, (exit.x as i64, exit.y as i64)))
}

/// Per-ghost scatter corner, just outside the board.
pub fn corner(id: u8, grid: &Grid) -> (i64, i64) {
    let w = grid.width() as i64;
    let h = grid.height() as i64;
    match id % 4 {
        0 => (w - 2, -2),
        1 => (2, -2),
        2 => (w - 1, h + 1),
        _ => (1, h + 1),
    }
}

/// Chase target by personality (id mod 4).
pub fn chase_target(ghost: &Ghost, world: &WorldView) -> (i64, i64) {
    let pac = world.pacman.position;
    let (px, py) = (pac.x as i64, pac.y as i64);
    match ghost.id % 4 {
        0 => (px, py),
        1 => {
            let (dx, dy) = world.pacman.heading.delta();
            (px + dx as i64 * AMBUSH_LOOKAHEAD, py + dy as i64 * AMBUSH_LOOKAHEAD)
        }
        2 => {
            // Mirror the leader through Pac-Man.
            let leader = world.ghosts.iter().find(|g| g.id % 4 == 0 && g.id != ghost.id);
            match leader {
                Some(l) => (2 * px - l.position.x as i64, 2 * py - l.position.y as i64),
                None => (px, py),
            }
        }
        _ => {
            if ghost.position.manhattan(pac) < SHY_DISTANCE {
                corner(ghost.id, world.grid)
            } else {
                (px, py)
            }
        }
    }
}
