/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Pac-Man movement
///   2. Item consumption (pellet / power pellet, frightened arming)
///   3. Ghost movement, one ghost at a time in ascending id order
///      (mode timers → policy → move)
///   4. Collision (any ghost on Pac-Man's cell)
///   5. Lives, lifecycle transition, death reset
///
/// Movement is `rules::attempt_move` for everyone; only the `Mover`
/// differs. A rejected move is a no-op, never an error.

use crate::domain::ai::WorldView;
use crate::domain::entity::Direction;
use crate::domain::physics;
use crate::domain::rules::{self, Mover};
use crate::domain::tile::Item;
use crate::error::StepError;
use super::event::GameEvent;
use super::lifecycle::{self, Outcome, TickInputs};
use super::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

/// Advance one tick. A terminal world is left untouched.
pub fn step(world: &mut WorldState, action: Direction) -> Result<Vec<GameEvent>, StepError> {
    if world.outcome.is_terminal() {
        return Err(StepError::StaleEnvironment);
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.steps_taken += 1;

    resolve_pacman_movement(world, action);
    resolve_consumption(world, &mut events);
    resolve_ghost_movement(world, &mut events);
    let caught = resolve_collision(world, &mut events);
    resolve_lifecycle(world, caught, &mut events);

    tracing::trace!(
        step = world.steps_taken,
        ?action,
        x = world.pacman.position.x,
        y = world.pacman.position.y,
        score = world.score,
        "tick"
    );

    Ok(events)
}

// ══════════════════════════════════════════════════════════════
// Pac-Man
// ══════════════════════════════════════════════════════════════

fn resolve_pacman_movement(world: &mut WorldState, action: Direction) {
    let here = world.pacman.position;
    let next = rules::attempt_move(here, action, &world.map.grid, Mover::Pacman);
    if next != here {
        world.pacman.position = next;
        world.pacman.heading = action;
    }
}

fn resolve_consumption(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let p = world.pacman.position;
    let taken = world.pellets.take(p);
    match taken {
        Some(Item::Pellet) => {
            world.score = world.score.saturating_add(world.config.pellet_points);
            events.push(GameEvent::PelletEaten { x: p.x, y: p.y });
        }
        Some(Item::PowerPellet) => {
            world.score = world.score.saturating_add(world.config.power_pellet_points);
            events.push(GameEvent::PowerPelletEaten { x: p.x, y: p.y });
            let ticks = world.config.frightened_ticks;
            if ticks > 0 {
                for g in &mut world.ghosts {
                    g.frighten(ticks);
                }
                events.push(GameEvent::GhostsFrightened { ticks });
            }
        }
        None => {}
    }
    if taken.is_some() && world.pellets.is_empty() {
        events.push(GameEvent::BoardCleared);
    }
}

// ══════════════════════════════════════════════════════════════
// Ghosts
// ══════════════════════════════════════════════════════════════

fn resolve_ghost_movement(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let chase = world.config.chase_ticks;
    let scatter = world.config.scatter_ticks;

    for i in 0..world.ghosts.len() {
        let was_den = world.ghosts[i].in_den();
        world.ghosts[i].tick_mode(chase, scatter);
        if world.ghosts[i].in_den() { continue; }
        if was_den {
            events.push(GameEvent::GhostReleased { id: world.ghosts[i].id });
        }

        // Frightened ghosts move on even ticks only.
        if world.ghosts[i].is_frightened() && world.ghosts[i].frightened_remaining % 2 == 1 {
            continue;
        }

        let dir = {
            let view = WorldView {
                grid: &world.map.grid,
                pacman: &world.pacman,
                ghosts: &world.ghosts,
                den_exit: world.map.den_exit,
            };
            world.policy.next_direction(&world.ghosts[i], &view, &mut world.rng)
        };

        let grid = &world.map.grid;
        let g = &mut world.ghosts[i];
        let next = rules::attempt_move(g.position, dir, grid, Mover::Ghost { through_door: g.leaving_den });
        if next != g.position {
            g.position = next;
            g.heading = dir;
        }
        if g.leaving_den && !grid.is_den(g.position) && !grid.cell(g.position).is_door() {
            g.leaving_den = false;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Collision / lifecycle
// ══════════════════════════════════════════════════════════════

/// Contact costs a life whatever the ghost's mode; eating frightened
/// ghosts is not a rule of this engine.
fn resolve_collision(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    let at = world.pacman.position;
    match physics::colliding_ghosts(&world.ghosts, at).next() {
        Some(ghost) => {
            events.push(GameEvent::PacmanCaught { ghost, at });
            true
        }
        None => false,
    }
}

fn resolve_lifecycle(world: &mut WorldState, caught: bool, events: &mut Vec<GameEvent>) {
    let pellets_exhausted = world.pellets.is_empty();
    // Clearing the board on this tick wins outright; the contact is moot.
    let life_lost = caught && !pellets_exhausted;
    if life_lost {
        world.pacman.lives_remaining = world.pacman.lives_remaining.saturating_sub(1);
        events.push(GameEvent::LifeLost { lives_remaining: world.pacman.lives_remaining });
        tracing::debug!(lives = world.pacman.lives_remaining, step = world.steps_taken, "life lost");
    }

    let inputs = TickInputs {
        life_lost,
        lives_remaining: world.pacman.lives_remaining,
        pellets_exhausted,
        step_limit_reached: world.steps_taken >= world.config.max_episode_steps,
    };
    world.outcome = lifecycle::transition(world.outcome, inputs);

    match world.outcome {
        Outcome::Running => {}
        Outcome::Won => events.push(GameEvent::EpisodeWon),
        Outcome::Lost => events.push(GameEvent::EpisodeLost),
        Outcome::Truncated => events.push(GameEvent::EpisodeTruncated),
    }
    if world.outcome.is_terminal() {
        tracing::debug!(outcome = ?world.outcome, score = world.score, steps = world.steps_taken, "episode over");
    }

    if life_lost && world.pacman.lives_remaining > 0 {
        world.respawn_entities();
    }
}
