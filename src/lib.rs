//! Deterministic grid Pac-Man engine for reinforcement-learning agents.
//!
//! ```text
//!   config ──▶ sim::level (parse once) ──▶ sim::env::Environment
//!                                             │ step(Direction)
//!                                             ▼
//!   domain::{rules, physics, ai} ◀── sim::step ──▶ sim::snapshot::State
//!                                                     │
//!                                                     ▼
//!                                               ui::renderer
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;
pub mod ui;

pub use config::{Config, GameConfig};
pub use domain::ai::{GhostPolicy, PolicyKind, WorldView};
pub use domain::entity::{Direction, GhostMode, Position};
pub use error::{ConfigError, RenderError, StepError};
pub use sim::env::{make, make_with_render, Environment};
pub use sim::event::GameEvent;
pub use sim::lifecycle::Outcome;
pub use sim::snapshot::State;
pub use ui::renderer::{RenderMode, TextRenderer};
