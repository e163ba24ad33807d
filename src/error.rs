/// Error taxonomy.
///
/// Only caller mistakes are errors. Gameplay outcomes (bumping a wall,
/// losing a life, winning, running out of steps) live in `State`.

use thiserror::Error;

use crate::ui::renderer::RenderMode;

/// Malformed `Config` or map. Always fatal at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("map is empty")]
    EmptyMap,

    #[error("map has {actual} rows, config expects {expected}")]
    RowCount { expected: usize, actual: usize },

    #[error("map row {row} has {actual} columns, config expects {expected}")]
    RowLength { row: usize, expected: usize, actual: usize },

    #[error("unrecognized map symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol { symbol: char, x: usize, y: usize },

    #[error("map has no Pac-Man spawn")]
    MissingPacman,

    #[error("map has more than one Pac-Man spawn (second at ({x}, {y}))")]
    DuplicatePacman { x: usize, y: usize },

    #[error("ghost {id} spawns more than once (second at ({x}, {y}))")]
    DuplicateGhost { id: u8, x: usize, y: usize },

    #[error("map has {found} ghost spawns, config expects {expected}")]
    TooFewGhosts { expected: usize, found: usize },

    #[error("map has no pellets or power pellets")]
    NoPellets,

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("config parse error: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e.to_string())
    }
}

/// Misuse of `Environment::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    /// Ordinal outside the four directions.
    #[error("invalid action ordinal {0}, expected 0..=3")]
    InvalidAction(u8),

    /// The episode is over; call `reset` first.
    #[error("episode is complete, call reset() before stepping again")]
    StaleEnvironment,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render mode {0:?} is not provided by this crate")]
    Unsupported(RenderMode),

    #[error("render output failed: {0}")]
    Io(#[from] std::io::Error),
}
