/// Environment configuration and the external TOML loader.
///
/// `Config` is what the engine consumes: built once by the caller, never
/// mutated afterwards. `GameConfig::load()` is for the demo driver: it
/// reads `config.toml` from the executable's directory (or CWD) and falls
/// back to the built-in classic board if the file is missing or incomplete.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::ai::PolicyKind;
use crate::error::ConfigError;
use crate::ui::renderer::RenderMode;

/// Classic arcade-style board, 21 rows × 19 columns.
pub const CLASSIC_MAP: [&str; 21] = [
    "###################",
    "#........#........#",
    "#@##.###.#.###.##@#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#...#...#....#",
    "####.###.#.###.####",
    "####.#...0...#.####",
    "####.#.##G##.#.####",
    "#......#123#......#",
    "####.#.#####.#.####",
    "####.#...P...#.####",
    "####.#.#####.#.####",
    "#........#........#",
    "#.##.###.#.###.##.#",
    "#@.#...........#.@#",
    "##.#.#.#####.#.#.##",
    "#....#...#...#....#",
    "#.######.#.######.#",
    "#.................#",
    "###################",
];

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub max_episode_steps: u32,
    pub pacman_lives: u32,
    pub map: Vec<String>,

    /// Ghosts the map must provide. `None` = every spawn found.
    pub ghost_count: Option<usize>,
    pub pellet_points: u32,
    pub power_pellet_points: u32,
    /// Frightened duration armed by a power pellet. 0 = score bonus only.
    pub frightened_ticks: u32,
    pub seed: u64,
    pub ghost_policy: PolicyKind,
    /// Den release delay per ghost, in id order. The last value repeats.
    pub ghost_release_ticks: Vec<u32>,
    pub chase_ticks: u32,
    pub scatter_ticks: u32,
}

impl Config {
    /// Config for `map` with dimensions taken from the map itself.
    pub fn from_map<S: AsRef<str>>(map: &[S]) -> Self {
        let map: Vec<String> = map.iter().map(|r| r.as_ref().to_string()).collect();
        Config {
            rows: map.len(),
            cols: map.first().map_or(0, |r| r.chars().count()),
            map,
            ..Config::default()
        }
    }

    /// Release delay for the ghost at `order` (0-based, id order).
    pub fn release_delay(&self, order: usize) -> u32 {
        self.ghost_release_ticks
            .get(order)
            .or(self.ghost_release_ticks.last())
            .copied()
            .unwrap_or(0)
    }

    /// Parse a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: TomlConfig = toml::from_str(text)?;
        Ok(cfg.into_config())
    }
}

impl Default for Config {
    fn default() -> Self {
        TomlConfig::default().into_config()
    }
}

/// Demo driver settings. Never read by the engine.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub tick_rate_ms: u64,
    pub episodes: u32,
    pub action_seed: u64,
    pub render: RenderMode,
}

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub env: Config,
    pub driver: DriverConfig,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    scoring: TomlScoring,
    #[serde(default)]
    ghosts: TomlGhosts,
    #[serde(default)]
    driver: TomlDriver,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default)]
    rows: Option<usize>,
    #[serde(default)]
    cols: Option<usize>,
    #[serde(default = "default_max_steps")]
    max_episode_steps: u32,
    #[serde(default = "default_lives")]
    pacman_lives: u32,
    #[serde(default = "default_map")]
    map: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlScoring {
    #[serde(default = "default_pellet_points")]
    pellet_points: u32,
    #[serde(default = "default_power_points")]
    power_pellet_points: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGhosts {
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    policy: PolicyKind,
    #[serde(default)]
    seed: u64,
    #[serde(default = "default_frightened")]
    frightened_ticks: u32,
    #[serde(default = "default_release")]
    release_ticks: Vec<u32>,
    #[serde(default = "default_chase")]
    chase_ticks: u32,
    #[serde(default = "default_scatter")]
    scatter_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlDriver {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_episodes")]
    episodes: u32,
    #[serde(default)]
    action_seed: u64,
    #[serde(default)]
    render: RenderMode,
}

// ── Defaults ──

fn default_max_steps() -> u32 { 1000 }
fn default_lives() -> u32 { 3 }
fn default_map() -> Vec<String> { CLASSIC_MAP.iter().map(|r| r.to_string()).collect() }
fn default_pellet_points() -> u32 { 10 }
fn default_power_points() -> u32 { 50 }
fn default_frightened() -> u32 { 12 }
fn default_release() -> Vec<u32> { vec![0, 20, 40, 60] }
fn default_chase() -> u32 { 30 }
fn default_scatter() -> u32 { 10 }
fn default_tick_rate() -> u64 { 50 }
fn default_episodes() -> u32 { 1 }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            rows: None,
            cols: None,
            max_episode_steps: default_max_steps(),
            pacman_lives: default_lives(),
            map: default_map(),
        }
    }
}

impl Default for TomlScoring {
    fn default() -> Self {
        TomlScoring {
            pellet_points: default_pellet_points(),
            power_pellet_points: default_power_points(),
        }
    }
}

impl Default for TomlGhosts {
    fn default() -> Self {
        TomlGhosts {
            count: None,
            policy: PolicyKind::default(),
            seed: 0,
            frightened_ticks: default_frightened(),
            release_ticks: default_release(),
            chase_ticks: default_chase(),
            scatter_ticks: default_scatter(),
        }
    }
}

impl Default for TomlDriver {
    fn default() -> Self {
        TomlDriver {
            tick_rate_ms: default_tick_rate(),
            episodes: default_episodes(),
            action_seed: 0,
            render: RenderMode::default(),
        }
    }
}

impl TomlConfig {
    fn into_config(self) -> Config {
        // rows/cols default to the map's own size; explicit values are
        // checked against the map by the loader.
        let rows = self.board.rows.unwrap_or(self.board.map.len());
        let cols = self.board.cols
            .unwrap_or_else(|| self.board.map.first().map_or(0, |r| r.chars().count()));
        Config {
            rows,
            cols,
            max_episode_steps: self.board.max_episode_steps,
            pacman_lives: self.board.pacman_lives,
            map: self.board.map,
            ghost_count: self.ghosts.count,
            pellet_points: self.scoring.pellet_points,
            power_pellet_points: self.scoring.power_pellet_points,
            frightened_ticks: self.ghosts.frightened_ticks,
            seed: self.ghosts.seed,
            ghost_policy: self.ghosts.policy,
            ghost_release_ticks: self.ghosts.release_ticks,
            chase_ticks: self.ghosts.chase_ticks,
            scatter_ticks: self.ghosts.scatter_ticks,
        }
    }

    fn into_game_config(self) -> GameConfig {
        let driver = DriverConfig {
            tick_rate_ms: self.driver.tick_rate_ms,
            episodes: self.driver.episodes,
            action_seed: self.driver.action_seed,
            render: self.driver.render,
        };
        GameConfig { env: self.into_config(), driver }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        load_toml(&candidate_dirs()).into_game_config()
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: TomlConfig = toml::from_str(text)?;
        Ok(cfg.into_game_config())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into_game_config()
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() { continue; }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "loaded config");
                    return cfg;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "config.toml parse error: {e}; using defaults");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                tracing::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}
