/// Map loader.
///
/// Parses `Config::map` once into a typed, read-only `ParsedMap`. Episodes
/// share the result behind an `Arc`; `reset` never reparses.
///
/// ## Tile legend:
///   '#' = Wall                   '.' = Pellet
///   '@' = Power pellet           'P' = Pac-Man spawn
///   '0'..'9' = Ghost spawn (id)  'G' = Den door
///   ' ' / '-' = Empty floor
///
/// ## Den
///   The den is the floor region around an enclosed ghost spawn, bounded by
///   walls and doors. A spawn whose region reaches Pac-Man is not enclosed
///   and contributes nothing.

use std::collections::VecDeque;

use crate::config::Config;
use crate::domain::entity::{Direction, Position};
use crate::domain::physics::PelletMap;
use crate::domain::rules::Grid;
use crate::domain::tile::{Cell, Item};
use crate::error::ConfigError;

/// Symbol as read from the map.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Symbol {
    Wall,
    Empty,
    Pellet,
    PowerPellet,
    PacmanSpawn,
    GhostSpawn(u8),
    Door,
}

impl Symbol {
    fn from_char(ch: char) -> Option<Symbol> {
        Some(match ch {
            '#' => Symbol::Wall,
            ' ' | '-' => Symbol::Empty,
            '.' => Symbol::Pellet,
            '@' => Symbol::PowerPellet,
            'P' => Symbol::PacmanSpawn,
            'G' => Symbol::Door,
            '0'..='9' => Symbol::GhostSpawn(ch as u8 - b'0'),
            _ => return None,
        })
    }

    fn cell(self) -> Cell {
        match self {
            Symbol::Wall => Cell::Wall,
            Symbol::Door => Cell::DenDoor,
            _ => Cell::Floor,
        }
    }
}

/// Immutable result of parsing a map.
#[derive(Clone, Debug)]
pub struct ParsedMap {
    pub grid: Grid,
    /// Initial items. Cloned into each episode.
    pub pellets: PelletMap,
    pub pacman_spawn: Position,
    /// `(id, spawn)` in ascending id order.
    pub ghost_spawns: Vec<(u8, Position)>,
    /// Floor cell just outside the first den door that has one.
    pub den_exit: Option<Position>,
}

/// Parse and validate `config`. Pure.
pub fn parse_map(config: &Config) -> Result<ParsedMap, ConfigError> {
    if config.max_episode_steps == 0 {
        return Err(ConfigError::NonPositive { field: "max_episode_steps" });
    }
    if config.pacman_lives == 0 {
        return Err(ConfigError::NonPositive { field: "pacman_lives" });
    }
    if config.map.is_empty() || config.rows == 0 || config.cols == 0 {
        return Err(ConfigError::EmptyMap);
    }
    if config.map.len() != config.rows {
        return Err(ConfigError::RowCount { expected: config.rows, actual: config.map.len() });
    }

    let (width, height) = (config.cols, config.rows);
    let mut cells = vec![Cell::Floor; width * height];
    let mut pellets = PelletMap::new(width, height);
    let mut pacman: Option<Position> = None;
    let mut ghosts: Vec<(u8, Position)> = Vec::new();

    for (y, row) in config.map.iter().enumerate() {
        let len = row.chars().count();
        if len != width {
            return Err(ConfigError::RowLength { row: y, expected: width, actual: len });
        }
        for (x, ch) in row.chars().enumerate() {
            let sym = Symbol::from_char(ch)
                .ok_or(ConfigError::UnknownSymbol { symbol: ch, x, y })?;
            let p = Position::new(x, y);
            cells[y * width + x] = sym.cell();
            match sym {
                Symbol::Pellet => pellets.place(p, Item::Pellet),
                Symbol::PowerPellet => pellets.place(p, Item::PowerPellet),
                Symbol::PacmanSpawn => {
                    if pacman.is_some() {
                        return Err(ConfigError::DuplicatePacman { x, y });
                    }
                    pacman = Some(p);
                }
                Symbol::GhostSpawn(id) => {
                    if ghosts.iter().any(|&(g, _)| g == id) {
                        return Err(ConfigError::DuplicateGhost { id, x, y });
                    }
                    ghosts.push((id, p));
                }
                Symbol::Wall | Symbol::Empty | Symbol::Door => {}
            }
        }
    }

    let pacman_spawn = pacman.ok_or(ConfigError::MissingPacman)?;

    ghosts.sort_by_key(|&(id, _)| id);
    if let Some(expected) = config.ghost_count {
        if ghosts.len() < expected {
            return Err(ConfigError::TooFewGhosts { expected, found: ghosts.len() });
        }
        ghosts.truncate(expected);
    }
    if pellets.is_empty() {
        return Err(ConfigError::NoPellets);
    }

    let den = find_den(&cells, width, height, &ghosts, pacman_spawn);
    let grid = Grid::new(width, height, cells, den);
    let den_exit = find_den_exit(&grid);

    Ok(ParsedMap { grid, pellets, pacman_spawn, ghost_spawns: ghosts, den_exit })
}

/// Flood-fill floor from each ghost spawn, stopping at walls and doors.
/// Regions that reach Pac-Man's spawn are open board, not den.
fn find_den(
    cells: &[Cell],
    width: usize,
    height: usize,
    ghosts: &[(u8, Position)],
    pacman: Position,
) -> Vec<bool> {
    let mut den = vec![false; width * height];
    let mut visited = vec![false; width * height];
    let mut queue: VecDeque<Position> = VecDeque::with_capacity(64);

    for &(_, spawn) in ghosts {
        let start = spawn.y * width + spawn.x;
        if visited[start] { continue; }

        let mut region = vec![];
        let mut open = false;
        visited[start] = true;
        queue.push_back(spawn);

        while let Some(p) = queue.pop_front() {
            region.push(p.y * width + p.x);
            if p == pacman { open = true; }
            for d in Direction::ALL {
                let Some(n) = p.step(d) else { continue };
                if n.x >= width || n.y >= height { continue; }
                let i = n.y * width + n.x;
                if visited[i] || cells[i] != Cell::Floor { continue; }
                visited[i] = true;
                queue.push_back(n);
            }
        }

        if !open {
            for i in region {
                den[i] = true;
            }
        }
    }

    den
}

/// First door (row-major) with an adjacent non-den floor cell.
fn find_den_exit(grid: &Grid) -> Option<Position> {
    grid.doors().find_map(|door| {
        Direction::PRECEDENCE.into_iter().find_map(|d| {
            let n = door.step(d)?;
            (grid.in_bounds(n) && grid.cell(n) == Cell::Floor && !grid.is_den(n)).then_some(n)
        })
    })
}
