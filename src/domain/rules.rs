/// Movement rules: truth-table driven.
///
/// Pure functions over the static grid. No side effects; these encode
/// "where does a move land" without touching world state.
///
/// ## Movement Truth Table
///
/// ┌────────────────────────────┬──────────────┬──────────────┐
/// │ Target cell                 │ Pac-Man      │ Ghost        │
/// ├────────────────────────────┼──────────────┼──────────────┤
/// │ Out of bounds               │ stay         │ stay         │
/// │ Wall                        │ stay         │ stay         │
/// │ Den door                    │ stay         │ enter only   │
/// │                             │              │ while leaving│
/// │ Floor                       │ enter        │ enter        │
/// └────────────────────────────┴──────────────┴──────────────┘
///
/// A rejected move is not an error: the mover simply keeps its cell.

use super::entity::{Direction, Position};
use super::tile::Cell;

/// Static terrain, parsed once and shared read-only between episodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    den: Vec<bool>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>, den: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        debug_assert_eq!(den.len(), width * height);
        Grid { cells, den, width, height }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    #[inline]
    pub fn in_bounds(&self, p: Position) -> bool {
        p.x < self.width && p.y < self.height
    }

    #[inline]
    pub fn index(&self, p: Position) -> usize {
        p.y * self.width + p.x
    }

    /// Cell at `p`. Out of bounds reads as wall.
    #[inline]
    pub fn cell(&self, p: Position) -> Cell {
        if self.in_bounds(p) { self.cells[self.index(p)] } else { Cell::Wall }
    }

    /// Inside the enclosed ghost den (door cells excluded).
    #[inline]
    pub fn is_den(&self, p: Position) -> bool {
        self.in_bounds(p) && self.den[self.index(p)]
    }

    pub fn doors(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|&p| self.cell(p).is_door())
    }

    /// Every cell in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let w = self.width;
        (0..self.height).flat_map(move |y| (0..w).map(move |x| Position::new(x, y)))
    }
}

/// Who is moving. Decides how den doors behave.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mover {
    Pacman,
    Ghost { through_door: bool },
}

/// May `mover` occupy `p`?
#[inline]
pub fn can_enter(grid: &Grid, p: Position, mover: Mover) -> bool {
    let cell = grid.cell(p);
    cell.is_open() || (cell.is_door() && matches!(mover, Mover::Ghost { through_door: true }))
}

/// Resolve one step. Returns `position` unchanged when the move is illegal.
pub fn attempt_move(position: Position, direction: Direction, grid: &Grid, mover: Mover) -> Position {
    match position.step(direction) {
        Some(target) if can_enter(grid, target, mover) => target,
        _ => position,
    }
}

/// Compact set of directions (bit = ordinal).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DirSet(u8);

impl DirSet {
    pub fn insert(&mut self, d: Direction) {
        self.0 |= 1 << d.ordinal();
    }

    pub fn remove(&mut self, d: Direction) {
        self.0 &= !(1 << d.ordinal());
    }

    pub fn contains(self, d: Direction) -> bool {
        self.0 & (1 << d.ordinal()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ordinal order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }
}

/// Directions from `p` that actually move `mover`.
pub fn legal_moves(grid: &Grid, p: Position, mover: Mover) -> DirSet {
    let mut set = DirSet::default();
    for d in Direction::ALL {
        if attempt_move(p, d, grid, mover) != p {
            set.insert(d);
        }
    }
    set
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Helper: build a Grid from a string diagram.
    /// Legend:  '#'=Wall  'G'=DenDoor  'd'=Den floor  anything else=Floor
    pub(crate) fn grid_from(rows: &[&str]) -> Grid {
        let height = rows.len();
        let width = rows[0].len();
        let mut cells = vec![Cell::Floor; width * height];
        let mut den = vec![false; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let i = y * width + x;
                match ch {
                    '#' => cells[i] = Cell::Wall,
                    'G' => cells[i] = Cell::DenDoor,
                    'd' => den[i] = true,
                    _ => {}
                }
            }
        }
        Grid::new(width, height, cells, den)
    }

    const PAC: Mover = Mover::Pacman;
    const GHOST_OUT: Mover = Mover::Ghost { through_door: true };
    const GHOST_IN: Mover = Mover::Ghost { through_door: false };

    #[test]
    fn move_onto_floor() {
        let g = grid_from(&[
            "###",
            "#  ",
            "###",
        ]);
        assert_eq!(attempt_move(Position::new(1, 1), Direction::Right, &g, PAC), Position::new(2, 1));
    }

    #[test]
    fn move_into_wall_is_rejected() {
        let g = grid_from(&[
            "###",
            "# #",
            "###",
        ]);
        let p = Position::new(1, 1);
        for d in Direction::ALL {
            assert_eq!(attempt_move(p, d, &g, PAC), p);
            assert_eq!(attempt_move(p, d, &g, GHOST_OUT), p);
        }
    }

    #[test]
    fn map_edges_are_walls() {
        let g = grid_from(&[
            "   ",
            "   ",
        ]);
        assert_eq!(attempt_move(Position::new(0, 0), Direction::Left, &g, PAC), Position::new(0, 0));
        assert_eq!(attempt_move(Position::new(0, 0), Direction::Up, &g, PAC), Position::new(0, 0));
        assert_eq!(attempt_move(Position::new(2, 1), Direction::Right, &g, PAC), Position::new(2, 1));
        assert_eq!(attempt_move(Position::new(2, 1), Direction::Down, &g, PAC), Position::new(2, 1));
    }

    #[test]
    fn door_blocks_pacman() {
        let g = grid_from(&[
            "#G#",
            "# #",
        ]);
        let p = Position::new(1, 1);
        assert_eq!(attempt_move(p, Direction::Up, &g, PAC), p);
    }

    #[test]
    fn door_passable_only_for_leaving_ghost() {
        let g = grid_from(&[
            "# #",
            "#G#",
            "#d#",
        ]);
        let p = Position::new(1, 2);
        assert_eq!(attempt_move(p, Direction::Up, &g, GHOST_IN), p);
        assert_eq!(attempt_move(p, Direction::Up, &g, GHOST_OUT), Position::new(1, 1));
    }

    #[test]
    fn legal_moves_in_corridor() {
        let g = grid_from(&[
            "#####",
            "#   #",
            "#####",
        ]);
        let set = legal_moves(&g, Position::new(2, 1), PAC);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Direction::Left));
        assert!(set.contains(Direction::Right));
        assert!(!set.contains(Direction::Up));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Direction::Left, Direction::Right]);
    }

    #[test]
    fn dir_set_remove() {
        let mut s = DirSet::default();
        assert!(s.is_empty());
        s.insert(Direction::Up);
        s.insert(Direction::Down);
        s.remove(Direction::Up);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![Direction::Down]);
    }

    #[test]
    fn den_lookup() {
        let g = grid_from(&[
            "#G#",
            "#d#",
        ]);
        assert!(g.is_den(Position::new(1, 1)));
        assert!(!g.is_den(Position::new(1, 0)));
        assert!(!g.is_den(Position::new(9, 9)));
        assert_eq!(g.doors().collect::<Vec<_>>(), vec![Position::new(1, 0)]);
    }
}
