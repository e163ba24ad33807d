/// Consumables and occupancy.
///
/// ## Architecture
///
/// Two distinct concepts, queried separately:
///   1. ITEMS    : what lies on a cell (pellet, power pellet), mutable per episode
///   2. OCCUPANCY: who is in a cell (Pac-Man, ghosts)
///
/// Terrain lives in `rules::Grid` and never changes after load.
///
/// ## Item Map (O(1) lookup)
///
/// Items are a flat row-major `Vec<Option<Item>>` with a running count,
/// so "is the board cleared" is O(1) instead of a scan.

use serde::{Deserialize, Serialize};

use super::entity::{Ghost, Position};
use super::tile::Item;

/// Remaining pellets and power pellets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PelletMap {
    width: usize,
    height: usize,
    items: Vec<Option<Item>>,
    remaining: usize,
}

impl PelletMap {
    pub fn new(width: usize, height: usize) -> Self {
        PelletMap { width, height, items: vec![None; width * height], remaining: 0 }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    #[inline]
    fn index(&self, p: Position) -> Option<usize> {
        (p.x < self.width && p.y < self.height).then(|| p.y * self.width + p.x)
    }

    /// Put an item on `p`, replacing whatever was there.
    pub fn place(&mut self, p: Position, item: Item) {
        let Some(i) = self.index(p) else { return };
        if self.items[i].is_none() {
            self.remaining += 1;
        }
        self.items[i] = Some(item);
    }

    pub fn get(&self, p: Position) -> Option<Item> {
        self.index(p).and_then(|i| self.items[i])
    }

    /// Remove and return the item on `p`.
    pub fn take(&mut self, p: Position) -> Option<Item> {
        let i = self.index(p)?;
        let item = self.items[i].take();
        if item.is_some() {
            self.remaining -= 1;
        }
        item
    }

    /// Pellets plus power pellets still on the board.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    pub fn count(&self, kind: Item) -> usize {
        self.items.iter().filter(|&&i| i == Some(kind)).count()
    }

    /// Occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Item)> + '_ {
        let w = self.width;
        self.items
            .iter()
            .enumerate()
            .filter_map(move |(i, it)| it.map(|item| (Position::new(i % w, i / w), item)))
    }
}

// ── Occupancy ──

/// Ids of ghosts sharing Pac-Man's cell, in id order.
pub fn colliding_ghosts(ghosts: &[Ghost], pacman: Position) -> impl Iterator<Item = u8> + '_ {
    ghosts.iter().filter(move |g| g.position == pacman).map(|g| g.id)
}
