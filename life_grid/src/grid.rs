//! The sparse cell store.
//!
//! Absence of a key means the cell is dead.  The grid has no extent; the
//! only bounded operation is [`Grid::randomize`], which fills a viewport.

use std::collections::hash_map::{self, HashMap};

use rand::Rng;

use crate::cursor::Bounds;

/// Grid coordinate.  Signed and unbounded, no wraparound.
pub type Coord = (i32, i32);

/// State of one live cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Index into the active [`Palette`](crate::Palette).
    pub color:     u8,
    /// Consecutive generations this cell has survived (0 at birth).
    pub stability: u32,
}

impl Cell {
    pub fn newborn(color: u8) -> Self {
        Cell { color, stability: 0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Grid
// ════════════════════════════════════════════════════════════════════════════

/// Mapping from live coordinates to their [`Cell`] state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    cells: HashMap<Coord, Cell>,
}

impl Grid {
    pub fn new() -> Self {
        Grid { cells: HashMap::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        Grid { cells: HashMap::with_capacity(n) }
    }

    pub fn len(&self)      -> usize { self.cells.len() }
    pub fn is_empty(&self) -> bool  { self.cells.is_empty() }

    pub fn contains(&self, at: Coord) -> bool {
        self.cells.contains_key(&at)
    }

    pub fn get(&self, at: Coord) -> Option<&Cell> {
        self.cells.get(&at)
    }

    /// Stability of a live cell; `None` for dead cells.
    pub fn stability(&self, at: Coord) -> Option<u32> {
        self.cells.get(&at).map(|c| c.stability)
    }

    /// Make `at` alive as a newborn of `color`, replacing whatever was there.
    pub fn insert(&mut self, at: Coord, color: u8) {
        self.cells.insert(at, Cell::newborn(color));
    }

    /// Insert a cell with explicit state.  Used by the engine to build the
    /// next generation.
    pub fn insert_cell(&mut self, at: Coord, cell: Cell) {
        self.cells.insert(at, cell);
    }

    /// Make `at` alive only if it is currently dead.  Returns `true` if a
    /// cell was created; an existing cell keeps its color and stability.
    pub fn insert_if_absent(&mut self, at: Coord, color: u8) -> bool {
        match self.cells.entry(at) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(v) => {
                v.insert(Cell::newborn(color));
                true
            }
        }
    }

    pub fn remove(&mut self, at: Coord) -> Option<Cell> {
        self.cells.remove(&at)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        self.cells.iter().map(|(&k, v)| (k, v))
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.keys().copied()
    }

    /// Clear the grid, then make every cell inside `bounds` alive
    /// independently with probability `density`, each with a uniformly
    /// random color from `0..palette_len`.
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        bounds:      Bounds,
        density:     f64,
        palette_len: usize,
        rng:         &mut R,
    ) {
        self.cells.clear();
        let density = density.clamp(0.0, 1.0);
        let colors  = palette_len.clamp(1, u8::MAX as usize + 1);
        for x in 0..bounds.cols as i32 {
            for y in 0..bounds.rows as i32 {
                if rng.gen_bool(density) {
                    let color = rng.gen_range(0..colors) as u8;
                    self.cells.insert((x, y), Cell::newborn(color));
                }
            }
        }
        log::debug!(
            "randomized {}x{} viewport: {} live cells",
            bounds.cols, bounds.rows, self.cells.len()
        );
    }
}

impl FromIterator<(Coord, Cell)> for Grid {
    fn from_iter<I: IntoIterator<Item = (Coord, Cell)>>(iter: I) -> Self {
        Grid { cells: iter.into_iter().collect() }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
