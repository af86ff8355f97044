//! Generational step for the sparse grid.
//!
//! # Algorithm
//!
//! Every live cell visits its 8 neighbors and leaves a *tally* there: one
//! count plus its own color.  Only coordinates that received a tally can be
//! alive in the next generation, so the work is `O(live × 8)` no matter how
//! far apart the live cells are.
//!
//! * survivor (alive, 2 or 3 neighbors): color unchanged, stability + 1
//! * birth (dead, exactly 3 neighbors): modal neighbor color, stability 0
//!
//! Ties in the modal color go to the lowest palette index.  The result does
//! not depend on hash iteration order.

use std::collections::{HashMap, HashSet};

use crate::grid::{Cell, Coord, Grid};

/// Relative positions of the 8 Moore neighbors, in visiting order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

// ════════════════════════════════════════════════════════════════════════════
// Tally — neighbor count plus the colors that contributed to it
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    count:  u8,
    colors: [u8; 8],
}

impl Tally {
    fn push(&mut self, color: u8) {
        // At most 8 neighbors can ever visit one coordinate.
        self.colors[self.count as usize] = color;
        self.count += 1;
    }

    fn colors(&self) -> &[u8] {
        &self.colors[..self.count as usize]
    }

    /// Most frequent contributed color; lowest index among equals.
    fn modal_color(&self) -> u8 {
        let colors = self.colors();
        let mut best       = colors[0];
        let mut best_count = 0usize;
        for &c in colors {
            let n = colors.iter().filter(|&&o| o == c).count();
            if n > best_count || (n == best_count && c < best) {
                best       = c;
                best_count = n;
            }
        }
        best
    }
}

// ════════════════════════════════════════════════════════════════════════════
// step
// ════════════════════════════════════════════════════════════════════════════

/// Compute the next generation of `grid`.
///
/// Returns the new grid and the set of coordinates born this step.  `grid`
/// itself is left untouched.
pub fn step(grid: &Grid) -> (Grid, HashSet<Coord>) {
    let mut tallies: HashMap<Coord, Tally> = HashMap::with_capacity(grid.len() * 8);

    for ((x, y), cell) in grid.iter() {
        for &(dx, dy) in &NEIGHBOR_OFFSETS {
            let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
                continue;
            };
            tallies.entry((nx, ny)).or_default().push(cell.color);
        }
    }

    let mut next = Grid::with_capacity(grid.len());
    let mut born = HashSet::new();

    for (at, tally) in &tallies {
        match (grid.get(*at), tally.count) {
            (Some(old), 2 | 3) => {
                next.insert_cell(*at, Cell {
                    color:     old.color,
                    stability: old.stability.saturating_add(1),
                });
            }
            (None, 3) => {
                next.insert_cell(*at, Cell::newborn(tally.modal_color()));
                born.insert(*at);
            }
            _ => {}
        }
    }

    (next, born)
}

/// Apply [`step`] `n` times, discarding the newborn sets.
pub fn run(grid: &Grid, n: usize) -> Grid {
    let mut g = grid.clone();
    for _ in 0..n {
        g = step(&g).0;
    }
    g
}

impl Grid {
    /// Replace `self` with its next generation and return the newborn set.
    ///
    /// The next state is built completely before it is swapped in, so an
    /// observer never sees a half-stepped grid.
    pub fn advance(&mut self) -> HashSet<Coord> {
        let (next, born) = step(self);
        *self = next;
        born
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_of(cells: &[(Coord, u8)]) -> Grid {
        let mut g = Grid::new();
        for &(at, color) in cells {
            g.insert(at, color);
        }
        g
    }

    fn sorted_coords(g: &Grid) -> Vec<Coord> {
        let mut v: Vec<Coord> = g.coords().collect();
        v.sort();
        v
    }

    const GLIDER: [Coord; 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

    #[test]
    fn empty_grid_is_a_fixed_point() {
        let (next, born) = step(&Grid::new());
        assert!(next.is_empty());
        assert!(born.is_empty());
    }

    #[test]
    fn lone_cell_dies() {
        let (next, born) = step(&grid_of(&[((0, 0), 0)]));
        assert!(next.is_empty());
        assert!(born.is_empty());
    }

    #[test]
    fn input_grid_is_not_mutated() {
        let g = grid_of(&[((0, 0), 0), ((1, 0), 0), ((2, 0), 0)]);
        let before = g.clone();
        let _ = step(&g);
        assert_eq!(g, before);
    }

    #[test]
    fn glider_translates_diagonally_after_four_steps() {
        let mut g = grid_of(&GLIDER.map(|c| (c, 0)));
        for _ in 0..4 {
            g = step(&g).0;
            assert_eq!(g.len(), 5);
        }
        let mut expected: Vec<Coord> = GLIDER.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
        expected.sort();
        assert_eq!(sorted_coords(&g), expected);
    }

    #[test]
    fn glider_crosses_into_negative_coordinates() {
        let shifted: Vec<(Coord, u8)> = GLIDER.iter().map(|&(x, y)| ((x - 40, y - 40), 1)).collect();
        let g = run(&grid_of(&shifted), 40);
        let mut expected: Vec<Coord> = GLIDER.iter().map(|&(x, y)| (x - 30, y - 30)).collect();
        expected.sort();
        assert_eq!(sorted_coords(&g), expected);
    }

    #[test]
    fn blinker_oscillates() {
        let g = grid_of(&[((0, 1), 0), ((1, 1), 0), ((2, 1), 0)]);
        let (g1, born) = step(&g);
        assert_eq!(sorted_coords(&g1), vec![(1, 0), (1, 1), (1, 2)]);
        assert_eq!(born.len(), 2);
        assert!(born.contains(&(1, 0)) && born.contains(&(1, 2)));
        assert_eq!(sorted_coords(&run(&g, 2)), sorted_coords(&g));
    }

    #[test]
    fn survivors_gain_one_stability_per_generation() {
        let mut g = grid_of(&[((0, 0), 2), ((1, 0), 2), ((0, 1), 2), ((1, 1), 2)]);
        for gen in 1..=5u32 {
            let born = g.advance();
            assert!(born.is_empty());
            for (_, cell) in g.iter() {
                assert_eq!(cell.stability, gen);
                assert_eq!(cell.color, 2);
            }
        }
    }

    #[test]
    fn stability_rule_holds_for_every_cell() {
        let mut g = grid_of(&GLIDER.map(|c| (c, 0)));
        g.insert((10, 10), 1);
        g.insert((11, 10), 1);
        g.insert((10, 11), 1);
        g.insert((11, 11), 1);
        for _ in 0..12 {
            let (next, born) = step(&g);
            for (at, cell) in next.iter() {
                match g.get(at) {
                    Some(prev) => {
                        assert!(!born.contains(&at));
                        assert_eq!(cell.stability, prev.stability + 1);
                    }
                    None => {
                        assert!(born.contains(&at));
                        assert_eq!(cell.stability, 0);
                    }
                }
            }
            g = next;
        }
    }

    #[test]
    fn newborn_takes_majority_color() {
        // (1,1) is dead with neighbors (0,0)=3, (2,0)=3, (0,2)=5.
        let g = grid_of(&[((0, 0), 3), ((2, 0), 3), ((0, 2), 5)]);
        for _ in 0..10 {
            let (next, born) = step(&g);
            assert!(born.contains(&(1, 1)));
            assert_eq!(next.get((1, 1)).map(|c| c.color), Some(3));
        }
    }

    #[test]
    fn three_way_tie_goes_to_lowest_color() {
        let g = grid_of(&[((0, 0), 4), ((2, 0), 1), ((0, 2), 2)]);
        let (next, _) = step(&g);
        assert_eq!(next.get((1, 1)).map(|c| c.color), Some(1));
    }

    #[test]
    fn modal_color_three_against_one() {
        let mut t = Tally::default();
        for c in [6, 2, 6, 6] {
            t.push(c);
        }
        assert_eq!(t.modal_color(), 6);

        let mut t = Tally::default();
        for c in [5, 1, 5, 1] {
            t.push(c);
        }
        assert_eq!(t.modal_color(), 1);
    }

    #[test]
    fn far_apart_cells_do_not_interact() {
        let g = grid_of(&[
            ((0, 1), 0), ((1, 1), 0), ((2, 1), 0),
            ((1_000_000, 1), 1), ((1_000_001, 1), 1), ((1_000_002, 1), 1),
        ]);
        let (next, born) = step(&g);
        assert_eq!(next.len(), 6);
        assert_eq!(born.len(), 4);
        assert_eq!(next.get((1_000_001, 0)).map(|c| c.color), Some(1));
    }
}
