//! Direct edits to the grid from the brush (gesture cursor) or pointer.
//!
//! Drawing is always *set if absent*: a live cell keeps its color and
//! stability.  Erasing removes unconditionally.

use rand::Rng;

use crate::cursor::{Bounds, CursorState, Geometry};
use crate::grid::{Coord, Grid};

/// Apply the brush around the cursor.
///
/// Every cell with `dx² + dy² <= radius²` around the cursor's grid cell is
/// affected, clipped to `bounds` when given.  Returns the number of cells
/// created or removed.
pub fn paint<R: Rng + ?Sized>(
    grid:        &mut Grid,
    cursor:      &CursorState,
    geometry:    &Geometry,
    drawing:     bool,
    erasing:     bool,
    bounds:      Option<Bounds>,
    palette_len: usize,
    rng:         &mut R,
) -> usize {
    if !drawing && !erasing {
        return 0;
    }
    let Some((cx, cy)) = cursor.grid_center(geometry) else {
        return 0;
    };

    let r  = cursor.radius as i32;
    let r2 = r * r;
    let mut changed = 0;

    for dx in -r..=r {
        for dy in -r..=r {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let at = (cx + dx, cy + dy);
            if bounds.is_some_and(|b| !b.contains(at)) {
                continue;
            }
            let hit = if drawing {
                draw_cell(grid, at, palette_len, rng)
            } else {
                erase_cell(grid, at)
            };
            if hit { changed += 1; }
        }
    }
    changed
}

/// Bring one cell to life with a random palette color unless it is
/// already alive.
pub fn draw_cell<R: Rng + ?Sized>(grid: &mut Grid, at: Coord, palette_len: usize, rng: &mut R) -> bool {
    if grid.contains(at) {
        return false;
    }
    grid.insert_if_absent(at, random_color(palette_len, rng))
}

pub fn erase_cell(grid: &mut Grid, at: Coord) -> bool {
    grid.remove(at).is_some()
}

/// Flip one cell; used for a pointer click.  Returns the new liveness.
pub fn toggle_cell<R: Rng + ?Sized>(grid: &mut Grid, at: Coord, palette_len: usize, rng: &mut R) -> bool {
    if grid.remove(at).is_some() {
        false
    } else {
        grid.insert(at, random_color(palette_len, rng));
        true
    }
}

fn random_color<R: Rng + ?Sized>(palette_len: usize, rng: &mut R) -> u8 {
    let n = palette_len.clamp(1, u8::MAX as usize + 1);
    rng.gen_range(0..n) as u8
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
