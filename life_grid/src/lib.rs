//! # life_grid
//!
//! A sparse, conceptually infinite Game of Life.  Only live cells are stored;
//! each one carries a palette color and a *stability* counter (consecutive
//! generations survived).
//!
//! ## Quick start
//!
//! ```rust
//! use life_grid::{Grid, engine};
//!
//! let mut grid = Grid::new();
//! for &(x, y) in &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)] {
//!     grid.insert((x, y), 0);
//! }
//!
//! let (next, born) = engine::step(&grid);
//! assert_eq!(next.len(), 5);
//! assert!(!born.is_empty());
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |---|---|
//! | [`grid`] | `Grid` store: coordinate → (color, stability) |
//! | [`engine`] | one generational step, returning the newborn set |
//! | [`cursor`] | cursor state, pixel ↔ grid geometry, viewport bounds |
//! | [`probe`] | cells near the cursor that should sound this tick |
//! | [`paint`] | brush / pointer edits applied directly to the grid |
//! | [`palette`] | named color palettes |

pub mod grid;
pub mod engine;
pub mod cursor;
pub mod probe;
pub mod paint;
pub mod palette;

pub use grid::{Cell, Coord, Grid};
pub use cursor::{Bounds, CursorMode, CursorState, Geometry};
pub use palette::Palette;
pub use probe::ProbeSource;
