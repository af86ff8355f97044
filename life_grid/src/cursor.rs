//! Cursor state and the pixel ↔ grid geometry shared by the probe, the
//! painter, the sound mapper and the renderer.

use crate::grid::Coord;

/// Pixel value reported for "no cursor".
pub const NO_CURSOR: (i32, i32) = (-1, -1);

/// What the cursor is doing this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorMode {
    #[default]
    Hovering,
    Drawing,
    Erasing,
}

impl CursorMode {
    pub fn from_flags(drawing: bool, erasing: bool) -> Self {
        match (drawing, erasing) {
            (true, _)     => CursorMode::Drawing,
            (false, true) => CursorMode::Erasing,
            _             => CursorMode::Hovering,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CursorState
// ════════════════════════════════════════════════════════════════════════════

/// Cursor position in render-surface pixels, brush/probe radius in grid
/// units, and interaction mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorState {
    /// `None` when no pointer or hand is tracked.
    pub pos:    Option<(i32, i32)>,
    pub radius: u32,
    pub mode:   CursorMode,
}

impl Default for CursorState {
    fn default() -> Self {
        CursorState { pos: None, radius: 1, mode: CursorMode::Hovering }
    }
}

impl CursorState {
    pub fn at(px: i32, py: i32, radius: u32) -> Self {
        CursorState { pos: Some((px, py)), radius, mode: CursorMode::Hovering }
    }

    pub fn is_present(&self) -> bool { self.pos.is_some() }

    /// Forget the position; radius and mode are left alone.
    pub fn hide(&mut self) {
        self.pos = None;
    }

    pub fn pixel_or_sentinel(&self) -> (i32, i32) {
        self.pos.unwrap_or(NO_CURSOR)
    }

    /// Grid cell under the cursor, if there is a cursor.
    pub fn grid_center(&self, geometry: &Geometry) -> Option<Coord> {
        self.pos.map(|(px, py)| geometry.pixel_to_grid(px, py))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Geometry / Bounds
// ════════════════════════════════════════════════════════════════════════════

/// Size of the visible viewport in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub cols: u32,
    pub rows: u32,
}

impl Bounds {
    pub fn new(cols: u32, rows: u32) -> Self {
        Bounds { cols, rows }
    }

    pub fn contains(&self, (x, y): Coord) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.cols && (y as u32) < self.rows
    }
}

/// Viewport size in cells plus the pixel size of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub cols:    u32,
    pub rows:    u32,
    /// Side length of one cell in pixels.
    pub cell_px: u32,
}

impl Geometry {
    pub fn new(cols: u32, rows: u32, cell_px: u32) -> Self {
        Geometry { cols, rows, cell_px: cell_px.max(1) }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.cols, self.rows)
    }

    pub fn surface_width(&self)  -> u32 { self.cols * self.cell_px }
    pub fn surface_height(&self) -> u32 { self.rows * self.cell_px }

    /// Floor division, so pixels left of / above the surface map to
    /// negative cells rather than collapsing onto row or column 0.
    pub fn pixel_to_grid(&self, px: i32, py: i32) -> Coord {
        let s = self.cell_px as i32;
        (px.div_euclid(s), py.div_euclid(s))
    }

    /// Scale a normalized `[0, 1]` point onto the full render surface.
    pub fn normalized_to_pixel(&self, nx: f32, ny: f32) -> (i32, i32) {
        (
            (nx * self.surface_width()  as f32) as i32,
            (ny * self.surface_height() as f32) as i32,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
