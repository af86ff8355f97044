//! Software-rendered grid using `minifb`.
//!
//! [`CellCanvas`] owns the framebuffer and redraws only cells whose
//! liveness changed since the previous frame.  [`Visualizer`] wraps the
//! window: input polling, simulated-hand forwarding, cursor overlay and
//! presentation.

use std::collections::HashSet;
use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use life_grid::palette::{BASE_COLOR, DEAD_COLOR};
use life_grid::{Coord, CursorMode, CursorState, Geometry, Grid, Palette};

use crate::error::{Error, Result};
use crate::tracker::{SimInput, SimKey};

const RING_HOVER: u32 = 0xFFFFFFFF;
const RING_DRAW:  u32 = 0xFF40FF80;
const RING_ERASE: u32 = 0xFFFF4040;

// ════════════════════════════════════════════════════════════════════════════
// CellCanvas
// ════════════════════════════════════════════════════════════════════════════

/// ARGB framebuffer for the viewport plus the coordinate set drawn last.
pub struct CellCanvas {
    geometry:    Geometry,
    width:       usize,
    height:      usize,
    buf:         Vec<u32>,
    prev:        HashSet<Coord>,
    full_redraw: bool,
}

impl CellCanvas {
    pub fn new(geometry: Geometry) -> Self {
        let width  = geometry.surface_width()  as usize;
        let height = geometry.surface_height() as usize;
        CellCanvas {
            geometry,
            width,
            height,
            buf:         vec![BASE_COLOR; width * height],
            prev:        HashSet::new(),
            full_redraw: true,
        }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn buffer(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buf[y * self.width + x]
    }

    /// Repaint everything on the next [`render`](Self::render).
    pub fn force_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Bring the framebuffer up to date with `grid`.  Returns the number of
    /// cells painted.
    pub fn render(&mut self, grid: &Grid, palette: &Palette) -> usize {
        let bounds = self.geometry.bounds();
        let current: HashSet<Coord> = grid.coords().filter(|&c| bounds.contains(c)).collect();
        let mut painted = 0;

        if self.full_redraw {
            self.buf.fill(BASE_COLOR);
            for y in 0..bounds.rows as i32 {
                for x in 0..bounds.cols as i32 {
                    let color = grid.get((x, y)).map_or(DEAD_COLOR, |c| palette.color(c.color));
                    self.fill_cell((x, y), color);
                    painted += 1;
                }
            }
            self.full_redraw = false;
        } else {
            let died: Vec<Coord> = self.prev.difference(&current).copied().collect();
            for at in died {
                self.fill_cell(at, DEAD_COLOR);
                painted += 1;
            }
            let born: Vec<Coord> = current.difference(&self.prev).copied().collect();
            for at in born {
                let color = grid.get(at).map_or(DEAD_COLOR, |c| palette.color(c.color));
                self.fill_cell(at, color);
                painted += 1;
            }
        }

        self.prev = current;
        painted
    }

    /// One cell, leaving a 1 px gap on its right and bottom edges.
    fn fill_cell(&mut self, (x, y): Coord, color: u32) {
        let s  = self.geometry.cell_px as usize;
        let x0 = x as usize * s;
        let y0 = y as usize * s;
        let side = s.saturating_sub(1).max(1);
        for row in y0..(y0 + side).min(self.height) {
            for col in x0..(x0 + side).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Input
// ════════════════════════════════════════════════════════════════════════════

/// One-shot keyboard commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Start,
    Pause,
    Clear,
    Randomize,
    Quit,
}

/// Everything the window reported since the previous frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Mouse position in surface pixels.
    pub pointer:     Option<(i32, i32)>,
    pub commands:    Vec<KeyCommand>,
    pub draw_held:   bool,
    pub erase_held:  bool,
    pub step_held:   bool,
    /// Left button went up this frame.
    pub clicked:     bool,
}

impl InputFrame {
    pub fn quit_requested(&self) -> bool {
        self.commands.contains(&KeyCommand::Quit)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    canvas:     CellCanvas,
    frame:      Vec<u32>,
    sim_tx:     Option<Sender<SimInput>>,
    mouse_down: bool,
}

impl Visualizer {
    pub fn new(geometry: Geometry, sim_tx: Option<Sender<SimInput>>) -> Result<Self> {
        let canvas = CellCanvas::new(geometry);
        let mut window = Window::new(
            "Hand Life: Game of Life with gesture control",
            canvas.width(), canvas.height(),
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| Error::Window(e.to_string()))?;

        // The app paces itself.
        window.limit_update_rate(None);

        Ok(Visualizer {
            window,
            frame: canvas.buffer().to_vec(),
            canvas,
            sim_tx,
            mouse_down: false,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn force_full_redraw(&mut self) { self.canvas.force_full_redraw(); }

    /// Read keys and mouse, forwarding simulated-hand input when a tracker
    /// is listening.
    pub fn poll_input(&mut self) -> InputFrame {
        let mut input = InputFrame::default();
        if !self.window.is_open() {
            input.commands.push(KeyCommand::Quit);
            return input;
        }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        for (key, cmd) in [
            (Key::S, KeyCommand::Start),
            (Key::P, KeyCommand::Pause),
            (Key::C, KeyCommand::Clear),
            (Key::R, KeyCommand::Randomize),
            (Key::Q, KeyCommand::Quit),
        ] {
            if pressed(key) {
                input.commands.push(cmd);
            }
        }
        input.draw_held  = self.window.is_key_down(Key::W);
        input.erase_held = self.window.is_key_down(Key::E);
        input.step_held  = self.window.is_key_down(Key::N);

        input.pointer = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x as i32, y as i32));

        let down = self.window.get_mouse_down(MouseButton::Left);
        input.clicked   = self.mouse_down && !down;
        self.mouse_down = down;

        self.forward_sim_input(input.pointer);
        input
    }

    fn forward_sim_input(&self, pointer: Option<(i32, i32)>) {
        let Some(tx) = &self.sim_tx else { return };
        let (w, h) = (self.canvas.width() as f32, self.canvas.height() as f32);

        let _ = tx.send(SimInput::Pointer(pointer.map(|(x, y)| (x as f32 / w, y as f32 / h))));

        for (key, sim) in [
            (Key::Key1,  SimKey::PinchIndex),
            (Key::Key2,  SimKey::PinchMiddle),
            (Key::Key3,  SimKey::PinchRing),
            (Key::Key4,  SimKey::PinchPinky),
            (Key::Space, SimKey::FlatOpen),
        ] {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                let _ = tx.send(SimInput::KeyDown(sim));
            }
            if self.window.is_key_released(key) {
                let _ = tx.send(SimInput::KeyUp(sim));
            }
        }
        if self.window.is_key_pressed(Key::LeftBracket, KeyRepeat::Yes) {
            let _ = tx.send(SimInput::KeyDown(SimKey::Narrow));
        }
        if self.window.is_key_pressed(Key::RightBracket, KeyRepeat::Yes) {
            let _ = tx.send(SimInput::KeyDown(SimKey::Widen));
        }
    }

    /// Render the grid diff, overlay the cursor ring and show the frame.
    pub fn present(&mut self, grid: &Grid, palette: &Palette, cursor: &CursorState) -> Result<()> {
        self.canvas.render(grid, palette);

        self.frame.copy_from_slice(self.canvas.buffer());
        if let Some((px, py)) = cursor.pos {
            let r = (cursor.radius * self.canvas.geometry.cell_px) as i32;
            let color = match cursor.mode {
                CursorMode::Hovering => RING_HOVER,
                CursorMode::Drawing  => RING_DRAW,
                CursorMode::Erasing  => RING_ERASE,
            };
            draw_ring(&mut self.frame, self.canvas.width(), self.canvas.height(), px, py, r, color);
        }

        self.window
            .update_with_buffer(&self.frame, self.canvas.width(), self.canvas.height())
            .map_err(|e| Error::Window(e.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Primitive drawing helpers
// ────────────────────────────────────────────────────────────────────────────

fn set_pixel(buf: &mut [u32], w: usize, h: usize, x: i32, y: i32, color: u32) {
    if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
        buf[y as usize * w + x as usize] = color;
    }
}

/// Midpoint circle outline.
fn draw_ring(buf: &mut [u32], w: usize, h: usize, cx: i32, cy: i32, r: i32, color: u32) {
    let (mut x, mut y, mut err) = (r, 0, 1 - r);
    while x >= y {
        for (dx, dy) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            set_pixel(buf, w, h, cx + dx, cy + dy, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use life_grid::Cell;

    fn small() -> CellCanvas {
        CellCanvas::new(Geometry::new(4, 3, 5))
    }

    #[test]
    fn first_render_paints_every_viewport_cell() {
        let mut c = small();
        let painted = c.render(&Grid::new(), &Palette::default());
        assert_eq!(painted, 12);
        assert_eq!(c.pixel(0, 0), DEAD_COLOR);
        // Gap column / row between cells keeps the base color.
        assert_eq!(c.pixel(4, 0), BASE_COLOR);
        assert_eq!(c.pixel(0, 4), BASE_COLOR);
    }

    #[test]
    fn later_renders_only_touch_changes() {
        let palette = Palette::default();
        let mut c = small();
        let mut g = Grid::new();
        c.render(&g, &palette);

        g.insert((1, 1), 2);
        assert_eq!(c.render(&g, &palette), 1);
        assert_eq!(c.pixel(5, 5), palette.color(2));

        // No change: nothing painted.
        assert_eq!(c.render(&g, &palette), 0);

        g.remove((1, 1));
        g.insert((3, 2), 0);
        assert_eq!(c.render(&g, &palette), 2);
        assert_eq!(c.pixel(5, 5), DEAD_COLOR);
        assert_eq!(c.pixel(15, 10), palette.color(0));
    }

    #[test]
    fn off_screen_cells_are_ignored() {
        let palette = Palette::default();
        let mut c = small();
        c.render(&Grid::new(), &palette);
        let g: Grid = [(-1, 0), (4, 0), (0, 3)].into_iter().map(|at| (at, Cell::newborn(0))).collect();
        assert_eq!(c.render(&g, &palette), 0);
    }

    #[test]
    fn forced_redraw_repaints_everything() {
        let palette = Palette::default();
        let mut c = small();
        c.render(&Grid::new(), &palette);
        c.force_full_redraw();
        assert_eq!(c.render(&Grid::new(), &palette), 12);
    }

    #[test]
    fn ring_is_clipped_to_the_buffer() {
        let (w, h) = (20, 20);
        let mut buf = vec![0u32; w * h];
        draw_ring(&mut buf, w, h, 0, 0, 5, 7);
        assert_eq!(buf[5], 7);        // (5, 0)
        assert_eq!(buf[5 * w], 7);    // (0, 5)
        assert_eq!(buf[0], 0);        // centre untouched
    }

    #[test]
    fn quit_command_detected() {
        let input = InputFrame { commands: vec![KeyCommand::Pause, KeyCommand::Quit], ..Default::default() };
        assert!(input.quit_requested());
        assert!(!InputFrame::default().quit_requested());
    }
}
