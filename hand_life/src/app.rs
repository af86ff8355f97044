//! Top-level application state machine.
//!
//! `AppState` owns the grid, the interaction state, the sound mapper and the
//! OSC sink.  [`AppState::tick`] runs one pass of the pipeline
//! (input → gestures → paint → evolve → probe/sound) and [`run`] wraps it in
//! the window loop with rendering and pacing.

use std::collections::HashSet;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use life_grid::paint::{draw_cell, erase_cell, paint, toggle_cell};
use life_grid::{Coord, CursorMode, CursorState, Geometry, Grid, Palette};
use life_sound::{open_sink, MessageSink, SoundConfig, SoundMapper, VoiceBatch, VoiceClass};

use crate::error::{Error, Result};
use crate::gesture::{GestureEvent, GestureRecognizer, InteractionState};
use crate::pacing::{Diagnostics, FramePacer};
use crate::tracker::{HandTracker, SimInput};
use crate::visualizer::{InputFrame, KeyCommand, Visualizer};

/// Tick rate while the simulation runs.
pub const RUNNING_FPS:       u32 = 15;
/// Tick rate while paused, so drawing stays responsive.
pub const DRAWING_FPS:       u32 = 150;
pub const RANDOM_DENSITY:    f64 = 0.3;
/// Extra delay after a manual single step (`N` held).
pub const MANUAL_STEP_DELAY: Duration = Duration::from_millis(80);

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub geometry:        Geometry,
    pub palette:         Palette,
    pub sound:           SoundConfig,
    /// `host:port` receiving OSC datagrams.
    pub osc_target:      String,
    pub running_fps:     u32,
    pub drawing_fps:     u32,
    pub density:         f64,
    /// Cursor radius (cells) when the mouse is the cursor.
    pub pointer_radius:  u32,
    /// Drive the cursor with hands instead of the mouse.
    pub camera:          bool,
    pub start_running:   bool,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed:            Option<u64>,
    pub report_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            geometry:        Geometry::new(100, 100, 10),
            palette:         Palette::default(),
            sound:           SoundConfig::default(),
            osc_target:      "127.0.0.1:9000".to_string(),
            running_fps:     RUNNING_FPS,
            drawing_fps:     DRAWING_FPS,
            density:         RANDOM_DENSITY,
            pointer_radius:  1,
            camera:          false,
            start_running:   false,
            seed:            None,
            report_interval: Duration::from_secs(2),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: &str| Err(Error::Config(msg.to_string()));
        if self.geometry.cols == 0 || self.geometry.rows == 0 {
            return bad("grid must have at least one column and one row");
        }
        if self.running_fps == 0 || self.drawing_fps == 0 {
            return bad("frame rates must be positive");
        }
        if !(0.0..=1.0).contains(&self.density) {
            return bad("random density must be within 0..=1");
        }
        if self.palette.is_empty() {
            return bad("palette has no colors");
        }
        if !self.sound.pitch_min.is_finite() || !self.sound.pitch_max.is_finite() {
            return bad("pitch bounds must be finite");
        }
        if self.sound.pitch_min >= self.sound.pitch_max {
            return bad("pitch range is empty");
        }
        if self.sound.max_voices == 0 {
            return bad("max voices must be positive");
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Interaction profile
// ════════════════════════════════════════════════════════════════════════════

/// Hand-tracking pieces that only exist in camera mode.
pub struct CameraInteraction {
    pub tracker:    Box<dyn HandTracker>,
    pub recognizer: GestureRecognizer,
}

impl CameraInteraction {
    pub fn new(tracker: Box<dyn HandTracker>, geometry: Geometry) -> Self {
        CameraInteraction { tracker, recognizer: GestureRecognizer::new(geometry) }
    }
}

/// Who moves the cursor: the mouse (headless) or a hand tracker.
pub enum InteractionProfile {
    Headless,
    CameraDriven(CameraInteraction),
}

/// Counters from one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub live:        usize,
    pub born:        usize,
    pub voices:      usize,
    /// The grid was stepped by hand while paused.
    pub manual_step: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── simulation ───────────────────────────────────────────────────────
    grid:        Grid,
    born:        HashSet<Coord>,
    palette:     Palette,
    geometry:    Geometry,
    rng:         StdRng,
    density:     f64,

    // ── interaction ──────────────────────────────────────────────────────
    interaction:    InteractionState,
    profile:        InteractionProfile,
    pointer_radius: u32,

    // ── sound ────────────────────────────────────────────────────────────
    mapper:      SoundMapper,
    sink:        Box<dyn MessageSink>,

    // ── pacing / rendering ───────────────────────────────────────────────
    running_fps: u32,
    drawing_fps: u32,
    full_redraw: bool,
    started:     Instant,
}

impl AppState {
    pub fn new(cfg: AppConfig, profile: InteractionProfile, sink: Box<dyn MessageSink>) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let interaction = InteractionState {
            cursor:  CursorState { radius: cfg.pointer_radius.max(1), ..CursorState::default() },
            running: cfg.start_running,
            ..InteractionState::default()
        };

        AppState {
            grid:           Grid::new(),
            born:           HashSet::new(),
            palette:        cfg.palette,
            geometry:       cfg.geometry,
            rng,
            density:        cfg.density,
            interaction,
            profile,
            pointer_radius: cfg.pointer_radius,
            mapper:         SoundMapper::new(cfg.sound),
            sink,
            running_fps:    cfg.running_fps,
            drawing_fps:    cfg.drawing_fps,
            full_redraw:    true,
            started:        Instant::now(),
        }
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn grid(&self)     -> &Grid         { &self.grid }
    pub fn palette(&self)  -> &Palette      { &self.palette }
    pub fn geometry(&self) -> &Geometry     { &self.geometry }
    pub fn cursor(&self)   -> &CursorState  { &self.interaction.cursor }
    pub fn running(&self)  -> bool          { self.interaction.running }
    pub fn born(&self)     -> &HashSet<Coord> { &self.born }

    pub fn grid_mut(&mut self) -> &mut Grid { &mut self.grid }

    pub fn camera(&self) -> Option<&CameraInteraction> {
        match &self.profile {
            InteractionProfile::CameraDriven(cam) => Some(cam),
            InteractionProfile::Headless          => None,
        }
    }

    /// Current tick rate target.
    pub fn fps(&self) -> u32 {
        if self.interaction.running { self.running_fps } else { self.drawing_fps }
    }

    /// True once after any change that invalidates the render diff.
    pub fn take_full_redraw(&mut self) -> bool {
        std::mem::take(&mut self.full_redraw)
    }

    // ── commands ─────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, cmd: KeyCommand) {
        match cmd {
            KeyCommand::Start => {
                if !self.interaction.running {
                    log::info!("running");
                }
                self.interaction.running = true;
            }
            KeyCommand::Pause => {
                if self.interaction.running {
                    log::info!("paused");
                }
                self.interaction.running = false;
            }
            KeyCommand::Clear     if !self.interaction.running => self.clear(),
            KeyCommand::Randomize if !self.interaction.running => self.randomize(),
            _ => {}
        }
    }

    /// Apply a recognizer event.  `ToggleRun` has already updated the
    /// running flag inside the recognizer.
    pub fn apply_gesture(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Randomize => self.randomize(),
            GestureEvent::Clear     => self.clear(),
            GestureEvent::ToggleRun { running } => {
                log::debug!("toggle gesture, running={running}");
            }
        }
    }

    fn clear(&mut self) {
        self.grid.clear();
        self.born.clear();
        self.full_redraw = true;
        log::info!("grid cleared");
    }

    fn randomize(&mut self) {
        self.grid.randomize(self.geometry.bounds(), self.density, self.palette.len(), &mut self.rng);
        self.born.clear();
        self.full_redraw = true;
        log::info!("grid randomized: {} live cells", self.grid.len());
    }

    // ── tick ─────────────────────────────────────────────────────────────

    pub fn tick(&mut self, input: &InputFrame) -> Result<TickReport> {
        let now = self.started.elapsed().as_secs_f64();
        self.tick_at(input, now)
    }

    /// One tick at monotonic time `now` (seconds).
    pub fn tick_at(&mut self, input: &InputFrame, now: f64) -> Result<TickReport> {
        for &cmd in &input.commands {
            self.handle_key(cmd);
        }

        // ── cursor + paint ───────────────────────────────────────────────
        let events = match &mut self.profile {
            InteractionProfile::CameraDriven(cam) => {
                let hands = cam.tracker.poll()?;
                cam.recognizer.recognize(&hands, &mut self.interaction, now)
            }
            InteractionProfile::Headless => Vec::new(),
        };

        if self.camera().is_some() {
            for event in events {
                self.apply_gesture(event);
            }
            paint(
                &mut self.grid,
                &self.interaction.cursor,
                &self.geometry,
                self.interaction.drawing,
                self.interaction.erasing,
                Some(self.geometry.bounds()),
                self.palette.len(),
                &mut self.rng,
            );
        } else {
            self.follow_pointer(input);
            if !self.interaction.running {
                self.edit_under_pointer(input);
            }
        }

        // ── evolve ───────────────────────────────────────────────────────
        let manual_step = !self.interaction.running && input.step_held;
        if self.interaction.running || manual_step {
            self.born = self.grid.advance();
        } else {
            self.born.clear();
        }

        // ── sound ────────────────────────────────────────────────────────
        let cursor = self.interaction.cursor;
        let probed = self.mapper.config.probe_source.probe(
            &self.grid, &self.born, &cursor, &self.geometry, self.interaction.running,
        );
        let batches = self.mapper.map(&probed, &self.grid, &cursor, &self.geometry, &mut self.rng);
        self.mapper.emit(&batches, self.sink.as_mut());

        Ok(TickReport {
            live:   self.grid.len(),
            born:   self.born.len(),
            voices: batches.iter().map(|b| b.voices.len()).sum(),
            manual_step,
        })
    }

    /// Mouse as cursor: fixed radius, W/E select the mode.
    fn follow_pointer(&mut self, input: &InputFrame) {
        let state = &mut self.interaction;
        state.cursor.pos    = input.pointer;
        state.cursor.radius = self.pointer_radius.max(1);
        state.drawing       = input.draw_held;
        state.erasing       = input.erase_held && !input.draw_held;
        state.cursor.mode   = CursorMode::from_flags(state.drawing, state.erasing);
    }

    /// Paused-only single-cell edits under the mouse.
    fn edit_under_pointer(&mut self, input: &InputFrame) {
        let Some(at) = self.interaction.cursor.grid_center(&self.geometry) else {
            return;
        };
        if !self.geometry.bounds().contains(at) {
            return;
        }
        let colors = self.palette.len();
        if input.draw_held {
            draw_cell(&mut self.grid, at, colors, &mut self.rng);
        } else if input.erase_held {
            erase_cell(&mut self.grid, at);
        }
        if input.clicked {
            toggle_cell(&mut self.grid, at, colors, &mut self.rng);
        }
    }

    /// Close both voice gates.
    pub fn silence(&mut self) {
        let batches = VoiceClass::ALL.map(|class| VoiceBatch { class, voices: Vec::new() });
        self.mapper.emit(&batches, self.sink.as_mut());
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run
// ════════════════════════════════════════════════════════════════════════════

fn build_profile(cfg: &AppConfig) -> Result<(InteractionProfile, Option<Sender<SimInput>>)> {
    if !cfg.camera {
        return Ok((InteractionProfile::Headless, None));
    }

    #[cfg(feature = "leap")]
    {
        let tracker = crate::tracker::LeapHandTracker::open()?;
        let cam = CameraInteraction::new(Box::new(tracker), cfg.geometry);
        Ok((InteractionProfile::CameraDriven(cam), None))
    }

    #[cfg(not(feature = "leap"))]
    {
        log::info!("no tracking hardware compiled in; simulating hands (1-4 pinch, Space toggles, [ ] pinch width)");
        let (tx, rx) = mpsc::channel();
        let tracker = crate::tracker::SimHandTracker::new(rx);
        let cam = CameraInteraction::new(Box::new(tracker), cfg.geometry);
        Ok((InteractionProfile::CameraDriven(cam), Some(tx)))
    }
}

/// Open the window and run until it closes, `Q` is pressed, or hand capture
/// fails.
pub fn run(cfg: AppConfig) -> Result<()> {
    cfg.validate()?;

    let sink = open_sink(&cfg.osc_target);
    let (profile, sim_tx) = build_profile(&cfg)?;
    let mut vis = Visualizer::new(cfg.geometry, sim_tx)?;

    log::info!(
        "{}x{} grid, {} palette, {} mode",
        cfg.geometry.cols, cfg.geometry.rows, cfg.palette.name,
        if cfg.camera { "camera" } else { "pointer" }
    );

    let mut diag  = Diagnostics::new(cfg.report_interval, Instant::now());
    let mut pacer = FramePacer::new();
    let mut app   = AppState::new(cfg, profile, sink);

    while vis.is_open() {
        let input = vis.poll_input();
        if input.quit_requested() {
            break;
        }

        let report = match app.tick(&input) {
            Ok(r)  => r,
            Err(e) => {
                app.silence();
                return Err(e);
            }
        };

        if app.take_full_redraw() {
            vis.force_full_redraw();
        }
        vis.present(app.grid(), app.palette(), app.cursor())?;
        diag.record(Instant::now(), report.live, report.born, report.voices);

        if report.manual_step {
            thread::sleep(MANUAL_STEP_DELAY);
        }
        pacer.pace(app.fps());
    }

    app.silence();
    log::info!("bye");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
