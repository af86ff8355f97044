//! Cells → voices → OSC messages.
//!
//! # Per-cell mapping
//!
//! * **class**: Chaos if `stability < stable_threshold`, else Stable
//! * **pan** = `pan_spread · ((x / width) · 2 − 1)`
//!   (unclamped; cells left or right of the viewport pan past ±1)
//! * **pitch** = `pitch_min + (1 − y / height) · (pitch_max − pitch_min)`,
//!   quantized to the class scale, then shifted by the class octave offset
//! * **gain** = `clamp(1 − d / r, 0, 1)²` where `d` is the distance from the
//!   cell to the cursor's grid cell and `r` the cursor radius
//!
//! # Emission
//!
//! A class with voices sends `…/pitch`, `…/pan`, `…/gain` and `…/gate`
//! (all 1.0), each sized to the voice count.  A class with no voices sends
//! a single `…/gate 0.0`, the only way a gate is ever closed.

use std::collections::HashSet;

use rand::Rng;

use life_grid::{Coord, CursorState, Geometry, Grid, ProbeSource};

use crate::osc::OscMessage;
use crate::scale::Scale;
use crate::sink::MessageSink;

/// Maximum simultaneous voices per class.
pub const MAX_VOICES: usize = 16;
/// Stability at which a cell stops being chaotic.
pub const STABLE_THRESHOLD: u32 = 10;

// ════════════════════════════════════════════════════════════════════════════
// SoundConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tunable constants for the mapping.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundConfig {
    /// Pitch at the bottom row, in octaves.
    pub pitch_min:           f32,
    /// Pitch at the top row, in octaves.
    pub pitch_max:           f32,
    pub pan_spread:          f32,
    pub max_voices:          usize,
    pub stable_threshold:    u32,
    pub stable_octave_shift: f32,
    pub chaos_octave_shift:  f32,
    pub probe_source:        ProbeSource,
    /// Address prefix, e.g. `/life` → `/life/chaos/pitch`.
    pub address_prefix:      String,
}

impl Default for SoundConfig {
    fn default() -> Self {
        SoundConfig {
            pitch_min:           -3.0,
            pitch_max:            7.0,
            pan_spread:           1.0,
            max_voices:          MAX_VOICES,
            stable_threshold:    STABLE_THRESHOLD,
            stable_octave_shift: -1.0,
            chaos_octave_shift:   2.0,
            probe_source:        ProbeSource::Live,
            address_prefix:      "/life".to_string(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Voices
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoiceClass {
    Chaos,
    Stable,
}

impl VoiceClass {
    pub const ALL: [VoiceClass; 2] = [VoiceClass::Chaos, VoiceClass::Stable];

    /// Path segment used in OSC addresses.
    pub fn name(self) -> &'static str {
        match self {
            VoiceClass::Chaos  => "chaos",
            VoiceClass::Stable => "stable",
        }
    }
}

/// One sounding cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voice {
    pub pitch: f32,
    pub pan:   f32,
    pub gain:  f32,
}

/// All voices of one class for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceBatch {
    pub class:  VoiceClass,
    pub voices: Vec<Voice>,
}

impl VoiceBatch {
    pub fn is_silent(&self) -> bool { self.voices.is_empty() }

    /// OSC messages for this batch under `prefix`.
    pub fn messages(&self, prefix: &str) -> Vec<OscMessage> {
        let base = format!("{}/{}", prefix, self.class.name());
        if self.voices.is_empty() {
            return vec![OscMessage::new(format!("{base}/gate"), vec![0.0])];
        }
        vec![
            OscMessage::new(format!("{base}/pitch"), self.voices.iter().map(|v| v.pitch).collect()),
            OscMessage::new(format!("{base}/pan"),   self.voices.iter().map(|v| v.pan).collect()),
            OscMessage::new(format!("{base}/gain"),  self.voices.iter().map(|v| v.gain).collect()),
            OscMessage::new(format!("{base}/gate"),  vec![1.0; self.voices.len()]),
        ]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// gain
// ════════════════════════════════════════════════════════════════════════════

/// Distance falloff from the cursor center.
///
/// A zero radius means only the center cell is audible.
pub fn gain(cell: Coord, center: Coord, radius: u32) -> f32 {
    if radius == 0 {
        return if cell == center { 1.0 } else { 0.0 };
    }
    let dx = (cell.0 as i64 - center.0 as i64) as f32;
    let dy = (cell.1 as i64 - center.1 as i64) as f32;
    let d  = (dx * dx + dy * dy).sqrt();
    let g  = (1.0 - d / radius as f32).clamp(0.0, 1.0);
    g * g
}

// ════════════════════════════════════════════════════════════════════════════
// SoundMapper
// ════════════════════════════════════════════════════════════════════════════

pub struct SoundMapper {
    pub config:   SoundConfig,
    chaos_scale:  Scale,
    stable_scale: Scale,
}

impl SoundMapper {
    pub fn new(config: SoundConfig) -> Self {
        SoundMapper {
            config,
            chaos_scale:  Scale::major(),
            stable_scale: Scale::major_seventh(),
        }
    }

    pub fn classify(&self, stability: u32) -> VoiceClass {
        if stability < self.config.stable_threshold {
            VoiceClass::Chaos
        } else {
            VoiceClass::Stable
        }
    }

    pub fn pan(&self, x: i32, width: u32) -> f32 {
        let w = width.max(1) as f32;
        self.config.pan_spread * ((x as f32 / w) * 2.0 - 1.0)
    }

    /// Unquantized pitch in octaves; the top row is highest.
    pub fn raw_pitch(&self, y: i32, height: u32) -> f32 {
        let h = height.max(1) as f32;
        let c = &self.config;
        c.pitch_min + (1.0 - y as f32 / h) * (c.pitch_max - c.pitch_min)
    }

    /// Quantized, octave-shifted pitch for a cell of `class` on row `y`.
    pub fn pitch(&self, class: VoiceClass, y: i32, height: u32) -> f32 {
        let raw = self.raw_pitch(y, height);
        match class {
            VoiceClass::Chaos  => self.chaos_scale.quantize(raw)  + self.config.chaos_octave_shift,
            VoiceClass::Stable => self.stable_scale.quantize(raw) + self.config.stable_octave_shift,
        }
    }

    /// Build this tick's voice batches (Chaos first, then Stable).
    ///
    /// Cells are visited in coordinate order so that a seeded `rng` gives
    /// a reproducible voice selection when a class exceeds `max_voices`.
    pub fn map<R: Rng + ?Sized>(
        &self,
        probed:   &HashSet<Coord>,
        grid:     &Grid,
        cursor:   &CursorState,
        geometry: &Geometry,
        rng:      &mut R,
    ) -> [VoiceBatch; 2] {
        let mut cells: Vec<Coord> = probed.iter().copied().collect();
        cells.sort_unstable();

        let (chaos, stable): (Vec<Coord>, Vec<Coord>) = cells.into_iter().partition(|&at| {
            self.classify(grid.stability(at).unwrap_or(0)) == VoiceClass::Chaos
        });

        let center = cursor.grid_center(geometry);
        [
            self.batch(VoiceClass::Chaos,  chaos,  center, cursor.radius, geometry, rng),
            self.batch(VoiceClass::Stable, stable, center, cursor.radius, geometry, rng),
        ]
    }

    fn batch<R: Rng + ?Sized>(
        &self,
        class:    VoiceClass,
        mut cells: Vec<Coord>,
        center:   Option<Coord>,
        radius:   u32,
        geometry: &Geometry,
        rng:      &mut R,
    ) -> VoiceBatch {
        let max = self.config.max_voices;
        if cells.len() > max {
            let picked = rand::seq::index::sample(rng, cells.len(), max);
            cells = picked.iter().map(|i| cells[i]).collect();
        }

        let voices = cells
            .into_iter()
            .map(|(x, y)| Voice {
                pitch: self.pitch(class, y, geometry.rows),
                pan:   self.pan(x, geometry.cols),
                gain:  center.map_or(0.0, |c| gain((x, y), c, radius)),
            })
            .collect();

        VoiceBatch { class, voices }
    }

    /// Send every batch to `sink`; returns what was sent.
    pub fn emit(&self, batches: &[VoiceBatch], sink: &mut dyn MessageSink) -> Vec<OscMessage> {
        let messages: Vec<OscMessage> = batches
            .iter()
            .flat_map(|b| b.messages(&self.config.address_prefix))
            .collect();
        for m in &messages {
            sink.send(m);
        }
        messages
    }

    /// [`map`](Self::map) followed by [`emit`](Self::emit).
    pub fn map_and_emit<R: Rng + ?Sized>(
        &self,
        probed:   &HashSet<Coord>,
        grid:     &Grid,
        cursor:   &CursorState,
        geometry: &Geometry,
        rng:      &mut R,
        sink:     &mut dyn MessageSink,
    ) -> Vec<OscMessage> {
        let batches = self.map(probed, grid, cursor, geometry, rng);
        log::trace!(
            "voices: chaos={} stable={}",
            batches[0].voices.len(), batches[1].voices.len()
        );
        self.emit(&batches, sink)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
