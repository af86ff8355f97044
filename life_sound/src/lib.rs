//! # life_sound
//!
//! Turn the cells under the cursor into control voltages for an external
//! modular synthesizer, sent as OSC over UDP.
//!
//! * **Chaos** cells (stability < 10) → seven-tone scale, two octaves up
//! * **Stable** cells (stability ≥ 10) → four-tone chord, one octave down
//!
//! Each voice is a `(pitch, pan, gain)` triple.  Pitch is in octaves
//! (1 V/oct) and gain is in `[0, 1]`.  Pan is `[-1, 1]` across the
//! viewport and is not clamped, so live cells probed just outside it pan
//! past ±1.  No external crates are needed for the wire format; OSC bytes
//! are written directly.
//!
//! ## Quick start
//!
//! ```rust
//! use std::collections::HashSet;
//! use life_grid::{CursorState, Geometry, Grid};
//! use life_sound::{MemorySink, SoundConfig, SoundMapper};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut grid = Grid::new();
//! grid.insert((5, 5), 0);
//! let probed: HashSet<_> = grid.coords().collect();
//!
//! let mapper   = SoundMapper::new(SoundConfig::default());
//! let geometry = Geometry::new(100, 100, 10);
//! let cursor   = CursorState::at(55, 55, 4);
//! let mut sink = MemorySink::default();
//! let mut rng  = StdRng::seed_from_u64(1);
//!
//! mapper.map_and_emit(&probed, &grid, &cursor, &geometry, &mut rng, &mut sink);
//! assert!(sink.messages.iter().any(|m| m.addr == "/life/chaos/pitch"));
//! ```

pub mod scale;
pub mod mapper;
pub mod osc;
pub mod sink;

pub use mapper::{gain, SoundConfig, SoundMapper, Voice, VoiceBatch, VoiceClass};
pub use osc::OscMessage;
pub use scale::Scale;
pub use sink::{open_sink, MemorySink, MessageSink, NullSink, UdpSink};
