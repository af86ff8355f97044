//! # hand_life
//!
//! Two-hand gesture controller for an unbounded Game of Life, with a
//! software-rendered grid and real-time OSC voices for an external synth.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hand | Action |
//! |---|---|---|
//! | Thumb + index apart | Cursor | Move brush/probe to the midpoint; spread sets the radius |
//! | Pinch index | Controller | Draw (set cells alive under the brush) |
//! | Pinch middle | Controller | Erase cells under the brush |
//! | Pinch ring (paused) | Controller | Randomize the viewport |
//! | Pinch pinky (paused) | Controller | Clear the grid |
//! | Flat open hand | Controller | Toggle run / pause |
//!
//! Commands are debounced to one per second each.  With one hand visible the
//! detector's left/right label picks its role; with two, the hand further
//! left in the image is the controller.
//!
//! ## Sound
//!
//! While running, live cells near the cursor become voices in two classes,
//! **chaos** (young cells, major scale, two octaves up) and **stable** (cells
//! alive for 10+ generations, major-seventh chord, one octave down), sent as
//! OSC to `/life/<class>/{pitch,pan,gain,gate}`.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: mouse and keyboard synthesize hands.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Keyboard
//!
//! | Key | Action |
//! |---|---|
//! | `S` / `P` | Start / pause |
//! | `C` / `R` (paused) | Clear / randomize |
//! | `N` held (paused) | Single-step |
//! | `W` / `E` held (paused) | Draw / erase under the mouse |
//! | click (paused) | Toggle the cell under the mouse |
//! | `1`–`4` (simulated hands) | Pinch index / middle / ring / pinky |
//! | `Space` (simulated hands) | Flat open hand |
//! | `[` / `]` (simulated hands) | Narrow / widen the cursor pinch |
//! | `Q` | Quit |

pub mod error;
pub mod hand;
pub mod debounce;
pub mod gesture;
pub mod tracker;
pub mod pacing;
pub mod visualizer;
pub mod app;

pub use error::{Error, Result};
