//! Hand trackers: where [`HandObservation`]s come from.
//!
//! The recognizer only sees `Vec<HandObservation>` per frame and does not
//! know whether it came from hardware, the keyboard/mouse simulator or a
//! fixed script.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};

use crate::error::{Error, Result};
use crate::hand::{HandObservation, Handedness, Landmark, LANDMARK_COUNT, INDEX_TIP, THUMB_TIP};

// ════════════════════════════════════════════════════════════════════════════
// HandTracker trait
// ════════════════════════════════════════════════════════════════════════════

/// A per-frame source of hand observations.
pub trait HandTracker {
    /// Hands visible in the newest frame.  An error means the device is
    /// gone and is not retried.
    fn poll(&mut self) -> Result<Vec<HandObservation>>;
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedHandTracker — fixed frames, for tests and demos
// ════════════════════════════════════════════════════════════════════════════

/// Replays a fixed list of frames, then reports a capture failure.
#[derive(Debug, Default)]
pub struct ScriptedHandTracker {
    frames: VecDeque<Vec<HandObservation>>,
}

impl ScriptedHandTracker {
    pub fn new<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Vec<HandObservation>>,
    {
        ScriptedHandTracker { frames: frames.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize { self.frames.len() }
}

impl HandTracker for ScriptedHandTracker {
    fn poll(&mut self) -> Result<Vec<HandObservation>> {
        self.frames
            .pop_front()
            .ok_or_else(|| Error::Capture("scripted frames exhausted".into()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandTracker — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse position, normalized to the render surface; `None` when the
    /// pointer leaves the window.
    Pointer(Option<(f32, f32)>),
    KeyDown(SimKey),
    KeyUp(SimKey),
}

/// Simulated key codes (mapped from minifb keys by the visualizer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    PinchIndex,   // 1
    PinchMiddle,  // 2
    PinchRing,    // 3
    PinchPinky,   // 4
    FlatOpen,     // Space
    Narrow,       // [
    Widen,        // ]
}

impl SimKey {
    /// Fingertip the thumb touches for a pinch key.
    fn pinch_tip(self) -> Option<usize> {
        use crate::hand::{MIDDLE_TIP, PINKY_TIP, RING_TIP};
        match self {
            SimKey::PinchIndex  => Some(INDEX_TIP),
            SimKey::PinchMiddle => Some(MIDDLE_TIP),
            SimKey::PinchRing   => Some(RING_TIP),
            SimKey::PinchPinky  => Some(PINKY_TIP),
            _                   => None,
        }
    }
}

const CONTROLLER_WRIST: (f32, f32) = (0.25, 0.85);
const DEFAULT_SPREAD:   f32 = 0.1;
const SPREAD_STEP:      f32 = 0.025;
const MAX_SPREAD:       f32 = 0.375;

/// Synthesizes a controller hand (always present, left of frame) and a
/// cursor hand that follows the mouse.
pub struct SimHandTracker {
    rx:      Receiver<SimInput>,
    pointer: Option<(f32, f32)>,
    pose:    Option<SimKey>,
    spread:  f32,
}

impl SimHandTracker {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHandTracker { rx, pointer: None, pose: None, spread: DEFAULT_SPREAD }
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer(p) => self.pointer = p,
            SimInput::KeyDown(SimKey::Narrow) => {
                self.spread = (self.spread - SPREAD_STEP).max(0.0);
            }
            SimInput::KeyDown(SimKey::Widen) => {
                self.spread = (self.spread + SPREAD_STEP).min(MAX_SPREAD);
            }
            SimInput::KeyDown(key) => self.pose = Some(key),
            SimInput::KeyUp(key) => {
                if self.pose == Some(key) {
                    self.pose = None;
                }
            }
        }
    }

    fn frame(&self) -> Vec<HandObservation> {
        let mut hands = vec![controller_pose(self.pose)];
        if let Some((x, y)) = self.pointer {
            hands.push(cursor_pose(x, y, self.spread));
        }
        hands
    }
}

impl HandTracker for SimHandTracker {
    fn poll(&mut self) -> Result<Vec<HandObservation>> {
        loop {
            match self.rx.try_recv() {
                Ok(input)                       => self.apply(input),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(Error::Capture("simulated input channel closed".into()));
                }
            }
        }
        Ok(self.frame())
    }
}

/// Upright hand with the fingers fanned out, every fingertip well outside
/// pinch range of the thumb.
fn relaxed_hand(wx: f32, wy: f32) -> [Landmark; LANDMARK_COUNT] {
    const OFFSETS: [(f32, f32); LANDMARK_COUNT] = [
        ( 0.00,  0.00),                                            // wrist
        (-0.03, -0.04), (-0.06, -0.08), (-0.08, -0.12), (-0.10, -0.18), // thumb
        (-0.03, -0.12), (-0.04, -0.20), (-0.05, -0.27), (-0.06, -0.35), // index
        ( 0.00, -0.13), ( 0.00, -0.22), ( 0.00, -0.29), ( 0.00, -0.37), // middle
        ( 0.03, -0.12), ( 0.04, -0.20), ( 0.05, -0.27), ( 0.06, -0.34), // ring
        ( 0.06, -0.10), ( 0.08, -0.16), ( 0.10, -0.22), ( 0.12, -0.28), // pinky
    ];
    let mut out = [Landmark::default(); LANDMARK_COUNT];
    for (lm, (dx, dy)) in out.iter_mut().zip(OFFSETS) {
        *lm = Landmark::new((wx + dx).clamp(0.0, 1.0), (wy + dy).clamp(0.0, 1.0));
    }
    out
}

fn controller_pose(pose: Option<SimKey>) -> HandObservation {
    let (wx, wy) = CONTROLLER_WRIST;
    let mut landmarks = relaxed_hand(wx, wy);

    match pose {
        Some(SimKey::FlatOpen) => {
            landmarks[THUMB_TIP] = Landmark::new(wx - 0.20, wy - 0.20);
            landmarks[INDEX_TIP] = Landmark::new(wx + 0.10, wy - 0.20);
        }
        Some(key) => {
            if let Some(tip) = key.pinch_tip() {
                landmarks[THUMB_TIP] = landmarks[tip];
            }
        }
        None => {}
    }
    HandObservation { landmarks, handedness: Handedness::Left }
}

/// The wrist stays right of the controller's so two-hand role assignment
/// never swaps the hands, wherever the pointer is.
fn cursor_pose(x: f32, y: f32, spread: f32) -> HandObservation {
    let wrist_x = x.max(CONTROLLER_WRIST.0 + 0.05);
    let mut landmarks = relaxed_hand(wrist_x, (y + 0.3).min(1.0));
    let half = spread / 2.0;
    landmarks[THUMB_TIP] = Landmark::new(x - half, y);
    landmarks[INDEX_TIP] = Landmark::new(x + half, y);
    HandObservation { landmarks, handedness: Handedness::Right }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandTracker — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "leap")]
pub use leap::LeapHandTracker;

#[cfg(feature = "leap")]
mod leap {
    use leaprs::*;

    use super::HandTracker;
    use crate::error::{Error, Result};
    use crate::hand::{frame_or_empty, HandObservation, Handedness};

    /// Interaction box mapped onto the unit square, in millimetres.
    const X_RANGE: (f32, f32) = (-200.0, 200.0);
    const Y_RANGE: (f32, f32) = (100.0, 500.0);
    const POLL_TIMEOUT_MS: u32 = 100;
    /// Consecutive polls without a tracking frame before giving up.
    const MAX_IDLE_POLLS:  u32 = 50;

    /// Hand source backed by a LeapMotion controller.
    ///
    /// Requires the `leap` feature flag and the LeapC shared library.  Each
    /// digit contributes four joints (base, two knuckles, tip) in the usual
    /// 21-point order; the index metacarpal base stands in for the wrist.
    pub struct LeapHandTracker {
        connection: Connection,
    }

    impl LeapHandTracker {
        pub fn open() -> Result<Self> {
            let mut connection = Connection::create(ConnectionConfig::default())
                .map_err(|e| Error::Capture(format!("LeapC connection: {e:?}")))?;
            connection
                .open()
                .map_err(|e| Error::Capture(format!("LeapMotion device: {e:?}")))?;
            log::info!("LeapMotion connection open");
            Ok(LeapHandTracker { connection })
        }
    }

    impl HandTracker for LeapHandTracker {
        fn poll(&mut self) -> Result<Vec<HandObservation>> {
            for _ in 0..MAX_IDLE_POLLS {
                let msg = match self.connection.poll(POLL_TIMEOUT_MS) {
                    Ok(m)  => m,
                    Err(_) => continue,
                };
                if let Event::Tracking(frame) = msg.event() {
                    let hands: Vec<_> = frame.hands().collect();
                    return Ok(frame_or_empty(hands.iter().map(observe)));
                }
            }
            Err(Error::Capture("no tracking frames from LeapMotion".into()))
        }
    }

    fn normalize(x: f32, y: f32) -> (f32, f32) {
        let nx = (x - X_RANGE.0) / (X_RANGE.1 - X_RANGE.0);
        let ny = 1.0 - (y - Y_RANGE.0) / (Y_RANGE.1 - Y_RANGE.0);
        (nx, ny)
    }

    fn observe(hand: &Hand) -> Option<HandObservation> {
        let digits: Vec<_> = hand.digits().collect();
        if digits.len() < 5 {
            return None;
        }

        let wrist = digits[1].metacarpal().prev_joint();
        let mut points = vec![normalize(wrist.x, wrist.y)];
        for d in &digits[..5] {
            for joint in [
                d.proximal().prev_joint(),
                d.intermediate().prev_joint(),
                d.distal().prev_joint(),
                d.distal().next_joint(),
            ] {
                points.push(normalize(joint.x, joint.y));
            }
        }

        let handedness = match hand.hand_type() {
            HandType::Left  => Handedness::Left,
            HandType::Right => Handedness::Right,
        };
        HandObservation::from_points(&points, handedness)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
