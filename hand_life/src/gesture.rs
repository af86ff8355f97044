//! Gesture recognition: turns one frame of hand observations into cursor
//! state, brush flags and discrete commands.
//!
//! # Roles
//!
//! * **Cursor hand** places the brush/probe at the midpoint of thumb tip and
//!   index tip; the pinch width sets the radius.
//! * **Controller hand** issues commands by pinching the thumb against a
//!   finger, or toggles run/pause with a horizontal open hand.
//!
//! With one hand, a `Right` label means cursor and `Left` means controller.
//! With two, the hand whose wrist is further left in the image is the
//! controller.

use life_grid::{CursorMode, CursorState, Geometry};

use crate::debounce::{Command, RateLimiter, COMMAND_COOLDOWN_SECS};
use crate::hand::{
    HandObservation, Handedness, INDEX_MCP, INDEX_TIP, MIDDLE_TIP, PINKY_TIP, RING_TIP,
    THUMB_TIP,
};

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

/// Thumb-to-fingertip distance (normalized) that counts as a pinch.
pub const PINCH_THRESHOLD:    f32 = 0.05;
/// Cursor radius per unit of normalized pinch width.
pub const RADIUS_SENSITIVITY: f32 = 40.0;
pub const MIN_RADIUS:         u32 = 1;
pub const MAX_RADIUS:         u32 = 15;
/// Thumb→index angles within this many degrees of horizontal count as flat.
pub const FLAT_TOLERANCE_DEG: f32 = 25.0;

// ════════════════════════════════════════════════════════════════════════════
// State and events
// ════════════════════════════════════════════════════════════════════════════

/// Interaction state written by the recognizer each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub cursor:  CursorState,
    pub drawing: bool,
    pub erasing: bool,
    pub running: bool,
}

/// Discrete outcome of a frame.  `Randomize` and `Clear` still have to be
/// applied to the grid by the caller; `ToggleRun` has already flipped
/// [`InteractionState::running`] and reports the new value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEvent {
    Randomize,
    Clear,
    ToggleRun { running: bool },
}

// ════════════════════════════════════════════════════════════════════════════
// GestureRecognizer
// ════════════════════════════════════════════════════════════════════════════

pub struct GestureRecognizer {
    limiter:  RateLimiter<Command>,
    geometry: Geometry,
    pinch:    f32,
    cooldown: f64,
}

impl GestureRecognizer {
    pub fn new(geometry: Geometry) -> Self {
        GestureRecognizer {
            limiter:  RateLimiter::new(),
            geometry,
            pinch:    PINCH_THRESHOLD,
            cooldown: COMMAND_COOLDOWN_SECS,
        }
    }

    pub fn with_cooldown(mut self, cooldown: f64) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Process one frame.  `now` is monotonic time in seconds.
    ///
    /// The cursor and both brush flags are reset before anything else, so a
    /// frame without a cursor hand hides the cursor.  The radius survives.
    pub fn recognize(
        &mut self,
        hands: &[HandObservation],
        state: &mut InteractionState,
        now:   f64,
    ) -> Vec<GestureEvent> {
        state.cursor.hide();
        state.drawing = false;
        state.erasing = false;

        let (cursor_hand, controller_hand) = assign_roles(hands);
        let mut events = Vec::new();

        if let Some(hand) = controller_hand {
            self.control(hand, state, now, &mut events);
        }
        if let Some(hand) = cursor_hand {
            self.place_cursor(hand, state);
        }

        state.cursor.mode = CursorMode::from_flags(state.drawing, state.erasing);
        events
    }

    fn place_cursor(&self, hand: &HandObservation, state: &mut InteractionState) {
        let thumb = hand.thumb_tip();
        let index = hand.index_tip();
        let mid   = thumb.midpoint(index);

        state.cursor.pos    = Some(self.geometry.normalized_to_pixel(mid.x, mid.y));
        state.cursor.radius = pinch_radius(thumb.distance(index));
    }

    fn control(
        &mut self,
        hand:   &HandObservation,
        state:  &mut InteractionState,
        now:    f64,
        events: &mut Vec<GestureEvent>,
    ) {
        let thumb   = hand.thumb_tip();
        let pinched = |tip: usize| thumb.distance(hand.point(tip)) < self.pinch;

        // First matching finger wins.
        if pinched(INDEX_TIP) {
            state.drawing = true;
        } else if pinched(MIDDLE_TIP) {
            state.erasing = true;
        } else if pinched(RING_TIP) {
            if !state.running
                && self.limiter.try_trigger(Command::Randomize, now, self.cooldown)
            {
                events.push(GestureEvent::Randomize);
            }
        } else if pinched(PINKY_TIP)
            && !state.running
            && self.limiter.try_trigger(Command::Clear, now, self.cooldown)
        {
            events.push(GestureEvent::Clear);
        }

        if is_flat_open(hand) && self.limiter.try_trigger(Command::ToggleRun, now, self.cooldown) {
            state.running = !state.running;
            log::info!("gesture: {}", if state.running { "run" } else { "pause" });
            events.push(GestureEvent::ToggleRun { running: state.running });
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Geometry helpers
// ════════════════════════════════════════════════════════════════════════════

/// Split a frame into `(cursor, controller)` hands.
///
/// Frames with zero or more than two hands yield neither role.
pub fn assign_roles(hands: &[HandObservation]) -> (Option<&HandObservation>, Option<&HandObservation>) {
    match hands {
        [only] => match only.handedness {
            Handedness::Right => (Some(only), None),
            Handedness::Left  => (None, Some(only)),
        },
        [a, b] => {
            if a.wrist().x <= b.wrist().x {
                (Some(b), Some(a))
            } else {
                (Some(a), Some(b))
            }
        }
        _ => (None, None),
    }
}

/// Radius in cells for a thumb–index distance `d`.
pub fn pinch_radius(d: f32) -> u32 {
    let r = (RADIUS_SENSITIVITY * d).floor().max(0.0) as u32;
    r.clamp(MIN_RADIUS, MAX_RADIUS)
}

/// Angle of the thumb→index vector in degrees, `(-180, 180]`.
pub fn thumb_index_angle(hand: &HandObservation) -> f32 {
    let t = hand.thumb_tip();
    let i = hand.index_tip();
    (i.y - t.y).atan2(i.x - t.x).to_degrees()
}

/// Thumb and index roughly level, and spread wider than the index finger is
/// long (tip to knuckle).
pub fn is_flat_open(hand: &HandObservation) -> bool {
    let a = thumb_index_angle(hand);
    let horizontal = a.abs() < FLAT_TOLERANCE_DEG || a.abs() > 180.0 - FLAT_TOLERANCE_DEG;
    let open = hand.point(THUMB_TIP).distance(hand.point(INDEX_TIP))
        > hand.point(INDEX_TIP).distance(hand.point(INDEX_MCP));
    horizontal && open
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{Landmark, LANDMARK_COUNT, WRIST};

    fn geometry() -> Geometry {
        Geometry::new(100, 100, 10)
    }

    /// A hand with every landmark parked far from each other, then the
    /// given overrides applied.
    fn hand(handedness: Handedness, overrides: &[(usize, f32, f32)]) -> HandObservation {
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            // Spread on a diagonal so no two points are within pinch range.
            *lm = Landmark::new(0.02 + i as f32 * 0.045, 0.95 - i as f32 * 0.04);
        }
        for &(i, x, y) in overrides {
            landmarks[i] = Landmark::new(x, y);
        }
        HandObservation { landmarks, handedness }
    }

    fn controller_pinching(tip: usize) -> HandObservation {
        let t = hand(Handedness::Left, &[]).point(tip);
        hand(Handedness::Left, &[(THUMB_TIP, t.x + 0.01, t.y)])
    }

    fn flat_controller() -> HandObservation {
        hand(Handedness::Left, &[
            (THUMB_TIP, 0.10, 0.50),
            (INDEX_TIP, 0.40, 0.52),
            (INDEX_MCP, 0.35, 0.60),
        ])
    }

    fn cursor_hand(thumb: (f32, f32), index: (f32, f32)) -> HandObservation {
        hand(Handedness::Right, &[(THUMB_TIP, thumb.0, thumb.1), (INDEX_TIP, index.0, index.1)])
    }

    #[test]
    fn no_hands_clears_cursor_but_keeps_radius() {
        let mut rec   = GestureRecognizer::new(geometry());
        let mut state = InteractionState::default();
        state.cursor  = CursorState::at(10, 10, 7);
        state.drawing = true;

        let events = rec.recognize(&[], &mut state, 0.0);
        assert!(events.is_empty());
        assert!(!state.cursor.is_present());
        assert_eq!(state.cursor.radius, 7);
        assert!(!state.drawing);
    }

    #[test]
    fn three_hands_count_as_none() {
        let mut rec   = GestureRecognizer::new(geometry());
        let mut state = InteractionState::default();
        let c = cursor_hand((0.5, 0.5), (0.6, 0.5));
        rec.recognize(&[c.clone(), c.clone(), c], &mut state, 0.0);
        assert!(!state.cursor.is_present());
    }

    #[test]
    fn single_right_hand_is_cursor() {
        let mut rec   = GestureRecognizer::new(geometry());
        let mut state = InteractionState::default();
        // Midpoint (0.5, 0.25); distance 0.2 → radius floor(8.0) = 8.
        rec.recognize(&[cursor_hand((0.4, 0.25), (0.6, 0.25))], &mut state, 0.0);
        assert_eq!(state.cursor.pos, Some((500, 250)));
        assert_eq!(state.cursor.radius, 8);
        assert_eq!(state.cursor.mode, CursorMode::Hovering);
    }

    #[test]
    fn radius_is_clamped() {
        assert_eq!(pinch_radius(0.0), 1);
        assert_eq!(pinch_radius(0.01), 1);
        assert_eq!(pinch_radius(0.1), 4);
        assert_eq!(pinch_radius(1.0), 15);
    }

    #[test]
    fn single_left_hand_is_controller() {
        let mut rec   = GestureRecognizer::new(geometry());
        let mut state = InteractionState::default();
        rec.recognize(&[controller_pinching(INDEX_TIP)], &mut state, 0.0);
        assert!(state.drawing);
        assert!(!state.cursor.is_present());
    }

    #[test]
    fn two_hands_are_split_by_wrist_x() {
        let mut rec   = GestureRecognizer::new(geometry());
        let mut state = InteractionState::default();

        // Labels are deliberately wrong; position decides.
        let mut controller = controller_pinching(MIDDLE_TIP);
        controller.handedness = Handedness::Right;
        controller.landmarks[WRIST] = Landmark::new(0.05, 0.9);

        let mut cursor = cursor_hand((0.7, 0.5), (0.8, 0.5));
        cursor.handedness = Handedness::Left;
        cursor.landmarks[WRIST] = Landmark::new(0.75, 0.9);

        rec.recognize(&[cursor, controller], &mut state, 0.0);
        assert!(state.erasing);
        assert_eq!(state.cursor.mode, CursorMode::Erasing);
        assert_eq!(state.cursor.pos, Some((750, 500)));

        // Equal wrist x: the first hand listed controls.
        let mut first  = controller_pinching(MIDDLE_TIP);
        let mut second = cursor_hand((0.7, 0.5), (0.8, 0.5));
        first.handedness  = Handedness::Right;
        second.handedness = Handedness::Left;
        first.landmarks[WRIST]  = Landmark::new(0.5, 0.9);
        second.landmarks[WRIST] = Landmark::new(0.5, 0.9);
        let hands = [first, second];
        assert_eq!(assign_roles(&hands), (Some(&hands[1]), Some(&hands[0])));
    }

    #[test]
    fn index_pinch_beats_middle_pinch() {
        let mut rec   = GestureRecognizer::new(geometry());
        let mut state = InteractionState::default();
        let base  = hand(Handedness::Left, &[]);
        let index = base.point(INDEX_TIP);
        // Thumb, index tip and middle tip all bunched together.
        let h = hand(Handedness::Left, &[
            (THUMB_TIP,  index.x, index.y),
            (MIDDLE_TIP, index.x + 0.01, index.y),
        ]);
        rec.recognize(&[h], &mut state, 0.0);
        assert!(state.drawing);
        assert!(!state.erasing);
    }

    #[test]
    fn ring_pinch_randomizes_only_while_paused() {
        let mut rec   = GestureRecognizer::new(geometry());
        let mut state = InteractionState { running: true, ..Default::default() };
        let h = controller_pinching(RING_TIP);

        assert!(rec.recognize(&[h.clone()], &mut state, 0.0).is_empty());

        state.running = false;
        assert_eq!(rec.recognize(&[h.clone()], &mut state, 0.1), vec![GestureEvent::Randomize]);
        // Still held inside the cooldown: nothing.
        assert!(rec.recognize(&[h.clone()], &mut state, 0.6).is_empty());
        assert_eq!(rec.recognize(&[h], &mut state, 1.2), vec![GestureEvent::Randomize]);
    }

    #[test]
    fn pinky_pinch_clears_while_paused() {
        let mut rec   = GestureRecognizer::new(geometry());
        let mut state = InteractionState::default();
        let events = rec.recognize(&[controller_pinching(PINKY_TIP)], &mut state, 3.0);
        assert_eq!(events, vec![GestureEvent::Clear]);
    }

    #[test]
    fn flat_open_hand_toggles_with_debounce() {
        let mut rec   = GestureRecognizer::new(geometry());
        let mut state = InteractionState::default();
        let h = flat_controller();
        assert!(is_flat_open(&h));

        let ev = rec.recognize(&[h.clone()], &mut state, 10.0);
        assert_eq!(ev, vec![GestureEvent::ToggleRun { running: true }]);
        assert!(state.running);

        // Held for half a second: no flapping.
        assert!(rec.recognize(&[h.clone()], &mut state, 10.5).is_empty());
        assert!(state.running);

        let ev = rec.recognize(&[h], &mut state, 11.1);
        assert_eq!(ev, vec![GestureEvent::ToggleRun { running: false }]);
        assert!(!state.running);
    }

    #[test]
    fn vertical_or_closed_hand_does_not_toggle() {
        let vertical = hand(Handedness::Left, &[
            (THUMB_TIP, 0.30, 0.70),
            (INDEX_TIP, 0.32, 0.20),
            (INDEX_MCP, 0.31, 0.60),
        ]);
        assert!(!is_flat_open(&vertical));

        // Level, but the thumb is closer to the index tip than the knuckle is.
        let closed = hand(Handedness::Left, &[
            (THUMB_TIP, 0.30, 0.50),
            (INDEX_TIP, 0.40, 0.50),
            (INDEX_MCP, 0.40, 0.80),
        ]);
        assert!(!is_flat_open(&closed));
    }

    #[test]
    fn angle_wraps_near_180() {
        let leftward = hand(Handedness::Left, &[
            (THUMB_TIP, 0.60, 0.50),
            (INDEX_TIP, 0.20, 0.52),
            (INDEX_MCP, 0.25, 0.60),
        ]);
        assert!(thumb_index_angle(&leftward).abs() > 155.0);
        assert!(is_flat_open(&leftward));
    }
}
