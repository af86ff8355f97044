//! Hand observations: 21 normalized landmarks plus a handedness label.
//!
//! Landmark numbering follows the common 21-point hand topology:
//!
//! ```text
//!            8   12  16  20        tips
//!            7   11  15  19
//!        4   6   10  14  18
//!        3   5    9  13  17        5 = index knuckle
//!        2
//!         1
//!              0                   wrist
//! ```

/// Points per hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP:   usize = 16;
pub const PINKY_TIP:  usize = 20;

/// A point in normalized image space, `x` and `y` in `[0, 1]`, `y` down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y }
    }

    pub fn distance(self, other: Landmark) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Landmark) -> Landmark {
        Landmark::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse a detector label such as `"Left"` / `"Right"`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "left"  => Some(Handedness::Left),
            "right" => Some(Handedness::Right),
            _       => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandObservation
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    pub landmarks:  [Landmark; LANDMARK_COUNT],
    pub handedness: Handedness,
}

impl HandObservation {
    /// Build from raw detector output.
    ///
    /// Returns `None` unless there are exactly 21 finite points.  Points are
    /// clamped into `[0, 1]`; detectors report slightly out-of-frame
    /// fingertips as values just outside that range.
    pub fn from_points(points: &[(f32, f32)], handedness: Handedness) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            return None;
        }
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (slot, &(x, y)) in landmarks.iter_mut().zip(points) {
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            *slot = Landmark::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
        }
        Some(HandObservation { landmarks, handedness })
    }

    pub fn point(&self, i: usize) -> Landmark { self.landmarks[i] }

    pub fn wrist(&self)     -> Landmark { self.landmarks[WRIST] }
    pub fn thumb_tip(&self) -> Landmark { self.landmarks[THUMB_TIP] }
    pub fn index_tip(&self) -> Landmark { self.landmarks[INDEX_TIP] }
}

/// Collapse a frame's detections: a single malformed hand makes the whole
/// frame count as "no hands".
pub fn frame_or_empty<I>(detections: I) -> Vec<HandObservation>
where
    I: IntoIterator<Item = Option<HandObservation>>,
{
    detections.into_iter().collect::<Option<Vec<_>>>().unwrap_or_default()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<(f32, f32)> {
        (0..n).map(|i| (i as f32 / 40.0, 0.5)).collect()
    }

    #[test]
    fn wrong_point_count_is_rejected() {
        assert!(HandObservation::from_points(&points(20), Handedness::Left).is_none());
        assert!(HandObservation::from_points(&points(22), Handedness::Left).is_none());
        assert!(HandObservation::from_points(&points(21), Handedness::Left).is_some());
    }

    #[test]
    fn nan_is_rejected() {
        let mut p = points(21);
        p[7].1 = f32::NAN;
        assert!(HandObservation::from_points(&p, Handedness::Right).is_none());
    }

    #[test]
    fn out_of_frame_points_are_clamped() {
        let mut p = points(21);
        p[8] = (1.05, -0.02);
        let h = HandObservation::from_points(&p, Handedness::Right).unwrap();
        assert_eq!(h.index_tip(), Landmark::new(1.0, 0.0));
    }

    #[test]
    fn one_bad_detection_empties_the_frame() {
        let good = HandObservation::from_points(&points(21), Handedness::Left);
        assert_eq!(frame_or_empty(vec![good.clone(), None]).len(), 0);
        assert_eq!(frame_or_empty(vec![good.clone(), good]).len(), 2);
    }

    #[test]
    fn labels_parse() {
        assert_eq!(Handedness::from_label("Right"), Some(Handedness::Right));
        assert_eq!(Handedness::from_label(" left "), Some(Handedness::Left));
        assert_eq!(Handedness::from_label("unknown"), None);
    }

    #[test]
    fn distance_and_midpoint() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(0.3, 0.4);
        assert!((a.distance(b) - 0.5).abs() < 1e-6);
        assert_eq!(a.midpoint(b), Landmark::new(0.15, 0.2));
    }
}
