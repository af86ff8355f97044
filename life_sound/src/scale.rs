//! Pitch sets used to quantize continuous pitch.
//!
//! Pitch is measured in octaves (1 V/oct).  Quantizing keeps the integer
//! octave and snaps the fractional part onto the nearest scale tone.

/// Distances closer than this count as a tie.
const TIE_EPSILON: f32 = 1e-6;

/// A pitch collection, as semitone offsets from the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scale {
    /// Ascending semitone offsets, e.g. `[0,2,4,5,7,9,11]` for major.
    pub intervals: Vec<u8>,
    pub name:      &'static str,
}

impl Scale {
    /// Major scale (Ionian): W W H W W W H
    pub fn major() -> Self {
        Scale { intervals: vec![0, 2, 4, 5, 7, 9, 11], name: "Major" }
    }
    /// Major seventh chord: root, major third, fifth, major seventh.
    pub fn major_seventh() -> Self {
        Scale { intervals: vec![0, 4, 7, 11], name: "Major Seventh" }
    }
    pub fn custom(intervals: Vec<u8>) -> Self {
        Scale { intervals, name: "Custom" }
    }

    pub fn len(&self)      -> usize { self.intervals.len() }
    pub fn is_empty(&self) -> bool  { self.intervals.is_empty() }

    /// Scale tones as fractions of an octave.
    pub fn tones(&self) -> impl Iterator<Item = f32> + '_ {
        self.intervals.iter().map(|&s| s as f32 / 12.0)
    }

    /// Snap `pitch` (octaves) to this scale.
    ///
    /// The integer octave is kept; the fractional part moves to the nearest
    /// tone, with ties going to the lower scale degree.  An empty scale
    /// returns the input unchanged.
    pub fn quantize(&self, pitch: f32) -> f32 {
        let octave = pitch.floor();
        let frac   = pitch - octave;

        let mut best: Option<(f32, f32)> = None; // (tone, distance)
        for tone in self.tones() {
            let d = (frac - tone).abs();
            match best {
                Some((_, bd)) if d >= bd - TIE_EPSILON => {}
                _ => best = Some((tone, d)),
            }
        }
        match best {
            Some((tone, _)) => octave + tone,
            None            => pitch,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn exact_tones_are_fixed_points() {
        let s = Scale::major();
        for semis in [0u8, 2, 4, 5, 7, 9, 11] {
            let p = 3.0 + semis as f32 / 12.0;
            assert!(approx(s.quantize(p), p));
        }
    }

    #[test]
    fn snaps_to_nearest_chord_tone() {
        let s = Scale::major_seventh();
        // 5/12 is nearer 4/12 than 7/12
        assert!(approx(s.quantize(1.0 + 5.0 / 12.0), 1.0 + 4.0 / 12.0));
        // 10/12 is nearer 11/12 than 7/12
        assert!(approx(s.quantize(10.0 / 12.0), 11.0 / 12.0));
    }

    #[test]
    fn tie_goes_to_lower_degree() {
        let s = Scale::major();
        // 1/12 sits exactly between 0 and 2/12
        assert!(approx(s.quantize(1.0 / 12.0), 0.0));
        assert!(approx(s.quantize(2.0 + 1.0 / 12.0), 2.0));
        let chord = Scale::major_seventh();
        // 2/12 sits exactly between 0 and 4/12
        assert!(approx(chord.quantize(-1.0 + 2.0 / 12.0), -1.0));
    }

    #[test]
    fn negative_pitch_keeps_floor_octave() {
        let s = Scale::major();
        // -2.9 → octave -3, fraction 0.1, nearest tone 2/12
        assert!(approx(s.quantize(-2.9), -3.0 + 2.0 / 12.0));
    }

    #[test]
    fn high_fraction_stays_in_octave() {
        let s = Scale::major_seventh();
        assert!(approx(s.quantize(0.99), 11.0 / 12.0));
    }

    #[test]
    fn empty_scale_is_identity() {
        let s = Scale::custom(vec![]);
        assert!(approx(s.quantize(1.234), 1.234));
    }
}
