//! Soft frame-rate cap and periodic throughput logging.

use std::thread;
use std::time::{Duration, Instant};

// ════════════════════════════════════════════════════════════════════════════
// FramePacer
// ════════════════════════════════════════════════════════════════════════════

/// Sleeps away whatever is left of a frame's time budget.  A slow frame is
/// not compensated for on the next one.
#[derive(Debug)]
pub struct FramePacer {
    frame_start: Instant,
}

impl Default for FramePacer {
    fn default() -> Self {
        FramePacer { frame_start: Instant::now() }
    }
}

impl FramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn budget(fps: u32) -> Duration {
        Duration::from_secs(1) / fps.max(1)
    }

    /// Time still to wait at `now` to hold `fps`.
    pub fn remaining(&self, fps: u32, now: Instant) -> Duration {
        Self::budget(fps).saturating_sub(now.saturating_duration_since(self.frame_start))
    }

    pub fn pace(&mut self, fps: u32) {
        let wait = self.remaining(fps, Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        self.frame_start = Instant::now();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Diagnostics
// ════════════════════════════════════════════════════════════════════════════

/// Averages over one reporting window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    pub ticks_per_sec:  f64,
    pub births_per_sec: f64,
    pub live:           usize,
    pub voices:         usize,
}

/// Accumulates per-tick counters and logs a summary every `interval`.
#[derive(Debug)]
pub struct Diagnostics {
    interval:     Duration,
    window_start: Instant,
    ticks:        u64,
    births:       u64,
}

impl Diagnostics {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Diagnostics { interval, window_start: now, ticks: 0, births: 0 }
    }

    /// Count one tick.  Returns (and logs) a report once the interval has
    /// elapsed, then starts a new window.
    pub fn record(&mut self, now: Instant, live: usize, born: usize, voices: usize) -> Option<Report> {
        self.ticks  += 1;
        self.births += born as u64;
        log::trace!("tick: live={live} born={born} voices={voices}");

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }

        let secs = elapsed.as_secs_f64().max(f64::EPSILON);
        let report = Report {
            ticks_per_sec:  self.ticks  as f64 / secs,
            births_per_sec: self.births as f64 / secs,
            live,
            voices,
        };
        log::info!(
            "{:.1} ticks/s, {} live, {:.1} births/s, {} voices",
            report.ticks_per_sec, report.live, report.births_per_sec, report.voices
        );

        self.window_start = now;
        self.ticks  = 0;
        self.births = 0;
        Some(report)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_per_rate() {
        assert_eq!(FramePacer::budget(10),  Duration::from_millis(100));
        assert_eq!(FramePacer::budget(150), Duration::from_secs(1) / 150);
        assert_eq!(FramePacer::budget(0),   Duration::from_secs(1));
    }

    #[test]
    fn remaining_shrinks_and_saturates() {
        let p = FramePacer::new();
        let t = p.frame_start;
        assert_eq!(p.remaining(10, t + Duration::from_millis(30)),  Duration::from_millis(70));
        assert_eq!(p.remaining(10, t + Duration::from_millis(250)), Duration::ZERO);
    }

    #[test]
    fn diagnostics_report_after_interval() {
        let t0 = Instant::now();
        let mut d = Diagnostics::new(Duration::from_secs(2), t0);

        for i in 1..20u64 {
            let now = t0 + Duration::from_millis(100 * i);
            assert!(d.record(now, 50, 3, 4).is_none());
        }
        let r = d.record(t0 + Duration::from_secs(2), 50, 3, 4).unwrap();
        assert!((r.ticks_per_sec  - 10.0).abs() < 1e-9);
        assert!((r.births_per_sec - 30.0).abs() < 1e-9);
        assert_eq!(r.live, 50);
        assert_eq!(r.voices, 4);

        // Counters restart.
        assert!(d.record(t0 + Duration::from_millis(2100), 0, 0, 0).is_none());
    }
}
