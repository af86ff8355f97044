//! Cooldown gate for discrete commands.

use std::collections::HashMap;
use std::hash::Hash;

/// Default cooldown between two triggers of the same gesture command.
pub const COMMAND_COOLDOWN_SECS: f64 = 1.0;

/// Discrete commands issued by the controller hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Randomize,
    Clear,
    ToggleRun,
}

/// Last successful trigger time per command id, in seconds.
#[derive(Clone, Debug)]
pub struct RateLimiter<K = Command> {
    last: HashMap<K, f64>,
}

impl<K: Eq + Hash> Default for RateLimiter<K> {
    fn default() -> Self {
        RateLimiter { last: HashMap::new() }
    }
}

impl<K: Copy + Eq + Hash> RateLimiter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `id` at time `now` if strictly more than `cooldown` seconds
    /// have passed since it last fired.  Ids never fired before are always
    /// eligible.  Only a successful trigger updates the record.
    pub fn try_trigger(&mut self, id: K, now: f64, cooldown: f64) -> bool {
        let eligible = match self.last.get(&id) {
            None       => true,
            Some(&t)   => now - t > cooldown,
        };
        if eligible {
            self.last.insert(id, now);
        }
        eligible
    }

    pub fn last_trigger(&self, id: K) -> Option<f64> {
        self.last.get(&id).copied()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_trigger_always_fires() {
        let mut rl = RateLimiter::new();
        assert!(rl.try_trigger(Command::Clear, -1.0e9, 1.0));
    }

    #[test]
    fn cooldown_window() {
        let mut rl = RateLimiter::new();
        let t0 = 100.0;
        let c  = 1.0;
        assert!(rl.try_trigger(Command::Randomize, t0, c));
        assert!(!rl.try_trigger(Command::Randomize, t0 + c / 2.0, c));
        assert!(rl.try_trigger(Command::Randomize, t0 + c + 1e-6, c));
    }

    #[test]
    fn exactly_equal_does_not_retrigger() {
        let mut rl = RateLimiter::new();
        assert!(rl.try_trigger(Command::ToggleRun, 4.0, 2.0));
        assert!(!rl.try_trigger(Command::ToggleRun, 6.0, 2.0));
        assert_eq!(rl.last_trigger(Command::ToggleRun), Some(4.0));
    }

    #[test]
    fn rejected_attempts_do_not_extend_the_cooldown() {
        let mut rl = RateLimiter::new();
        assert!(rl.try_trigger(Command::Clear, 0.0, 1.0));
        for i in 1..10 {
            assert!(!rl.try_trigger(Command::Clear, i as f64 * 0.1, 1.0));
        }
        assert!(rl.try_trigger(Command::Clear, 1.05, 1.0));
    }

    #[test]
    fn commands_are_independent() {
        let mut rl = RateLimiter::new();
        assert!(rl.try_trigger(Command::Clear, 0.0, 1.0));
        assert!(rl.try_trigger(Command::Randomize, 0.1, 1.0));
        assert!(rl.try_trigger(Command::ToggleRun, 0.2, 1.0));
    }

    #[test]
    fn works_with_other_key_types() {
        let mut rl: RateLimiter<&str> = RateLimiter::new();
        assert!(rl.try_trigger("snap", 0.0, 0.5));
        assert!(!rl.try_trigger("snap", 0.5, 0.5));
    }
}
