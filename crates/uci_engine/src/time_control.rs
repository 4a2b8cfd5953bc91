//! Thinking-time budgets for engine requests.
//!
//! Stronger settings get proportionally more time: the budget grows linearly
//! from the base at the lowest rating up to `MAX_TIME_SCALE` times the base at
//! full strength.

use std::time::Duration;

use crate::strength::Strength;

/// Default base thinking time per engine move.
pub const DEFAULT_MOVE_TIME: Duration = Duration::from_millis(200);

/// Budget multiplier at full strength.
pub const MAX_TIME_SCALE: f64 = 1.5;

/// Slack on top of the thinking time before a silent engine counts as hung.
pub const REPLY_GRACE: Duration = Duration::from_secs(5);

/// Upper bound for a depth-limited analysis.
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Base thinking time, scaled per request by strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveBudget {
    base: Duration,
}

impl MoveBudget {
    /// A zero base is bumped to one millisecond so `go movetime` stays valid.
    pub fn new(base: Duration) -> Self {
        Self {
            base: base.max(Duration::from_millis(1)),
        }
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    /// Thinking time for a request at `strength`.
    pub fn for_strength(&self, strength: Strength) -> Duration {
        let scale = 1.0 + strength.fraction() * (MAX_TIME_SCALE - 1.0);
        let micros = (self.base.as_micros() as f64 * scale).round();
        Duration::from_micros(micros as u64)
    }

    /// How long to wait for `bestmove` before giving up on the engine.
    pub fn reply_deadline(&self, strength: Strength) -> Duration {
        self.for_strength(strength) + REPLY_GRACE
    }
}

impl Default for MoveBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_TIME)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
