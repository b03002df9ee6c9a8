//! Game clock for timestamp-based expiry checks
//!
//! Managers never read wall-clock time. Each owns a clock that only moves
//! when the scheduler calls `tick(dt)`, which keeps every window and
//! cooldown deterministic under test.

use serde::{Deserialize, Serialize};

use crate::core::types::Timestamp;

/// Monotonic game clock measured in seconds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameClock {
    elapsed: Timestamp,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn now(&self) -> Timestamp {
        self.elapsed
    }
}
