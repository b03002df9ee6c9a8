//! Per-(system, player) engagement streaks

use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerId, Timestamp, SECONDS_PER_DAY};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    /// Multiplier for a streak of one
    pub base_multiplier: f32,
    /// Added per interaction after the first
    pub increment: f32,
    /// Hard cap on the streak multiplier
    pub max_multiplier: f32,
    /// Inactivity after which a streak ends (seconds)
    pub expiry_secs: f64,
    /// Engagement score an interaction needs to count toward a streak
    pub min_engagement: f32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            base_multiplier: 1.0,
            increment: 0.1,
            max_multiplier: 2.0,
            expiry_secs: SECONDS_PER_DAY,
            min_engagement: 0.5,
        }
    }
}

/// Multiplier for a streak of `count` interactions, capped at the configured max
pub fn streak_multiplier(count: u32, config: &StreakConfig) -> f32 {
    let steps = count.saturating_sub(1) as f32;
    (config.base_multiplier + steps * config.increment).min(config.max_multiplier)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Streak {
    pub system: String,
    pub player: PlayerId,
    pub count: u32,
    pub best_count: u32,
    pub active: bool,
    pub started_at: Timestamp,
    pub last_activity: Timestamp,
}

/// What happened to a streak on a qualifying interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    Started,
    Extended(u32),
}

impl Streak {
    pub fn new(system: &str, player: PlayerId, now: Timestamp) -> Self {
        Self {
            system: system.to_string(),
            player,
            count: 1,
            best_count: 1,
            active: true,
            started_at: now,
            last_activity: now,
        }
    }

    /// Count a qualifying interaction. An inactive or lapsed streak restarts at one.
    pub fn bump(&mut self, now: Timestamp, expiry_secs: f64) -> StreakChange {
        let lapsed = now - self.last_activity > expiry_secs;
        let change = if self.active && !lapsed {
            self.count += 1;
            StreakChange::Extended(self.count)
        } else {
            self.count = 1;
            self.active = true;
            self.started_at = now;
            StreakChange::Started
        };
        self.best_count = self.best_count.max(self.count);
        self.last_activity = now;
        change
    }

    /// Deactivate if idle past the expiry window, returns true if it just ended
    pub fn expire(&mut self, now: Timestamp, expiry_secs: f64) -> bool {
        if self.active && now - self.last_activity > expiry_secs {
            self.active = false;
            return true;
        }
        false
    }

    pub fn multiplier(&self, config: &StreakConfig) -> f32 {
        streak_multiplier(self.count, config)
    }
}
