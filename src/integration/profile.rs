//! Engagement profiles for game systems and players

use std::collections::VecDeque;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerId, Timestamp};

/// Declarative system definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSeed {
    pub name: String,
    /// Multiplier applied to every reward earned in this system
    #[serde(default = "default_multiplier")]
    pub base_multiplier: f32,
}

fn default_multiplier() -> f32 {
    1.0
}

impl SystemSeed {
    pub fn new(name: &str, base_multiplier: f32) -> Self {
        Self {
            name: name.into(),
            base_multiplier,
        }
    }
}

/// Engagement record for one game system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemProfile {
    pub name: String,
    pub base_multiplier: f32,
    pub last_activity: Option<Timestamp>,
    pub interaction_count: u32,
    /// Running average: each interaction halves the distance to the new score
    pub average_engagement: f32,
}

impl SystemProfile {
    pub fn from_seed(seed: &SystemSeed) -> Self {
        Self {
            name: seed.name.clone(),
            base_multiplier: seed.base_multiplier,
            last_activity: None,
            interaction_count: 0,
            average_engagement: 0.0,
        }
    }

    pub fn record(&mut self, engagement: f32, now: Timestamp) {
        self.last_activity = Some(now);
        self.interaction_count += 1;
        self.average_engagement = (self.average_engagement + engagement) / 2.0;
    }

    /// Whether the system saw activity less than `window` seconds ago
    pub fn active_within(&self, now: Timestamp, window: f64) -> bool {
        self.last_activity.map_or(false, |t| now - t < window)
    }
}

/// One entry in a player's recent-activity ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub system: String,
    pub interaction: String,
    pub timestamp: Timestamp,
}

/// Cross-system usage for one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerIntegrationProfile {
    pub player: PlayerId,
    pub system_usage: AHashMap<String, u32>,
    pub favorite_system: Option<String>,
    pub recent_activity: VecDeque<RecentActivity>,
    pub total_interactions: u32,
    pub total_bonus_earned: f32,
    pub first_seen: Timestamp,
    pub last_seen: Timestamp,
}

impl PlayerIntegrationProfile {
    pub fn new(player: PlayerId, now: Timestamp) -> Self {
        Self {
            player,
            system_usage: AHashMap::new(),
            favorite_system: None,
            recent_activity: VecDeque::new(),
            total_interactions: 0,
            total_bonus_earned: 0.0,
            first_seen: now,
            last_seen: now,
        }
    }

    pub fn record(&mut self, system: &str, interaction: &str, now: Timestamp, recent_cap: usize) {
        let count = {
            let entry = self.system_usage.entry(system.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        self.total_interactions += 1;
        self.last_seen = now;

        // Favorite only changes on a strictly higher count
        let favorite_count = self
            .favorite_system
            .as_ref()
            .and_then(|f| self.system_usage.get(f))
            .copied()
            .unwrap_or(0);
        if self.favorite_system.is_none() || count > favorite_count {
            self.favorite_system = Some(system.to_string());
        }

        self.recent_activity.push_back(RecentActivity {
            system: system.to_string(),
            interaction: interaction.to_string(),
            timestamp: now,
        });
        while self.recent_activity.len() > recent_cap {
            self.recent_activity.pop_front();
        }
    }

    pub fn usage(&self, system: &str) -> u32 {
        self.system_usage.get(system).copied().unwrap_or(0)
    }

    pub fn distinct_systems(&self) -> usize {
        self.system_usage.len()
    }

    pub fn max_single_system_usage(&self) -> u32 {
        self.system_usage.values().copied().max().unwrap_or(0)
    }
}
