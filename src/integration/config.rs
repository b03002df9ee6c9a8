//! Integrator configuration and built-in system, combo and bonus tables

use serde::{Deserialize, Serialize};

use crate::core::types::SECONDS_PER_HOUR;
use crate::integration::bonus::{BonusDefinition, Eligibility};
use crate::integration::combo::ComboDefinition;
use crate::integration::profile::SystemSeed;
use crate::integration::streak::StreakConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub enable_streaks: bool,
    pub enable_combos: bool,
    pub enable_bonuses: bool,

    pub systems: Vec<SystemSeed>,
    pub streak: StreakConfig,
    pub combos: Vec<ComboDefinition>,
    pub bonuses: Vec<BonusDefinition>,

    /// Transient interaction events older than this are pruned (seconds)
    pub event_window_secs: f64,
    /// Hard cap on retained interaction events
    pub max_events: usize,
    /// Oldest events dropped when the cap is exceeded
    pub eviction_batch: usize,
    /// Entries kept in each player's recent-activity ring
    pub recent_activity_cap: usize,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            enable_streaks: true,
            enable_combos: true,
            enable_bonuses: true,
            systems: default_systems(),
            streak: StreakConfig::default(),
            combos: default_combos(),
            bonuses: default_bonuses(),
            event_window_secs: SECONDS_PER_HOUR,
            max_events: 100,
            eviction_batch: 20,
            recent_activity_cap: 10,
        }
    }
}

pub fn default_systems() -> Vec<SystemSeed> {
    vec![
        SystemSeed::new("planting", 1.0),
        SystemSeed::new("harvesting", 1.1),
        SystemSeed::new("breeding", 1.25),
        SystemSeed::new("research", 1.2),
        SystemSeed::new("trading", 1.0),
        SystemSeed::new("exploration", 1.15),
    ]
}

pub fn default_combos() -> Vec<ComboDefinition> {
    vec![
        ComboDefinition::new("green_cycle", "Green Cycle", &["planting", "harvesting"], 1.25, 300.0),
        ComboDefinition::new("lab_to_field", "Lab to Field", &["research", "breeding"], 1.5, 600.0),
        ComboDefinition::new("travelling_merchant", "Travelling Merchant", &["trading", "exploration"], 1.3, 600.0),
        ComboDefinition::new(
            "full_circle",
            "Full Circle",
            &["planting", "harvesting", "research", "trading"],
            2.0,
            900.0,
        ),
    ]
}

pub fn default_bonuses() -> Vec<BonusDefinition> {
    vec![
        BonusDefinition::new("multi_system", "Jack of All Trades", 1.2, 600.0, 1800.0, Eligibility::DistinctSystems(3)),
        BonusDefinition::new("dedication", "Dedication", 1.15, 900.0, 3600.0, Eligibility::SingleSystemUsage(10)),
        BonusDefinition::new("streak_master", "Streak Master", 1.3, 600.0, 1800.0, Eligibility::ActiveStreak(5)),
        BonusDefinition::new("veteran", "Veteran Grower", 1.1, 1800.0, 7200.0, Eligibility::TotalInteractions(50)),
        BonusDefinition::new("discovery", "Discovery", 1.5, 120.0, 600.0, Eligibility::External),
        BonusDefinition::new("perfect_performance", "Perfect Performance", 1.25, 60.0, 300.0, Eligibility::External),
    ]
}

impl IntegrationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.streak.increment < 0.0 {
            return Err("streak.increment must not be negative".into());
        }
        if self.streak.max_multiplier < self.streak.base_multiplier {
            return Err(format!(
                "streak.max_multiplier ({}) must be >= streak.base_multiplier ({})",
                self.streak.max_multiplier, self.streak.base_multiplier
            ));
        }
        if self.eviction_batch == 0 || self.eviction_batch > self.max_events {
            return Err(format!(
                "eviction_batch ({}) must be between 1 and max_events ({})",
                self.eviction_batch, self.max_events
            ));
        }
        for combo in &self.combos {
            if let Some(unknown) = combo
                .required_systems
                .iter()
                .find(|s| !self.systems.iter().any(|seed| &seed.name == *s))
            {
                return Err(format!("combo '{}' requires unknown system '{}'", combo.id, unknown));
            }
        }
        let mut ids: Vec<&str> = self.bonuses.iter().map(|b| b.id.as_str()).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err("bonus ids must be unique".into());
        }
        Ok(())
    }
}
