//! Time-boxed bonuses and their eligibility rules

use serde::{Deserialize, Serialize};

use crate::core::types::Timestamp;
use crate::integration::profile::PlayerIntegrationProfile;

/// When a bonus may activate automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// Player has used at least this many distinct systems
    DistinctSystems(u32),
    /// Player has used one system at least this many times
    SingleSystemUsage(u32),
    /// Player holds an active streak of at least this count
    ActiveStreak(u32),
    /// Player has recorded at least this many interactions
    TotalInteractions(u32),
    /// Always eligible, but only activated by an explicit caller
    External,
}

impl Eligibility {
    /// Evaluate against a player. `best_active_streak` is the longest active
    /// streak count the player currently holds.
    pub fn is_met(&self, profile: &PlayerIntegrationProfile, best_active_streak: u32) -> bool {
        match *self {
            Eligibility::DistinctSystems(n) => profile.distinct_systems() >= n as usize,
            Eligibility::SingleSystemUsage(n) => profile.max_single_system_usage() >= n,
            Eligibility::ActiveStreak(n) => best_active_streak >= n,
            Eligibility::TotalInteractions(n) => profile.total_interactions >= n,
            Eligibility::External => true,
        }
    }

    pub fn is_automatic(&self) -> bool {
        !matches!(self, Eligibility::External)
    }
}

/// Declarative bonus definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusDefinition {
    pub id: String,
    pub name: String,
    pub multiplier: f32,
    pub duration_secs: f64,
    /// Wait after the bonus expires before it can activate again
    #[serde(default)]
    pub cooldown_secs: f64,
    pub eligibility: Eligibility,
}

impl BonusDefinition {
    pub fn new(
        id: &str,
        name: &str,
        multiplier: f32,
        duration_secs: f64,
        cooldown_secs: f64,
        eligibility: Eligibility,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            multiplier,
            duration_secs,
            cooldown_secs,
            eligibility,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub definition: BonusDefinition,
    /// Set on activation and never cleared by expiry; use `is_effective`
    pub active: bool,
    pub activated_at: Option<Timestamp>,
    pub activation_count: u32,
}

impl Bonus {
    pub fn new(definition: BonusDefinition) -> Self {
        Self {
            definition,
            active: false,
            activated_at: None,
            activation_count: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    /// Active and still inside its duration
    pub fn is_effective(&self, now: Timestamp) -> bool {
        self.active
            && self
                .activated_at
                .map_or(false, |t| now - t < self.definition.duration_secs)
    }

    /// Never activated, or duration plus cooldown has fully elapsed
    pub fn is_ready(&self, now: Timestamp) -> bool {
        self.activated_at.map_or(true, |t| {
            now - t >= self.definition.duration_secs + self.definition.cooldown_secs
        })
    }

    pub fn activate(&mut self, now: Timestamp) {
        self.active = true;
        self.activated_at = Some(now);
        self.activation_count += 1;
    }
}
