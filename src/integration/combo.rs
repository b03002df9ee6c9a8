//! Cross-system combos

use serde::{Deserialize, Serialize};

use crate::core::types::Timestamp;
use crate::integration::profile::SystemProfile;

/// Declarative combo definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboDefinition {
    pub id: String,
    pub name: String,
    pub required_systems: Vec<String>,
    pub multiplier: f32,
    /// All required systems must be active within this many seconds
    pub window_secs: f64,
}

impl ComboDefinition {
    pub fn new(id: &str, name: &str, systems: &[&str], multiplier: f32, window_secs: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            required_systems: systems.iter().map(|s| s.to_string()).collect(),
            multiplier,
            window_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combo {
    pub definition: ComboDefinition,
    pub active: bool,
    pub activation_count: u32,
    pub last_activated: Option<Timestamp>,
}

/// Result of re-evaluating a combo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboChange {
    Activated,
    Deactivated,
    Unchanged,
}

impl Combo {
    pub fn new(definition: ComboDefinition) -> Self {
        Self {
            definition,
            active: false,
            activation_count: 0,
            last_activated: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn includes(&self, system: &str) -> bool {
        self.definition.required_systems.iter().any(|s| s == system)
    }

    /// True when every required system shows activity inside the window
    pub fn eligible<'a>(
        &self,
        now: Timestamp,
        lookup: impl Fn(&str) -> Option<&'a SystemProfile>,
    ) -> bool {
        !self.definition.required_systems.is_empty()
            && self.definition.required_systems.iter().all(|system| {
                lookup(system).map_or(false, |p| p.active_within(now, self.definition.window_secs))
            })
    }

    /// Deactivate at window expiry, otherwise activate when eligible.
    /// A combo that just expired is not reactivated in the same pass.
    pub fn update<'a>(
        &mut self,
        now: Timestamp,
        lookup: impl Fn(&str) -> Option<&'a SystemProfile>,
    ) -> ComboChange {
        if self.active {
            let expired = self
                .last_activated
                .map_or(true, |t| now - t >= self.definition.window_secs);
            if expired {
                self.active = false;
                return ComboChange::Deactivated;
            }
            return ComboChange::Unchanged;
        }

        if self.eligible(now, lookup) {
            self.active = true;
            self.activation_count += 1;
            self.last_activated = Some(now);
            return ComboChange::Activated;
        }
        ComboChange::Unchanged
    }
}
