//! Progression integrator - coordinates streaks, combos and bonuses across systems
//!
//! Every reward computed through `calculate_bonus` is compounded in a fixed
//! order: system base multiplier, streak, one combo, then every effective bonus.

use std::collections::VecDeque;

use ahash::AHashMap;
use serde::Serialize;

use crate::core::clock::GameClock;
use crate::core::error::{ProgressionError, Result};
use crate::core::events::{EventChannel, SubscriptionId};
use crate::core::lifecycle::Manager;
use crate::core::types::{PlayerId, Timestamp};
use crate::integration::bonus::Bonus;
use crate::integration::combo::{Combo, ComboChange};
use crate::integration::config::IntegrationConfig;
use crate::integration::profile::{PlayerIntegrationProfile, SystemProfile};
use crate::integration::streak::{Streak, StreakChange};

/// Transient record of one interaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionEvent {
    pub system: String,
    pub interaction: String,
    pub engagement: f32,
    pub player: PlayerId,
    pub timestamp: Timestamp,
}

/// Notifications raised by the integrator
#[derive(Debug, Clone, PartialEq)]
pub enum IntegratorEvent {
    InteractionRecorded { system: String, player: PlayerId, engagement: f32 },
    StreakStarted { system: String, player: PlayerId },
    StreakExtended { system: String, player: PlayerId, count: u32 },
    StreakEnded { system: String, player: PlayerId, count: u32 },
    ComboActivated { id: String, name: String },
    ComboDeactivated { id: String },
    BonusActivated { id: String, name: String },
    BonusApplied {
        system: String,
        player: PlayerId,
        base: f32,
        total: f32,
        multiplier: f32,
    },
}

/// Aggregate view for dashboards and snapshots
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationSummary {
    pub total_interactions: u32,
    pub tracked_players: usize,
    pub active_streaks: usize,
    pub active_combos: Vec<String>,
    pub effective_bonuses: Vec<String>,
    pub total_bonus_awarded: f32,
    pub favorite_system: Option<String>,
}

#[derive(Debug)]
pub struct ProgressionIntegrator {
    config: IntegrationConfig,
    clock: GameClock,
    running: bool,
    systems: AHashMap<String, SystemProfile>,
    players: AHashMap<PlayerId, PlayerIntegrationProfile>,
    streaks: Vec<Streak>,
    combos: Vec<Combo>,
    bonuses: Vec<Bonus>,
    recent_events: VecDeque<InteractionEvent>,
    total_bonus_awarded: f32,
    events: EventChannel<IntegratorEvent>,
}

impl ProgressionIntegrator {
    pub fn new(config: IntegrationConfig) -> Self {
        let systems = config
            .systems
            .iter()
            .map(|seed| (seed.name.clone(), SystemProfile::from_seed(seed)))
            .collect();
        let combos = config.combos.iter().cloned().map(Combo::new).collect();
        let bonuses = config.bonuses.iter().cloned().map(Bonus::new).collect();

        Self {
            config,
            clock: GameClock::new(),
            running: false,
            systems,
            players: AHashMap::new(),
            streaks: Vec::new(),
            combos,
            bonuses,
            recent_events: VecDeque::new(),
            total_bonus_awarded: 0.0,
            events: EventChannel::new(),
        }
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&IntegratorEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Record a player interaction with a game system.
    ///
    /// Returns false if the system is unknown or the score is not finite.
    pub fn record_interaction(
        &mut self,
        system: &str,
        interaction: &str,
        engagement: f32,
        player: PlayerId,
    ) -> bool {
        if !engagement.is_finite() {
            tracing::warn!("Ignoring non-finite engagement score for {}", system);
            return false;
        }
        let now = self.clock.now();
        let Some(profile) = self.systems.get_mut(system) else {
            tracing::warn!("record_interaction: unknown system '{}'", system);
            return false;
        };
        profile.record(engagement, now);

        let recent_cap = self.config.recent_activity_cap;
        self.players
            .entry(player)
            .or_insert_with(|| PlayerIntegrationProfile::new(player, now))
            .record(system, interaction, now, recent_cap);

        self.events.emit(IntegratorEvent::InteractionRecorded {
            system: system.to_string(),
            player,
            engagement,
        });

        if self.config.enable_streaks && engagement >= self.config.streak.min_engagement {
            self.update_streak(system, player, now);
        }
        if self.config.enable_bonuses {
            self.activate_eligible_bonuses(player, now);
        }
        if self.config.enable_combos {
            self.update_combos(now);
        }

        self.push_event(InteractionEvent {
            system: system.to_string(),
            interaction: interaction.to_string(),
            engagement,
            player,
            timestamp: now,
        });
        true
    }

    fn update_streak(&mut self, system: &str, player: PlayerId, now: Timestamp) {
        let expiry = self.config.streak.expiry_secs;
        let change = match self
            .streaks
            .iter_mut()
            .find(|s| s.system == system && s.player == player)
        {
            Some(streak) => streak.bump(now, expiry),
            None => {
                self.streaks.push(Streak::new(system, player, now));
                StreakChange::Started
            }
        };

        let event = match change {
            StreakChange::Started => {
                tracing::debug!("Streak started: {} for {}", system, player);
                IntegratorEvent::StreakStarted {
                    system: system.to_string(),
                    player,
                }
            }
            StreakChange::Extended(count) => {
                tracing::debug!("Streak extended: {} for {} ({})", system, player, count);
                IntegratorEvent::StreakExtended {
                    system: system.to_string(),
                    player,
                    count,
                }
            }
        };
        self.events.emit(event);
    }

    fn best_active_streak(&self, player: PlayerId) -> u32 {
        self.streaks
            .iter()
            .filter(|s| s.player == player && s.active)
            .map(|s| s.count)
            .max()
            .unwrap_or(0)
    }

    fn activate_eligible_bonuses(&mut self, player: PlayerId, now: Timestamp) {
        let best_streak = self.best_active_streak(player);
        let Some(profile) = self.players.get(&player) else {
            return;
        };

        for bonus in self.bonuses.iter_mut() {
            let eligibility = bonus.definition.eligibility;
            if !eligibility.is_automatic() || !bonus.is_ready(now) {
                continue;
            }
            if eligibility.is_met(profile, best_streak) {
                bonus.activate(now);
                tracing::debug!("Bonus activated: {} for {}", bonus.definition.name, player);
                self.events.emit(IntegratorEvent::BonusActivated {
                    id: bonus.definition.id.clone(),
                    name: bonus.definition.name.clone(),
                });
            }
        }
    }

    /// Activate a bonus on behalf of an external caller (discoveries,
    /// perfect performances). Cooldowns apply to these as well.
    pub fn activate_bonus(&mut self, id: &str) -> Result<()> {
        if !self.config.enable_bonuses {
            return Err(ProgressionError::BonusesDisabled);
        }
        let now = self.clock.now();
        let bonus = self
            .bonuses
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or_else(|| ProgressionError::UnknownBonus(id.to_string()))?;

        if !bonus.is_ready(now) {
            return Err(ProgressionError::BonusOnCooldown(id.to_string()));
        }

        bonus.activate(now);
        tracing::debug!("Bonus activated externally: {}", bonus.definition.name);
        self.events.emit(IntegratorEvent::BonusActivated {
            id: bonus.definition.id.clone(),
            name: bonus.definition.name.clone(),
        });
        Ok(())
    }

    fn update_combos(&mut self, now: Timestamp) {
        let systems = &self.systems;
        for combo in self.combos.iter_mut() {
            match combo.update(now, |s| systems.get(s)) {
                ComboChange::Activated => {
                    tracing::debug!("Combo activated: {}", combo.definition.name);
                    self.events.emit(IntegratorEvent::ComboActivated {
                        id: combo.definition.id.clone(),
                        name: combo.definition.name.clone(),
                    });
                }
                ComboChange::Deactivated => {
                    tracing::debug!("Combo deactivated: {}", combo.definition.name);
                    self.events.emit(IntegratorEvent::ComboDeactivated {
                        id: combo.definition.id.clone(),
                    });
                }
                ComboChange::Unchanged => {}
            }
        }
    }

    fn push_event(&mut self, event: InteractionEvent) {
        self.recent_events.push_back(event);
        if self.recent_events.len() > self.config.max_events {
            let evict = self.config.eviction_batch.min(self.recent_events.len());
            self.recent_events.drain(..evict);
        }
    }

    fn prune_events(&mut self, now: Timestamp) {
        let window = self.config.event_window_secs;
        self.recent_events.retain(|e| now - e.timestamp <= window);
    }

    fn expire_streaks(&mut self, now: Timestamp) {
        let expiry = self.config.streak.expiry_secs;
        for streak in self.streaks.iter_mut() {
            if streak.expire(now, expiry) {
                tracing::debug!("Streak ended: {} for {} at {}", streak.system, streak.player, streak.count);
                self.events.emit(IntegratorEvent::StreakEnded {
                    system: streak.system.clone(),
                    player: streak.player,
                    count: streak.count,
                });
            }
        }
    }

    /// Multiplier the player's streak in `system` currently contributes
    pub fn streak_multiplier(&self, system: &str, player: PlayerId) -> f32 {
        if !self.config.enable_streaks {
            return 1.0;
        }
        self.streak(system, player)
            .filter(|s| s.active)
            .map_or(1.0, |s| s.multiplier(&self.config.streak))
    }

    /// Compound every applicable multiplier onto `base`
    pub fn calculate_bonus(&mut self, system: &str, base: f32, player: PlayerId) -> f32 {
        let now = self.clock.now();
        let mut multiplier = match self.systems.get(system) {
            Some(profile) => profile.base_multiplier,
            None => {
                tracing::warn!("calculate_bonus: unknown system '{}', using 1.0", system);
                1.0
            }
        };

        multiplier *= self.streak_multiplier(system, player);

        if self.config.enable_combos {
            if let Some(combo) = self.combos.iter().find(|c| c.active && c.includes(system)) {
                multiplier *= combo.definition.multiplier;
            }
        }

        if self.config.enable_bonuses {
            for bonus in self.bonuses.iter().filter(|b| b.is_effective(now)) {
                multiplier *= bonus.definition.multiplier;
            }
        }

        let total = base * multiplier;
        let delta = total - base;
        self.total_bonus_awarded += delta;
        if let Some(profile) = self.players.get_mut(&player) {
            profile.total_bonus_earned += delta;
        }

        self.events.emit(IntegratorEvent::BonusApplied {
            system: system.to_string(),
            player,
            base,
            total,
            multiplier,
        });
        total
    }

    pub fn system_profile(&self, system: &str) -> Option<&SystemProfile> {
        self.systems.get(system)
    }

    pub fn player_profile(&self, player: PlayerId) -> Option<&PlayerIntegrationProfile> {
        self.players.get(&player)
    }

    pub fn streak(&self, system: &str, player: PlayerId) -> Option<&Streak> {
        self.streaks
            .iter()
            .find(|s| s.system == system && s.player == player)
    }

    pub fn streaks(&self) -> &[Streak] {
        &self.streaks
    }

    pub fn combo(&self, id: &str) -> Option<&Combo> {
        self.combos.iter().find(|c| c.id() == id)
    }

    pub fn active_combos(&self) -> impl Iterator<Item = &Combo> {
        self.combos.iter().filter(|c| c.active)
    }

    pub fn bonus(&self, id: &str) -> Option<&Bonus> {
        self.bonuses.iter().find(|b| b.id() == id)
    }

    /// Bonuses that are active and inside their duration
    pub fn active_bonuses(&self) -> impl Iterator<Item = &Bonus> {
        let now = self.clock.now();
        self.bonuses.iter().filter(move |b| b.is_effective(now))
    }

    pub fn recent_events(&self) -> &VecDeque<InteractionEvent> {
        &self.recent_events
    }

    pub fn total_bonus_awarded(&self) -> f32 {
        self.total_bonus_awarded
    }

    /// Systems sorted by running-average engagement, highest first
    pub fn engagement_ranking(&self) -> Vec<(String, f32)> {
        let mut ranking: Vec<(String, f32)> = self
            .systems
            .values()
            .map(|p| (p.name.clone(), p.average_engagement))
            .collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranking
    }

    pub fn summary(&self) -> IntegrationSummary {
        let favorite_system = self
            .systems
            .values()
            .filter(|p| p.interaction_count > 0)
            .max_by(|a, b| {
                a.interaction_count
                    .cmp(&b.interaction_count)
                    .then_with(|| b.name.cmp(&a.name))
            })
            .map(|p| p.name.clone());

        IntegrationSummary {
            total_interactions: self.systems.values().map(|p| p.interaction_count).sum(),
            tracked_players: self.players.len(),
            active_streaks: self.streaks.iter().filter(|s| s.active).count(),
            active_combos: self.active_combos().map(|c| c.id().to_string()).collect(),
            effective_bonuses: self.active_bonuses().map(|b| b.id().to_string()).collect(),
            total_bonus_awarded: self.total_bonus_awarded,
            favorite_system,
        }
    }
}

impl Manager for ProgressionIntegrator {
    fn name(&self) -> &'static str {
        "integration"
    }

    fn init(&mut self) {
        self.running = true;
        tracing::info!(
            "Progression integrator started: {} systems, {} combos, {} bonuses",
            self.systems.len(),
            self.combos.len(),
            self.bonuses.len()
        );
    }

    fn tick(&mut self, dt: f64) {
        if !self.running {
            return;
        }
        self.clock.advance(dt);
        let now = self.clock.now();

        if self.config.enable_streaks {
            self.expire_streaks(now);
        }
        if self.config.enable_combos {
            self.update_combos(now);
        }
        self.prune_events(now);
    }

    fn shutdown(&mut self) {
        self.running = false;
        self.events.clear();
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
