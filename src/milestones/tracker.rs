//! Milestone tracker - moves milestones between locked, active and completed
//!
//! Requirement tags are satisfied when:
//! - the tag names a completed milestone (`first_harvest`)
//! - the tag is `complete_<id>` and milestone `<id>` is completed
//! - the tag was recorded through `satisfy_requirement` (`visit_market`)

use ahash::AHashSet;
use serde::Serialize;

use crate::core::clock::GameClock;
use crate::core::events::{EventChannel, SubscriptionId};
use crate::core::lifecycle::Manager;
use crate::milestones::milestone::{Milestone, MilestoneConfig};
use crate::milestones::rewards::{apply_rewards, RewardSink};

/// Which partition a milestone currently lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MilestoneState {
    Locked,
    Active,
    Completed,
}

/// Notifications raised by the tracker
#[derive(Debug, Clone, PartialEq)]
pub enum MilestoneEvent {
    Completed { id: String, name: String },
    Unlocked { id: String, name: String },
    Progress { id: String, progress: f32 },
}

/// Partition sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneCounts {
    pub locked: usize,
    pub active: usize,
    pub completed: usize,
}

impl MilestoneCounts {
    pub fn total(&self) -> usize {
        self.locked + self.active + self.completed
    }
}

#[derive(Debug)]
pub struct MilestoneTracker {
    config: MilestoneConfig,
    clock: GameClock,
    running: bool,
    locked: Vec<Milestone>,
    active: Vec<Milestone>,
    completed: Vec<Milestone>,
    satisfied_tags: AHashSet<String>,
    events: EventChannel<MilestoneEvent>,
}

impl MilestoneTracker {
    pub fn new(config: MilestoneConfig) -> Self {
        let mut tracker = Self {
            config,
            clock: GameClock::new(),
            running: false,
            locked: Vec::new(),
            active: Vec::new(),
            completed: Vec::new(),
            satisfied_tags: AHashSet::new(),
            events: EventChannel::new(),
        };
        tracker.seed();
        tracker
    }

    /// Rebuild all partitions from the configured seed list
    fn seed(&mut self) {
        self.locked.clear();
        self.active.clear();
        self.completed.clear();

        for seed in &self.config.seeds {
            let milestone = Milestone::from_seed(seed);
            if milestone.requirements.is_empty() {
                self.active.push(milestone);
            } else {
                self.locked.push(milestone);
            }
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&MilestoneEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    fn locate(&self, id: &str) -> Option<(MilestoneState, usize)> {
        if let Some(idx) = self.active.iter().position(|m| m.id == id) {
            return Some((MilestoneState::Active, idx));
        }
        if let Some(idx) = self.completed.iter().position(|m| m.id == id) {
            return Some((MilestoneState::Completed, idx));
        }
        self.locked
            .iter()
            .position(|m| m.id == id)
            .map(|idx| (MilestoneState::Locked, idx))
    }

    /// Find a milestone, searching active, completed, then locked
    pub fn find_milestone(&self, id: &str) -> Option<&Milestone> {
        let (state, idx) = self.locate(id)?;
        Some(match state {
            MilestoneState::Active => &self.active[idx],
            MilestoneState::Completed => &self.completed[idx],
            MilestoneState::Locked => &self.locked[idx],
        })
    }

    pub fn milestone_state(&self, id: &str) -> Option<MilestoneState> {
        self.locate(id).map(|(state, _)| state)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|m| m.id == id)
    }

    fn requirement_satisfied(&self, tag: &str) -> bool {
        if self.is_completed(tag) || self.satisfied_tags.contains(tag) {
            return true;
        }
        tag.strip_prefix("complete_")
            .map_or(false, |id| self.is_completed(id))
    }

    fn requirements_met(&self, requirements: &[String]) -> bool {
        requirements.iter().all(|r| self.requirement_satisfied(r))
    }

    /// Complete a milestone and apply its rewards.
    ///
    /// Returns false if the milestone is unknown or already completed.
    pub fn complete_milestone(&mut self, id: &str, sink: &mut dyn RewardSink) -> bool {
        let Some((state, idx)) = self.locate(id) else {
            tracing::debug!("complete_milestone: unknown milestone '{}'", id);
            return false;
        };

        let mut milestone = match state {
            MilestoneState::Completed => return false,
            MilestoneState::Active => self.active.remove(idx),
            MilestoneState::Locked => self.locked.remove(idx),
        };

        milestone.completed = true;
        milestone.completed_at = Some(self.clock.now());
        milestone.progress = 1.0;

        let rewards = milestone.rewards.clone();
        let name = milestone.name.clone();
        self.completed.push(milestone);

        tracing::info!("Milestone completed: {} ({})", name, id);
        self.events.emit(MilestoneEvent::Completed {
            id: id.to_string(),
            name,
        });

        apply_rewards(&rewards, sink);
        self.promote_unlocked();
        true
    }

    /// Record progress toward a milestone, completing it when its
    /// requirements are met and progress reaches the completion threshold.
    ///
    /// Returns true if this update completed the milestone.
    pub fn update_milestone_progress(
        &mut self,
        id: &str,
        progress: f32,
        sink: &mut dyn RewardSink,
    ) -> bool {
        if !progress.is_finite() {
            tracing::warn!("Ignoring non-finite progress for milestone '{}'", id);
            return false;
        }
        let Some((state, idx)) = self.locate(id) else {
            tracing::debug!("update_milestone_progress: unknown milestone '{}'", id);
            return false;
        };

        let progress = progress.clamp(0.0, 1.0);
        let requirements = match state {
            MilestoneState::Active => {
                self.active[idx].progress = progress;
                self.active[idx].requirements.clone()
            }
            MilestoneState::Locked => {
                self.locked[idx].progress = progress;
                self.locked[idx].requirements.clone()
            }
            MilestoneState::Completed => Vec::new(),
        };

        self.events.emit(MilestoneEvent::Progress {
            id: id.to_string(),
            progress,
        });

        if state == MilestoneState::Completed {
            return false;
        }

        if progress >= self.config.completion_threshold && self.requirements_met(&requirements) {
            return self.complete_milestone(id, sink);
        }
        false
    }

    /// Record an external requirement tag as achieved.
    ///
    /// Returns the number of milestones unlocked as a result.
    pub fn satisfy_requirement(&mut self, tag: &str) -> usize {
        if !self.satisfied_tags.insert(tag.to_string()) {
            return 0;
        }
        tracing::debug!("Requirement satisfied: {}", tag);
        self.promote_unlocked()
    }

    /// Single pass over locked milestones, promoting those whose requirements are met
    fn promote_unlocked(&mut self) -> usize {
        let mut promoted = 0;
        let mut i = 0;
        while i < self.locked.len() {
            let met = self.requirements_met(&self.locked[i].requirements);
            if !met {
                i += 1;
                continue;
            }

            let milestone = self.locked.remove(i);
            tracing::info!("Milestone unlocked: {} ({})", milestone.name, milestone.id);
            self.events.emit(MilestoneEvent::Unlocked {
                id: milestone.id.clone(),
                name: milestone.name.clone(),
            });
            self.active.push(milestone);
            promoted += 1;
        }
        promoted
    }

    pub fn active(&self) -> &[Milestone] {
        &self.active
    }

    pub fn completed(&self) -> &[Milestone] {
        &self.completed
    }

    pub fn locked(&self) -> &[Milestone] {
        &self.locked
    }

    pub fn counts(&self) -> MilestoneCounts {
        MilestoneCounts {
            locked: self.locked.len(),
            active: self.active.len(),
            completed: self.completed.len(),
        }
    }

    /// Fraction of milestones completed (0.0 when there are none)
    pub fn completion_ratio(&self) -> f32 {
        let total = self.counts().total();
        if total == 0 {
            return 0.0;
        }
        self.completed.len() as f32 / total as f32
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

impl Manager for MilestoneTracker {
    fn name(&self) -> &'static str {
        "milestones"
    }

    fn init(&mut self) {
        self.running = true;
        tracing::info!(
            "Milestone tracker started: {} active, {} locked",
            self.active.len(),
            self.locked.len()
        );
    }

    fn tick(&mut self, dt: f64) {
        if self.running {
            self.clock.advance(dt);
        }
    }

    fn shutdown(&mut self) {
        self.running = false;
        self.events.clear();
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
