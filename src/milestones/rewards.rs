//! Reward tags and the sink that applies them
//!
//! Reward tags are dispatched by prefix:
//! - `experience_<n>`: grant `n` experience
//! - `skill_points_<n>`: grant `n` skill points
//! - `unlock_<name>`: unlock a feature in an external system

/// A parsed reward tag
#[derive(Debug, Clone, PartialEq)]
pub enum Reward {
    Experience(f32),
    SkillPoints(u32),
    Unlock(String),
}

impl Reward {
    /// Parse a reward tag, returns None for unknown or malformed tags
    pub fn parse(tag: &str) -> Option<Reward> {
        if let Some(amount) = tag.strip_prefix("experience_") {
            return amount
                .parse::<f32>()
                .ok()
                .filter(|a| a.is_finite() && *a >= 0.0)
                .map(Reward::Experience);
        }
        if let Some(points) = tag.strip_prefix("skill_points_") {
            return points.parse::<u32>().ok().map(Reward::SkillPoints);
        }
        if let Some(name) = tag.strip_prefix("unlock_") {
            if name.is_empty() {
                return None;
            }
            return Some(Reward::Unlock(name.to_string()));
        }
        None
    }
}

/// Receiver for milestone rewards
pub trait RewardSink {
    fn grant_experience(&mut self, amount: f32);

    fn grant_skill_points(&mut self, points: u32);

    fn unlock(&mut self, feature: &str) {
        tracing::info!("Unlocked {}", feature);
    }
}

/// Sink that discards every reward
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRewards;

impl RewardSink for NoRewards {
    fn grant_experience(&mut self, _amount: f32) {}

    fn grant_skill_points(&mut self, _points: u32) {}

    fn unlock(&mut self, _feature: &str) {}
}

/// Apply a list of reward tags to a sink, returns how many were applied
pub fn apply_rewards(tags: &[String], sink: &mut dyn RewardSink) -> usize {
    let mut applied = 0;
    for tag in tags {
        match Reward::parse(tag) {
            Some(Reward::Experience(amount)) => sink.grant_experience(amount),
            Some(Reward::SkillPoints(points)) => sink.grant_skill_points(points),
            Some(Reward::Unlock(feature)) => sink.unlock(&feature),
            None => {
                tracing::warn!("Ignoring unrecognised reward tag '{}'", tag);
                continue;
            }
        }
        applied += 1;
    }
    applied
}
