//! Milestone records and the seed list they are created from

use serde::{Deserialize, Serialize};

use crate::core::types::Timestamp;

/// A one-time-completable progress marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub name: String,
    pub description: String,
    pub completed: bool,
    /// Game time of completion
    pub completed_at: Option<Timestamp>,
    /// Last reported progress (0.0 to 1.0)
    pub progress: f32,
    /// Requirement tags, checked in order
    pub requirements: Vec<String>,
    /// Reward tags applied on completion
    pub rewards: Vec<String>,
}

impl Milestone {
    pub fn from_seed(seed: &MilestoneSeed) -> Self {
        Self {
            id: seed.id.clone(),
            name: seed.name.clone(),
            description: seed.description.clone(),
            completed: false,
            completed_at: None,
            progress: 0.0,
            requirements: seed.requirements.clone(),
            rewards: seed.rewards.clone(),
        }
    }
}

/// Declarative milestone definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneSeed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub rewards: Vec<String>,
}

impl MilestoneSeed {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            requirements: Vec::new(),
            rewards: Vec::new(),
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.into();
        self
    }

    pub fn requires(mut self, requirement: &str) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    pub fn rewards(mut self, reward: &str) -> Self {
        self.rewards.push(reward.into());
        self
    }
}

/// Milestone tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneConfig {
    /// Progress at or above which a milestone with satisfied requirements completes
    pub completion_threshold: f32,
    /// Milestones created at init
    pub seeds: Vec<MilestoneSeed>,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            completion_threshold: 1.0,
            seeds: default_seeds(),
        }
    }
}

impl MilestoneConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.completion_threshold) {
            return Err(format!(
                "completion_threshold ({}) must be within 0..=1",
                self.completion_threshold
            ));
        }
        for seed in &self.seeds {
            if seed.id.is_empty() {
                return Err("milestone id must not be empty".into());
            }
            if self.seeds.iter().filter(|s| s.id == seed.id).count() > 1 {
                return Err(format!("duplicate milestone id '{}'", seed.id));
            }
        }
        Ok(())
    }
}

/// Built-in milestone chain for the cultivation game
pub fn default_seeds() -> Vec<MilestoneSeed> {
    vec![
        MilestoneSeed::new("first_seed", "First Seed")
            .describe("Plant your first seed")
            .rewards("experience_50"),
        MilestoneSeed::new("first_research", "Curious Mind")
            .describe("Finish a research project")
            .rewards("experience_100")
            .rewards("unlock_research_lab"),
        MilestoneSeed::new("first_germination", "First Sprout")
            .describe("Watch a seed germinate")
            .requires("complete_first_seed")
            .rewards("experience_100")
            .rewards("unlock_watering_can"),
        MilestoneSeed::new("first_harvest", "First Harvest")
            .describe("Harvest a fully grown plant")
            .requires("first_germination")
            .rewards("experience_200")
            .rewards("skill_points_1"),
        MilestoneSeed::new("market_day", "Market Day")
            .describe("Sell a harvest at the market")
            .requires("first_harvest")
            .requires("visit_market")
            .rewards("experience_150")
            .rewards("unlock_market_stall"),
        MilestoneSeed::new("green_thumb", "Green Thumb")
            .describe("Become a reliable grower")
            .requires("first_harvest")
            .rewards("experience_300")
            .rewards("unlock_greenhouse"),
        MilestoneSeed::new("cross_pollination", "Cross Pollination")
            .describe("Breed your first hybrid")
            .requires("first_harvest")
            .requires("first_research")
            .rewards("experience_400")
            .rewards("skill_points_2"),
        MilestoneSeed::new("master_gardener", "Master Gardener")
            .describe("Master every part of the garden")
            .requires("green_thumb")
            .requires("cross_pollination")
            .requires("market_day")
            .rewards("experience_1000")
            .rewards("unlock_rare_seeds"),
    ]
}
