//! Player level and per-skill state

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::core::types::Timestamp;

/// Player level, experience and unspent skill points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLevel {
    pub level: u32,
    /// Experience toward the next level
    pub current_experience: f32,
    /// Experience earned over the whole game
    pub total_experience: f32,
    pub skill_points: u32,
}

impl PlayerLevel {
    pub fn new(starting_skill_points: u32) -> Self {
        Self {
            level: 1,
            current_experience: 0.0,
            total_experience: 0.0,
            skill_points: starting_skill_points,
        }
    }
}

/// Progress in one learned skill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSkillData {
    pub skill: String,
    pub level: u32,
    /// Skill-specific experience, spendable on experience-paid level ups
    pub experience: f32,
    pub mastered: bool,
    pub learned_at: Timestamp,
    pub last_leveled_at: Timestamp,
    pub mastered_at: Option<Timestamp>,
}

impl PlayerSkillData {
    pub fn learned(skill: &str, now: Timestamp) -> Self {
        Self {
            skill: skill.to_string(),
            level: 1,
            experience: 0.0,
            mastered: false,
            learned_at: now,
            last_leveled_at: now,
            mastered_at: None,
        }
    }
}

/// Snapshot used by prerequisite and feasibility checks
#[derive(Debug, Clone, Default)]
pub struct PlayerCapabilities {
    pub player_level: u32,
    pub skill_levels: AHashMap<String, u32>,
    pub completed_research: AHashSet<String>,
}

impl PlayerCapabilities {
    pub fn skill_level(&self, skill: &str) -> u32 {
        self.skill_levels.get(skill).copied().unwrap_or(0)
    }

    pub fn has_research(&self, project: &str) -> bool {
        self.completed_research.contains(project)
    }
}
