//! Skill, experience and research configuration

use serde::{Deserialize, Serialize};

use crate::progression::curve::ExperienceCurve;
use crate::progression::definitions::{default_skills, SkillDefinition};
use crate::progression::effects::SynergyRates;
use crate::progression::research::{default_projects, ResearchProjectDefinition};

/// Where experience came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceSource {
    Planting,
    Harvesting,
    Breeding,
    Research,
    Milestone,
    Discovery,
    Trading,
    Exploration,
}

/// Multiplier per experience source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceMultipliers {
    pub planting: f32,
    pub harvesting: f32,
    pub breeding: f32,
    pub research: f32,
    pub milestone: f32,
    pub discovery: f32,
    pub trading: f32,
    pub exploration: f32,
}

impl Default for SourceMultipliers {
    fn default() -> Self {
        Self {
            planting: 1.0,
            harvesting: 1.2,
            breeding: 1.5,
            research: 1.3,
            milestone: 1.0,
            discovery: 2.0,
            trading: 0.8,
            exploration: 1.1,
        }
    }
}

impl SourceMultipliers {
    pub fn for_source(&self, source: ExperienceSource) -> f32 {
        match source {
            ExperienceSource::Planting => self.planting,
            ExperienceSource::Harvesting => self.harvesting,
            ExperienceSource::Breeding => self.breeding,
            ExperienceSource::Research => self.research,
            ExperienceSource::Milestone => self.milestone,
            ExperienceSource::Discovery => self.discovery,
            ExperienceSource::Trading => self.trading,
            ExperienceSource::Exploration => self.exploration,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    pub max_player_level: u32,
    pub starting_skill_points: u32,
    /// Skill points granted per player level gained
    pub skill_points_per_level: u32,
    /// Player level curve
    pub level_curve: ExperienceCurve,
    /// Per-skill curve used for experience-paid level ups
    pub skill_curve: ExperienceCurve,
    pub source_multipliers: SourceMultipliers,
    /// Fraction of experience added per learning-speed effect point
    pub learning_speed_per_point: f32,
    /// Experience awarded when a skill reaches its max level
    pub mastery_experience: f32,

    pub synergy: SynergyRates,
    /// Effect multiplier added per specialization level
    pub specialization_bonus: f32,

    pub enable_research: bool,
    pub max_active_research: usize,
    pub min_feasibility: f32,
    /// Global research speed before skill effects
    pub research_speed: f32,
    /// Fraction of speed added per research-speed effect point
    pub research_speed_per_point: f32,

    pub skills: Vec<SkillDefinition>,
    pub projects: Vec<ResearchProjectDefinition>,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            max_player_level: 100,
            starting_skill_points: 3,
            skill_points_per_level: 1,
            level_curve: ExperienceCurve::power(100.0),
            skill_curve: ExperienceCurve::power(50.0),
            source_multipliers: SourceMultipliers::default(),
            learning_speed_per_point: 0.01,
            mastery_experience: 250.0,
            synergy: SynergyRates::default(),
            specialization_bonus: 0.1,
            enable_research: true,
            max_active_research: 3,
            min_feasibility: 0.5,
            research_speed: 1.0,
            research_speed_per_point: 0.01,
            skills: default_skills(),
            projects: default_projects(),
        }
    }
}

impl SkillConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.level_curve.validate()?;
        self.skill_curve.validate()?;

        if self.max_player_level == 0 {
            return Err("max_player_level must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.min_feasibility) {
            return Err(format!("min_feasibility ({}) must be within 0..=1", self.min_feasibility));
        }
        if self.research_speed < 0.0 {
            return Err("research_speed must not be negative".into());
        }

        for skill in &self.skills {
            if skill.max_level == 0 {
                return Err(format!("skill '{}' has max_level 0", skill.id));
            }
            if self.skills.iter().filter(|s| s.id == skill.id).count() > 1 {
                return Err(format!("duplicate skill id '{}'", skill.id));
            }
            if let Some(prereq) = skill
                .prerequisites
                .iter()
                .find(|p| !self.skills.iter().any(|s| s.id == p.skill))
            {
                return Err(format!("skill '{}' requires unknown skill '{}'", skill.id, prereq.skill));
            }
        }

        for project in &self.projects {
            if self.projects.iter().filter(|p| p.id == project.id).count() > 1 {
                return Err(format!("duplicate research id '{}'", project.id));
            }
            if project.duration_secs < 0.0 {
                return Err(format!("research '{}' has negative duration", project.id));
            }
            if let Some(req) = project
                .required_skills
                .iter()
                .find(|r| !self.skills.iter().any(|s| s.id == r.skill))
            {
                return Err(format!("research '{}' requires unknown skill '{}'", project.id, req.skill));
            }
        }
        Ok(())
    }
}
