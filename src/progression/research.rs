//! Research projects - definitions, feasibility, team expertise and progress

use serde::{Deserialize, Serialize};

use crate::core::types::Timestamp;
use crate::progression::definitions::{SkillCategory, SkillPrerequisite};
use crate::progression::player::PlayerCapabilities;

/// Bounds on the team-expertise multiplier
pub const MIN_TEAM_EXPERTISE: f32 = 0.5;
pub const MAX_TEAM_EXPERTISE: f32 = 2.0;

/// Expertise gained per required skill at max level
const EXPERTISE_PER_SKILL: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchProjectDefinition {
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    /// Estimated seconds to finish at speed 1.0 and expertise 1.0
    pub duration_secs: f64,
    #[serde(default)]
    pub required_skills: Vec<SkillPrerequisite>,
    /// Projects that must already be completed
    #[serde(default)]
    pub required_research: Vec<String>,
    #[serde(default)]
    pub experience_reward: f32,
    /// Features handed to external systems on completion
    #[serde(default)]
    pub unlocks: Vec<String>,
}

impl ResearchProjectDefinition {
    pub fn new(id: &str, name: &str, category: SkillCategory, duration_secs: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            duration_secs,
            required_skills: Vec::new(),
            required_research: Vec::new(),
            experience_reward: 0.0,
            unlocks: Vec::new(),
        }
    }

    pub fn requires_skill(mut self, skill: &str, min_level: u32) -> Self {
        self.required_skills.push(SkillPrerequisite {
            skill: skill.into(),
            min_level,
        });
        self
    }

    pub fn requires_research(mut self, project: &str) -> Self {
        self.required_research.push(project.into());
        self
    }

    pub fn rewards_experience(mut self, amount: f32) -> Self {
        self.experience_reward = amount;
        self
    }

    pub fn unlocks(mut self, feature: &str) -> Self {
        self.unlocks.push(feature.into());
        self
    }

    /// How achievable the project is for this player (0.0 to 1.0).
    ///
    /// Missing prerequisite research makes a project infeasible. Otherwise the
    /// score is the mean over required skills of `level / min_level`, each
    /// capped at 1.0.
    pub fn feasibility(&self, capabilities: &PlayerCapabilities) -> f32 {
        if self.required_research.iter().any(|r| !capabilities.has_research(r)) {
            return 0.0;
        }
        if self.required_skills.is_empty() {
            return 1.0;
        }

        let total: f32 = self
            .required_skills
            .iter()
            .map(|req| {
                if req.min_level == 0 {
                    return 1.0;
                }
                (capabilities.skill_level(&req.skill) as f32 / req.min_level as f32).min(1.0)
            })
            .sum();
        total / self.required_skills.len() as f32
    }
}

/// Product over required skills of `1 + 0.5 * level / max_level`, clamped to [0.5, 2.0]
pub fn team_expertise(
    project: &ResearchProjectDefinition,
    capabilities: &PlayerCapabilities,
    max_level: impl Fn(&str) -> Option<u32>,
) -> f32 {
    let product: f32 = project
        .required_skills
        .iter()
        .map(|req| {
            let max = max_level(&req.skill).unwrap_or(1).max(1);
            let level = capabilities.skill_level(&req.skill).min(max);
            1.0 + EXPERTISE_PER_SKILL * (level as f32 / max as f32)
        })
        .product();
    product.clamp(MIN_TEAM_EXPERTISE, MAX_TEAM_EXPERTISE)
}

/// Quality of a project's results, fixed at start
pub fn quality_score(feasibility: f32, team_expertise: f32) -> f32 {
    (feasibility * 0.5 + team_expertise * 0.25).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveResearchProject {
    pub project: String,
    /// 0.0 to 1.0
    pub progress: f32,
    pub quality: f32,
    pub team_expertise: f32,
    pub started_at: Timestamp,
}

impl ActiveResearchProject {
    pub fn new(project: &str, quality: f32, team_expertise: f32, now: Timestamp) -> Self {
        Self {
            project: project.to_string(),
            progress: 0.0,
            quality,
            team_expertise,
            started_at: now,
        }
    }

    /// Advance by `dt` seconds, returns true once progress reaches 1.0
    pub fn advance(&mut self, dt: f64, duration_secs: f64, speed: f32) -> bool {
        let delta = if duration_secs > 0.0 {
            (dt / duration_secs) as f32 * speed * self.team_expertise
        } else {
            1.0
        };
        self.progress = (self.progress + delta.max(0.0)).min(1.0);
        self.progress >= 1.0
    }

    pub fn finish(self, now: Timestamp) -> CompletedResearchProject {
        CompletedResearchProject {
            project: self.project,
            quality: self.quality,
            team_expertise: self.team_expertise,
            started_at: self.started_at,
            completed_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedResearchProject {
    pub project: String,
    pub quality: f32,
    pub team_expertise: f32,
    pub started_at: Timestamp,
    pub completed_at: Timestamp,
}

/// Built-in research projects
pub fn default_projects() -> Vec<ResearchProjectDefinition> {
    vec![
        ResearchProjectDefinition::new("field_notes", "Field Notes", SkillCategory::Research, 120.0)
            .rewards_experience(100.0)
            .unlocks("garden_journal"),
        ResearchProjectDefinition::new("improved_fertilizer", "Improved Fertilizer", SkillCategory::Cultivation, 300.0)
            .requires_skill("soil_science", 2)
            .rewards_experience(250.0)
            .unlocks("fertilizer_mk2"),
        ResearchProjectDefinition::new("drip_irrigation", "Drip Irrigation", SkillCategory::Engineering, 450.0)
            .requires_skill("irrigation", 2)
            .rewards_experience(300.0)
            .unlocks("drip_system"),
        ResearchProjectDefinition::new("hybrid_seeds", "Hybrid Seeds", SkillCategory::Genetics, 600.0)
            .requires_skill("plant_genetics", 3)
            .requires_skill("botanical_study", 2)
            .rewards_experience(500.0)
            .unlocks("hybrid_seed_packs"),
        ResearchProjectDefinition::new("greenhouse_automation", "Greenhouse Automation", SkillCategory::Engineering, 900.0)
            .requires_skill("lab_methods", 3)
            .requires_skill("irrigation", 3)
            .requires_research("drip_irrigation")
            .rewards_experience(800.0)
            .unlocks("automated_greenhouse"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(levels: &[(&str, u32)]) -> PlayerCapabilities {
        let mut caps = PlayerCapabilities::default();
        for (skill, level) in levels {
            caps.skill_levels.insert(skill.to_string(), *level);
        }
        caps
    }

    #[test]
    fn test_feasibility_without_requirements() {
        let project = ResearchProjectDefinition::new("p", "P", SkillCategory::Research, 10.0);
        assert_eq!(project.feasibility(&caps(&[])), 1.0);
    }

    #[test]
    fn test_feasibility_partial_skills() {
        let project = ResearchProjectDefinition::new("p", "P", SkillCategory::Research, 10.0)
            .requires_skill("a", 4)
            .requires_skill("b", 2);
        // a: 2/4 = 0.5, b: capped at 1.0
        assert_eq!(project.feasibility(&caps(&[("a", 2), ("b", 5)])), 0.75);
        assert_eq!(project.feasibility(&caps(&[])), 0.0);
    }

    #[test]
    fn test_missing_research_is_infeasible() {
        let project = ResearchProjectDefinition::new("p", "P", SkillCategory::Research, 10.0)
            .requires_research("q");
        assert_eq!(project.feasibility(&caps(&[])), 0.0);

        let mut with_q = caps(&[]);
        with_q.completed_research.insert("q".into());
        assert_eq!(project.feasibility(&with_q), 1.0);
    }

    #[test]
    fn test_team_expertise_product_and_clamp() {
        let project = ResearchProjectDefinition::new("p", "P", SkillCategory::Research, 10.0)
            .requires_skill("a", 1)
            .requires_skill("b", 1);
        let max = |_: &str| Some(10);

        // Unskilled team: 1.0 * 1.0
        assert_eq!(team_expertise(&project, &caps(&[]), max), 1.0);
        // Half-mastered: 1.25 * 1.25
        assert_eq!(team_expertise(&project, &caps(&[("a", 5), ("b", 5)]), max), 1.5625);

        let wide = ResearchProjectDefinition::new("w", "W", SkillCategory::Research, 10.0)
            .requires_skill("a", 1)
            .requires_skill("b", 1)
            .requires_skill("c", 1);
        // 1.5^3 = 3.375 clamps to 2.0
        let maxed = caps(&[("a", 10), ("b", 10), ("c", 10)]);
        assert_eq!(team_expertise(&wide, &maxed, max), MAX_TEAM_EXPERTISE);
    }

    #[test]
    fn test_advance_reaches_completion_once() {
        let mut active = ActiveResearchProject::new("p", 0.8, 1.0, 0.0);
        assert!(!active.advance(50.0, 100.0, 1.0));
        assert_eq!(active.progress, 0.5);
        assert!(active.advance(80.0, 100.0, 1.0));
        assert_eq!(active.progress, 1.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut active = ActiveResearchProject::new("p", 0.8, 1.0, 0.0);
        assert!(active.advance(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_quality_bounds() {
        assert_eq!(quality_score(1.0, 2.0), 1.0);
        assert_eq!(quality_score(0.5, 0.5), 0.375);
    }
}
