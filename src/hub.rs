//! Central registry owning the three progression managers
//!
//! The hub is the seam where managers meet: milestone rewards flow into the
//! skill manager through `RewardSink`, integrator multipliers scale
//! experience awards, and finished research is reported back to the
//! milestone tracker as `research_<id>` requirement tags.

use serde::Serialize;

use crate::core::config::ProgressionConfig;
use crate::core::error::Result;
use crate::core::lifecycle::Manager;
use crate::core::types::{PlayerId, Timestamp};
use crate::integration::integrator::{IntegrationSummary, ProgressionIntegrator};
use crate::milestones::tracker::{MilestoneCounts, MilestoneTracker};
use crate::progression::config::ExperienceSource;
use crate::progression::manager::{SkillProgressionManager, SkillSummary};

/// Requirement tag reported when a research project completes
pub fn research_requirement(project: &str) -> String {
    format!("research_{}", project)
}

#[derive(Debug)]
pub struct ProgressionHub {
    milestones: MilestoneTracker,
    integration: ProgressionIntegrator,
    skills: SkillProgressionManager,
    /// Completed research already reported to the milestone tracker
    research_reported: usize,
    running: bool,
}

impl ProgressionHub {
    /// Build every manager from a validated config
    pub fn new(config: ProgressionConfig) -> Result<Self> {
        config.validate()?;
        let ProgressionConfig {
            milestones,
            integration,
            skills,
        } = config;

        Ok(Self {
            milestones: MilestoneTracker::new(milestones),
            integration: ProgressionIntegrator::new(integration),
            skills: SkillProgressionManager::new(skills),
            research_reported: 0,
            running: false,
        })
    }

    pub fn milestones(&self) -> &MilestoneTracker {
        &self.milestones
    }

    /// See `integration_mut`
    pub fn milestones_mut(&mut self) -> &mut MilestoneTracker {
        &mut self.milestones
    }

    pub fn integration(&self) -> &ProgressionIntegrator {
        &self.integration
    }

    /// Mutable access for queries and commands. Advance time through the
    /// hub's `tick` only; ticking a manager directly desyncs its clock.
    pub fn integration_mut(&mut self) -> &mut ProgressionIntegrator {
        &mut self.integration
    }

    pub fn skills(&self) -> &SkillProgressionManager {
        &self.skills
    }

    /// See `integration_mut`; `now` reports the skills clock.
    pub fn skills_mut(&mut self) -> &mut SkillProgressionManager {
        &mut self.skills
    }

    /// Complete a milestone, paying its rewards into the skill manager
    pub fn complete_milestone(&mut self, id: &str) -> bool {
        self.milestones.complete_milestone(id, &mut self.skills)
    }

    pub fn update_milestone_progress(&mut self, id: &str, progress: f32) -> bool {
        self.milestones
            .update_milestone_progress(id, progress, &mut self.skills)
    }

    pub fn satisfy_requirement(&mut self, tag: &str) -> usize {
        self.milestones.satisfy_requirement(tag)
    }

    pub fn record_interaction(
        &mut self,
        system: &str,
        interaction: &str,
        engagement: f32,
        player: PlayerId,
    ) -> bool {
        self.integration
            .record_interaction(system, interaction, engagement, player)
    }

    pub fn calculate_bonus(&mut self, system: &str, base: f32, player: PlayerId) -> f32 {
        self.integration.calculate_bonus(system, base, player)
    }

    /// Scale `base` experience by the system's current multiplier and award it.
    ///
    /// Returns the experience the player actually gained.
    pub fn award_experience(
        &mut self,
        system: &str,
        base: f32,
        source: ExperienceSource,
        related_skill: Option<&str>,
        player: PlayerId,
    ) -> f32 {
        let boosted = self.integration.calculate_bonus(system, base, player);
        self.skills.gain_experience(boosted, source, related_skill)
    }

    fn report_research(&mut self) {
        let completed = self.skills.completed_research();
        if completed.len() <= self.research_reported {
            return;
        }
        let tags: Vec<String> = completed[self.research_reported..]
            .iter()
            .map(|p| research_requirement(&p.project))
            .collect();
        self.research_reported = completed.len();

        for tag in tags {
            self.milestones.satisfy_requirement(&tag);
        }
    }

    pub fn now(&self) -> Timestamp {
        self.skills.now()
    }

    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            time: self.now(),
            milestones: self.milestones.counts(),
            completed_milestones: self
                .milestones
                .completed()
                .iter()
                .map(|m| m.id.clone())
                .collect(),
            completion_ratio: self.milestones.completion_ratio(),
            integration: self.integration.summary(),
            engagement: self.integration.engagement_ranking(),
            skills: self.skills.summary(),
        }
    }
}

impl Manager for ProgressionHub {
    fn name(&self) -> &'static str {
        "hub"
    }

    fn init(&mut self) {
        self.milestones.init();
        self.integration.init();
        self.skills.init();
        self.running = true;
        tracing::info!("Progression hub started");
    }

    fn tick(&mut self, dt: f64) {
        if !self.running {
            return;
        }
        self.milestones.tick(dt);
        self.integration.tick(dt);
        self.skills.tick(dt);
        self.report_research();
    }

    fn shutdown(&mut self) {
        self.skills.shutdown();
        self.integration.shutdown();
        self.milestones.shutdown();
        self.running = false;
        tracing::info!("Progression hub stopped");
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Inspection snapshot; not a save format
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionSnapshot {
    pub time: Timestamp,
    pub milestones: MilestoneCounts,
    pub completed_milestones: Vec<String>,
    pub completion_ratio: f32,
    pub integration: IntegrationSummary,
    pub engagement: Vec<(String, f32)>,
    pub skills: SkillSummary,
}

impl ProgressionSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
