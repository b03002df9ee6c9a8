//! Skill progression manager - player level, skills, research and specializations
//!
//! Skills move monotonically from unlearned through learned (level 1) up to
//! mastered. Effect totals are recomputed whenever a skill or specialization
//! changes.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::Serialize;

use crate::core::clock::GameClock;
use crate::core::error::{ProgressionError, Result};
use crate::core::events::{EventChannel, SubscriptionId};
use crate::core::lifecycle::Manager;
use crate::core::types::Timestamp;
use crate::milestones::rewards::RewardSink;
use crate::progression::config::{ExperienceSource, SkillConfig};
use crate::progression::definitions::{EffectType, SkillCategory, SkillDefinition};
use crate::progression::effects::{compute_effects, synergy_bonuses, SpecializationProgress};
use crate::progression::player::{PlayerCapabilities, PlayerLevel, PlayerSkillData};
use crate::progression::research::{
    quality_score, team_expertise, ActiveResearchProject, CompletedResearchProject,
    ResearchProjectDefinition,
};

/// How a skill level up is paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelUpPayment {
    /// `base_cost * level` skill points
    SkillPoints,
    /// The skill's own accumulated experience
    Experience,
}

/// Notifications raised by the skill manager
#[derive(Debug, Clone, PartialEq)]
pub enum SkillEvent {
    ExperienceGained { amount: f32, source: ExperienceSource },
    PlayerLeveledUp { level: u32, skill_points: u32 },
    SkillPointsGranted { points: u32 },
    SkillLearned { skill: String },
    SkillLeveledUp { skill: String, level: u32 },
    SkillMastered { skill: String },
    SpecializationUnlocked { category: SkillCategory, path: String, level: u32 },
    ResearchStarted { project: String },
    ResearchCompleted { project: String, quality: f32 },
    ResearchCancelled { project: String },
    FeatureUnlocked { feature: String },
}

/// Aggregate view for dashboards and snapshots
#[derive(Debug, Clone, Serialize)]
pub struct SkillSummary {
    pub player_level: u32,
    pub total_experience: f32,
    pub skill_points: u32,
    pub learned_skills: usize,
    pub mastered_skills: usize,
    pub active_research: Vec<String>,
    pub completed_research: Vec<String>,
    pub specializations: usize,
    pub effects: BTreeMap<EffectType, f32>,
}

#[derive(Debug)]
pub struct SkillProgressionManager {
    config: SkillConfig,
    clock: GameClock,
    running: bool,
    player: PlayerLevel,
    skills: AHashMap<String, PlayerSkillData>,
    active_research: Vec<ActiveResearchProject>,
    completed_research: Vec<CompletedResearchProject>,
    specializations: BTreeMap<SkillCategory, SpecializationProgress>,
    effects: BTreeMap<EffectType, f32>,
    events: EventChannel<SkillEvent>,
}

impl SkillProgressionManager {
    pub fn new(config: SkillConfig) -> Self {
        let player = PlayerLevel::new(config.starting_skill_points);
        Self {
            config,
            clock: GameClock::new(),
            running: false,
            player,
            skills: AHashMap::new(),
            active_research: Vec::new(),
            completed_research: Vec::new(),
            specializations: BTreeMap::new(),
            effects: BTreeMap::new(),
            events: EventChannel::new(),
        }
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&SkillEvent) + 'static) -> SubscriptionId {
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

    // === Lookups ===

    pub fn definition(&self, skill: &str) -> Option<&SkillDefinition> {
        self.config.skills.iter().find(|s| s.id == skill)
    }

    pub fn project(&self, project: &str) -> Option<&ResearchProjectDefinition> {
        self.config.projects.iter().find(|p| p.id == project)
    }

    pub fn player(&self) -> &PlayerLevel {
        &self.player
    }

    pub fn skill(&self, skill: &str) -> Option<&PlayerSkillData> {
        self.skills.get(skill)
    }

    pub fn skills(&self) -> impl Iterator<Item = &PlayerSkillData> {
        self.skills.values()
    }

    pub fn is_learned(&self, skill: &str) -> bool {
        self.skills.contains_key(skill)
    }

    pub fn skill_level(&self, skill: &str) -> u32 {
        self.skills.get(skill).map_or(0, |s| s.level)
    }

    pub fn specialization(&self, category: SkillCategory) -> Option<&SpecializationProgress> {
        self.specializations.get(&category)
    }

    pub fn specializations(&self) -> impl Iterator<Item = &SpecializationProgress> {
        self.specializations.values()
    }

    /// Compounded value for one effect type
    pub fn effect_value(&self, effect: EffectType) -> f32 {
        self.effects.get(&effect).copied().unwrap_or(0.0)
    }

    pub fn effects(&self) -> &BTreeMap<EffectType, f32> {
        &self.effects
    }

    pub fn active_research(&self) -> &[ActiveResearchProject] {
        &self.active_research
    }

    pub fn completed_research(&self) -> &[CompletedResearchProject] {
        &self.completed_research
    }

    pub fn research_progress(&self, project: &str) -> Option<f32> {
        self.active_research
            .iter()
            .find(|p| p.project == project)
            .map(|p| p.progress)
    }

    pub fn is_research_completed(&self, project: &str) -> bool {
        self.completed_research.iter().any(|p| p.project == project)
    }

    /// Snapshot of everything prerequisite and feasibility checks look at
    pub fn capabilities(&self) -> PlayerCapabilities {
        PlayerCapabilities {
            player_level: self.player.level,
            skill_levels: self
                .skills
                .values()
                .map(|s| (s.skill.clone(), s.level))
                .collect(),
            completed_research: self
                .completed_research
                .iter()
                .map(|p| p.project.clone())
                .collect(),
        }
    }

    /// Unlearned skills whose prerequisites are currently met
    pub fn available_skills(&self) -> Vec<&SkillDefinition> {
        let capabilities = self.capabilities();
        self.config
            .skills
            .iter()
            .filter(|def| !self.is_learned(&def.id) && def.prerequisites_met(&capabilities))
            .collect()
    }

    /// `1 + per_point * sum of learning-speed effect values` over learned skills
    pub fn learning_speed_multiplier(&self) -> f32 {
        let points: f32 = self
            .skills
            .values()
            .filter_map(|data| {
                self.definition(&data.skill)
                    .map(|def| def.effect_value(EffectType::LearningSpeed, data.level))
            })
            .sum();
        1.0 + self.config.learning_speed_per_point * points
    }

    pub fn research_speed_multiplier(&self) -> f32 {
        let bonus = self.config.research_speed_per_point * self.effect_value(EffectType::ResearchSpeed);
        (self.config.research_speed * (1.0 + bonus)).max(0.0)
    }

    // === Experience ===

    /// Award experience from gameplay.
    ///
    /// The source multiplier always applies. Naming a related skill adds the
    /// learning-speed multiplier and credits the skill's own experience.
    /// Returns the experience actually gained.
    pub fn gain_experience(
        &mut self,
        amount: f32,
        source: ExperienceSource,
        related_skill: Option<&str>,
    ) -> f32 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }

        let mut multiplier = self.config.source_multipliers.for_source(source);
        if related_skill.is_some() {
            multiplier *= self.learning_speed_multiplier();
        }
        let gained = amount * multiplier;

        if let Some(skill) = related_skill {
            if let Some(data) = self.skills.get_mut(skill) {
                data.experience += gained;
            }
        }

        self.award_flat_experience(gained, source);
        gained
    }

    fn award_flat_experience(&mut self, amount: f32, source: ExperienceSource) {
        if amount <= 0.0 {
            return;
        }
        self.events.emit(SkillEvent::ExperienceGained { amount, source });
        self.player.total_experience += amount;
        self.player.current_experience += amount;
        self.process_level_ups();
    }

    fn process_level_ups(&mut self) {
        while self.player.level < self.config.max_player_level {
            let required = self.config.level_curve.required(self.player.level);
            if self.player.current_experience < required {
                break;
            }
            self.player.current_experience -= required;
            self.player.level += 1;
            self.player.skill_points = self
                .player
                .skill_points
                .saturating_add(self.config.skill_points_per_level);

            tracing::info!(
                "Player reached level {} ({} skill points)",
                self.player.level,
                self.player.skill_points
            );
            self.events.emit(SkillEvent::PlayerLeveledUp {
                level: self.player.level,
                skill_points: self.player.skill_points,
            });
        }
    }

    /// Experience needed for the player's next level
    pub fn experience_to_next_level(&self) -> f32 {
        if self.player.level >= self.config.max_player_level {
            return 0.0;
        }
        (self.config.level_curve.required(self.player.level) - self.player.current_experience).max(0.0)
    }

    pub fn add_skill_points(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.player.skill_points = self.player.skill_points.saturating_add(points);
        self.events.emit(SkillEvent::SkillPointsGranted { points });
    }

    // === Skills ===

    pub fn learn_skill(&mut self, skill: &str) -> Result<()> {
        let def = self
            .definition(skill)
            .cloned()
            .ok_or_else(|| ProgressionError::UnknownSkill(skill.to_string()))?;

        if self.is_learned(skill) {
            return Err(ProgressionError::SkillAlreadyLearned(skill.to_string()));
        }
        if !def.prerequisites_met(&self.capabilities()) {
            tracing::debug!("Cannot learn {}: prerequisites not met", skill);
            return Err(ProgressionError::PrerequisitesNotMet(skill.to_string()));
        }

        let cost = def.learn_cost();
        if self.player.skill_points < cost {
            return Err(ProgressionError::InsufficientSkillPoints {
                required: cost,
                available: self.player.skill_points,
            });
        }

        let now = self.clock.now();
        self.player.skill_points -= cost;
        self.skills
            .insert(skill.to_string(), PlayerSkillData::learned(skill, now));

        tracing::info!("Learned skill {}", def.name);
        self.events.emit(SkillEvent::SkillLearned {
            skill: skill.to_string(),
        });

        self.after_level_change(&def, 1);
        Ok(())
    }

    /// Raise a learned skill by one level. Returns the new level.
    pub fn level_up_skill(&mut self, skill: &str, payment: LevelUpPayment) -> Result<u32> {
        let def = self
            .definition(skill)
            .cloned()
            .ok_or_else(|| ProgressionError::UnknownSkill(skill.to_string()))?;
        let (level, experience) = self
            .skills
            .get(skill)
            .map(|s| (s.level, s.experience))
            .ok_or_else(|| ProgressionError::SkillNotLearned(skill.to_string()))?;

        if level >= def.max_level {
            return Err(ProgressionError::MaxLevelReached(skill.to_string()));
        }

        match payment {
            LevelUpPayment::SkillPoints => {
                let cost = def.level_cost(level);
                if self.player.skill_points < cost {
                    return Err(ProgressionError::InsufficientSkillPoints {
                        required: cost,
                        available: self.player.skill_points,
                    });
                }
                self.player.skill_points -= cost;
            }
            LevelUpPayment::Experience => {
                let required = self.config.skill_curve.required(level + 1);
                if experience < required {
                    return Err(ProgressionError::InsufficientExperience {
                        required,
                        available: experience,
                    });
                }
                if let Some(data) = self.skills.get_mut(skill) {
                    data.experience -= required;
                }
            }
        }

        let now = self.clock.now();
        let new_level = level + 1;
        if let Some(data) = self.skills.get_mut(skill) {
            data.level = new_level;
            data.last_leveled_at = now;
        }

        tracing::debug!("{} reached level {}", def.name, new_level);
        self.events.emit(SkillEvent::SkillLeveledUp {
            skill: skill.to_string(),
            level: new_level,
        });

        self.after_level_change(&def, new_level);
        Ok(new_level)
    }

    /// Specialization, mastery and effect bookkeeping after a skill changes level
    fn after_level_change(&mut self, def: &SkillDefinition, level: u32) {
        self.check_specialization(def, level);

        if level >= def.max_level {
            self.master_skill(def);
        }

        self.recalculate_effects();
    }

    fn master_skill(&mut self, def: &SkillDefinition) {
        let now = self.clock.now();
        let Some(data) = self.skills.get_mut(&def.id) else {
            return;
        };
        if data.mastered {
            return;
        }
        data.mastered = true;
        data.mastered_at = Some(now);

        tracing::info!("Mastered skill {}", def.name);
        self.events.emit(SkillEvent::SkillMastered {
            skill: def.id.clone(),
        });

        let bonus = self.config.mastery_experience;
        self.award_flat_experience(bonus, ExperienceSource::Milestone);
    }

    fn check_specialization(&mut self, def: &SkillDefinition, level: u32) {
        let (Some(threshold), Some(path)) = (def.specialization_level, def.specialization_path.as_deref()) else {
            return;
        };
        if level < threshold {
            return;
        }

        let now = self.clock.now();
        let unlocked_level = match self.specializations.get_mut(&def.category) {
            Some(spec) => spec.unlock_path(path).then_some(spec.level),
            None => {
                self.specializations
                    .insert(def.category, SpecializationProgress::new(def.category, path, now));
                Some(1)
            }
        };

        if let Some(spec_level) = unlocked_level {
            tracing::info!(
                "Specialization unlocked: {} / {} (level {})",
                def.category.name(),
                path,
                spec_level
            );
            self.events.emit(SkillEvent::SpecializationUnlocked {
                category: def.category,
                path: path.to_string(),
                level: spec_level,
            });
        }
    }

    fn recalculate_effects(&mut self) {
        let mut learned: Vec<(&SkillDefinition, u32)> = self
            .skills
            .values()
            .filter_map(|data| {
                self.config
                    .skills
                    .iter()
                    .find(|def| def.id == data.skill)
                    .map(|def| (def, data.level))
            })
            .collect();
        learned.sort_by(|a, b| a.0.id.cmp(&b.0.id));

        let synergies = synergy_bonuses(&learned, &self.config.synergy);
        self.effects = compute_effects(
            &learned,
            &synergies,
            &self.specializations,
            self.config.specialization_bonus,
        );
    }

    // === Research ===

    pub fn start_research(&mut self, project: &str) -> Result<()> {
        if !self.config.enable_research {
            return Err(ProgressionError::ResearchDisabled);
        }
        let def = self
            .project(project)
            .cloned()
            .ok_or_else(|| ProgressionError::UnknownProject(project.to_string()))?;

        if self.research_progress(project).is_some() {
            return Err(ProgressionError::ProjectAlreadyActive(project.to_string()));
        }
        if self.is_research_completed(project) {
            return Err(ProgressionError::ProjectAlreadyCompleted(project.to_string()));
        }
        if self.active_research.len() >= self.config.max_active_research {
            return Err(ProgressionError::ResearchCapacityReached(self.config.max_active_research));
        }

        let capabilities = self.capabilities();
        let feasibility = def.feasibility(&capabilities);
        if feasibility < self.config.min_feasibility {
            tracing::debug!("Research {} not feasible ({:.2})", project, feasibility);
            return Err(ProgressionError::InsufficientFeasibility {
                id: project.to_string(),
                score: feasibility,
                required: self.config.min_feasibility,
            });
        }

        let expertise = team_expertise(&def, &capabilities, |s| {
            self.definition(s).map(|d| d.max_level)
        });
        let quality = quality_score(feasibility, expertise);

        self.active_research.push(ActiveResearchProject::new(
            project,
            quality,
            expertise,
            self.clock.now(),
        ));

        tracing::info!("Research started: {} (expertise {:.2})", def.name, expertise);
        self.events.emit(SkillEvent::ResearchStarted {
            project: project.to_string(),
        });
        Ok(())
    }

    pub fn cancel_research(&mut self, project: &str) -> Result<()> {
        let idx = self
            .active_research
            .iter()
            .position(|p| p.project == project)
            .ok_or_else(|| ProgressionError::ProjectNotActive(project.to_string()))?;
        self.active_research.remove(idx);

        tracing::debug!("Research cancelled: {}", project);
        self.events.emit(SkillEvent::ResearchCancelled {
            project: project.to_string(),
        });
        Ok(())
    }

    fn tick_research(&mut self, dt: f64) {
        if self.active_research.is_empty() {
            return;
        }

        let speed = self.research_speed_multiplier();
        let capabilities = self.capabilities();
        let skills = &self.config.skills;
        let projects = &self.config.projects;

        let mut finished = Vec::new();
        for active in self.active_research.iter_mut() {
            let Some(def) = projects.iter().find(|p| p.id == active.project) else {
                continue;
            };
            active.team_expertise = team_expertise(def, &capabilities, |s| {
                skills.iter().find(|d| d.id == s).map(|d| d.max_level)
            });
            if active.advance(dt, def.duration_secs, speed) {
                finished.push(active.project.clone());
            }
        }

        for project in finished {
            self.complete_research(&project);
        }
    }

    fn complete_research(&mut self, project: &str) {
        let Some(idx) = self.active_research.iter().position(|p| p.project == project) else {
            return;
        };
        let Some(def) = self.project(project).cloned() else {
            return;
        };

        let completed = self.active_research.remove(idx).finish(self.clock.now());
        let quality = completed.quality;
        self.completed_research.push(completed);

        tracing::info!("Research completed: {} (quality {:.2})", def.name, quality);
        self.events.emit(SkillEvent::ResearchCompleted {
            project: project.to_string(),
            quality,
        });

        self.award_flat_experience(def.experience_reward, ExperienceSource::Research);
        for feature in &def.unlocks {
            self.events.emit(SkillEvent::FeatureUnlocked {
                feature: feature.clone(),
            });
        }
    }

    pub fn summary(&self) -> SkillSummary {
        SkillSummary {
            player_level: self.player.level,
            total_experience: self.player.total_experience,
            skill_points: self.player.skill_points,
            learned_skills: self.skills.len(),
            mastered_skills: self.skills.values().filter(|s| s.mastered).count(),
            active_research: self.active_research.iter().map(|p| p.project.clone()).collect(),
            completed_research: self.completed_research.iter().map(|p| p.project.clone()).collect(),
            specializations: self.specializations.len(),
            effects: self.effects.clone(),
        }
    }
}

impl RewardSink for SkillProgressionManager {
    fn grant_experience(&mut self, amount: f32) {
        self.gain_experience(amount, ExperienceSource::Milestone, None);
    }

    fn grant_skill_points(&mut self, points: u32) {
        self.add_skill_points(points);
    }

    fn unlock(&mut self, feature: &str) {
        tracing::info!("Unlocked {}", feature);
        self.events.emit(SkillEvent::FeatureUnlocked {
            feature: feature.to_string(),
        });
    }
}

impl Manager for SkillProgressionManager {
    fn name(&self) -> &'static str {
        "skills"
    }

    fn init(&mut self) {
        self.running = true;
        self.recalculate_effects();
        tracing::info!(
            "Skill progression started: {} skills, {} research projects",
            self.config.skills.len(),
            self.config.projects.len()
        );
    }

    fn tick(&mut self, dt: f64) {
        if !self.running {
            return;
        }
        self.clock.advance(dt);
        if self.config.enable_research && dt.is_finite() && dt > 0.0 {
            self.tick_research(dt);
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
