//! Player and skill progression
//!
//! Player levels driven by experience curves, a skill tree with
//! prerequisites and mastery, research projects, and compounded skill
//! effects with synergies and category specializations.

pub mod config;
pub mod curve;
pub mod definitions;
pub mod effects;
pub mod manager;
pub mod player;
pub mod research;

pub use config::{ExperienceSource, SkillConfig, SourceMultipliers};
pub use curve::{CurvePoint, ExperienceCurve};
pub use definitions::{
    default_skills, EffectType, SkillCategory, SkillDefinition, SkillDomain, SkillEffect,
    SkillPrerequisite,
};
pub use effects::{SpecializationProgress, SynergyKind, SynergyRates};
pub use manager::{LevelUpPayment, SkillEvent, SkillProgressionManager, SkillSummary};
pub use player::{PlayerCapabilities, PlayerLevel, PlayerSkillData};
pub use research::{
    default_projects, ActiveResearchProject, CompletedResearchProject, ResearchProjectDefinition,
};
