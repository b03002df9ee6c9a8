//! Grove Progression - milestone, engagement and skill progression for a cultivation game

pub mod core;
pub mod hub;
pub mod integration;
pub mod milestones;
pub mod progression;

pub use crate::core::{Manager, PlayerId, ProgressionConfig, ProgressionError, Result, Timestamp};
pub use hub::{ProgressionHub, ProgressionSnapshot};
pub use integration::ProgressionIntegrator;
pub use milestones::{MilestoneTracker, RewardSink};
pub use progression::SkillProgressionManager;
