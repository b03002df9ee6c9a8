//! Milestone tracking
//!
//! Milestones live in exactly one of three partitions (locked, active,
//! completed) and move forward as their requirement tags are satisfied.

pub mod milestone;
pub mod rewards;
pub mod tracker;

pub use milestone::{default_seeds, Milestone, MilestoneConfig, MilestoneSeed};
pub use rewards::{apply_rewards, NoRewards, Reward, RewardSink};
pub use tracker::{MilestoneCounts, MilestoneEvent, MilestoneState, MilestoneTracker};
