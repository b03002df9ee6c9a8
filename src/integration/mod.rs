//! Cross-system progression integration
//!
//! Tracks how players engage with each game system and turns that
//! engagement into reward multipliers: streaks for repeated play in one
//! system, combos for playing several systems together, and time-boxed
//! bonuses unlocked by usage patterns.

pub mod bonus;
pub mod combo;
pub mod config;
pub mod integrator;
pub mod profile;
pub mod streak;

pub use bonus::{Bonus, BonusDefinition, Eligibility};
pub use combo::{Combo, ComboChange, ComboDefinition};
pub use config::IntegrationConfig;
pub use integrator::{IntegrationSummary, IntegratorEvent, InteractionEvent, ProgressionIntegrator};
pub use profile::{PlayerIntegrationProfile, RecentActivity, SystemProfile, SystemSeed};
pub use streak::{streak_multiplier, Streak, StreakChange, StreakConfig};
