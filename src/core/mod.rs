pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod types;

pub use clock::GameClock;
pub use config::ProgressionConfig;
pub use error::{ProgressionError, Result};
pub use events::{EventChannel, SubscriptionId};
pub use lifecycle::Manager;
pub use types::{PlayerId, Timestamp};
