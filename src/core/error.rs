use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressionError {
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("Skill already learned: {0}")]
    SkillAlreadyLearned(String),

    #[error("Skill not learned: {0}")]
    SkillNotLearned(String),

    #[error("Prerequisites not met for skill: {0}")]
    PrerequisitesNotMet(String),

    #[error("Skill {0} is already at max level")]
    MaxLevelReached(String),

    #[error("Insufficient skill points: need {required}, have {available}")]
    InsufficientSkillPoints { required: u32, available: u32 },

    #[error("Insufficient skill experience: need {required:.1}, have {available:.1}")]
    InsufficientExperience { required: f32, available: f32 },

    #[error("Unknown research project: {0}")]
    UnknownProject(String),

    #[error("Research project already active: {0}")]
    ProjectAlreadyActive(String),

    #[error("Research project already completed: {0}")]
    ProjectAlreadyCompleted(String),

    #[error("Research project not active: {0}")]
    ProjectNotActive(String),

    #[error("Research capacity reached ({0} simultaneous projects)")]
    ResearchCapacityReached(usize),

    #[error("Research project {id} not feasible (score {score:.2}, need {required:.2})")]
    InsufficientFeasibility { id: String, score: f32, required: f32 },

    #[error("Research is disabled")]
    ResearchDisabled,

    #[error("Unknown bonus: {0}")]
    UnknownBonus(String),

    #[error("Bonus {0} is on cooldown")]
    BonusOnCooldown(String),

    #[error("Bonuses are disabled")]
    BonusesDisabled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProgressionError>;
