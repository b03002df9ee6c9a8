//! Skill definitions - categories, domains, effects and the built-in skill tree

use serde::{Deserialize, Serialize};

use crate::progression::player::PlayerCapabilities;

/// Gameplay area a skill belongs to; specializations are tracked per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Cultivation,
    Genetics,
    Research,
    Engineering,
    Commerce,
}

impl SkillCategory {
    pub fn name(&self) -> &'static str {
        match self {
            SkillCategory::Cultivation => "Cultivation",
            SkillCategory::Genetics => "Genetics",
            SkillCategory::Research => "Research",
            SkillCategory::Engineering => "Engineering",
            SkillCategory::Commerce => "Commerce",
        }
    }
}

/// Broad field of knowledge, cutting across categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillDomain {
    /// Living things: seeds, plants, pollinators
    Life,
    /// Soil, water, climate
    Earth,
    /// Tools and machinery
    Craft,
    /// Study, trade, people
    Mind,
}

/// What a skill improves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    GrowthRate,
    YieldBonus,
    LearningSpeed,
    ResearchSpeed,
    ResourceEfficiency,
    TradeValue,
    DiscoveryChance,
}

/// A passive effect scaling linearly with skill level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub effect: EffectType,
    /// Value at level 1
    pub base_value: f32,
    /// Added per level above 1
    #[serde(default)]
    pub per_level: f32,
}

impl SkillEffect {
    pub fn new(effect: EffectType, base_value: f32, per_level: f32) -> Self {
        Self {
            effect,
            base_value,
            per_level,
        }
    }

    pub fn value_at(&self, level: u32) -> f32 {
        if level == 0 {
            return 0.0;
        }
        self.base_value + self.per_level * (level - 1) as f32
    }
}

/// Another skill that must reach a level first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPrerequisite {
    pub skill: String,
    pub min_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    pub domain: SkillDomain,
    pub max_level: u32,
    /// Skill points to learn; levelling from L costs `base_cost * L`
    pub base_cost: u32,
    #[serde(default)]
    pub prerequisites: Vec<SkillPrerequisite>,
    #[serde(default)]
    pub min_player_level: u32,
    #[serde(default)]
    pub effects: Vec<SkillEffect>,
    /// Level at which this skill opens its specialization path
    #[serde(default)]
    pub specialization_level: Option<u32>,
    #[serde(default)]
    pub specialization_path: Option<String>,
}

impl SkillDefinition {
    pub fn new(id: &str, name: &str, category: SkillCategory, domain: SkillDomain) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            domain,
            max_level: 10,
            base_cost: 1,
            prerequisites: Vec::new(),
            min_player_level: 0,
            effects: Vec::new(),
            specialization_level: None,
            specialization_path: None,
        }
    }

    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_cost(mut self, base_cost: u32) -> Self {
        self.base_cost = base_cost;
        self
    }

    pub fn requires(mut self, skill: &str, min_level: u32) -> Self {
        self.prerequisites.push(SkillPrerequisite {
            skill: skill.into(),
            min_level,
        });
        self
    }

    pub fn requires_player_level(mut self, level: u32) -> Self {
        self.min_player_level = level;
        self
    }

    pub fn with_effect(mut self, effect: EffectType, base_value: f32, per_level: f32) -> Self {
        self.effects.push(SkillEffect::new(effect, base_value, per_level));
        self
    }

    pub fn specializes_at(mut self, level: u32, path: &str) -> Self {
        self.specialization_level = Some(level);
        self.specialization_path = Some(path.into());
        self
    }

    /// Skill points needed to learn the skill
    pub fn learn_cost(&self) -> u32 {
        self.base_cost
    }

    /// Skill points needed to go from `level` to `level + 1`
    pub fn level_cost(&self, level: u32) -> u32 {
        self.base_cost.saturating_mul(level.max(1))
    }

    /// Whether the player meets every prerequisite and the player-level gate
    pub fn prerequisites_met(&self, capabilities: &PlayerCapabilities) -> bool {
        capabilities.player_level >= self.min_player_level
            && self
                .prerequisites
                .iter()
                .all(|p| capabilities.skill_level(&p.skill) >= p.min_level)
    }

    /// Sum of this skill's values for one effect type at `level`
    pub fn effect_value(&self, effect: EffectType, level: u32) -> f32 {
        self.effects
            .iter()
            .filter(|e| e.effect == effect)
            .map(|e| e.value_at(level))
            .sum()
    }
}

/// Built-in skill tree
pub fn default_skills() -> Vec<SkillDefinition> {
    use EffectType::*;
    use SkillCategory::*;
    use SkillDomain::*;

    vec![
        SkillDefinition::new("seed_handling", "Seed Handling", Cultivation, Life)
            .with_effect(GrowthRate, 2.0, 1.0)
            .specializes_at(5, "propagation"),
        SkillDefinition::new("soil_science", "Soil Science", Cultivation, Earth)
            .with_effect(YieldBonus, 3.0, 1.5)
            .specializes_at(5, "soil_mastery"),
        SkillDefinition::new("plant_genetics", "Plant Genetics", Genetics, Life)
            .with_cost(2)
            .requires("seed_handling", 3)
            .with_effect(DiscoveryChance, 1.0, 0.5)
            .specializes_at(5, "hybridization"),
        SkillDefinition::new("botanical_study", "Botanical Study", Research, Mind)
            .with_effect(LearningSpeed, 5.0, 2.5)
            .with_effect(ResearchSpeed, 2.0, 1.0),
        SkillDefinition::new("lab_methods", "Lab Methods", Research, Craft)
            .with_cost(2)
            .requires("botanical_study", 2)
            .with_effect(ResearchSpeed, 5.0, 2.0)
            .specializes_at(6, "experimentation"),
        SkillDefinition::new("irrigation", "Irrigation", Engineering, Earth)
            .with_effect(ResourceEfficiency, 4.0, 2.0)
            .specializes_at(5, "hydraulics"),
        SkillDefinition::new("market_savvy", "Market Savvy", Commerce, Mind)
            .with_effect(TradeValue, 5.0, 2.5),
        SkillDefinition::new("master_cultivator", "Master Cultivator", Cultivation, Life)
            .with_max_level(5)
            .with_cost(3)
            .requires("seed_handling", 8)
            .requires("soil_science", 5)
            .requires_player_level(10)
            .with_effect(GrowthRate, 10.0, 5.0)
            .with_effect(YieldBonus, 10.0, 5.0),
    ]
}
