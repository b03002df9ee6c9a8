//! Compounded skill effects: base values, pairwise synergies, specializations
//!
//! For each effect type:
//!   total = sum over learned skills of
//!           value(level) * (1 + synergy(skill)) * (1 + spec_bonus * spec_level(category))

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::Timestamp;
use crate::progression::definitions::{EffectType, SkillCategory, SkillDefinition};

/// How two learned skills relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynergyKind {
    SameDomain,
    SameCategory,
    CrossDiscipline,
}

/// Domain wins over category when a pair shares both
pub fn classify(a: &SkillDefinition, b: &SkillDefinition) -> SynergyKind {
    if a.domain == b.domain {
        SynergyKind::SameDomain
    } else if a.category == b.category {
        SynergyKind::SameCategory
    } else {
        SynergyKind::CrossDiscipline
    }
}

/// Synergy per level of the weaker skill in a pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynergyRates {
    pub same_domain: f32,
    pub same_category: f32,
    pub cross_discipline: f32,
}

impl Default for SynergyRates {
    fn default() -> Self {
        Self {
            same_domain: 0.01,
            same_category: 0.005,
            cross_discipline: 0.002,
        }
    }
}

impl SynergyRates {
    pub fn rate(&self, kind: SynergyKind) -> f32 {
        match kind {
            SynergyKind::SameDomain => self.same_domain,
            SynergyKind::SameCategory => self.same_category,
            SynergyKind::CrossDiscipline => self.cross_discipline,
        }
    }
}

/// Per-skill synergy bonus, summed over every pair the skill is part of
pub fn synergy_bonuses(
    learned: &[(&SkillDefinition, u32)],
    rates: &SynergyRates,
) -> AHashMap<String, f32> {
    let mut bonuses: AHashMap<String, f32> = learned
        .iter()
        .map(|(def, _)| (def.id.clone(), 0.0))
        .collect();

    for (i, (a, level_a)) in learned.iter().enumerate() {
        for (b, level_b) in learned.iter().skip(i + 1) {
            let bonus = rates.rate(classify(a, b)) * (*level_a).min(*level_b) as f32;
            if let Some(v) = bonuses.get_mut(&a.id) {
                *v += bonus;
            }
            if let Some(v) = bonuses.get_mut(&b.id) {
                *v += bonus;
            }
        }
    }
    bonuses
}

/// Specialization state for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecializationProgress {
    pub category: SkillCategory,
    pub level: u32,
    pub paths: Vec<String>,
    pub unlocked_at: Timestamp,
}

impl SpecializationProgress {
    pub fn new(category: SkillCategory, path: &str, now: Timestamp) -> Self {
        Self {
            category,
            level: 1,
            paths: vec![path.to_string()],
            unlocked_at: now,
        }
    }

    /// Add a path, raising the level. Returns false if already unlocked.
    pub fn unlock_path(&mut self, path: &str) -> bool {
        if self.paths.iter().any(|p| p == path) {
            return false;
        }
        self.paths.push(path.to_string());
        self.level = self.level.saturating_add(1);
        true
    }
}

/// Recompute every effect total
pub fn compute_effects(
    learned: &[(&SkillDefinition, u32)],
    synergies: &AHashMap<String, f32>,
    specializations: &BTreeMap<SkillCategory, SpecializationProgress>,
    specialization_bonus: f32,
) -> BTreeMap<EffectType, f32> {
    let mut totals = BTreeMap::new();

    for (def, level) in learned {
        let synergy = 1.0 + synergies.get(&def.id).copied().unwrap_or(0.0);
        let spec_level = specializations.get(&def.category).map_or(0, |s| s.level);
        let specialization = 1.0 + specialization_bonus * spec_level as f32;

        for effect in &def.effects {
            let value = effect.value_at(*level) * synergy * specialization;
            *totals.entry(effect.effect).or_insert(0.0) += value;
        }
    }
    totals
}
