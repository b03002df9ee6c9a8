//! Experience requirement curves
//!
//! Either a power curve (`base * level^exponent`) or a designer-authored
//! keyframe curve sampled with linear interpolation.

use serde::{Deserialize, Serialize};

/// Smallest requirement any curve reports, so level-up loops always consume experience
pub const MIN_REQUIREMENT: f32 = 1.0;

/// Default player curve exponent
pub const DEFAULT_EXPONENT: f32 = 1.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub level: f32,
    pub experience: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExperienceCurve {
    Power { base: f32, exponent: f32 },
    Keyframes { points: Vec<CurvePoint> },
}

impl ExperienceCurve {
    pub fn power(base: f32) -> Self {
        ExperienceCurve::Power {
            base,
            exponent: DEFAULT_EXPONENT,
        }
    }

    /// Experience needed to advance from `level` to `level + 1`
    pub fn required(&self, level: u32) -> f32 {
        let raw = match self {
            ExperienceCurve::Power { base, exponent } => {
                base * (level.max(1) as f32).powf(*exponent)
            }
            ExperienceCurve::Keyframes { points } => sample_keyframes(points, level as f32),
        };
        if raw.is_finite() {
            raw.max(MIN_REQUIREMENT)
        } else {
            MIN_REQUIREMENT
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ExperienceCurve::Power { base, exponent } => {
                if *base <= 0.0 || !base.is_finite() {
                    return Err(format!("curve base must be positive, got {}", base));
                }
                if *exponent < 0.0 || !exponent.is_finite() {
                    return Err(format!("curve exponent must be non-negative, got {}", exponent));
                }
            }
            ExperienceCurve::Keyframes { points } => {
                if points.is_empty() {
                    return Err("keyframe curve needs at least one point".into());
                }
                if points.windows(2).any(|w| w[1].level <= w[0].level) {
                    return Err("keyframe levels must be strictly increasing".into());
                }
            }
        }
        Ok(())
    }
}

fn sample_keyframes(points: &[CurvePoint], level: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if level <= first.level {
        return first.experience;
    }
    if level >= last.level {
        return last.experience;
    }
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if level >= a.level && level <= b.level {
            let t = (level - a.level) / (b.level - a.level);
            return a.experience + (b.experience - a.experience) * t;
        }
    }
    last.experience
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_curve() {
        let curve = ExperienceCurve::power(100.0);
        assert_eq!(curve.required(1), 100.0);
        let level_2 = curve.required(2);
        assert!((level_2 - 100.0 * 2f32.powf(1.8)).abs() < 1e-3);
        assert!(curve.required(10) > curve.required(9));
    }

    #[test]
    fn test_power_curve_treats_zero_as_one() {
        let curve = ExperienceCurve::power(100.0);
        assert_eq!(curve.required(0), curve.required(1));
    }

    #[test]
    fn test_keyframe_interpolation() {
        let curve = ExperienceCurve::Keyframes {
            points: vec![
                CurvePoint { level: 1.0, experience: 100.0 },
                CurvePoint { level: 5.0, experience: 500.0 },
            ],
        };
        assert_eq!(curve.required(1), 100.0);
        assert_eq!(curve.required(3), 300.0);
        assert_eq!(curve.required(5), 500.0);
        // Clamped past the last key
        assert_eq!(curve.required(9), 500.0);
    }

    #[test]
    fn test_requirement_floor() {
        let curve = ExperienceCurve::Keyframes {
            points: vec![CurvePoint { level: 1.0, experience: 0.0 }],
        };
        assert_eq!(curve.required(1), MIN_REQUIREMENT);
    }

    #[test]
    fn test_validate() {
        assert!(ExperienceCurve::power(100.0).validate().is_ok());
        assert!(ExperienceCurve::Power { base: 0.0, exponent: 1.8 }.validate().is_err());
        assert!(ExperienceCurve::Keyframes { points: vec![] }.validate().is_err());
    }
}
