//! Suitability scoring and pitch tuning
//!
//! Defaults reproduce the stock weighting: base 5.0 clamped to [1.0, 10.0],
//! cost capped at 2.0 (critical) or 1.5 (high).

use serde::{Deserialize, Serialize};
use telecom_pitch_core::Priority;

use crate::ConfigError;

/// Cost adjustment: `min(cap, |savings| / divisor)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeight {
    pub cap: f64,
    pub divisor: f64,
}

impl CostWeight {
    /// Signed adjustment for a monthly delta (positive = target cheaper)
    pub fn adjustment(&self, monthly_savings: f64) -> f64 {
        let magnitude = (monthly_savings.abs() / self.divisor).min(self.cap);
        if monthly_savings > 0.0 {
            magnitude
        } else {
            -magnitude
        }
    }
}

/// Allowance adjustments for a data or voice need
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllowanceWeights {
    /// Target allowance is unlimited
    pub unlimited: f64,
    /// Current usage fits the target allowance
    pub fits: f64,
    /// Current usage exceeds the target allowance (subtracted)
    pub exceeds: f64,
}

/// Adjustments for an included/not-included capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlagWeights {
    pub present: f64,
    /// Subtracted when the capability is missing
    pub absent: f64,
}

/// Suitability score weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub cost_critical: CostWeight,
    pub cost_high: CostWeight,
    pub data: AllowanceWeights,
    pub voice: AllowanceWeights,
    pub international: FlagWeights,
    pub network: FlagWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 5.0,
            min_score: 1.0,
            max_score: 10.0,
            cost_critical: CostWeight { cap: 2.0, divisor: 10.0 },
            cost_high: CostWeight { cap: 1.5, divisor: 15.0 },
            data: AllowanceWeights {
                unlimited: 1.5,
                fits: 1.0,
                exceeds: 1.5,
            },
            voice: AllowanceWeights {
                unlimited: 1.0,
                fits: 0.5,
                exceeds: 1.0,
            },
            international: FlagWeights {
                present: 1.0,
                absent: 0.5,
            },
            network: FlagWeights {
                present: 1.0,
                absent: 0.5,
            },
        }
    }
}

impl ScoringConfig {
    /// Cost weight for a cost-sensitivity level; `None` below high
    pub fn cost_weight(&self, level: Priority) -> Option<CostWeight> {
        match level {
            Priority::Critical => Some(self.cost_critical),
            Priority::High => Some(self.cost_high),
            Priority::Medium | Priority::Low => None,
        }
    }

    pub fn clamp(&self, score: f64) -> f64 {
        score.clamp(self.min_score, self.max_score)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("scoring.base_score", self.base_score),
            ("scoring.min_score", self.min_score),
            ("scoring.max_score", self.max_score),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("Must be finite, got {}", value)));
            }
        }

        if self.min_score >= self.max_score {
            return Err(invalid(
                "scoring.min_score",
                format!(
                    "Must be below max_score ({} >= {})",
                    self.min_score, self.max_score
                ),
            ));
        }

        if !(self.min_score..=self.max_score).contains(&self.base_score) {
            return Err(invalid(
                "scoring.base_score",
                format!(
                    "Must be between {} and {}, got {}",
                    self.min_score, self.max_score, self.base_score
                ),
            ));
        }

        for (field, weight) in [
            ("scoring.cost_critical.divisor", self.cost_critical),
            ("scoring.cost_high.divisor", self.cost_high),
        ] {
            if weight.divisor <= 0.0 || !weight.divisor.is_finite() {
                return Err(invalid(
                    field,
                    format!("Must be positive, got {}", weight.divisor),
                ));
            }
            if weight.cap < 0.0 {
                return Err(invalid(field, format!("Cap must not be negative, got {}", weight.cap)));
            }
        }

        Ok(())
    }
}

/// Pitch composition limits and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Highlighted features kept after re-ranking
    pub max_feature_highlights: usize,
    /// Feature improvements quoted in the value proposition
    pub value_proposition_features: usize,
    /// Feature improvements quoted in the "current plan is fine" rebuttal
    pub objection_features: usize,
    /// Monthly savings above which a savings callout is added to urgency
    pub urgency_savings_threshold: f64,
    /// Suitability at or above which the plan counts as an excellent fit
    pub high_fit_threshold: f64,
    /// Tenure above which loyalty is acknowledged
    pub loyalty_years_threshold: u32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            max_feature_highlights: 5,
            value_proposition_features: 2,
            objection_features: 3,
            urgency_savings_threshold: 20.0,
            high_fit_threshold: 8.0,
            loyalty_years_threshold: 2,
        }
    }
}

impl PitchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_feature_highlights == 0 {
            return Err(invalid(
                "pitch.max_feature_highlights",
                "Must be at least 1".to_string(),
            ));
        }
        if !self.urgency_savings_threshold.is_finite() || !self.high_fit_threshold.is_finite() {
            return Err(invalid("pitch", "Thresholds must be finite".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message,
    }
}
