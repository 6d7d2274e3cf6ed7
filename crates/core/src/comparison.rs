//! Plan comparison result

use serde::{Deserialize, Serialize};

use crate::plan::Plan;

/// Quantitative comparison between the current and the target plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanComparison {
    pub current_plan: Plan,
    pub target_plan: Plan,
    /// Positive when the target is cheaper
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub data_difference: String,
    pub voice_difference: String,
    #[serde(default)]
    pub feature_improvements: Vec<String>,
    #[serde(default)]
    pub potential_drawbacks: Vec<String>,
    /// Fit of the target plan, 1.0 to 10.0
    pub suitability_score: f64,
}

impl PlanComparison {
    pub fn saves_money(&self) -> bool {
        self.monthly_savings > 0.0
    }

    pub fn costs_more(&self) -> bool {
        self.monthly_savings < 0.0
    }

    /// Whether any improvement string contains `needle` (case-insensitive)
    pub fn mentions_feature(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.feature_improvements
            .iter()
            .any(|f| f.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Allowance;

    fn comparison(monthly: f64, features: &[&str]) -> PlanComparison {
        let plan = Plan::new("p", "P", 50.0, Allowance::Limited(10.0), Allowance::Limited(500));
        PlanComparison {
            current_plan: plan.clone(),
            target_plan: plan,
            monthly_savings: monthly,
            annual_savings: monthly * 12.0,
            data_difference: String::new(),
            voice_difference: String::new(),
            feature_improvements: features.iter().map(|s| s.to_string()).collect(),
            potential_drawbacks: Vec::new(),
            suitability_score: 5.0,
        }
    }

    #[test]
    fn test_savings_sign() {
        assert!(comparison(5.0, &[]).saves_money());
        assert!(comparison(-5.0, &[]).costs_more());
        let even = comparison(0.0, &[]);
        assert!(!even.saves_money() && !even.costs_more());
    }

    #[test]
    fn test_mentions_feature_ignores_case() {
        let c = comparison(0.0, &["Premium network priority for faster speeds"]);
        assert!(c.mentions_feature("premium"));
        assert!(!c.mentions_feature("discount"));
    }
}
