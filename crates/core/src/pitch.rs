//! Composed sales pitch

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Objection tags used as keys of [`Pitch::objection_handling`]
pub mod objection_ids {
    pub const COST_CONCERN: &str = "cost_concern";
    pub const CONTRACT_FLEXIBILITY: &str = "contract_flexibility";
    pub const COVERAGE_DOUBT: &str = "coverage_doubt";
    pub const SWITCHING_HASSLE: &str = "switching_hassle";
    pub const CURRENT_PLAN_OK: &str = "current_plan_ok";
}

/// Narrative fragments handed to a sales representative
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pitch {
    pub opening_hook: String,
    pub pain_point_address: String,
    pub value_proposition: String,
    /// Most relevant improvements first, at most five
    #[serde(default)]
    pub feature_highlights: Vec<String>,
    pub cost_benefit_analysis: String,
    /// Objection tag to rebuttal
    #[serde(default)]
    pub objection_handling: BTreeMap<String, String>,
    pub call_to_action: String,
    #[serde(default)]
    pub urgency_factors: Vec<String>,
    #[serde(default)]
    pub personalization_notes: Vec<String>,
}
