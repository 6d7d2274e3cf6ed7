//! Pitch composition
//!
//! Template selection only: every fragment is a fixed phrase parameterized by
//! numbers from the comparison and fields of the profile.
//!
//! ## Fragments
//!
//! - Opening hook: one hook, first matching priority branch wins
//! - Pain-point rebuttals, value proposition, re-ranked feature highlights
//! - Cost/benefit narrative keyed by savings sign and cost sensitivity
//! - Objection responses, call to action, urgency and personal notes

use std::collections::BTreeMap;

use telecom_pitch_config::PitchConfig;
use telecom_pitch_core::{
    objection_ids, CustomerProfile, CustomerSegment, NeedCategory, PainPoint, PaymentHistory,
    Pitch, PitchComposer, PlanComparison, Priority, StageError, UsagePattern,
};

const REBUTTAL_PREFIX: &str = "I specifically chose this plan because it addresses your concerns: ";

// =============================================================================
// Relevance keywords for feature re-ranking
// =============================================================================

/// Checked in this order per feature; the first matching category promotes it
const RELEVANCE: [(NeedCategory, &[&str]); 4] = [
    (NeedCategory::InternationalNeeds, &["international"]),
    (NeedCategory::DataPriority, &["data", "unlimited", "hotspot"]),
    (
        NeedCategory::NetworkQuality,
        &["premium", "priority", "speed", "coverage"],
    ),
    (
        NeedCategory::CostSensitivity,
        &["discount", "promotion", "save", "%"],
    ),
];

/// Rule-based pitch composer
#[derive(Debug, Clone, Default)]
pub struct PitchGenerator {
    config: PitchConfig,
}

impl PitchGenerator {
    pub fn new(config: PitchConfig) -> Self {
        Self { config }
    }

    pub fn opening_hook(&self, profile: &CustomerProfile, comparison: &PlanComparison) -> String {
        let name = profile.display_name();
        let needs = &profile.needs;

        if needs.cost_sensitivity.is_elevated() {
            return if comparison.saves_money() {
                format!(
                    "Hi {}, I have great news! I found a way to save you ${:.2} every month on your phone bill - that's ${:.2} per year!",
                    name, comparison.monthly_savings, comparison.annual_savings
                )
            } else {
                format!(
                    "Hi {}, I know keeping costs down is important to you. Let me show you how you can get significantly more value for just a small increase in your monthly spend.",
                    name
                )
            };
        }

        if needs.data_priority.is_elevated() {
            let delta = comparison.data_difference.to_lowercase();
            if delta.contains("unlimited") {
                return format!(
                    "Hi {}, imagine never worrying about data limits again. I have a plan that gives you unlimited data for your streaming and browsing needs.",
                    name
                );
            }
            if delta.contains("increase") {
                return format!(
                    "Hi {}, I noticed you're a heavy data user. I found a plan that gives you {} - perfect for your usage patterns!",
                    name, comparison.data_difference
                );
            }
        }

        if needs.network_quality.is_elevated() {
            return format!(
                "Hi {}, I understand reliable coverage is crucial for you. I have a solution that will give you premium network priority and improved coverage where you need it most.",
                name
            );
        }

        format!(
            "Hi {}, I've been analyzing your current plan and usage patterns, and I believe I've found a much better fit for your specific needs.",
            name
        )
    }

    /// Rebuttal for one pain point; the bill rebuttal needs actual savings
    fn rebuttal(pain_point: PainPoint, comparison: &PlanComparison) -> Option<String> {
        let text = match pain_point {
            PainPoint::PoorCoverage => "The new plan includes access to our premium network with 99.9% coverage and priority data speeds.".to_string(),
            PainPoint::ExpensiveBill if comparison.saves_money() => format!(
                "This plan will reduce your monthly costs by ${:.2}, giving you more value for less money.",
                comparison.monthly_savings
            ),
            PainPoint::ExpensiveBill => return None,
            PainPoint::SlowInternet => "You'll get premium network priority, which means faster data speeds even during peak hours.".to_string(),
            PainPoint::PoorCustomerService => "Our premium customers get access to dedicated support with average wait times under 2 minutes.".to_string(),
            PainPoint::ContractIssues => "This plan offers flexible terms so you're not locked into something that doesn't work for you.".to_string(),
            PainPoint::BillingIssues => "We've simplified our billing and you'll have a dedicated account manager to ensure clarity.".to_string(),
            PainPoint::OverageCharges => "With this plan's generous allowances, you'll never have to worry about overage charges again.".to_string(),
        };
        Some(text)
    }

    pub fn pain_point_address(
        &self,
        profile: &CustomerProfile,
        comparison: &PlanComparison,
    ) -> String {
        if profile.pain_points.is_empty() {
            return "I understand you're looking for better value and service from your telecom provider.".to_string();
        }

        let rebuttals: Vec<String> = profile
            .pain_points
            .iter()
            .filter_map(|p| Self::rebuttal(*p, comparison))
            .collect();
        if rebuttals.is_empty() {
            return "This plan is designed to eliminate the frustrations you've experienced with your current service.".to_string();
        }
        format!("{}{}", REBUTTAL_PREFIX, rebuttals.join(" "))
    }

    pub fn value_proposition(
        &self,
        profile: &CustomerProfile,
        comparison: &PlanComparison,
    ) -> String {
        let needs = &profile.needs;
        let mut points: Vec<String> = Vec::new();

        if needs.cost_sensitivity.is_elevated() && comparison.saves_money() {
            points.push(format!("Save ${:.2} annually", comparison.annual_savings));
        }

        if needs.data_priority.is_elevated() {
            let delta = comparison.data_difference.to_lowercase();
            if delta.contains("unlimited") {
                points.push("Unlimited data for worry-free usage".to_string());
            } else if delta.contains("increase") {
                points.push(format!("More data ({})", comparison.data_difference));
            }
        }

        points.extend(
            comparison
                .feature_improvements
                .iter()
                .take(self.config.value_proposition_features)
                .cloned(),
        );

        if needs.network_quality.is_elevated() && comparison.mentions_feature("premium") {
            points.push("Premium network quality and priority".to_string());
        }

        if points.is_empty() {
            format!(
                "This plan is perfectly tailored to your usage pattern and provides better overall value than your current plan (suitability score: {:.1}/10).",
                comparison.suitability_score
            )
        } else {
            format!(
                "This plan gives you exactly what matters most to you: {}.",
                points.join(", ")
            )
        }
    }

    /// Improvements re-ranked by relevance, truncated to the configured maximum
    pub fn feature_highlights(
        &self,
        profile: &CustomerProfile,
        comparison: &PlanComparison,
    ) -> Vec<String> {
        let mut ranked: Vec<String> = Vec::with_capacity(comparison.feature_improvements.len());

        for feature in &comparison.feature_improvements {
            let lower = feature.to_lowercase();
            let relevant = RELEVANCE.iter().any(|(category, words)| {
                profile.needs.is_elevated(*category) && words.iter().any(|w| lower.contains(w))
            });

            if relevant {
                ranked.insert(0, feature.clone());
            } else {
                ranked.push(feature.clone());
            }
        }

        ranked.truncate(self.config.max_feature_highlights);
        ranked
    }

    pub fn cost_benefit(&self, profile: &CustomerProfile, comparison: &PlanComparison) -> String {
        let monthly = comparison.monthly_savings;
        let annual = comparison.annual_savings;
        let cost_level = profile.needs.cost_sensitivity;

        if monthly > 0.0 {
            if cost_level == Priority::Critical {
                format!(
                    "You'll save ${:.2} every month - that's ${:.2} per year! Over a 2-year period, you'd save ${:.2}. That's real money back in your pocket.",
                    monthly,
                    annual,
                    annual * 2.0
                )
            } else {
                format!(
                    "Not only do you get better service, but you'll also save ${:.2} monthly (${:.2} annually).",
                    monthly, annual
                )
            }
        } else if monthly < 0.0 {
            let extra = monthly.abs();
            if cost_level == Priority::Low {
                format!(
                    "For just ${:.2} more per month, you get significantly better service and features - excellent value for the upgrade.",
                    extra
                )
            } else {
                format!(
                    "While this plan is ${:.2} more per month, the additional value you receive makes it worth every penny.",
                    extra
                )
            }
        } else {
            "You get all these improvements at the same price you're paying now - it's like getting a free upgrade!".to_string()
        }
    }

    pub fn objection_handling(
        &self,
        profile: &CustomerProfile,
        comparison: &PlanComparison,
    ) -> BTreeMap<String, String> {
        let mut objections = BTreeMap::new();

        if comparison.costs_more() {
            objections.insert(
                objection_ids::COST_CONCERN.to_string(),
                format!(
                    "I understand cost is important. While this is ${:.2} more monthly, you're getting {} new features and better service. It's actually better value per dollar.",
                    comparison.monthly_savings.abs(),
                    comparison.feature_improvements.len()
                ),
            );
        }

        if profile.needs.flexibility.is_elevated() {
            objections.insert(
                objection_ids::CONTRACT_FLEXIBILITY.to_string(),
                "I know flexibility is important to you. This plan offers options to adjust your service as your needs change.".to_string(),
            );
        }

        if profile.has_pain_point(PainPoint::PoorCoverage) {
            objections.insert(
                objection_ids::COVERAGE_DOUBT.to_string(),
                "I completely understand your coverage concerns. This plan includes access to our premium network with 99.9% coverage and we offer a 30-day satisfaction guarantee.".to_string(),
            );
        }

        objections.insert(
            objection_ids::SWITCHING_HASSLE.to_string(),
            "I know switching providers can seem like a hassle, but I'll personally handle the entire transition for you. You'll keep your phone number and there's no downtime.".to_string(),
        );

        let cited: Vec<&str> = comparison
            .feature_improvements
            .iter()
            .take(self.config.objection_features)
            .map(String::as_str)
            .collect();
        let missing_out = if cited.is_empty() {
            "a plan built around how you actually use your phone".to_string()
        } else {
            cited.join(", ")
        };
        objections.insert(
            objection_ids::CURRENT_PLAN_OK.to_string(),
            format!(
                "Your current plan might seem fine, but you're missing out on {}. Why settle for 'okay' when you can have exactly what you need?",
                missing_out
            ),
        );

        objections
    }

    pub fn call_to_action(&self, profile: &CustomerProfile, comparison: &PlanComparison) -> String {
        let needs = &profile.needs;

        if needs.cost_sensitivity.is_elevated() && comparison.saves_money() {
            return format!(
                "Let's get you started today so you can begin saving ${:.2} immediately. I can have your new service active within 24 hours. What's the best time to complete the switch?",
                comparison.monthly_savings
            );
        }

        if comparison.mentions_feature("discount") {
            return "This promotional offer is available for a limited time. Let me secure this deal for you today before it expires. Shall we proceed with the activation?".to_string();
        }

        if needs.network_quality.is_elevated() {
            return "You deserve reliable, fast service. Let's get you switched over to our premium network today. I can start the process right now and you'll notice the difference immediately.".to_string();
        }

        format!(
            "This plan is perfectly matched to your needs with a {:.1}/10 fit score. Let's get you set up today so you can start enjoying these benefits right away.",
            comparison.suitability_score
        )
    }

    /// Reasons to act now; never empty
    pub fn urgency_factors(&self, profile: &CustomerProfile, comparison: &PlanComparison) -> Vec<String> {
        let mut factors = Vec::new();

        if comparison.mentions_feature("discount") || comparison.mentions_feature("%") {
            factors.push("Limited-time promotional pricing expires soon".to_string());
        }

        if profile.contract_end_date.is_some() {
            factors.push("Perfect timing - your current contract allows for changes".to_string());
        }

        if comparison.monthly_savings > self.config.urgency_savings_threshold {
            factors.push(format!(
                "Start saving ${:.2}/month immediately",
                comparison.monthly_savings
            ));
        }

        if !profile.pain_points.is_empty() {
            factors.push("Stop dealing with current service issues".to_string());
        }

        if comparison.suitability_score >= self.config.high_fit_threshold {
            factors.push("This plan is an excellent fit for your needs".to_string());
        }

        factors.push("Plan availability subject to change".to_string());
        factors
    }

    pub fn personalization_notes(&self, profile: &CustomerProfile) -> Vec<String> {
        let mut notes = Vec::new();

        if profile.loyalty_years > self.config.loyalty_years_threshold {
            notes.push(format!(
                "As a valued {}-year customer, you deserve our best service",
                profile.loyalty_years
            ));
        }

        match profile.usage_pattern {
            UsagePattern::Heavy => notes.push(
                "I can see you're a power user - this plan is designed for people like you"
                    .to_string(),
            ),
            UsagePattern::Business => notes
                .push("This business-grade plan matches your professional needs".to_string()),
            UsagePattern::Light | UsagePattern::Moderate => {}
        }

        match profile.segment {
            CustomerSegment::Family => notes.push(
                "Perfect for keeping your family connected with shared benefits".to_string(),
            ),
            CustomerSegment::Business => notes
                .push("Designed for business reliability and professional features".to_string()),
            CustomerSegment::Individual | CustomerSegment::Enterprise => {}
        }

        if !profile.location.trim().is_empty() {
            notes.push(format!("Excellent coverage in the {} area", profile.location));
        }

        if profile.payment_history == PaymentHistory::Good {
            notes.push("Your excellent payment history qualifies you for our best rates".to_string());
        }

        notes
    }
}

impl PitchComposer for PitchGenerator {
    fn compose(
        &self,
        profile: &CustomerProfile,
        comparison: &PlanComparison,
    ) -> Result<Pitch, StageError> {
        if !comparison.monthly_savings.is_finite() || !comparison.suitability_score.is_finite() {
            return Err(StageError::InvalidComparison(format!(
                "non-finite figures (monthly savings {}, suitability {})",
                comparison.monthly_savings, comparison.suitability_score
            )));
        }

        let pitch = Pitch {
            opening_hook: self.opening_hook(profile, comparison),
            pain_point_address: self.pain_point_address(profile, comparison),
            value_proposition: self.value_proposition(profile, comparison),
            feature_highlights: self.feature_highlights(profile, comparison),
            cost_benefit_analysis: self.cost_benefit(profile, comparison),
            objection_handling: self.objection_handling(profile, comparison),
            call_to_action: self.call_to_action(profile, comparison),
            urgency_factors: self.urgency_factors(profile, comparison),
            personalization_notes: self.personalization_notes(profile),
        };

        tracing::debug!(
            highlights = pitch.feature_highlights.len(),
            objections = pitch.objection_handling.len(),
            urgency = pitch.urgency_factors.len(),
            "Pitch composed"
        );

        Ok(pitch)
    }
}
