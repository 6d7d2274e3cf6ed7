//! Plan comparison and suitability scoring

use telecom_pitch_config::ScoringConfig;
use telecom_pitch_core::{
    Allowance, CountAllowance, CustomerProfile, DataAllowance, NeedCategory, NetworkPriority, Plan,
    PlanComparator, PlanComparison, Priority, StageError,
};

/// Format a GB quantity without float noise (`15`, `15.5`)
fn gb(value: f64) -> String {
    format!("{}", (value * 100.0).round() / 100.0)
}

/// Describe the data allowance change from `current` to `target`
pub fn describe_data_change(current: DataAllowance, target: DataAllowance) -> String {
    match (current, target) {
        (Allowance::Unlimited, Allowance::Unlimited) => {
            "No change: both plans offer unlimited data".to_string()
        }
        (Allowance::Limited(c), Allowance::Unlimited) => {
            format!("Upgrade from {}GB to unlimited data", gb(c))
        }
        (Allowance::Unlimited, Allowance::Limited(t)) => {
            format!("Downgrade from unlimited to {}GB data", gb(t))
        }
        (Allowance::Limited(c), Allowance::Limited(t)) => {
            let diff = t - c;
            if diff > 0.0 {
                format!("Increase of {}GB data ({}GB → {}GB)", gb(diff), gb(c), gb(t))
            } else if diff < 0.0 {
                format!("Decrease of {}GB data ({}GB → {}GB)", gb(-diff), gb(c), gb(t))
            } else {
                format!("No change in data allowance ({}GB)", gb(c))
            }
        }
    }
}

/// Describe the voice allowance change from `current` to `target`
pub fn describe_voice_change(current: CountAllowance, target: CountAllowance) -> String {
    match (current, target) {
        (Allowance::Unlimited, Allowance::Unlimited) => {
            "No change: both plans offer unlimited voice minutes".to_string()
        }
        (Allowance::Limited(c), Allowance::Unlimited) => {
            format!("Upgrade from {} to unlimited voice minutes", c)
        }
        (Allowance::Unlimited, Allowance::Limited(t)) => {
            format!("Downgrade from unlimited to {} voice minutes", t)
        }
        (Allowance::Limited(c), Allowance::Limited(t)) => {
            let diff = i64::from(t) - i64::from(c);
            if diff > 0 {
                format!("Increase of {} voice minutes ({} → {})", diff, c, t)
            } else if diff < 0 {
                format!("Decrease of {} voice minutes ({} → {})", -diff, c, t)
            } else {
                format!("No change in voice minutes ({})", c)
            }
        }
    }
}

/// Rule-based plan comparator
#[derive(Debug, Clone, Default)]
pub struct PlanAnalyzer {
    scoring: ScoringConfig,
}

impl PlanAnalyzer {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self { scoring }
    }

    /// First malformed field of a plan, for callers that skip request validation
    fn check_plan(role: &str, plan: &Plan) -> Result<(), StageError> {
        match plan.issues().into_iter().next() {
            Some(issue) => Err(StageError::invalid_plan(
                format!("{}.{}", role, issue.field),
                issue.message,
            )),
            None => Ok(()),
        }
    }

    /// Monthly and annual savings, positive when the target is cheaper.
    ///
    /// The annual figure is taken from the list-price delta before an active
    /// promotion adjusts the monthly figure, so with a promotion the two do
    /// not agree (120 vs 100 at 20% off: monthly 40, annual 240).
    pub fn savings(current: &Plan, target: &Plan) -> (f64, f64) {
        let mut monthly = current.price - target.price;
        let annual = monthly * 12.0;

        if target.active_promotion().is_some() {
            monthly = current.price - target.effective_price();
        }

        (monthly, annual)
    }

    pub fn feature_improvements(
        current: &Plan,
        target: &Plan,
        profile: &CustomerProfile,
    ) -> Vec<String> {
        let needs = &profile.needs;
        let mut improvements = Vec::new();

        if !current.international_included
            && target.international_included
            && needs.international_needs >= Priority::Medium
        {
            improvements.push("International calling now included".to_string());
        }

        if !current.roaming_included && target.roaming_included {
            improvements.push("Roaming services now included".to_string());
        }

        let (old_hotspot, new_hotspot) = (current.hotspot_gb(), target.hotspot_gb());
        if old_hotspot <= 0.0 && new_hotspot > 0.0 {
            improvements.push(format!("Mobile hotspot with {}GB included", gb(new_hotspot)));
        } else if old_hotspot > 0.0 && new_hotspot > old_hotspot {
            improvements.push(format!(
                "Increased hotspot data ({}GB → {}GB)",
                gb(old_hotspot),
                gb(new_hotspot)
            ));
        }

        if current.network_priority == NetworkPriority::Standard
            && target.network_priority == NetworkPriority::Premium
            && needs.network_quality.is_elevated()
        {
            improvements.push("Premium network priority for faster speeds".to_string());
        }

        // Declared order of the target plan, de-duplicated
        let mut added: Vec<&str> = Vec::new();
        for feature in &target.features {
            if !current.features.contains(feature) && !added.contains(&feature.as_str()) {
                added.push(feature);
                improvements.push(format!("New feature: {}", feature));
            }
        }

        if let Some(pct) = target.promotional_discount_pct() {
            match target.promotional_duration {
                Some(months) => improvements.push(format!(
                    "{}% discount for {} months",
                    gb(pct),
                    months
                )),
                None => improvements.push(format!("{}% promotional discount", gb(pct))),
            }
        }

        improvements
    }

    pub fn drawbacks(current: &Plan, target: &Plan, profile: &CustomerProfile) -> Vec<String> {
        let mut drawbacks = Vec::new();

        if current.international_included && !target.international_included {
            drawbacks.push("Loss of included international calling".to_string());
        }

        if current.roaming_included && !target.roaming_included {
            drawbacks.push("Loss of included roaming services".to_string());
        }

        let (old_hotspot, new_hotspot) = (current.hotspot_gb(), target.hotspot_gb());
        if old_hotspot > 0.0 && new_hotspot < old_hotspot {
            drawbacks.push(format!(
                "Reduced hotspot data ({}GB → {}GB)",
                gb(old_hotspot),
                gb(new_hotspot)
            ));
        }

        if target.contract_length > current.contract_length
            && profile.needs.flexibility.is_elevated()
        {
            drawbacks.push(format!(
                "Longer contract commitment ({} → {} months)",
                current.contract_length, target.contract_length
            ));
        }

        if target.setup_fee > current.setup_fee {
            drawbacks.push(format!("Setup fee of ${:.2}", target.setup_fee));
        }

        drawbacks
    }

    /// Suitability on the configured scale, clamped.
    ///
    /// Cost uses the list-price delta; promotions do not move the score.
    pub fn suitability(&self, current: &Plan, target: &Plan, profile: &CustomerProfile) -> f64 {
        let needs = &profile.needs;
        let usage = &profile.usage_data;
        let weights = &self.scoring;
        let mut score = weights.base_score;

        if let Some(cost) = weights.cost_weight(needs.cost_sensitivity) {
            score += cost.adjustment(current.price - target.price);
        }

        if needs.is_elevated(NeedCategory::DataPriority) {
            score += match target.data_allowance {
                Allowance::Unlimited => weights.data.unlimited,
                allowance if allowance.covers(usage.data_usage_gb) => weights.data.fits,
                _ => -weights.data.exceeds,
            };
        }

        if needs.is_elevated(NeedCategory::VoicePriority) {
            score += match target.voice_minutes {
                Allowance::Unlimited => weights.voice.unlimited,
                allowance if allowance.covers(usage.voice_minutes) => weights.voice.fits,
                _ => -weights.voice.exceeds,
            };
        }

        if needs.is_elevated(NeedCategory::InternationalNeeds) {
            score += if target.international_included {
                weights.international.present
            } else {
                -weights.international.absent
            };
        }

        if needs.is_elevated(NeedCategory::NetworkQuality) {
            score += match target.network_priority {
                NetworkPriority::Premium => weights.network.present,
                NetworkPriority::Standard => -weights.network.absent,
            };
        }

        weights.clamp(score)
    }
}

impl PlanComparator for PlanAnalyzer {
    fn compare(
        &self,
        current: &Plan,
        target: &Plan,
        profile: &CustomerProfile,
    ) -> Result<PlanComparison, StageError> {
        Self::check_plan("current_plan", current)?;
        Self::check_plan("target_plan", target)?;

        let (monthly_savings, annual_savings) = Self::savings(current, target);
        let suitability_score = self.suitability(current, target, profile);

        let comparison = PlanComparison {
            current_plan: current.clone(),
            target_plan: target.clone(),
            monthly_savings,
            annual_savings,
            data_difference: describe_data_change(current.data_allowance, target.data_allowance),
            voice_difference: describe_voice_change(current.voice_minutes, target.voice_minutes),
            feature_improvements: Self::feature_improvements(current, target, profile),
            potential_drawbacks: Self::drawbacks(current, target, profile),
            suitability_score,
        };

        tracing::debug!(
            current = %current.plan_id,
            target = %target.plan_id,
            monthly_savings = comparison.monthly_savings,
            suitability = comparison.suitability_score,
            improvements = comparison.feature_improvements.len(),
            drawbacks = comparison.potential_drawbacks.len(),
            "Plans compared"
        );

        Ok(comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telecom_pitch_core::UsageStatistics;

    fn plan(id: &str, price: f64, data: DataAllowance, voice: CountAllowance) -> Plan {
        Plan::new(id, id, price, data, voice)
    }

    fn profile_with(levels: &[(NeedCategory, Priority)]) -> CustomerProfile {
        let mut profile = CustomerProfile::default();
        for (category, level) in levels {
            profile.needs.set(*category, *level);
        }
        profile
    }

    #[test]
    fn test_data_descriptions() {
        use Allowance::{Limited, Unlimited};
        assert_eq!(
            describe_data_change(Unlimited, Unlimited),
            "No change: both plans offer unlimited data"
        );
        assert_eq!(
            describe_data_change(Limited(50.0), Unlimited),
            "Upgrade from 50GB to unlimited data"
        );
        assert_eq!(
            describe_data_change(Unlimited, Limited(20.0)),
            "Downgrade from unlimited to 20GB data"
        );
        assert_eq!(
            describe_data_change(Limited(15.0), Limited(25.0)),
            "Increase of 10GB data (15GB → 25GB)"
        );
        assert_eq!(
            describe_data_change(Limited(20.5), Limited(15.0)),
            "Decrease of 5.5GB data (20.5GB → 15GB)"
        );
        assert_eq!(
            describe_data_change(Limited(15.0), Limited(15.0)),
            "No change in data allowance (15GB)"
        );
    }

    #[test]
    fn test_voice_descriptions() {
        use Allowance::{Limited, Unlimited};
        assert_eq!(
            describe_voice_change(Unlimited, Unlimited),
            "No change: both plans offer unlimited voice minutes"
        );
        assert_eq!(
            describe_voice_change(Limited(500), Unlimited),
            "Upgrade from 500 to unlimited voice minutes"
        );
        assert_eq!(
            describe_voice_change(Unlimited, Limited(300)),
            "Downgrade from unlimited to 300 voice minutes"
        );
        assert_eq!(
            describe_voice_change(Limited(1000), Limited(600)),
            "Decrease of 400 voice minutes (1000 → 600)"
        );
    }

    #[test]
    fn test_savings_without_promotion() {
        let current = plan("a", 80.0, Allowance::Limited(10.0), Allowance::Unlimited);
        let target = plan("b", 65.0, Allowance::Limited(10.0), Allowance::Unlimited);
        assert_eq!(PlanAnalyzer::savings(&current, &target), (15.0, 180.0));
    }

    #[test]
    fn test_promotion_needs_duration_to_change_price() {
        let current = plan("a", 120.0, Allowance::Unlimited, Allowance::Unlimited);
        let mut target = plan("b", 100.0, Allowance::Unlimited, Allowance::Unlimited);
        target.promotional_discount = Some(20.0);

        assert_eq!(PlanAnalyzer::savings(&current, &target), (20.0, 240.0));

        let target = target.promotion(20.0, 6);
        let (monthly, annual) = PlanAnalyzer::savings(&current, &target);
        assert!((monthly - 40.0).abs() < 1e-9);
        assert_eq!(annual, 240.0);
    }

    #[test]
    fn test_improvements_in_order() {
        let current = plan("a", 50.0, Allowance::Limited(10.0), Allowance::Limited(500))
            .hotspot(5.0)
            .features(["Voicemail"]);
        let target = plan("b", 60.0, Allowance::Unlimited, Allowance::Unlimited)
            .international(true)
            .roaming(true)
            .hotspot(15.0)
            .network(NetworkPriority::Premium)
            .features(["Voicemail", "Streaming bundle", "5G access", "Streaming bundle"])
            .promotion(25.0, 3);
        let profile = profile_with(&[
            (NeedCategory::InternationalNeeds, Priority::Medium),
            (NeedCategory::NetworkQuality, Priority::High),
        ]);

        assert_eq!(
            PlanAnalyzer::feature_improvements(&current, &target, &profile),
            vec![
                "International calling now included",
                "Roaming services now included",
                "Increased hotspot data (5GB → 15GB)",
                "Premium network priority for faster speeds",
                "New feature: Streaming bundle",
                "New feature: 5G access",
                "25% discount for 3 months",
            ]
        );
    }

    #[test]
    fn test_need_gated_improvements_are_skipped() {
        let current = plan("a", 50.0, Allowance::Limited(10.0), Allowance::Limited(500));
        let target = plan("b", 50.0, Allowance::Limited(10.0), Allowance::Limited(500))
            .international(true)
            .network(NetworkPriority::Premium)
            .hotspot(10.0);
        // International stays at its default of low, network at medium
        let profile = CustomerProfile::default();

        assert_eq!(
            PlanAnalyzer::feature_improvements(&current, &target, &profile),
            vec!["Mobile hotspot with 10GB included"]
        );
    }

    #[test]
    fn test_drawbacks() {
        let current = plan("a", 50.0, Allowance::Limited(10.0), Allowance::Limited(500))
            .international(true)
            .roaming(true)
            .hotspot(10.0)
            .contract(12, 0.0);
        let target = plan("b", 40.0, Allowance::Limited(10.0), Allowance::Limited(500))
            .contract(24, 35.0);
        let profile = profile_with(&[(NeedCategory::Flexibility, Priority::High)]);

        assert_eq!(
            PlanAnalyzer::drawbacks(&current, &target, &profile),
            vec![
                "Loss of included international calling",
                "Loss of included roaming services",
                "Reduced hotspot data (10GB → 0GB)",
                "Longer contract commitment (12 → 24 months)",
                "Setup fee of $35.00",
            ]
        );

        let relaxed = CustomerProfile::default();
        assert_eq!(PlanAnalyzer::drawbacks(&current, &target, &relaxed).len(), 4);
    }

    #[test]
    fn test_suitability_additive_adjustments() {
        let analyzer = PlanAnalyzer::default();
        let current = plan("a", 120.0, Allowance::Limited(50.0), Allowance::Limited(1000));
        let target = plan("b", 95.0, Allowance::Unlimited, Allowance::Limited(1000))
            .network(NetworkPriority::Premium)
            .international(true);

        let mut profile = profile_with(&[
            (NeedCategory::CostSensitivity, Priority::Critical),
            (NeedCategory::DataPriority, Priority::Critical),
            (NeedCategory::NetworkQuality, Priority::High),
        ]);
        profile.usage_data = UsageStatistics::new(65.0, 700, 0);

        // 5.0 + 2.0 (capped cost) + 1.5 (unlimited) + 1.0 (premium)
        assert!((analyzer.suitability(&current, &target, &profile) - 9.5).abs() < 1e-9);

        profile.needs.voice_priority = Priority::High;
        // + 0.5 voice fits, then clamped to 10
        assert_eq!(analyzer.suitability(&current, &target, &profile), 10.0);
    }

    #[test]
    fn test_suitability_penalties_clamp_at_floor() {
        let analyzer = PlanAnalyzer::default();
        let current = plan("a", 40.0, Allowance::Unlimited, Allowance::Unlimited);
        let target = plan("b", 90.0, Allowance::Limited(5.0), Allowance::Limited(100));

        let mut profile = profile_with(&[
            (NeedCategory::CostSensitivity, Priority::Critical),
            (NeedCategory::DataPriority, Priority::High),
            (NeedCategory::VoicePriority, Priority::High),
            (NeedCategory::InternationalNeeds, Priority::High),
            (NeedCategory::NetworkQuality, Priority::Critical),
        ]);
        profile.usage_data = UsageStatistics::new(20.0, 900, 0);

        // 5 - 2 - 1.5 - 1 - 0.5 - 0.5 = -0.5 before clamping
        assert_eq!(analyzer.suitability(&current, &target, &profile), 1.0);
    }

    #[test]
    fn test_high_cost_weight() {
        let analyzer = PlanAnalyzer::default();
        let current = plan("a", 60.0, Allowance::Unlimited, Allowance::Unlimited);
        let target = plan("b", 45.0, Allowance::Unlimited, Allowance::Unlimited);
        let profile = profile_with(&[(NeedCategory::CostSensitivity, Priority::High)]);
        // 15 / 15 = 1.0
        assert!((analyzer.suitability(&current, &target, &profile) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_prices_have_no_savings() {
        let analyzer = PlanAnalyzer::default();
        let current = plan("a", 55.0, Allowance::Unlimited, Allowance::Unlimited);
        let target = plan("b", 55.0, Allowance::Unlimited, Allowance::Unlimited);
        let comparison = analyzer
            .compare(&current, &target, &CustomerProfile::default())
            .unwrap();
        assert_eq!(comparison.monthly_savings, 0.0);
        assert_eq!(comparison.annual_savings, 0.0);
        assert!(comparison.data_difference.starts_with("No change"));
        assert!(comparison.voice_difference.starts_with("No change"));
        assert_eq!(comparison.suitability_score, 5.0);
    }

    #[test]
    fn test_invalid_plan_is_rejected() {
        let analyzer = PlanAnalyzer::default();
        let current = plan("a", f64::NAN, Allowance::Unlimited, Allowance::Unlimited);
        let target = plan("b", 50.0, Allowance::Unlimited, Allowance::Unlimited);
        let err = analyzer
            .compare(&current, &target, &CustomerProfile::default())
            .unwrap_err();
        assert!(matches!(err, StageError::InvalidPlan { ref field, .. } if field == "current_plan.price"));

        let target = target.promotion(150.0, 2);
        let current = plan("a", 50.0, Allowance::Unlimited, Allowance::Unlimited);
        assert!(analyzer
            .compare(&current, &target, &CustomerProfile::default())
            .is_err());

        let target = plan("b", 50.0, Allowance::Unlimited, Allowance::Unlimited).hotspot(-1.0);
        let err = analyzer
            .compare(&current, &target, &CustomerProfile::default())
            .unwrap_err();
        assert!(matches!(err, StageError::InvalidPlan { ref field, .. } if field == "target_plan.hotspot_data"));
    }
}
