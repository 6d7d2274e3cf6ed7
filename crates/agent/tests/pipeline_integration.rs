//! End-to-end pipeline scenarios

use std::sync::Arc;

use telecom_pitch_agent::{PipelineError, PipelineRequest, PipelineStep, SalesPipeline};
use telecom_pitch_core::{
    Allowance, CustomerProfile, CustomerSegment, NeedCategory, NetworkPriority, Pitch,
    PitchComposer, Plan, PlanComparator, PlanComparison, Priority, StageError, UsagePattern,
    UsageReport, UsageStatistics,
};

fn current_plan() -> Plan {
    Plan::new(
        "basic_50",
        "Basic 50GB",
        120.0,
        Allowance::Limited(50.0),
        Allowance::Limited(1000),
    )
}

fn premium_plan() -> Plan {
    Plan::new(
        "premium_unlimited",
        "Premium Unlimited",
        95.0,
        Allowance::Unlimited,
        Allowance::Unlimited,
    )
    .network(NetworkPriority::Premium)
    .international(true)
}

fn scenario_a() -> PipelineRequest {
    PipelineRequest::new(
        "My current plan is way too expensive and I need unlimited data for work. \
         I keep getting dropped calls too.",
        current_plan(),
        premium_plan(),
        UsageReport::new(UsageStatistics::new(65.0, 900, 150)).customer("cust_a", "Jordan"),
    )
}

#[test]
fn scenario_a_cost_and_data_driven_upgrade() {
    let outcome = SalesPipeline::new().run(scenario_a());
    assert!(outcome.success, "{}", outcome.error);

    let profile = outcome.customer_profile.expect("profile");
    assert_eq!(profile.needs.cost_sensitivity, Priority::Critical);
    assert_eq!(profile.needs.data_priority, Priority::Critical);
    assert_eq!(profile.segment, CustomerSegment::Business);
    assert_eq!(profile.usage_pattern, UsagePattern::Heavy);

    let comparison = outcome.plan_comparison.expect("comparison");
    assert_eq!(comparison.monthly_savings, 25.0);
    assert_eq!(comparison.annual_savings, 300.0);
    assert!(comparison.data_difference.contains("Upgrade"));
    assert!(comparison.data_difference.contains("unlimited"));
    assert!(comparison.suitability_score >= 8.0);
    assert!(comparison.suitability_score <= 10.0);

    let pitch = outcome.personalized_pitch.expect("pitch");
    assert!(pitch.opening_hook.starts_with("Hi Jordan, I have great news!"));
    assert!(pitch.feature_highlights.len() <= 5);
    assert_eq!(
        pitch.urgency_factors.last().map(String::as_str),
        Some("Plan availability subject to change")
    );
}

#[test]
fn scenario_b_missing_target_plan() {
    let mut request = scenario_a();
    request.target_plan = None;

    let outcome = SalesPipeline::new().run(request);
    assert!(!outcome.success);
    assert_eq!(outcome.step, PipelineStep::Error);
    assert_eq!(outcome.error, "Missing required fields: target_plan");
    assert!(!outcome.error.contains("current_plan"));
    assert!(outcome.customer_profile.is_none());
    assert!(outcome.plan_comparison.is_none());
    assert!(outcome.personalized_pitch.is_none());
}

#[test]
fn scenario_c_no_keywords_keeps_defaults() {
    let request = PipelineRequest::new(
        "Hello, I'd like to hear about my options.",
        current_plan(),
        premium_plan(),
        UsageReport::new(UsageStatistics::default()),
    );

    let outcome = SalesPipeline::new().run(request);
    assert!(outcome.success, "{}", outcome.error);

    let profile = outcome.customer_profile.expect("profile");
    for category in NeedCategory::ALL {
        assert_eq!(
            profile.needs.get(category),
            category.default_priority(),
            "{} changed",
            category
        );
    }
    assert_eq!(profile.usage_pattern, UsagePattern::Light);
    assert_eq!(profile.segment, CustomerSegment::Individual);
    assert!(profile.pain_points.is_empty());
}

#[test]
fn promotional_discount_asymmetry() {
    let current = Plan::new("cur", "Current", 120.0, Allowance::Unlimited, Allowance::Unlimited);
    let target = Plan::new("tgt", "Promo", 100.0, Allowance::Unlimited, Allowance::Unlimited)
        .promotion(20.0, 6);
    let request = PipelineRequest::new(
        "Just browsing",
        current,
        target,
        UsageReport::new(UsageStatistics::new(5.0, 100, 10)),
    );

    let outcome = SalesPipeline::new().run(request);
    let comparison = outcome.plan_comparison.expect("comparison");
    assert!((comparison.monthly_savings - 40.0).abs() < 1e-9);
    assert_eq!(comparison.annual_savings, 240.0);
    assert!(comparison
        .feature_improvements
        .contains(&"20% discount for 6 months".to_string()));
}

#[test]
fn equal_prices_read_as_free_upgrade() {
    let current = Plan::new("cur", "Current", 60.0, Allowance::Limited(10.0), Allowance::Unlimited);
    let target = Plan::new("tgt", "Target", 60.0, Allowance::Limited(30.0), Allowance::Unlimited);
    let request = PipelineRequest::new(
        "Tell me what you have",
        current,
        target,
        UsageReport::new(UsageStatistics::new(8.0, 200, 10)),
    );

    let outcome = SalesPipeline::new().run(request);
    let comparison = outcome.plan_comparison.expect("comparison");
    assert_eq!(comparison.monthly_savings, 0.0);
    assert_eq!(comparison.annual_savings, 0.0);
    let pitch = outcome.personalized_pitch.expect("pitch");
    assert!(pitch.cost_benefit_analysis.contains("free upgrade"));
}

#[test]
fn suitability_is_always_clamped() {
    let conversations = [
        "",
        "too expensive, unlimited data, unlimited calls, travel abroad, dropped calls",
        "money no object, wifi mostly, rarely call",
    ];
    let targets = [
        premium_plan(),
        Plan::new("tiny", "Tiny", 300.0, Allowance::Limited(1.0), Allowance::Limited(10)),
        Plan::new("free", "Free", 0.0, Allowance::Unlimited, Allowance::Unlimited),
    ];

    let pipeline = SalesPipeline::new();
    for text in conversations {
        for target in &targets {
            let request = PipelineRequest::new(
                format!("{} hi", text),
                current_plan(),
                target.clone(),
                UsageReport::new(UsageStatistics::new(80.0, 2000, 0)),
            );
            let outcome = pipeline.run(request);
            let score = outcome.plan_comparison.expect("comparison").suitability_score;
            assert!((1.0..=10.0).contains(&score), "score {} out of range", score);
        }
    }
}

#[test]
fn existing_profile_identity_is_preserved() {
    let existing = CustomerProfile::new("crm_123", "Dana")
        .location("Portland")
        .segment(CustomerSegment::Enterprise)
        .loyalty_years(9);

    let outcome = SalesPipeline::new().run(scenario_a().with_existing_profile(existing));
    let profile = outcome.customer_profile.expect("profile");
    assert_eq!(profile.customer_id, "crm_123");
    assert_eq!(profile.segment, CustomerSegment::Enterprise);
    assert_eq!(profile.loyalty_years, 9);
    assert_eq!(profile.needs.cost_sensitivity, Priority::Critical);

    let pitch = outcome.personalized_pitch.expect("pitch");
    assert!(pitch
        .personalization_notes
        .contains(&"Excellent coverage in the Portland area".to_string()));
}

struct FailingComparator;

impl PlanComparator for FailingComparator {
    fn compare(
        &self,
        _current: &Plan,
        _target: &Plan,
        _profile: &CustomerProfile,
    ) -> Result<PlanComparison, StageError> {
        Err(StageError::Internal("rate table unavailable".to_string()))
    }
}

#[test]
fn stage_failure_keeps_partial_results() {
    let pipeline = SalesPipeline::new().with_comparator(Arc::new(FailingComparator));
    let outcome = pipeline.run(scenario_a());

    assert!(!outcome.success);
    assert_eq!(
        outcome.error,
        "Plan comparison error: Internal error: rate table unavailable"
    );
    assert!(matches!(outcome.failure, Some(PipelineError::Comparison(_))));
    assert!(outcome.customer_profile.is_some());
    assert!(outcome.plan_comparison.is_none());
    assert!(outcome.personalized_pitch.is_none());

    let log: Vec<&str> = outcome.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(log.len(), 2);
    assert!(log[0].starts_with("Customer profile analyzed successfully."));
    assert_eq!(
        log[1],
        "Error occurred: Plan comparison error: Internal error: rate table unavailable"
    );
}

struct PanickingComposer;

impl PitchComposer for PanickingComposer {
    fn compose(
        &self,
        _profile: &CustomerProfile,
        _comparison: &PlanComparison,
    ) -> Result<Pitch, StageError> {
        panic!("composer exploded");
    }
}

#[tokio::test]
async fn async_run_matches_blocking_run() {
    let pipeline = SalesPipeline::new();
    let blocking = pipeline.run(scenario_a());
    let awaited = pipeline.run_async(scenario_a()).await;

    assert_eq!(blocking.success, awaited.success);
    assert_eq!(blocking.customer_profile, awaited.customer_profile);
    assert_eq!(blocking.plan_comparison, awaited.plan_comparison);
    assert_eq!(blocking.personalized_pitch, awaited.personalized_pitch);
    assert_eq!(blocking.messages, awaited.messages);
    assert_ne!(blocking.run_id, awaited.run_id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_runs_are_independent() {
    let pipeline = SalesPipeline::new();
    let mut missing = scenario_a();
    missing.usage_data = None;

    let (ok, failed) = tokio::join!(pipeline.run_async(scenario_a()), pipeline.run_async(missing));
    assert!(ok.success);
    assert!(!failed.success);
    assert_eq!(failed.error, "Missing required fields: usage_data");
}

#[tokio::test]
async fn async_run_reports_stage_panic() {
    let pipeline = SalesPipeline::new().with_composer(Arc::new(PanickingComposer));
    let outcome = pipeline.run_async(scenario_a()).await;

    assert!(!outcome.success);
    assert_eq!(outcome.step, PipelineStep::Error);
    assert!(outcome.error.starts_with("Pitch generation error: "));
    assert!(outcome.error.contains("composer exploded"));
    assert!(outcome.customer_profile.is_some());
    assert!(outcome.plan_comparison.is_some());
    assert!(outcome.personalized_pitch.is_none());
}
