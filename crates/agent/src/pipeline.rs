//! Pipeline controller
//!
//! A finite-state sequencer over the three stages:
//!
//! ```text
//! validating -> profiling -> comparing -> pitching -> done
//!      \            \            \            \
//!       +------------+------------+------------+--> error
//! ```
//!
//! The state envelope is owned and replaced at every transition. Once the
//! error step is entered no further stage runs; results produced before the
//! failure stay on the outcome.

use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use telecom_pitch_config::{ConfigError, KeywordTaxonomy, Settings};
use telecom_pitch_core::{
    CustomerProfile, NeedsExtractor, Pitch, PitchComposer, Plan, PlanComparator, PlanComparison,
    StageError, UsageReport, ValidationError,
};

use crate::comparator::PlanAnalyzer;
use crate::pitch::PitchGenerator;
use crate::profiler::CustomerProfiler;

/// Controller step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Validating,
    Profiling,
    Comparing,
    Pitching,
    Done,
    Error,
}

impl PipelineStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::Validating => "validating",
            PipelineStep::Profiling => "profiling",
            PipelineStep::Comparing => "comparing",
            PipelineStep::Pitching => "pitching",
            PipelineStep::Done => "done",
            PipelineStep::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStep::Done | PipelineStep::Error)
    }

    /// Next step on success; `None` for terminal steps
    pub fn next(&self) -> Option<PipelineStep> {
        match self {
            PipelineStep::Validating => Some(PipelineStep::Profiling),
            PipelineStep::Profiling => Some(PipelineStep::Comparing),
            PipelineStep::Comparing => Some(PipelineStep::Pitching),
            PipelineStep::Pitching => Some(PipelineStep::Done),
            PipelineStep::Done | PipelineStep::Error => None,
        }
    }

    /// Forward by one step, or into error from any non-terminal step
    pub fn can_transition_to(&self, to: PipelineStep) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == PipelineStep::Error || self.next() == Some(to)
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline failure, rendered into the outcome's error string
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Customer analysis error: {0}")]
    Profiling(StageError),

    #[error("Plan comparison error: {0}")]
    Comparison(StageError),

    #[error("Pitch generation error: {0}")]
    Pitch(StageError),

    #[error("Pipeline run aborted: {0}")]
    Aborted(String),
}

impl PipelineError {
    /// Step that failed
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => PipelineStep::Validating.as_str(),
            PipelineError::Profiling(_) => PipelineStep::Profiling.as_str(),
            PipelineError::Comparison(_) => PipelineStep::Comparing.as_str(),
            PipelineError::Pitch(_) => PipelineStep::Pitching.as_str(),
            PipelineError::Aborted(_) => "aborted",
        }
    }
}

/// Role-tagged log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub role: String,
    pub content: String,
}

impl LogEntry {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Inputs for one run; required fields are optional here so a single
/// validation pass can report every missing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRequest {
    pub customer_conversation: Option<String>,
    pub current_plan: Option<Plan>,
    pub target_plan: Option<Plan>,
    pub usage_data: Option<UsageReport>,
    pub existing_profile: Option<CustomerProfile>,
}

/// Borrowed view of a request that passed validation
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    pub conversation: &'a str,
    pub current_plan: &'a Plan,
    pub target_plan: &'a Plan,
    pub usage: &'a UsageReport,
    pub existing_profile: Option<&'a CustomerProfile>,
}

fn check_plan(role: &str, plan: &Plan, errors: &mut ValidationError) {
    for issue in plan.issues() {
        errors.malformed(format!("{}.{}", role, issue.field), issue.message);
    }
}

fn check_usage(usage: &UsageReport, errors: &mut ValidationError) {
    let gb = usage.statistics.data_usage_gb;
    if !gb.is_finite() || gb < 0.0 {
        errors.malformed("usage_data.data_usage_gb", "must be a finite, non-negative amount");
    }
    let invalid = usage.statistics.invalid_peak_hours();
    if !invalid.is_empty() {
        let hours: Vec<String> = invalid.iter().map(|h| h.to_string()).collect();
        errors.malformed(
            "usage_data.peak_usage_hours",
            format!("hours must be 0-23, got {}", hours.join(", ")),
        );
    }
}

impl PipelineRequest {
    pub fn new(
        conversation: impl Into<String>,
        current_plan: Plan,
        target_plan: Plan,
        usage: UsageReport,
    ) -> Self {
        Self {
            customer_conversation: Some(conversation.into()),
            current_plan: Some(current_plan),
            target_plan: Some(target_plan),
            usage_data: Some(usage),
            existing_profile: None,
        }
    }

    pub fn with_existing_profile(mut self, profile: CustomerProfile) -> Self {
        self.existing_profile = Some(profile);
        self
    }

    /// Check every required and malformed field in one pass
    pub fn validate(&self) -> Result<Inputs<'_>, ValidationError> {
        let mut errors = ValidationError::new();

        let conversation = self
            .customer_conversation
            .as_deref()
            .filter(|c| !c.trim().is_empty());
        let current_plan = self.current_plan.as_ref().filter(|p| !p.is_blank());
        let target_plan = self.target_plan.as_ref().filter(|p| !p.is_blank());
        let usage = self.usage_data.as_ref();

        if conversation.is_none() {
            errors.missing("customer_conversation");
        }
        if current_plan.is_none() {
            errors.missing("current_plan");
        }
        if target_plan.is_none() {
            errors.missing("target_plan");
        }
        if usage.is_none() {
            errors.missing("usage_data");
        }

        if let Some(plan) = current_plan {
            check_plan("current_plan", plan, &mut errors);
        }
        if let Some(plan) = target_plan {
            check_plan("target_plan", plan, &mut errors);
        }
        if let Some(usage) = usage {
            check_usage(usage, &mut errors);
        }

        match (conversation, current_plan, target_plan, usage) {
            (Some(conversation), Some(current_plan), Some(target_plan), Some(usage))
                if errors.is_empty() =>
            {
                Ok(Inputs {
                    conversation,
                    current_plan,
                    target_plan,
                    usage,
                    existing_profile: self.existing_profile.as_ref(),
                })
            }
            _ => Err(errors),
        }
    }
}

/// State envelope threaded through the controller
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub run_id: Uuid,
    pub step: PipelineStep,
    pub request: PipelineRequest,
    pub customer_profile: Option<CustomerProfile>,
    pub plan_comparison: Option<PlanComparison>,
    pub personalized_pitch: Option<Pitch>,
    pub messages: Vec<LogEntry>,
    pub error: Option<PipelineError>,
}

impl PipelineState {
    pub fn new(request: PipelineRequest) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            step: PipelineStep::Validating,
            request,
            customer_profile: None,
            plan_comparison: None,
            personalized_pitch: None,
            messages: Vec::new(),
            error: None,
        }
    }

    fn transition(mut self, to: PipelineStep) -> Self {
        debug_assert!(
            self.step.can_transition_to(to),
            "invalid transition {} -> {}",
            self.step,
            to
        );
        tracing::debug!(from = %self.step, to = %to, "Pipeline transition");
        self.step = to;
        self
    }

    fn log(mut self, content: impl Into<String>) -> Self {
        self.messages.push(LogEntry::assistant(content));
        self
    }

    fn fail(mut self, error: PipelineError) -> Self {
        tracing::warn!(stage = error.stage(), error = %error, "Pipeline stage failed");
        metrics::counter!("pitch_pipeline_stage_failures_total", "stage" => error.stage())
            .increment(1);

        let message = format!("Error occurred: {}", error);
        self.error = Some(error);
        self.transition(PipelineStep::Error).log(message)
    }
}

/// What a caller gets back from a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    pub customer_profile: Option<CustomerProfile>,
    pub plan_comparison: Option<PlanComparison>,
    pub personalized_pitch: Option<Pitch>,
    pub messages: Vec<LogEntry>,
    pub success: bool,
    /// Empty on success
    pub error: String,
    pub step: PipelineStep,
    #[serde(skip)]
    pub failure: Option<PipelineError>,
}

impl From<PipelineState> for PipelineOutcome {
    fn from(state: PipelineState) -> Self {
        Self {
            run_id: state.run_id,
            customer_profile: state.customer_profile,
            plan_comparison: state.plan_comparison,
            personalized_pitch: state.personalized_pitch,
            messages: state.messages,
            success: state.error.is_none(),
            error: state
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            step: state.step,
            failure: state.error,
        }
    }
}

fn savings_summary(comparison: &PlanComparison) -> String {
    let savings = if comparison.saves_money() {
        format!("saves ${:.2}/month", comparison.monthly_savings)
    } else if comparison.costs_more() {
        format!("costs ${:.2}/month more", comparison.monthly_savings.abs())
    } else {
        "has the same cost".to_string()
    };
    format!(
        "Plan comparison completed. Target plan {} with {:.1}/10 suitability score.",
        savings, comparison.suitability_score
    )
}

/// Run a stage call, turning a panic into an internal stage error
fn guarded<T>(call: impl FnOnce() -> Result<T, StageError>) -> Result<T, StageError> {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "stage panicked".to_string());
        Err(StageError::Internal(format!("stage panicked: {}", message)))
    })
}

/// Sequences the three stages for one customer at a time
///
/// Cloning is cheap; clones share the stage implementations, which hold no
/// mutable state, so separate runs may execute concurrently.
#[derive(Clone)]
pub struct SalesPipeline {
    extractor: Arc<dyn NeedsExtractor>,
    comparator: Arc<dyn PlanComparator>,
    composer: Arc<dyn PitchComposer>,
}

impl std::fmt::Debug for SalesPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesPipeline").finish_non_exhaustive()
    }
}

impl Default for SalesPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesPipeline {
    /// Pipeline with the built-in taxonomy and default tuning
    pub fn new() -> Self {
        Self {
            extractor: Arc::new(CustomerProfiler::default()),
            comparator: Arc::new(PlanAnalyzer::default()),
            composer: Arc::new(PitchGenerator::default()),
        }
    }

    /// Pipeline tuned by settings; loads the taxonomy file when one is configured
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let taxonomy: KeywordTaxonomy = settings.taxonomy()?;
        Ok(Self {
            extractor: Arc::new(CustomerProfiler::new(Arc::new(taxonomy))),
            comparator: Arc::new(PlanAnalyzer::new(settings.scoring.clone())),
            composer: Arc::new(PitchGenerator::new(settings.pitch.clone())),
        })
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn NeedsExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_comparator(mut self, comparator: Arc<dyn PlanComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn with_composer(mut self, composer: Arc<dyn PitchComposer>) -> Self {
        self.composer = composer;
        self
    }

    /// Run one step and return the replacement state
    fn advance(&self, state: PipelineState) -> PipelineState {
        match state.step {
            PipelineStep::Validating => match state.request.validate() {
                Ok(_) => state.transition(PipelineStep::Profiling),
                Err(e) => state.fail(PipelineError::Validation(e)),
            },

            PipelineStep::Profiling => {
                let result = state.request.validate().map_err(PipelineError::from).and_then(
                    |inputs| {
                        guarded(|| {
                            self.extractor.extract(
                                inputs.conversation,
                                inputs.usage,
                                inputs.existing_profile,
                            )
                        })
                        .map_err(PipelineError::Profiling)
                    },
                );
                match result {
                    Ok(profile) => {
                        let message = format!(
                            "Customer profile analyzed successfully. Identified as {} segment with {} usage pattern.",
                            profile.segment, profile.usage_pattern
                        );
                        let mut state = state;
                        state.customer_profile = Some(profile);
                        state.log(message).transition(PipelineStep::Comparing)
                    }
                    Err(e) => state.fail(e),
                }
            }

            PipelineStep::Comparing => {
                let result = match (state.request.validate(), state.customer_profile.as_ref()) {
                    (Ok(inputs), Some(profile)) => guarded(|| {
                        self.comparator
                            .compare(inputs.current_plan, inputs.target_plan, profile)
                    })
                    .map_err(PipelineError::Comparison),
                    (Err(e), _) => Err(PipelineError::Validation(e)),
                    (Ok(_), None) => Err(PipelineError::Comparison(StageError::Internal(
                        "no customer profile".to_string(),
                    ))),
                };
                match result {
                    Ok(comparison) => {
                        let message = savings_summary(&comparison);
                        let mut state = state;
                        state.plan_comparison = Some(comparison);
                        state.log(message).transition(PipelineStep::Pitching)
                    }
                    Err(e) => state.fail(e),
                }
            }

            PipelineStep::Pitching => {
                let result = match (
                    state.customer_profile.as_ref(),
                    state.plan_comparison.as_ref(),
                ) {
                    (Some(profile), Some(comparison)) => {
                        guarded(|| self.composer.compose(profile, comparison))
                            .map_err(PipelineError::Pitch)
                    }
                    _ => Err(PipelineError::Pitch(StageError::Internal(
                        "no profile or comparison".to_string(),
                    ))),
                };
                match result {
                    Ok(pitch) => {
                        let mut state = state;
                        state.personalized_pitch = Some(pitch);
                        state
                            .log("Personalized sales pitch generated successfully.")
                            .transition(PipelineStep::Done)
                    }
                    Err(e) => state.fail(e),
                }
            }

            PipelineStep::Done | PipelineStep::Error => state,
        }
    }

    /// Run to a terminal step. Never returns an error or unwinds; failures,
    /// stage panics included, are reported on the outcome.
    pub fn run(&self, request: PipelineRequest) -> PipelineOutcome {
        let mut state = PipelineState::new(request);
        let span = tracing::info_span!("pitch_pipeline", run_id = %state.run_id);
        let _guard = span.enter();

        while !state.step.is_terminal() {
            state = self.advance(state);
        }

        metrics::counter!("pitch_pipeline_runs_total", "outcome" => state.step.as_str())
            .increment(1);

        match &state.error {
            None => tracing::info!(messages = state.messages.len(), "Pipeline run completed"),
            Some(e) => tracing::info!(error = %e, "Pipeline run failed"),
        }

        state.into()
    }

    /// Same as [`run`](Self::run) on a blocking worker thread.
    ///
    /// A worker that fails to report back yields an aborted outcome.
    pub async fn run_async(&self, request: PipelineRequest) -> PipelineOutcome {
        let pipeline = self.clone();
        match tokio::task::spawn_blocking(move || pipeline.run(request)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let mut state = PipelineState::new(PipelineRequest::default());
                state.step = PipelineStep::Error;
                let error = PipelineError::Aborted(e.to_string());
                state
                    .messages
                    .push(LogEntry::assistant(format!("Error occurred: {}", error)));
                state.error = Some(error);
                state.into()
            }
        }
    }
}
