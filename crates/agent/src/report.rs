//! Sales-rep brief and export record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

use telecom_pitch_config::AgentSettings;

use crate::pipeline::PipelineOutcome;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Run did not complete: {0}")]
    Incomplete(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// `cost_concern` -> `Cost Concern`
fn title_case(tag: &str) -> String {
    tag.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn section(out: &mut String, title: &str, body: &str) {
    let _ = write!(out, "\n{}:\n{}\n", title, body);
}

fn bullets(out: &mut String, title: &str, items: impl IntoIterator<Item = String>) {
    let _ = writeln!(out, "\n{}:", title);
    for item in items {
        let _ = writeln!(out, "• {}", item);
    }
}

/// Render an outcome as a plain-text brief for a sales representative
pub fn format_sales_brief(outcome: &PipelineOutcome) -> String {
    let (profile, comparison, pitch) = match (
        outcome.success,
        &outcome.customer_profile,
        &outcome.plan_comparison,
        &outcome.personalized_pitch,
    ) {
        (true, Some(profile), Some(comparison), Some(pitch)) => (profile, comparison, pitch),
        _ => {
            let reason = if outcome.error.is_empty() {
                "incomplete results"
            } else {
                outcome.error.as_str()
            };
            return format!("Error generating pitch: {}", reason);
        }
    };

    let mut out = format!(
        "PERSONALIZED SALES PITCH FOR {}\n",
        profile.display_name().to_uppercase()
    );

    section(&mut out, "OPENING", &pitch.opening_hook);
    section(&mut out, "ADDRESS THEIR CONCERNS", &pitch.pain_point_address);
    section(&mut out, "VALUE PROPOSITION", &pitch.value_proposition);
    bullets(
        &mut out,
        "KEY FEATURES TO HIGHLIGHT",
        pitch.feature_highlights.iter().cloned(),
    );
    section(&mut out, "COST BENEFITS", &pitch.cost_benefit_analysis);
    bullets(
        &mut out,
        "OBJECTION HANDLING",
        pitch
            .objection_handling
            .iter()
            .map(|(tag, response)| format!("{}: {}", title_case(tag), response)),
    );
    section(&mut out, "CALL TO ACTION", &pitch.call_to_action);
    bullets(&mut out, "URGENCY FACTORS", pitch.urgency_factors.iter().cloned());
    bullets(
        &mut out,
        "PERSONAL TOUCHES",
        pitch.personalization_notes.iter().cloned(),
    );
    bullets(
        &mut out,
        "PLAN COMPARISON SUMMARY",
        [
            format!("Monthly savings: ${:.2}", comparison.monthly_savings),
            format!("Annual savings: ${:.2}", comparison.annual_savings),
            format!("Data: {}", comparison.data_difference),
            format!("Voice: {}", comparison.voice_difference),
            format!("Suitability Score: {:.1}/10", comparison.suitability_score),
        ],
    );

    out
}

/// Flat record exported after a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub timestamp: DateTime<Utc>,
    pub customer_type: String,
    pub annual_savings: f64,
    pub suitability_score: f64,
    pub agent_version: String,
    pub analysis_method: String,
}

impl ExportRecord {
    pub fn from_outcome(
        outcome: &PipelineOutcome,
        agent: &AgentSettings,
    ) -> Result<Self, ReportError> {
        if !outcome.success {
            return Err(ReportError::Incomplete(outcome.error.clone()));
        }
        let (profile, comparison) = match (&outcome.customer_profile, &outcome.plan_comparison) {
            (Some(profile), Some(comparison)) => (profile, comparison),
            _ => {
                return Err(ReportError::Incomplete(
                    "missing profile or comparison".to_string(),
                ))
            }
        };

        Ok(Self {
            timestamp: Utc::now(),
            customer_type: profile.segment.to_string(),
            annual_savings: comparison.annual_savings,
            suitability_score: comparison.suitability_score,
            agent_version: agent.agent_version.clone(),
            analysis_method: agent.analysis_method.clone(),
        })
    }

    /// Write as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        tracing::info!(path = %path.as_ref().display(), "Export record written");
        Ok(())
    }
}
