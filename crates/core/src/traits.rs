//! Stage traits
//!
//! Each pipeline stage sits behind a trait so the controller can be driven
//! with alternative implementations (tests inject failing stages this way).

use crate::comparison::PlanComparison;
use crate::customer::CustomerProfile;
use crate::error::StageError;
use crate::pitch::Pitch;
use crate::plan::Plan;
use crate::usage::UsageReport;

/// Derives a needs/segment/pain-point profile from text and usage
pub trait NeedsExtractor: Send + Sync {
    /// Build a profile; when `existing` is given its identity and behavioral
    /// fields are preserved.
    fn extract(
        &self,
        conversation: &str,
        usage: &UsageReport,
        existing: Option<&CustomerProfile>,
    ) -> Result<CustomerProfile, StageError>;
}

/// Computes cost, allowance and feature deltas plus a suitability score
pub trait PlanComparator: Send + Sync {
    fn compare(
        &self,
        current: &Plan,
        target: &Plan,
        profile: &CustomerProfile,
    ) -> Result<PlanComparison, StageError>;
}

/// Assembles the narrative from a profile and a comparison
pub trait PitchComposer: Send + Sync {
    fn compose(
        &self,
        profile: &CustomerProfile,
        comparison: &PlanComparison,
    ) -> Result<Pitch, StageError>;
}
