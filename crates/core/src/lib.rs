//! Core types for the telecom sales-pitch pipeline
//!
//! This crate provides the record types shared by every stage:
//! - Usage statistics and the caller's usage report
//! - Needs profile with ordinal priority levels
//! - Customer profile, segment, usage pattern and pain points
//! - Plans, plan comparison and the composed pitch
//! - Stage traits and error types

pub mod comparison;
pub mod customer;
pub mod error;
pub mod needs;
pub mod pitch;
pub mod plan;
pub mod traits;
pub mod usage;

pub use comparison::PlanComparison;
pub use customer::{
    CustomerProfile, CustomerSegment, PainPoint, PaymentHistory, PreferenceValue, UsagePattern,
};
pub use error::{FieldIssue, StageError, ValidationError};
pub use needs::{NeedCategory, NeedsProfile, Priority};
pub use pitch::{objection_ids, Pitch};
pub use plan::{Allowance, CountAllowance, DataAllowance, NetworkPriority, Plan};
pub use traits::{NeedsExtractor, PitchComposer, PlanComparator};
pub use usage::{UsageReport, UsageStatistics};
