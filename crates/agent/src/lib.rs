//! Sales pitch agent
//!
//! Rule-based implementations of the three pipeline stages and the
//! controller that sequences them:
//! - [`CustomerProfiler`]: needs, segment and pain points from text + usage
//! - [`PlanAnalyzer`]: cost/allowance/feature deltas and suitability score
//! - [`PitchGenerator`]: template-driven pitch fragments
//! - [`SalesPipeline`]: validating -> profiling -> comparing -> pitching
//! - [`report`]: sales-rep brief and export record

pub mod comparator;
pub mod pipeline;
pub mod pitch;
pub mod profiler;
pub mod report;

pub use comparator::{describe_data_change, describe_voice_change, PlanAnalyzer};
pub use pipeline::{
    Inputs, LogEntry, PipelineError, PipelineOutcome, PipelineRequest, PipelineState,
    PipelineStep, SalesPipeline,
};
pub use pitch::PitchGenerator;
pub use profiler::CustomerProfiler;
pub use report::{format_sales_brief, ExportRecord, ReportError};
