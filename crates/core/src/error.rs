//! Error types shared by the pipeline stages

use thiserror::Error;

/// Failure raised inside a stage implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    #[error("Invalid plan field '{field}': {message}")]
    InvalidPlan { field: String, message: String },

    #[error("Invalid comparison: {0}")]
    InvalidComparison(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StageError {
    pub fn invalid_plan(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPlan {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A single malformed input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result of the boundary validation pass
///
/// Lists every missing and every malformed field, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub missing: Vec<String>,
    pub malformed: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(&mut self, field: impl Into<String>) {
        self.missing.push(field.into());
    }

    pub fn malformed(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.malformed.push(FieldIssue::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.malformed.is_empty()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    fn describe(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if !self.missing.is_empty() {
            parts.push(format!("Missing required fields: {}", self.missing.join(", ")));
        }
        if !self.malformed.is_empty() {
            let issues: Vec<String> = self
                .malformed
                .iter()
                .map(|i| format!("{} ({})", i.field, i.message))
                .collect();
            parts.push(format!("Invalid fields: {}", issues.join(", ")));
        }
        parts.join("; ")
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_field() {
        let mut err = ValidationError::new();
        err.missing("current_plan");
        err.missing("target_plan");
        assert_eq!(err.to_string(), "Missing required fields: current_plan, target_plan");

        err.malformed("target_plan.price", "must be finite and non-negative");
        assert_eq!(
            err.to_string(),
            "Missing required fields: current_plan, target_plan; \
             Invalid fields: target_plan.price (must be finite and non-negative)"
        );
    }

    #[test]
    fn test_empty_validation_is_ok() {
        assert!(ValidationError::new().into_result().is_ok());
    }

    #[test]
    fn test_stage_error_display() {
        let err = StageError::invalid_plan("price", "not a number");
        assert_eq!(err.to_string(), "Invalid plan field 'price': not a number");
    }
}
