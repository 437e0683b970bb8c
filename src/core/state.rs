//! Execution state models

use serde::{Deserialize, Serialize};

/// Outcome of one pipeline execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Every stage ran and none reported a failure
    Completed,
    /// The run stopped at an arity, type or stage failure
    Failed,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Completed)
    }
}
