//! Error types for registration and execution

use crate::core::value::ValueType;
use thiserror::Error;

/// A stage's own domain error, returned through a failure-typed result slot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StageError {
    message: String,
}

impl StageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for StageError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for StageError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Errors raised by a stage adapter while decoding its arguments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvokeError {
    #[error("argument {position} expected {expected}, found {found}")]
    ArgumentType {
        position: usize,
        expected: ValueType,
        found: ValueType,
    },
}

/// Errors returned by pipeline construction and execution
///
/// Every variant is terminal for the call that produced it. The pipeline
/// itself stays usable afterwards.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("value at position {position} is not callable (found {found})")]
    NotCallable { position: usize, found: ValueType },

    #[error("not enough arguments for stage '{stage}' (#{index}): expected {expected}, got {available}")]
    Arity {
        stage: String,
        index: usize,
        expected: usize,
        available: usize,
    },

    #[error("invalid argument {position} for stage '{stage}' (#{index}): expected {expected}, found {found}")]
    ArgumentType {
        stage: String,
        index: usize,
        position: usize,
        expected: ValueType,
        found: ValueType,
    },

    #[error("{error}")]
    StageFailure { stage: String, error: StageError },

    #[error("stage '{stage}' (#{index}) declared {declared} results but returned {returned}")]
    ResultMismatch {
        stage: String,
        index: usize,
        declared: usize,
        returned: usize,
    },
}

impl PipelineError {
    /// The stage's own error, when the run halted on a failure-typed result
    pub fn stage_failure(&self) -> Option<&StageError> {
        match self {
            PipelineError::StageFailure { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Name of the stage that caused the error, if one was reached
    pub fn stage(&self) -> Option<&str> {
        match self {
            PipelineError::NotCallable { .. } => None,
            PipelineError::Arity { stage, .. }
            | PipelineError::ArgumentType { stage, .. }
            | PipelineError::StageFailure { stage, .. }
            | PipelineError::ResultMismatch { stage, .. } => Some(stage),
        }
    }
}
