//! pipe - chain runtime-registered callables into a single executable sequence
//!
//! Each stage's outputs become the next stage's arguments. Arity and type
//! compatibility are checked lazily, against the values actually flowing
//! through a run.

pub mod core;
pub mod execution;

// Re-export commonly used types
pub use crate::core::{stage_fn, FnStage, Pipeline, Signature, Stage, StageRef, Value, ValueType};
pub use crate::core::{ExecutionStatus, InvokeError, PipelineError, StageError};
pub use crate::core::{PipelineConfig, StageCatalog};
pub use execution::{ExecutionEngine, ExecutionEvent};
