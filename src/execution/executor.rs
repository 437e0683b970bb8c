//! Stage executor - runs a single stage against the current frame

use crate::core::{InvokeError, PipelineError, Stage, StageError, Value};
use crate::execution::ExecutionFrame;
use tracing::{debug, warn};

/// Executes a single stage
#[derive(Debug, Clone, Copy, Default)]
pub struct StageExecutor;

impl StageExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Run `stage` with arguments drawn from `frame`
    ///
    /// On success returns the values to thread into the next stage: every
    /// declared result except failure slots that held no failure.
    pub fn execute(
        &self,
        index: usize,
        stage: &dyn Stage,
        frame: &mut ExecutionFrame,
    ) -> Result<Vec<Value>, PipelineError> {
        let signature = stage.signature();
        let args = frame.take_arguments(index, stage)?;
        debug!(
            "Invoking stage '{}' (#{}) {} with {} argument(s)",
            stage.name(),
            index,
            signature,
            args.len()
        );

        let returned = stage.invoke(args).map_err(|e| match e {
            InvokeError::ArgumentType {
                position,
                expected,
                found,
            } => PipelineError::ArgumentType {
                stage: stage.name().to_string(),
                index,
                position,
                expected,
                found,
            },
        })?;

        if returned.len() != signature.results.len() {
            return Err(PipelineError::ResultMismatch {
                stage: stage.name().to_string(),
                index,
                declared: signature.results.len(),
                returned: returned.len(),
            });
        }

        let mut outputs = Vec::with_capacity(returned.len());
        for (value, declared) in returned.into_iter().zip(&signature.results) {
            if !declared.is_failure() {
                outputs.push(value);
                continue;
            }

            let error = match value {
                Value::Nil => continue,
                Value::Error(error) => error,
                other => StageError::new(format!(
                    "stage returned {} in a failure slot",
                    other.value_type()
                )),
            };

            warn!("Stage '{}' (#{}) failed: {}", stage.name(), index, error);
            return Err(PipelineError::StageFailure {
                stage: stage.name().to_string(),
                error,
            });
        }

        Ok(outputs)
    }
}
