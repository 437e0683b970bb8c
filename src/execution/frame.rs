//! Execution frame - the values threaded between consecutive stages

use crate::core::{PipelineError, Stage, Value};
use tracing::debug;

/// The current values of one in-flight execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionFrame {
    values: Vec<Value>,
}

impl ExecutionFrame {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Swap in the outputs of the stage that just ran
    pub fn replace(&mut self, outputs: Vec<Value>) {
        self.values = outputs;
    }

    /// Take the arguments for `stage` out of the frame
    ///
    /// With fewer values than the stage's arity this is an arity error. With
    /// exactly as many, they are passed as-is. With more, the first `arity`
    /// values must each be assignable to the declared parameter type at their
    /// position; the rest are dropped.
    pub fn take_arguments(&mut self, index: usize, stage: &dyn Stage) -> Result<Vec<Value>, PipelineError> {
        let signature = stage.signature();
        let expected = signature.arity();
        let available = self.values.len();

        if available < expected {
            return Err(PipelineError::Arity {
                stage: stage.name().to_string(),
                index,
                expected,
                available,
            });
        }

        let mut args = std::mem::take(&mut self.values);
        if available == expected {
            return Ok(args);
        }

        for (position, (value, declared)) in args.iter().zip(&signature.params).enumerate() {
            if !declared.accepts(value) {
                return Err(PipelineError::ArgumentType {
                    stage: stage.name().to_string(),
                    index,
                    position,
                    expected: *declared,
                    found: value.value_type(),
                });
            }
        }

        debug!(
            "Discarding {} surplus value(s) before stage '{}'",
            available - expected,
            stage.name()
        );
        args.truncate(expected);
        Ok(args)
    }
}
