//! Stage domain model
//!
//! A stage is an opaque callable with a signature the engine can inspect
//! at call time. The engine never looks past [`Stage::signature`] and
//! [`Stage::invoke`].

use crate::core::error::InvokeError;
use crate::core::value::{Value, ValueType};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a registered stage
pub type StageRef = Arc<dyn Stage>;

/// Declared parameter and result types of a stage
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<ValueType>,
    pub results: Vec<ValueType>,
}

impl Signature {
    pub fn new(params: Vec<ValueType>, results: Vec<ValueType>) -> Self {
        Self { params, results }
    }

    /// Number of positional parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn parameter_type(&self, position: usize) -> Option<ValueType> {
        self.params.get(position).copied()
    }

    /// Whether any result slot carries the failure type
    pub fn has_failure_slot(&self) -> bool {
        self.results.iter().any(|t| t.is_failure())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |types: &[ValueType]| {
            types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "({}) -> ({})", join(&self.params), join(&self.results))
    }
}

/// A callable unit of a pipeline
pub trait Stage: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    fn signature(&self) -> &Signature;

    /// Call the stage with exactly `signature().arity()` values
    ///
    /// Returns one value per declared result, in declared order. A
    /// failure-typed slot holds `Value::Nil` when the stage did not fail.
    fn invoke(&self, args: Vec<Value>) -> Result<Vec<Value>, InvokeError>;
}

type StageFn = dyn Fn(Vec<Value>) -> Result<Vec<Value>, InvokeError> + Send + Sync;

/// A stage backed by a closure over raw values
pub struct FnStage {
    name: String,
    signature: Signature,
    func: Box<StageFn>,
}

impl FnStage {
    pub fn new<F>(name: impl Into<String>, signature: Signature, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>, InvokeError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            func: Box::new(func),
        }
    }

    /// Wrap into a callable value ready for registration
    pub fn into_value(self) -> Value {
        Value::Stage(Arc::new(self))
    }
}

impl Stage for FnStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn invoke(&self, args: Vec<Value>) -> Result<Vec<Value>, InvokeError> {
        (self.func)(args)
    }
}

impl fmt::Debug for FnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStage")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}
