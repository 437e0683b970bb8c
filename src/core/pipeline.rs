//! Pipeline domain model: the ordered stage registry

use crate::core::error::PipelineError;
use crate::core::stage::StageRef;
use crate::core::value::Value;
use crate::execution::{EventHandler, ExecutionEngine, ExecutionEvent};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

const DEFAULT_NAME: &str = "pipeline";

/// An ordered, appendable sequence of stages
///
/// Registration order is execution order. `append` and `execute` share one
/// lock, held for the whole of an execution, so runs against the same
/// pipeline are serialized and never observe a half-finished append.
pub struct Pipeline {
    name: String,
    inner: Mutex<Registry>,
}

struct Registry {
    stages: Vec<StageRef>,
    handlers: Vec<EventHandler>,
}

impl Pipeline {
    /// Create a pipeline from candidate values
    ///
    /// Fails on the first value that is not callable; no pipeline is built.
    pub fn new<I>(candidates: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = Value>,
    {
        let stages = candidates
            .into_iter()
            .enumerate()
            .map(|(position, candidate)| callable(position, candidate))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_stages(stages))
    }

    /// Create a pipeline from stages that are already known to be callable
    pub fn from_stages<I>(stages: I) -> Self
    where
        I: IntoIterator<Item = StageRef>,
    {
        Self {
            name: DEFAULT_NAME.to_string(),
            inner: Mutex::new(Registry {
                stages: stages.into_iter().collect(),
                handlers: Vec::new(),
            }),
        }
    }

    /// Set the name used in logs and events
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a candidate to the end of the stage sequence
    ///
    /// Blocks while an execution is in flight. The stage takes part in
    /// every execution that starts after this returns.
    pub fn append(&self, candidate: Value) -> Result<(), PipelineError> {
        let mut registry = self.lock();
        let stage = callable(registry.stages.len(), candidate)?;
        info!("Appending stage '{}' to pipeline {}", stage.name(), self.name);
        registry.stages.push(stage);
        Ok(())
    }

    /// Append a stage that is already known to be callable
    pub fn append_stage(&self, stage: StageRef) {
        let mut registry = self.lock();
        info!("Appending stage '{}' to pipeline {}", stage.name(), self.name);
        registry.stages.push(stage);
    }

    /// Number of registered stages
    pub fn len(&self) -> usize {
        self.lock().stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().stages.is_empty()
    }

    /// Names of the registered stages, in execution order
    pub fn stage_names(&self) -> Vec<String> {
        self.lock()
            .stages
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Add an event handler
    ///
    /// Handlers run on the executing thread while the pipeline lock is held,
    /// so they must not call back into this pipeline.
    pub fn add_event_handler<F>(&self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.lock().handlers.push(Arc::new(handler));
    }

    /// Run every stage in order, threading each stage's outputs into the next
    ///
    /// Returns the last stage's outputs, or the first error encountered.
    /// With no stages registered, the arguments come back unchanged.
    pub fn execute<I>(&self, args: I) -> Result<Vec<Value>, PipelineError>
    where
        I: IntoIterator<Item = Value>,
    {
        let registry = self.lock();
        let engine = ExecutionEngine::new(&self.name, &registry.handlers);
        engine.run(&registry.stages, args.into_iter().collect())
    }

    // A panicking stage poisons the lock mid-run, but the stage list itself is
    // only mutated by a single push, so the data is still consistent.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn callable(position: usize, candidate: Value) -> Result<StageRef, PipelineError> {
    match candidate {
        Value::Stage(stage) => Ok(stage),
        other => Err(PipelineError::NotCallable {
            position,
            found: other.value_type(),
        }),
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("stages", &self.stage_names())
            .finish()
    }
}
