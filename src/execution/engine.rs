//! Main execution engine - threads values through every stage of a run

use crate::core::{ExecutionStatus, PipelineError, StageRef, Value};
use crate::execution::{ExecutionFrame, StageExecutor};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    ExecutionStarted {
        execution_id: Uuid,
        pipeline_name: String,
        stage_count: usize,
        started_at: DateTime<Utc>,
    },
    StageStarted {
        execution_id: Uuid,
        index: usize,
        stage: String,
        available: usize,
    },
    StageCompleted {
        execution_id: Uuid,
        index: usize,
        stage: String,
        outputs: usize,
    },
    StageFailed {
        execution_id: Uuid,
        index: usize,
        stage: String,
        error: PipelineError,
    },
    ExecutionCompleted {
        execution_id: Uuid,
        status: ExecutionStatus,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Runs one execution over a borrowed stage sequence
///
/// The caller holds the pipeline lock for the lifetime of the engine.
pub struct ExecutionEngine<'a> {
    pipeline_name: &'a str,
    handlers: &'a [EventHandler],
    executor: StageExecutor,
}

impl<'a> ExecutionEngine<'a> {
    pub fn new(pipeline_name: &'a str, handlers: &'a [EventHandler]) -> Self {
        Self {
            pipeline_name,
            handlers,
            executor: StageExecutor::new(),
        }
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in self.handlers {
            handler(event.clone());
        }
    }

    /// Execute every stage in order, starting from `args`
    pub fn run(&self, stages: &[StageRef], args: Vec<Value>) -> Result<Vec<Value>, PipelineError> {
        let execution_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(
            "Starting pipeline execution: {} ({}) with {} stage(s)",
            self.pipeline_name,
            execution_id,
            stages.len()
        );
        self.emit_event(ExecutionEvent::ExecutionStarted {
            execution_id,
            pipeline_name: self.pipeline_name.to_string(),
            stage_count: stages.len(),
            started_at,
        });

        if stages.is_empty() {
            debug!("Pipeline {} has no stages, returning inputs unchanged", self.pipeline_name);
        }

        let mut frame = ExecutionFrame::new(args);
        for (index, stage) in stages.iter().enumerate() {
            self.emit_event(ExecutionEvent::StageStarted {
                execution_id,
                index,
                stage: stage.name().to_string(),
                available: frame.len(),
            });

            match self.executor.execute(index, stage.as_ref(), &mut frame) {
                Ok(outputs) => {
                    self.emit_event(ExecutionEvent::StageCompleted {
                        execution_id,
                        index,
                        stage: stage.name().to_string(),
                        outputs: outputs.len(),
                    });
                    frame.replace(outputs);
                }
                Err(error) => {
                    warn!(
                        "Pipeline execution {} ({}) aborted at stage '{}': {}",
                        self.pipeline_name,
                        execution_id,
                        stage.name(),
                        error
                    );
                    self.emit_event(ExecutionEvent::StageFailed {
                        execution_id,
                        index,
                        stage: stage.name().to_string(),
                        error: error.clone(),
                    });
                    self.finish(execution_id, ExecutionStatus::Failed, started_at);
                    return Err(error);
                }
            }
        }

        self.finish(execution_id, ExecutionStatus::Completed, started_at);
        Ok(frame.into_values())
    }

    fn finish(&self, execution_id: Uuid, status: ExecutionStatus, started_at: DateTime<Utc>) {
        info!(
            "Pipeline execution finished: {} ({}) - {:?}",
            self.pipeline_name, execution_id, status
        );
        self.emit_event(ExecutionEvent::ExecutionCompleted {
            execution_id,
            status,
            started_at,
            completed_at: Utc::now(),
        });
    }
}
