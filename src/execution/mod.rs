//! Pipeline execution engine

pub mod engine;
pub mod executor;
pub mod frame;

pub use engine::{EventHandler, ExecutionEngine, ExecutionEvent};
pub use executor::StageExecutor;
pub use frame::ExecutionFrame;
