//! Core domain models for Pipeline
//!
//! This module defines runtime values, stages and their signatures, the
//! pipeline registry, and configuration.

pub mod adapter;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod stage;
pub mod state;
pub mod value;

pub use adapter::{stage_fn, FromValue, IntoOutputs, IntoStage, IntoValue};
pub use config::{PipelineConfig, StageCatalog};
pub use error::{InvokeError, PipelineError, StageError};
pub use pipeline::*;
pub use stage::*;
pub use state::*;
pub use value::*;
