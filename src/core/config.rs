//! Pipeline configuration from YAML
//!
//! A config names stages; the callables themselves are registered at runtime
//! in a [`StageCatalog`] and looked up by name when the pipeline is built.

use crate::core::{Pipeline, StageRef, Value};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Runtime registry of named values that configs can refer to
#[derive(Debug, Clone, Default)]
pub struct StageCatalog {
    entries: HashMap<String, Value>,
}

impl StageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register any value under `name`
    ///
    /// Callability is checked when a pipeline is built, not here.
    pub fn register(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.entries.insert(name.into(), value);
        self
    }

    /// Register a stage under its own name
    pub fn register_stage(&mut self, stage: StageRef) -> &mut Self {
        let name = stage.name().to_string();
        self.register(name, Value::Stage(stage))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Catalog names of the stages, in execution order
    pub stages: Vec<String>,

    /// Default arguments for an execution
    #[serde(default)]
    pub inputs: Vec<serde_yaml::Value>,
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Pipeline name must not be empty");
        }

        if self.stages.is_empty() {
            anyhow::bail!("Pipeline '{}' lists no stages", self.name);
        }

        if let Some(position) = self.stages.iter().position(|s| s.trim().is_empty()) {
            anyhow::bail!(
                "Pipeline '{}' has a blank stage name at position {}",
                self.name,
                position
            );
        }

        Ok(())
    }

    /// Convert the configured inputs into execution arguments
    pub fn default_inputs(&self) -> Result<Vec<Value>> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                Value::from_yaml(input.clone())
                    .with_context(|| format!("Invalid input at position {} in pipeline '{}'", i, self.name))
            })
            .collect()
    }

    /// Build a pipeline by resolving every stage name against `catalog`
    pub fn to_pipeline(&self, catalog: &StageCatalog) -> Result<Pipeline> {
        let candidates = self
            .stages
            .iter()
            .map(|name| {
                catalog.get(name).cloned().with_context(|| {
                    format!(
                        "Pipeline '{}' references unregistered stage '{}'",
                        self.name, name
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let pipeline = Pipeline::new(candidates)
            .with_context(|| format!("Failed to build pipeline '{}'", self.name))?;
        Ok(pipeline.with_name(&self.name))
    }
}
