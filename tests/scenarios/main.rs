//! Scenario-based tests for pipe


mod config_pipeline;
mod failure_handling;
