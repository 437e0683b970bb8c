//! Test: Config - pipelines assembled from YAML and a runtime catalog

use crate::helpers::*;
use pipe::{PipelineConfig, PipelineError, StageCatalog, Value};

fn catalog() -> StageCatalog {
    let mut catalog = StageCatalog::new();
    catalog
        .register("div", div())
        .register("parity", parity())
        .register("to_bytes", to_bytes());
    catalog
}

#[test]
fn test_config_parity_chain() {
    init_tracing();
    let yaml = r#"
name: "Parity"
description: "Divide, classify, encode"
stages:
  - div
  - parity
  - to_bytes
inputs: [10, 3.0]
"#;

    let config = PipelineConfig::from_yaml(yaml).unwrap();
    let pipeline = config.to_pipeline(&catalog()).unwrap();

    assert_eq!(pipeline.name(), "Parity");
    let output = pipeline.execute(config.default_inputs().unwrap()).unwrap();
    assert_eq!(output, vec![Value::Bytes(b"odd".to_vec())]);
}

#[test]
fn test_config_inputs_with_surplus() {
    let yaml = "name: p\nstages: [div, parity]\ninputs: [10, 3.0, 1]\n";

    let config = PipelineConfig::from_yaml(yaml).unwrap();
    let output = config
        .to_pipeline(&catalog())
        .unwrap()
        .execute(config.default_inputs().unwrap())
        .unwrap();

    assert_eq!(output, vec![Value::from("odd")]);
}

#[test]
fn test_config_non_callable_catalog_entry() {
    let mut catalog = catalog();
    catalog.register("constant", Value::Int(7));
    let config = PipelineConfig::from_yaml("name: p\nstages: [div, constant]\n").unwrap();

    let err = config.to_pipeline(&catalog).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::NotCallable { position: 1, .. })
    ));
}

#[test]
fn test_config_stage_from_json_inputs() {
    let config = PipelineConfig::from_yaml("name: p\nstages: [div, parity, to_bytes]\n").unwrap();
    let pipeline = config.to_pipeline(&catalog()).unwrap();

    let inputs = match Value::from_json(serde_json::json!([12, 3.0])).unwrap() {
        Value::List(items) => items,
        other => panic!("expected a list, got {:?}", other),
    };

    let output = pipeline.execute(inputs).unwrap();
    assert_eq!(output, vec![Value::Bytes(b"even".to_vec())]);
}
