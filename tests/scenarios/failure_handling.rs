//! Test: Failure Handling - arity, type and stage failures abort the whole run

use crate::helpers::*;
use pipe::execution::ExecutionEvent;
use pipe::{stage_fn, ExecutionStatus, Pipeline, PipelineError, StageError, Value, ValueType};

/// div needs two arguments
#[test]
fn test_single_argument_is_arity_error() {
    init_tracing();
    let pipeline = parity_chain();

    let result = pipeline.execute(args(&[Value::Int(10)]));

    assert_arity_error(&result, "div", 2);
}

/// A lone float is still one argument short of div
#[test]
fn test_single_float_is_arity_error() {
    let pipeline = parity_chain();

    let result = pipeline.execute(args(&[Value::Float(3.22)]));

    assert_arity_error(&result, "div", 2);
}

#[test]
fn test_no_arguments_is_arity_error() {
    let pipeline = parity_chain();

    let result = pipeline.execute(Vec::new());

    assert_arity_error(&result, "div", 2);
}

/// Division by zero surfaces div's own error and nothing after it runs
#[test]
fn test_stage_failure_short_circuits() {
    init_tracing();
    let counter = CallCounter::new();
    let pipeline = Pipeline::new(vec![div(), counter.stage("after_div")]).unwrap();
    pipeline.append(counter.stage("last")).unwrap();
    let recorder = EventRecorder::attach(&pipeline);

    let result = pipeline.execute(args(&[Value::Int(10), Value::Float(0.0)]));

    assert_stage_failure(&result, "div", "division by zero");
    assert_eq!(counter.count(), 0);
    assert_eq!(recorder.started_stages(), vec!["div"]);
    assert!(matches!(
        recorder.events().last(),
        Some(ExecutionEvent::ExecutionCompleted { status: ExecutionStatus::Failed, .. })
    ));
}

#[test]
fn test_parity_chain_division_by_zero() {
    let pipeline = parity_chain();
    let recorder = EventRecorder::attach(&pipeline);

    let result = pipeline.execute(args(&[Value::Int(10), Value::Float(0.0)]));

    assert_eq!(result.unwrap_err().to_string(), "division by zero");
    assert_eq!(recorder.started_stages(), vec!["div"]);
}

/// A failure in a middle stage stops the chain there
#[test]
fn test_failure_mid_chain() {
    let counter = CallCounter::new();
    let pipeline = Pipeline::new(vec![
        counter.stage("first"),
        stage_fn("check", |v: Value| -> Result<Value, StageError> {
            match v {
                Value::Int(i) if i < 0 => Err(StageError::new("negative input")),
                other => Ok(other),
            }
        }),
        counter.stage("never"),
    ])
    .unwrap();

    let result = pipeline.execute(vec![Value::Int(-1)]);

    assert_stage_failure(&result, "check", "negative input");
    assert_eq!(counter.count(), 1);
}

/// A stage that only returns an error behaves like any other failure slot
#[test]
fn test_error_only_stage() {
    let validate = stage_fn("validate", |s: String| -> Result<(), StageError> {
        if s.is_empty() {
            Err(StageError::new("empty"))
        } else {
            Ok(())
        }
    });
    let pipeline = Pipeline::new(vec![validate]).unwrap();

    assert_eq!(pipeline.execute(vec![Value::from("ok")]).unwrap(), Vec::<Value>::new());
    assert_stage_failure(&pipeline.execute(vec![Value::from("")]), "validate", "empty");
}

/// Surplus values whose prefix does not match the declared types are rejected
#[test]
fn test_surplus_with_wrong_types() {
    let pipeline = parity_chain();

    let result = pipeline.execute(args(&[Value::Float(10.0), Value::Float(3.0), Value::Int(1)]));

    assert_argument_type_error(&result, "div", 0, ValueType::Int);
}

/// Surplus nil values never satisfy a declared parameter
#[test]
fn test_surplus_with_nil() {
    let pipeline = parity_chain();

    let result = pipeline.execute(args(&[Value::Int(10), Value::Nil, Value::Int(1)]));

    assert_argument_type_error(&result, "div", 1, ValueType::Float);
}

/// With an exact count the values reach the stage as-is; its adapter rejects them
#[test]
fn test_exact_arity_wrong_types() {
    let pipeline = parity_chain();

    let result = pipeline.execute(args(&[Value::from("ten"), Value::Float(3.0)]));

    assert_argument_type_error(&result, "div", 0, ValueType::Int);
}

/// A later stage can be starved by an earlier stage's outputs
#[test]
fn test_arity_error_in_later_stage() {
    let pipeline = Pipeline::new(vec![
        stage_fn("one", |a: i64| a),
        stage_fn("two", |a: i64, b: i64| a + b),
    ])
    .unwrap();

    let result = pipeline.execute(vec![Value::Int(1)]);

    match result {
        Err(PipelineError::Arity {
            stage,
            index,
            expected,
            available,
        }) => {
            assert_eq!(stage, "two");
            assert_eq!(index, 1);
            assert_eq!(expected, 2);
            assert_eq!(available, 1);
        }
        other => panic!("expected arity error, got {:?}", other),
    }
}

/// Errors are terminal for the call only; the pipeline keeps working
#[test]
fn test_pipeline_reusable_after_failure() {
    let pipeline = parity_chain();

    assert!(pipeline.execute(args(&[Value::Int(10)])).is_err());
    assert!(pipeline.execute(args(&[Value::Int(10), Value::Float(0.0)])).is_err());

    let output = pipeline.execute(args(&[Value::Int(10), Value::Float(3.0)])).unwrap();
    assert_eq!(output, vec![Value::Bytes(b"odd".to_vec())]);
}

#[test]
fn test_failed_stage_event_carries_error() {
    let pipeline = parity_chain();
    let recorder = EventRecorder::attach(&pipeline);

    let _ = pipeline.execute(args(&[Value::Int(10)]));

    let failed = recorder.events().into_iter().find_map(|e| match e {
        ExecutionEvent::StageFailed { stage, error, .. } => Some((stage, error)),
        _ => None,
    });
    let (stage, error) = failed.expect("a StageFailed event");
    assert_eq!(stage, "div");
    assert!(matches!(error, PipelineError::Arity { .. }));
}
