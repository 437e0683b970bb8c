//! Runtime-typed values threaded between stages

use crate::core::error::StageError;
use crate::core::stage::StageRef;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Declared type of a parameter or result slot, and the tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    /// The distinguished failure type
    Error,
    Stage,
    /// Accepts every non-nil value
    Any,
}

impl ValueType {
    /// One-directional assignability: can `value` be passed where `self` is declared?
    ///
    /// `Nil` is never assignable, not even to `Any`.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Nil) => false,
            (ValueType::Any, _) => true,
            (expected, value) => expected == value.value_type(),
        }
    }

    pub fn is_failure(self) -> bool {
        self == ValueType::Error
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Nil => "nil",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "string",
            ValueType::Bytes => "bytes",
            ValueType::List => "list",
            ValueType::Error => "error",
            ValueType::Stage => "stage",
            ValueType::Any => "any",
        };
        f.write_str(name)
    }
}

/// A single runtime value in an execution frame
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Error(StageError),
    Stage(StageRef),
}

/// Raised when a serialized value has no pipeline counterpart
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("mappings cannot be converted into pipeline values")]
    Mapping,
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::Bytes(_) => ValueType::Bytes,
            Value::List(_) => ValueType::List,
            Value::Error(_) => ValueType::Error,
            Value::Stage(_) => ValueType::Stage,
        }
    }

    /// Only stage values can be registered in a pipeline
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Stage(_))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&StageError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_stage(&self) -> Option<&StageRef> {
        match self {
            Value::Stage(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON document into a pipeline value
    pub fn from_json(json: serde_json::Value) -> Result<Self, ConversionError> {
        use serde_json::Value as Json;

        Ok(match json {
            Json::Null => Value::Nil,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            Json::Object(_) => return Err(ConversionError::Mapping),
        })
    }

    /// Convert a YAML node into a pipeline value
    pub fn from_yaml(yaml: serde_yaml::Value) -> Result<Self, ConversionError> {
        use serde_yaml::Value as Yaml;

        Ok(match yaml {
            Yaml::Null => Value::Nil,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => Value::Str(s),
            Yaml::Sequence(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            Yaml::Mapping(_) => return Err(ConversionError::Mapping),
            Yaml::Tagged(tagged) => Value::from_yaml(tagged.value)?,
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Stage(a), Value::Stage(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Bytes(b) => f.debug_tuple("Bytes").field(b).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Error(e) => f.debug_tuple("Error").field(&e.message()).finish(),
            Value::Stage(s) => f.debug_tuple("Stage").field(&s.name()).finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<StageError> for Value {
    fn from(e: StageError) -> Self {
        Value::Error(e)
    }
}

impl From<StageRef> for Value {
    fn from(stage: StageRef) -> Self {
        Value::Stage(stage)
    }
}
