//! Typed adapters from ordinary Rust closures to stages
//!
//! A closure such as `|a: i64, b: f64| -> Result<i64, StageError>` becomes a
//! stage whose signature is derived from its parameter and return types:
//! `(int, float) -> (int, error)`. Only the adapter knows the concrete
//! types; the engine sees a [`Signature`] and a list of [`Value`]s.

use crate::core::error::{InvokeError, StageError};
use crate::core::stage::{FnStage, Signature};
use crate::core::value::{Value, ValueType};
use std::sync::Arc;

/// A parameter type a stage can receive
pub trait FromValue: Sized {
    const TYPE: ValueType;

    fn from_value(value: Value) -> Option<Self>;
}

/// A single result slot a stage can produce
pub trait IntoValue {
    const TYPE: ValueType;

    fn into_value(self) -> Value;
}

/// The full return of a stage: zero or more result slots
pub trait IntoOutputs {
    fn result_types() -> Vec<ValueType>;

    fn into_outputs(self) -> Vec<Value>;
}

macro_rules! impl_scalar {
    ($ty:ty, $variant:ident, $tag:ident) => {
        impl FromValue for $ty {
            const TYPE: ValueType = ValueType::$tag;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl IntoValue for $ty {
            const TYPE: ValueType = ValueType::$tag;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl IntoOutputs for $ty {
            fn result_types() -> Vec<ValueType> {
                vec![ValueType::$tag]
            }

            fn into_outputs(self) -> Vec<Value> {
                vec![self.into_value()]
            }
        }
    };
}

impl_scalar!(bool, Bool, Bool);
impl_scalar!(i64, Int, Int);
impl_scalar!(f64, Float, Float);
impl_scalar!(String, Str, Str);
impl_scalar!(Vec<u8>, Bytes, Bytes);
impl_scalar!(Vec<Value>, List, List);

// A raw `Value` parameter is declared `Any`.
impl FromValue for Value {
    const TYPE: ValueType = ValueType::Any;

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl IntoValue for Value {
    const TYPE: ValueType = ValueType::Any;

    fn into_value(self) -> Value {
        self
    }
}

impl IntoOutputs for Value {
    fn result_types() -> Vec<ValueType> {
        vec![ValueType::Any]
    }

    fn into_outputs(self) -> Vec<Value> {
        vec![self]
    }
}

impl IntoOutputs for () {
    fn result_types() -> Vec<ValueType> {
        Vec::new()
    }

    fn into_outputs(self) -> Vec<Value> {
        Vec::new()
    }
}

impl<A: IntoValue, B: IntoValue> IntoOutputs for (A, B) {
    fn result_types() -> Vec<ValueType> {
        vec![A::TYPE, B::TYPE]
    }

    fn into_outputs(self) -> Vec<Value> {
        vec![self.0.into_value(), self.1.into_value()]
    }
}

impl<A: IntoValue, B: IntoValue, C: IntoValue> IntoOutputs for (A, B, C) {
    fn result_types() -> Vec<ValueType> {
        vec![A::TYPE, B::TYPE, C::TYPE]
    }

    fn into_outputs(self) -> Vec<Value> {
        vec![self.0.into_value(), self.1.into_value(), self.2.into_value()]
    }
}

/// A fallible return gains a trailing failure slot
///
/// On `Err` the value slots are filled with `Nil`.
impl<T: IntoOutputs> IntoOutputs for Result<T, StageError> {
    fn result_types() -> Vec<ValueType> {
        let mut types = T::result_types();
        types.push(ValueType::Error);
        types
    }

    fn into_outputs(self) -> Vec<Value> {
        match self {
            Ok(value) => {
                let mut outputs = value.into_outputs();
                outputs.push(Value::Nil);
                outputs
            }
            Err(error) => {
                let mut outputs = vec![Value::Nil; T::result_types().len()];
                outputs.push(Value::Error(error));
                outputs
            }
        }
    }
}

/// Conversion of a closure into a stage, keyed by its parameter tuple
pub trait IntoStage<Args> {
    fn into_stage(self, name: String) -> FnStage;
}

fn decode<T: FromValue>(value: Option<Value>, position: usize) -> Result<T, InvokeError> {
    let value = value.unwrap_or(Value::Nil);
    let found = value.value_type();
    T::from_value(value).ok_or(InvokeError::ArgumentType {
        position,
        expected: T::TYPE,
        found,
    })
}

impl<F, R> IntoStage<()> for F
where
    F: Fn() -> R + Send + Sync + 'static,
    R: IntoOutputs,
{
    fn into_stage(self, name: String) -> FnStage {
        let signature = Signature::new(Vec::new(), R::result_types());
        FnStage::new(name, signature, move |_args| Ok(self().into_outputs()))
    }
}

macro_rules! impl_into_stage {
    ($($ty:ident $var:ident $pos:literal),+) => {
        impl<F, R, $($ty),+> IntoStage<($($ty,)+)> for F
        where
            F: Fn($($ty),+) -> R + Send + Sync + 'static,
            R: IntoOutputs,
            $($ty: FromValue,)+
        {
            fn into_stage(self, name: String) -> FnStage {
                let signature = Signature::new(vec![$($ty::TYPE),+], R::result_types());
                FnStage::new(name, signature, move |args| {
                    let mut args = args.into_iter();
                    $(let $var = decode::<$ty>(args.next(), $pos)?;)+
                    Ok(self($($var),+).into_outputs())
                })
            }
        }
    };
}

impl_into_stage!(A a 0);
impl_into_stage!(A a 0, B b 1);
impl_into_stage!(A a 0, B b 1, C c 2);
impl_into_stage!(A a 0, B b 1, C c 2, D d 3);

/// Wrap a closure as a named, callable [`Value`]
///
/// ```
/// use pipe::{stage_fn, StageError};
///
/// let div = stage_fn("div", |a: i64, b: f64| -> Result<i64, StageError> {
///     if b == 0.0 {
///         return Err(StageError::new("division by zero"));
///     }
///     Ok(a / b as i64)
/// });
/// assert!(div.is_callable());
/// ```
pub fn stage_fn<Args, F>(name: impl Into<String>, func: F) -> Value
where
    F: IntoStage<Args>,
{
    Value::Stage(Arc::new(func.into_stage(name.into())))
}
