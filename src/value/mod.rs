use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ConversionError, LookupError};

pub mod material;
pub mod sequence;
mod table;
mod utils;

pub use material::{MaterialKind, MaterialSource, MaterialTuple, ParameterSpace};
pub use sequence::{SequenceBlock, SequenceKind, SequenceSchedule, SequenceSource};

/// Loosely typed key / value input, e.g.: the parameters of a dictionary run.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ValueDict(pub HashMap<String, Value>);

impl ValueDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn pop<T>(&mut self, key: &str) -> Result<T, LookupError>
    where
        T: TryFrom<Value, Error = ConversionError>,
    {
        match self.0.remove(key) {
            Some(value) => Ok(value.try_into().map_err(LookupError::ConversionError)?),
            None => Err(LookupError::KeyError),
        }
    }

    /// Like [`ValueDict::pop`], but a missing key is not an error.
    pub fn pop_opt<T>(&mut self, key: &str) -> Result<Option<T>, ConversionError>
    where
        T: TryFrom<Value, Error = ConversionError>,
    {
        self.0.remove(key).map(T::try_from).transpose()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remaining keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    None(()),
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

// =====================================================
// CONVERSION: Dynamic typed Value <-> Static typed Rust
// =====================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        use std::any::type_name_of_val;

        match self {
            Value::None(x) => type_name_of_val(x),
            Value::Bool(x) => type_name_of_val(x),
            Value::Int(x) => type_name_of_val(x),
            Value::Float(x) => type_name_of_val(x),
            Value::String(x) => type_name_of_val(x),
        }
    }
}

macro_rules! impl_value {
    ($rust_type:ty, $value_type:ident) => {
        impl From<$rust_type> for Value {
            fn from(value: $rust_type) -> Self {
                Value::$value_type(value)
            }
        }

        impl TryFrom<Value> for $rust_type {
            type Error = ConversionError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$value_type(value) => Ok(value),
                    _ => Err(ConversionError {
                        from: value.type_name(),
                        into: std::any::type_name::<$rust_type>(),
                    }),
                }
            }
        }
    };
}

impl_value!((), None);
impl_value!(bool, Bool);
impl_value!(i64, Int);
impl_value!(f64, Float);
impl_value!(String, String);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}
