use std::fmt::Display;

use crate::bytecode::instruction::TypeTag;

/// A runtime value. Values are copied in and out of the stack and the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
        }
    }

    /// Integer view of a numeric value; floats are truncated.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            Value::Float(value) => Some(*value as i64),
            _ => None,
        }
    }

    /// Float view of a numeric value; ints are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Parses external text as a value of the given type. Strings are taken verbatim.
    pub fn parse(tag: TypeTag, text: &str) -> Result<Value, String> {
        match tag {
            TypeTag::Int => text
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|error| error.to_string()),
            TypeTag::Float => text
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|error| error.to_string()),
            TypeTag::Bool => match text.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                other => Err(format!("`{}` is not a boolean literal", other)),
            },
            TypeTag::String => Ok(Value::String(text.to_string())),
        }
    }

    /// Parses a `push` constant. String constants lose their surrounding quotes.
    pub fn from_literal(tag: TypeTag, text: &str) -> Result<Value, String> {
        if tag == TypeTag::String {
            let unquoted = text
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .unwrap_or(text);
            return Ok(Value::String(unquoted.to_string()));
        }
        Value::parse(tag, text)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            // Debug formatting keeps the fraction on whole floats ("4.0").
            Value::Float(value) => write!(f, "{:?}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
        }
    }
}
