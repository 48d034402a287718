//! Type domain shared by the checker, the generator and the instruction set.
//!
//! The language has four value types plus `Error`, a sentinel that poisons
//! every expression built from an ill-typed operand. Once an expression is
//! `Error`, the surrounding rules propagate it silently so a single mistake
//! produces a single diagnostic.

use std::{fmt::Display, str::FromStr};

use crate::bytecode::instruction::TypeTag;

/// Static type of a variable or expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Error,
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_error(&self) -> bool {
        *self == Type::Error
    }

    /// Implicit numeric widening: `Int` meets `Float` as `Float`.
    ///
    /// Anything that is not a pair of numeric types (including `Error`)
    /// widens to `Error`.
    pub fn widen(left: Type, right: Type) -> Type {
        match (left, right) {
            (Type::Int, Type::Int) => Type::Int,
            (Type::Int, Type::Float) | (Type::Float, Type::Int) | (Type::Float, Type::Float) => {
                Type::Float
            }
            _ => Type::Error,
        }
    }

    /// Whether a value of type `value` may be stored in a variable of type `target`.
    pub fn is_assignable(target: Type, value: Type) -> bool {
        target == value || (target == Type::Float && value == Type::Int)
    }

    /// Instruction type tag for this type. `Error` has none.
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            Type::Int => Some(TypeTag::Int),
            Type::Float => Some(TypeTag::Float),
            Type::Bool => Some(TypeTag::Bool),
            Type::String => Some(TypeTag::String),
            Type::Error => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Error => write!(f, "<error>"),
        }
    }
}

impl FromStr for Type {
    type Err = String;

    /// Parses a declaration keyword (`int`, `float`, `bool`, `string`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Type::Int),
            "float" => Ok(Type::Float),
            "bool" => Ok(Type::Bool),
            "string" => Ok(Type::String),
            _ => Err(format!("unknown type keyword `{}`", s)),
        }
    }
}
