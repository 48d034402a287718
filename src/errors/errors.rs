use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::Type, Position};

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position: Some(position),
        }
    }

    /// An error with no instruction attached, as produced by the checker.
    pub fn diagnostic(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
            position: None,
        }
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ConditionTypeError { .. } => "ConditionTypeError",
            ErrorImpl::OperandTypeError { .. } => "OperandTypeError",
            ErrorImpl::UnaryOperandError { .. } => "UnaryOperandError",
            ErrorImpl::IncompatibleBranches { .. } => "IncompatibleBranches",
            ErrorImpl::UnresolvedType { .. } => "UnresolvedType",
            ErrorImpl::UnknownOpcode { .. } => "UnknownOpcode",
            ErrorImpl::MalformedInstruction { .. } => "MalformedInstruction",
            ErrorImpl::DuplicateLabel { .. } => "DuplicateLabel",
            ErrorImpl::UnresolvedLabel { .. } => "UnresolvedLabel",
            ErrorImpl::UninitializedVariable { .. } => "UninitializedVariable",
            ErrorImpl::StackUnderflow => "StackUnderflow",
            ErrorImpl::OperandTypeMismatch { .. } => "OperandTypeMismatch",
            ErrorImpl::InputParseError { .. } => "InputParseError",
            ErrorImpl::InputExhausted => "InputExhausted",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::OutputError { .. } => "OutputError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::VariableAlreadyDeclared { variable } => ErrorTip::Suggestion(format!(
                "Rename `{}` or declare it in a nested block to shadow it",
                variable
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Declare `{}` before using it", variable))
            }
            ErrorImpl::TypeMatchError { expected, .. } => ErrorTip::Suggestion(format!(
                "Only `{}` values (or `int` into `float`) can be assigned here",
                expected
            )),
            ErrorImpl::ConditionTypeError { .. } => {
                ErrorTip::Suggestion(String::from("Use a comparison to produce a `bool`"))
            }
            ErrorImpl::UninitializedVariable { variable } => ErrorTip::Suggestion(format!(
                "Assign `{}` (or `read` it) before reading its value",
                variable
            )),
            ErrorImpl::UnknownOpcode { .. } | ErrorImpl::MalformedInstruction { .. } => {
                ErrorTip::Suggestion(String::from(
                    "The instruction stream was not produced by this compiler or was edited by hand",
                ))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(position) => write!(
                f,
                "{} at instruction {} (`{}`)",
                self.internal_error, position.0, position.1
            ),
            None => write!(f, "{}", self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Checker diagnostics
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable {variable:?} used before declaration")]
    VariableNotDeclared { variable: String },
    #[error("cannot assign {received} to {expected} variable {variable:?}")]
    TypeMatchError {
        variable: String,
        expected: Type,
        received: Type,
    },
    #[error("condition in {construct} must be bool, found {received}")]
    ConditionTypeError { construct: String, received: Type },
    #[error("operator '{operator}' used with incompatible operands: {left}, {right}")]
    OperandTypeError {
        operator: String,
        left: Type,
        right: Type,
    },
    #[error("operator '{operator}' cannot be applied to {operand}")]
    UnaryOperandError { operator: String, operand: Type },
    #[error("ternary branches have incompatible types: {then_type}, {else_type}")]
    IncompatibleBranches { then_type: Type, else_type: Type },

    // Code generation
    #[error("cannot resolve a runtime type for {construct}")]
    UnresolvedType { construct: String },

    // Instruction loading
    #[error("unknown opcode {opcode:?}")]
    UnknownOpcode { opcode: String },
    #[error("malformed instruction: {message}")]
    MalformedInstruction { message: String },
    #[error("label {label:?} defined more than once")]
    DuplicateLabel { label: String },
    #[error("jump to unknown label {label:?}")]
    UnresolvedLabel { label: String },

    // Execution
    #[error("variable {variable:?} not initialized")]
    UninitializedVariable { variable: String },
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("{instruction} expected {expected} operand, found {found}")]
    OperandTypeMismatch {
        instruction: String,
        expected: String,
        found: String,
    },
    #[error("cannot parse input {input:?} as {expected}")]
    InputParseError { input: String, expected: String },
    #[error("no more input available")]
    InputExhausted,
    #[error("division by zero")]
    DivisionByZero,
    #[error("failed to write output: {message}")]
    OutputError { message: String },
}
