//! Type checking and semantic analysis module.
//!
//! This module walks the syntax tree once and:
//!
//! - Assigns a static type to every expression
//! - Validates declarations, assignments, conditions and operators
//! - Manages nested scopes through a symbol table
//! - Collects every diagnostic instead of stopping at the first one
//!
//! An ill-typed subexpression evaluates to `Type::Error`, which silently
//! poisons the expressions around it so each mistake is reported once.
//! The `resolver` submodule holds the typing rules themselves and is
//! shared with the code generator.

pub mod resolver;
pub mod type_checker;
