//! Code generation module for the compiler.
//!
//! This module translates a type-checked syntax tree into the linear
//! instruction stream executed by the virtual machine. It handles:
//!
//! - Statements, including structured control flow lowered to labels and jumps
//! - Expressions, with `itof` inserted wherever an int meets a float
//! - Per-operation type tags derived from the shared type resolver
//! - Unique label allocation per compilation unit

pub mod compiler;
pub mod expr;
pub mod stmt;

#[cfg(test)]
mod tests;
