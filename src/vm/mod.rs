//! The stack virtual machine.
//!
//! Executes an instruction list against an operand stack, a flat variable
//! store and an input source. Runtime failures carry the index and text of
//! the instruction that raised them.

pub mod config;
pub mod input;
pub mod value;
pub mod vm;

#[cfg(test)]
mod tests;
