//! Instruction set and its text form.
//!
//! - `instruction`: the `Instruction` enum, type tags, rendering to text
//!   and label normalization
//! - `loader`: parsing instruction text back into instructions

pub mod instruction;
pub mod loader;
