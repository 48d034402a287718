//! Error types and error handling for the compiler.
//!
//! This module defines the single error type used by every pass:
//!
//! - Checker diagnostics, collected as data and never thrown
//! - Generation errors for trees that were not checked first
//! - Loader errors for malformed instruction text
//! - Fatal runtime errors raised by the virtual machine, carrying the
//!   offending instruction and its pointer

pub mod errors;
