#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    ast::ast::Program,
    bytecode::instruction::Instruction,
    compiler::compiler::compile,
    errors::errors::Error,
    type_checker::type_checker::type_check,
    vm::{config::VmConfig, vm::VM},
};

pub mod ast;
pub mod bytecode;
pub mod compiler;
pub mod errors;
pub mod symbol_table;
pub mod type_checker;
pub mod vm;

extern crate regex;

/// Instruction index and instruction text an error refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub usize, pub Rc<String>);

/// Type checks a program and, when it is well typed, generates its code.
///
/// All diagnostics are returned when checking fails. Generation never runs
/// on an ill-typed tree.
pub fn compile_program(program: &Program) -> Result<Vec<Instruction>, Vec<Error>> {
    let checker = type_check(program);
    if checker.has_errors() {
        tracing::debug!(count = checker.errors.len(), "type check failed");
        return Err(checker.errors);
    }

    compile(program).map_err(|error| vec![error])
}

/// A failed run, with the lines printed before the failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error}")]
pub struct RunError {
    pub output: Vec<String>,
    #[source]
    pub error: Error,
}

/// Executes instructions to completion and returns the printed lines.
pub fn run_program(
    instructions: Vec<Instruction>,
    config: VmConfig,
) -> Result<Vec<String>, RunError> {
    let mut machine = VM::new(instructions, config).map_err(|error| RunError {
        output: vec![],
        error,
    })?;
    let mut output = Vec::new();
    let result = machine.run(&mut output);

    let lines: Vec<String> = String::from_utf8_lossy(&output)
        .lines()
        .map(String::from)
        .collect();
    match result {
        Ok(()) => Ok(lines),
        Err(error) => Err(RunError {
            output: lines,
            error,
        }),
    }
}
