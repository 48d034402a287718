//! Main compiler module.
//!
//! This module contains the core Compiler structure: the instruction buffer,
//! the generator's own symbol table and the label counter. The statement and
//! expression translators in `stmt` and `expr` drive it.

use crate::{
    ast::{ast::Program, expressions::Expr, types::Type},
    bytecode::instruction::{Instruction, TypeTag},
    errors::errors::{Error, ErrorImpl},
    symbol_table::symbol_table::SymbolTable,
    type_checker::resolver::resolve_type,
};

use super::stmt::gen_statement;

/// State of one compilation unit.
///
/// The tree is assumed to have passed the type checker. Labels come from a
/// counter owned by this instance, so they are unique within the unit and
/// never reused.
#[derive(Debug, Default)]
pub struct Compiler {
    /// The instructions emitted so far, in program order
    pub instructions: Vec<Instruction>,
    /// Declarations seen so far, scoped like the checker's
    pub symbol_table: SymbolTable,
    label_counter: usize,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            instructions: vec![],
            symbol_table: SymbolTable::new(),
            label_counter: 0,
        }
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Mints a fresh label name.
    pub fn new_label(&mut self) -> String {
        let label = format!("L{}", self.label_counter);
        self.label_counter += 1;
        tracing::trace!(label = %label, "allocated label");
        label
    }

    /// Static type of `expr` given the declarations visited so far.
    pub fn resolve(&self, expr: &Expr) -> Type {
        resolve_type(&self.symbol_table, expr)
    }

    /// Runtime tag for a resolved type. Only an unchecked tree can fail here.
    pub fn tag_for(&self, ty: Type, construct: &str) -> Result<TypeTag, Error> {
        ty.tag().ok_or_else(|| {
            Error::diagnostic(ErrorImpl::UnresolvedType {
                construct: construct.to_string(),
            })
        })
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

/// Translates a checked program into stack machine instructions.
pub fn compile(ast: &Program) -> Result<Vec<Instruction>, Error> {
    let mut compiler = Compiler::new();

    for stmt in ast.iter() {
        gen_statement(&mut compiler, stmt)?;
    }

    tracing::debug!(
        instructions = compiler.instructions.len(),
        labels = compiler.label_counter,
        "code generation finished"
    );
    Ok(compiler.into_instructions())
}
