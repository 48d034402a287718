use std::slice::Iter;

use super::statements::Stmt;

/// Root of a syntax tree: the statements of the global scope, in order.
///
/// The tree is produced by an external parser; this crate only consumes it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }

    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}
