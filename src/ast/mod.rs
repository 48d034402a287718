/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root
/// - expressions: Expression node kinds and operators
/// - statements: Statement node kinds
/// - types: The static type domain and its widening rules
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
