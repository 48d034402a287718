//! Scoped symbol table.
//!
//! Both the type checker and the code generator own one of these and
//! push/pop scopes as they enter and leave blocks and `for` loops.

pub mod symbol_table;
