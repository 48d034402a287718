use std::collections::HashMap;

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
};

/// One lexical scope: the names declared directly inside it.
#[derive(Debug, Default)]
pub struct Environment {
    pub variable_lookup: HashMap<String, Type>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            variable_lookup: HashMap::new(),
        }
    }

    pub fn declare_variable(&mut self, variable_name: &str, variable_type: Type) -> Result<(), Error> {
        if self.variable_lookup.contains_key(variable_name) {
            Err(Error::diagnostic(ErrorImpl::VariableAlreadyDeclared {
                variable: variable_name.to_string(),
            }))
        } else {
            self.variable_lookup
                .insert(variable_name.to_string(), variable_type);
            Ok(())
        }
    }

    pub fn get_variable(&self, variable_name: &str) -> Option<Type> {
        self.variable_lookup.get(variable_name).copied()
    }
}

/// Stack of scopes. The global scope (index 0) always exists and is never popped.
#[derive(Debug)]
pub struct SymbolTable {
    environments: Vec<Environment>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            environments: vec![Environment::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.environments.push(Environment::new());
    }

    /// Pops the innermost scope. Returns `false` (and leaves the table
    /// untouched) when only the global scope is left.
    pub fn pop_scope(&mut self) -> bool {
        if self.environments.len() > 1 {
            self.environments.pop();
            true
        } else {
            tracing::warn!("attempted to pop the global scope");
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.environments.len()
    }

    /// Declares `name` in the current scope. Shadowing an outer scope is allowed.
    pub fn declare(&mut self, name: &str, ty: Type) -> Result<(), Error> {
        self.current_environment_mut().declare_variable(name, ty)
    }

    /// Innermost-first lookup.
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.environments
            .iter()
            .rev()
            .find_map(|environment| environment.get_variable(name))
    }

    pub fn exists_in_current_scope(&self, name: &str) -> bool {
        self.current_environment().get_variable(name).is_some()
    }

    fn current_environment(&self) -> &Environment {
        // The global scope is never popped, so there is always a last element.
        &self.environments[self.environments.len() - 1]
    }

    fn current_environment_mut(&mut self) -> &mut Environment {
        let last = self.environments.len() - 1;
        &mut self.environments[last]
    }
}
