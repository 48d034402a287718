use super::{expressions::Expr, types::Type};

/// Init clause of a `for` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `type name = value`; the variable is scoped to the loop.
    Declare {
        var_type: Type,
        name: String,
        value: Expr,
    },
    /// `name = value` on a variable declared outside the loop.
    Assign { name: String, value: Expr },
}

impl ForInit {
    pub fn declare(var_type: Type, name: &str, value: Expr) -> ForInit {
        ForInit::Declare {
            var_type,
            name: name.to_string(),
            value,
        }
    }

    pub fn assign(name: &str, value: Expr) -> ForInit {
        ForInit::Assign {
            name: name.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub condition: Option<Expr>,
    pub step: Option<Box<Stmt>>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declaration {
        var_type: Type,
        names: Vec<String>,
    },
    Assign {
        name: String,
        value: Expr,
    },
    Expression(Expr),
    Write(Vec<Expr>),
    Read(Vec<String>),
    If {
        condition: Expr,
        then_body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    For(ForStmt),
    Block(Vec<Stmt>),
}

impl Stmt {
    pub fn declare(var_type: Type, names: &[&str]) -> Stmt {
        Stmt::Declaration {
            var_type,
            names: names.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn assign(name: &str, value: Expr) -> Stmt {
        Stmt::Assign {
            name: name.to_string(),
            value,
        }
    }

    pub fn read(names: &[&str]) -> Stmt {
        Stmt::Read(names.iter().map(|name| name.to_string()).collect())
    }

    pub fn if_else(condition: Expr, then_body: Stmt, else_body: Option<Stmt>) -> Stmt {
        Stmt::If {
            condition,
            then_body: Box::new(then_body),
            else_body: else_body.map(Box::new),
        }
    }

    pub fn while_loop(condition: Expr, body: Stmt) -> Stmt {
        Stmt::While {
            condition,
            body: Box::new(body),
        }
    }

    pub fn for_loop(
        init: Option<ForInit>,
        condition: Option<Expr>,
        step: Option<Stmt>,
        body: Stmt,
    ) -> Stmt {
        Stmt::For(ForStmt {
            init,
            condition,
            step: step.map(Box::new),
            body: Box::new(body),
        })
    }
}
