//! Expression nodes.
//!
//! Every expression kind the language has is a variant of [`Expr`], so the
//! checker, the resolver and the generator all match exhaustively on it.

use std::fmt::Display;

use super::types::Type;

/// Literal flavour. The literal's text is kept exactly as written in the
/// source (string literals include their surrounding quotes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Bool,
    String,
}

impl LiteralKind {
    pub fn get_type(&self) -> Type {
        match self {
            LiteralKind::Int => Type::Int,
            LiteralKind::Float => Type::Float,
            LiteralKind::Bool => Type::Bool,
            LiteralKind::String => Type::String,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// String concatenation, written `.`
    Concat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOp {
    Less,
    Greater,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOp {
    Equals,
    NotEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
            ArithOp::Concat => ".",
        };
        write!(f, "{}", symbol)
    }
}

impl Display for RelationalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationalOp::Less => write!(f, "<"),
            RelationalOp::Greater => write!(f, ">"),
        }
    }
}

impl Display for EqualityOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EqualityOp::Equals => write!(f, "=="),
            EqualityOp::NotEquals => write!(f, "!="),
        }
    }
}

impl Display for LogicOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicOp::And => write!(f, "&&"),
            LogicOp::Or => write!(f, "||"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        kind: LiteralKind,
        text: String,
    },
    Var(String),
    UnaryMinus(Box<Expr>),
    Not(Box<Expr>),
    Arith {
        operator: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Relational {
        operator: RelationalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Equality {
        operator: EqualityOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logic {
        operator: LogicOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Paren(Box<Expr>),
}

// Shorthand constructors, mostly for building trees by hand.
impl Expr {
    pub fn int(value: i64) -> Expr {
        Expr::Literal {
            kind: LiteralKind::Int,
            text: value.to_string(),
        }
    }

    /// Float literal from its source text, e.g. `"3.14"`.
    pub fn float(text: &str) -> Expr {
        Expr::Literal {
            kind: LiteralKind::Float,
            text: text.to_string(),
        }
    }

    pub fn bool(value: bool) -> Expr {
        Expr::Literal {
            kind: LiteralKind::Bool,
            text: value.to_string(),
        }
    }

    /// String literal from its unquoted contents.
    pub fn string(value: &str) -> Expr {
        Expr::Literal {
            kind: LiteralKind::String,
            text: format!("\"{}\"", value),
        }
    }

    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn minus(operand: Expr) -> Expr {
        Expr::UnaryMinus(Box::new(operand))
    }

    pub fn not(operand: Expr) -> Expr {
        Expr::Not(Box::new(operand))
    }

    pub fn arith(operator: ArithOp, left: Expr, right: Expr) -> Expr {
        Expr::Arith {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn relational(operator: RelationalOp, left: Expr, right: Expr) -> Expr {
        Expr::Relational {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn equality(operator: EqualityOp, left: Expr, right: Expr) -> Expr {
        Expr::Equality {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn logic(operator: LogicOp, left: Expr, right: Expr) -> Expr {
        Expr::Logic {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn ternary(condition: Expr, then_expr: Expr, else_expr: Expr) -> Expr {
        Expr::Ternary {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    pub fn paren(inner: Expr) -> Expr {
        Expr::Paren(Box::new(inner))
    }
}
