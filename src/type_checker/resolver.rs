//! Typing rules and the stateless expression type resolver.
//!
//! The rule functions are the single source of truth for what each
//! operator accepts and produces. They return [`Type::Error`] for an
//! ill-typed combination, and they also return it whenever an operand is
//! already `Error`, which is how poisoning works. The checker layers
//! diagnostics on top of them and the code generator calls
//! [`resolve_type`] to recover static types on demand.

use crate::{
    ast::{
        expressions::{ArithOp, Expr},
        types::Type,
    },
    symbol_table::symbol_table::SymbolTable,
};

pub fn arith_result(operator: ArithOp, left: Type, right: Type) -> Type {
    match operator {
        ArithOp::Concat => {
            if left == Type::String && right == Type::String {
                Type::String
            } else {
                Type::Error
            }
        }
        ArithOp::Mod => {
            if left == Type::Int && right == Type::Int {
                Type::Int
            } else {
                Type::Error
            }
        }
        ArithOp::Add | ArithOp::Sub | ArithOp::Mul | ArithOp::Div => Type::widen(left, right),
    }
}

pub fn unary_minus_result(operand: Type) -> Type {
    if operand.is_numeric() {
        operand
    } else {
        Type::Error
    }
}

pub fn not_result(operand: Type) -> Type {
    if operand == Type::Bool {
        Type::Bool
    } else {
        Type::Error
    }
}

pub fn relational_result(left: Type, right: Type) -> Type {
    if left.is_numeric() && right.is_numeric() {
        Type::Bool
    } else {
        Type::Error
    }
}

/// Identical types compare, and so do `int` and `float` in either order.
pub fn equality_result(left: Type, right: Type) -> Type {
    if (left == right && !left.is_error()) || (left.is_numeric() && right.is_numeric()) {
        Type::Bool
    } else {
        Type::Error
    }
}

pub fn logic_result(left: Type, right: Type) -> Type {
    if left == Type::Bool && right == Type::Bool {
        Type::Bool
    } else {
        Type::Error
    }
}

/// Result type of `cond ? then : else`, ignoring the condition.
pub fn ternary_result(then_type: Type, else_type: Type) -> Type {
    if then_type.is_error() || else_type.is_error() {
        Type::Error
    } else if then_type == else_type {
        then_type
    } else if then_type.is_numeric() && else_type.is_numeric() {
        Type::Float
    } else {
        Type::Error
    }
}

/// Static type of `expr` against `symbols`, with no diagnostics.
///
/// Undeclared variables resolve to `Error`.
pub fn resolve_type(symbols: &SymbolTable, expr: &Expr) -> Type {
    match expr {
        Expr::Literal { kind, .. } => kind.get_type(),
        Expr::Var(name) => symbols.lookup(name).unwrap_or(Type::Error),
        Expr::UnaryMinus(operand) => unary_minus_result(resolve_type(symbols, operand)),
        Expr::Not(operand) => not_result(resolve_type(symbols, operand)),
        Expr::Arith {
            operator,
            left,
            right,
        } => arith_result(
            *operator,
            resolve_type(symbols, left),
            resolve_type(symbols, right),
        ),
        Expr::Relational { left, right, .. } => {
            relational_result(resolve_type(symbols, left), resolve_type(symbols, right))
        }
        Expr::Equality { left, right, .. } => {
            equality_result(resolve_type(symbols, left), resolve_type(symbols, right))
        }
        Expr::Logic { left, right, .. } => {
            logic_result(resolve_type(symbols, left), resolve_type(symbols, right))
        }
        Expr::Ternary {
            then_expr,
            else_expr,
            ..
        } => ternary_result(
            resolve_type(symbols, then_expr),
            resolve_type(symbols, else_expr),
        ),
        Expr::Paren(inner) => resolve_type(symbols, inner),
    }
}
