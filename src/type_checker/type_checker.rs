use crate::{
    ast::{
        ast::Program,
        expressions::Expr,
        statements::{ForInit, ForStmt, Stmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    symbol_table::symbol_table::SymbolTable,
};

use super::resolver::{
    arith_result, equality_result, logic_result, not_result, relational_result, ternary_result,
    unary_minus_result,
};

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub symbol_table: SymbolTable,
    pub errors: Vec<Error>,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            symbol_table: SymbolTable::new(),
            errors: vec![],
        }
    }

    pub fn add_error(&mut self, error: ErrorImpl) {
        let error = Error::diagnostic(error);
        tracing::debug!(diagnostic = %error, "type error");
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Diagnostics as human-readable strings, in the order they were found.
    pub fn get_diagnostics(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.to_string()).collect()
    }

    fn declare(&mut self, name: &str, ty: Type) {
        if let Err(error) = self.symbol_table.declare(name, ty) {
            tracing::debug!(diagnostic = %error, "type error");
            self.errors.push(error);
        }
    }

    /// Reports an operand error unless an operand was already poisoned.
    fn check_binary(&mut self, operator: String, left: Type, right: Type, result: Type) -> Type {
        if result.is_error() && !left.is_error() && !right.is_error() {
            self.add_error(ErrorImpl::OperandTypeError {
                operator,
                left,
                right,
            });
        }
        result
    }

    fn check_unary(&mut self, operator: &str, operand: Type, result: Type) -> Type {
        if result.is_error() && !operand.is_error() {
            self.add_error(ErrorImpl::UnaryOperandError {
                operator: operator.to_string(),
                operand,
            });
        }
        result
    }

    fn check_condition(&mut self, condition: &Expr, construct: &str) {
        let received = type_check_expr(self, condition);
        if received != Type::Bool && !received.is_error() {
            self.add_error(ErrorImpl::ConditionTypeError {
                construct: construct.to_string(),
                received,
            });
        }
    }
}

pub fn type_check_expr(type_checker: &mut TypeChecker, ast: &Expr) -> Type {
    match ast {
        Expr::Literal { kind, .. } => kind.get_type(),
        Expr::Var(name) => match type_checker.symbol_table.lookup(name) {
            Some(ty) => ty,
            None => {
                type_checker.add_error(ErrorImpl::VariableNotDeclared {
                    variable: name.clone(),
                });
                Type::Error
            }
        },
        Expr::UnaryMinus(operand) => {
            let operand = type_check_expr(type_checker, operand);
            type_checker.check_unary("-", operand, unary_minus_result(operand))
        }
        Expr::Not(operand) => {
            let operand = type_check_expr(type_checker, operand);
            type_checker.check_unary("!", operand, not_result(operand))
        }
        Expr::Arith {
            operator,
            left,
            right,
        } => {
            let left = type_check_expr(type_checker, left);
            let right = type_check_expr(type_checker, right);
            type_checker.check_binary(
                operator.to_string(),
                left,
                right,
                arith_result(*operator, left, right),
            )
        }
        Expr::Relational {
            operator,
            left,
            right,
        } => {
            let left = type_check_expr(type_checker, left);
            let right = type_check_expr(type_checker, right);
            type_checker.check_binary(
                operator.to_string(),
                left,
                right,
                relational_result(left, right),
            )
        }
        Expr::Equality {
            operator,
            left,
            right,
        } => {
            let left = type_check_expr(type_checker, left);
            let right = type_check_expr(type_checker, right);
            type_checker.check_binary(
                operator.to_string(),
                left,
                right,
                equality_result(left, right),
            )
        }
        Expr::Logic {
            operator,
            left,
            right,
        } => {
            let left = type_check_expr(type_checker, left);
            let right = type_check_expr(type_checker, right);
            type_checker.check_binary(operator.to_string(), left, right, logic_result(left, right))
        }
        Expr::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            type_checker.check_condition(condition, "ternary");
            let then_type = type_check_expr(type_checker, then_expr);
            let else_type = type_check_expr(type_checker, else_expr);
            let result = ternary_result(then_type, else_type);
            if result.is_error() && !then_type.is_error() && !else_type.is_error() {
                type_checker.add_error(ErrorImpl::IncompatibleBranches {
                    then_type,
                    else_type,
                });
            }
            result
        }
        Expr::Paren(inner) => type_check_expr(type_checker, inner),
    }
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, ast: &Stmt) {
    match ast {
        Stmt::Declaration { var_type, names } => {
            for name in names {
                type_checker.declare(name, *var_type);
            }
        }
        Stmt::Assign { name, value } => {
            type_check_assignment(type_checker, name, value);
        }
        Stmt::Expression(expression) => {
            type_check_expr(type_checker, expression);
        }
        Stmt::Write(expressions) => {
            for expression in expressions {
                type_check_expr(type_checker, expression);
            }
        }
        Stmt::Read(names) => {
            for name in names {
                if type_checker.symbol_table.lookup(name).is_none() {
                    type_checker.add_error(ErrorImpl::VariableNotDeclared {
                        variable: name.clone(),
                    });
                }
            }
        }
        Stmt::If {
            condition,
            then_body,
            else_body,
        } => {
            type_checker.check_condition(condition, "if");
            type_check_stmt(type_checker, then_body);
            if let Some(else_body) = else_body {
                type_check_stmt(type_checker, else_body);
            }
        }
        Stmt::While { condition, body } => {
            type_checker.check_condition(condition, "while");
            type_check_stmt(type_checker, body);
        }
        Stmt::For(for_stmt) => type_check_for(type_checker, for_stmt),
        Stmt::Block(body) => type_check_block(type_checker, body),
    }
}

/// Returns the declared type of `name`, or `Error` when the assignment is invalid.
fn type_check_assignment(type_checker: &mut TypeChecker, name: &str, value: &Expr) -> Type {
    let declared = type_checker.symbol_table.lookup(name);
    let received = type_check_expr(type_checker, value);

    let Some(expected) = declared else {
        type_checker.add_error(ErrorImpl::VariableNotDeclared {
            variable: name.to_string(),
        });
        return Type::Error;
    };

    if received.is_error() {
        return Type::Error;
    }
    if !Type::is_assignable(expected, received) {
        type_checker.add_error(ErrorImpl::TypeMatchError {
            variable: name.to_string(),
            expected,
            received,
        });
        return Type::Error;
    }
    expected
}

fn type_check_for(type_checker: &mut TypeChecker, for_stmt: &ForStmt) {
    type_checker.symbol_table.push_scope();

    match &for_stmt.init {
        Some(ForInit::Declare {
            var_type,
            name,
            value,
        }) => {
            let received = type_check_expr(type_checker, value);
            if !received.is_error() && !Type::is_assignable(*var_type, received) {
                type_checker.add_error(ErrorImpl::TypeMatchError {
                    variable: name.clone(),
                    expected: *var_type,
                    received,
                });
            }
            // Bound even on a bad initializer so the body doesn't report it as undeclared.
            type_checker.declare(name, *var_type);
        }
        Some(ForInit::Assign { name, value }) => {
            type_check_assignment(type_checker, name, value);
        }
        None => {}
    }
    if let Some(condition) = &for_stmt.condition {
        type_checker.check_condition(condition, "for");
    }
    if let Some(step) = &for_stmt.step {
        type_check_stmt(type_checker, step);
    }
    type_check_stmt(type_checker, &for_stmt.body);

    type_checker.symbol_table.pop_scope();
}

pub fn type_check_block(type_checker: &mut TypeChecker, body: &[Stmt]) {
    type_checker.symbol_table.push_scope();
    for stmt in body {
        type_check_stmt(type_checker, stmt);
    }
    type_checker.symbol_table.pop_scope();
}

/// Checks a whole program in the global scope, collecting every diagnostic.
pub fn type_check(ast: &Program) -> TypeChecker {
    let mut type_checker = TypeChecker::new();

    for stmt in ast.iter() {
        type_check_stmt(&mut type_checker, stmt);
    }

    tracing::debug!(
        diagnostics = type_checker.errors.len(),
        "type checking finished"
    );
    type_checker
}
