use crate::{
    ast::{
        expressions::{ArithOp, EqualityOp, Expr, LiteralKind, LogicOp, RelationalOp},
        types::Type,
    },
    bytecode::instruction::{Instruction, TypeTag},
    errors::errors::{Error, ErrorImpl},
};

use super::compiler::Compiler;

/// Emits code that leaves the value of `expression` on top of the stack.
pub fn gen_expression(compiler: &mut Compiler, expression: &Expr) -> Result<(), Error> {
    match expression {
        Expr::Literal { kind, text } => {
            let tag = match kind {
                LiteralKind::Int => TypeTag::Int,
                LiteralKind::Float => TypeTag::Float,
                LiteralKind::Bool => TypeTag::Bool,
                LiteralKind::String => TypeTag::String,
            };
            compiler.emit(Instruction::Push(tag, text.clone()));
        }
        Expr::Var(name) => compiler.emit(Instruction::Load(name.clone())),
        Expr::UnaryMinus(operand) => {
            let tag = if compiler.resolve(operand) == Type::Int {
                TypeTag::Int
            } else {
                TypeTag::Float
            };
            gen_expression(compiler, operand)?;
            compiler.emit(Instruction::UMinus(tag));
        }
        Expr::Not(operand) => {
            gen_expression(compiler, operand)?;
            compiler.emit(Instruction::Not);
        }
        Expr::Arith {
            operator,
            left,
            right,
        } => match operator {
            ArithOp::Concat => {
                gen_expression(compiler, left)?;
                gen_expression(compiler, right)?;
                compiler.emit(Instruction::Concat);
            }
            ArithOp::Mod => {
                gen_expression(compiler, left)?;
                gen_expression(compiler, right)?;
                compiler.emit(Instruction::Mod);
            }
            ArithOp::Add | ArithOp::Sub | ArithOp::Mul | ArithOp::Div => {
                let tag = gen_numeric_operands(compiler, left, right, &operator.to_string())?;
                compiler.emit(match operator {
                    ArithOp::Add => Instruction::Add(tag),
                    ArithOp::Sub => Instruction::Sub(tag),
                    ArithOp::Mul => Instruction::Mul(tag),
                    _ => Instruction::Div(tag),
                });
            }
        },
        Expr::Relational {
            operator,
            left,
            right,
        } => {
            let tag = gen_numeric_operands(compiler, left, right, &operator.to_string())?;
            compiler.emit(match operator {
                RelationalOp::Less => Instruction::Lt(tag),
                RelationalOp::Greater => Instruction::Gt(tag),
            });
        }
        Expr::Equality {
            operator,
            left,
            right,
        } => {
            let (left_type, right_type) = gen_coerced_operands(compiler, left, right)?;
            let tag = equality_tag(left_type, right_type).ok_or_else(|| {
                Error::diagnostic(ErrorImpl::UnresolvedType {
                    construct: format!("operands of '{}'", operator),
                })
            })?;
            compiler.emit(Instruction::Eq(tag));
            if *operator == EqualityOp::NotEquals {
                compiler.emit(Instruction::Not);
            }
        }
        Expr::Logic {
            operator,
            left,
            right,
        } => {
            // Both sides are always evaluated.
            gen_expression(compiler, left)?;
            gen_expression(compiler, right)?;
            compiler.emit(match operator {
                LogicOp::And => Instruction::And,
                LogicOp::Or => Instruction::Or,
            });
        }
        Expr::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            let result_type = compiler.resolve(expression);
            let false_label = compiler.new_label();
            let end_label = compiler.new_label();

            gen_expression(compiler, condition)?;
            compiler.emit(Instruction::Fjmp(false_label.clone()));
            gen_branch(compiler, then_expr, result_type)?;
            compiler.emit(Instruction::Jmp(end_label.clone()));
            compiler.emit(Instruction::Label(false_label));
            gen_branch(compiler, else_expr, result_type)?;
            compiler.emit(Instruction::Label(end_label));
        }
        Expr::Paren(inner) => gen_expression(compiler, inner)?,
    }

    Ok(())
}

/// Emits both operands, converting the int side when the other side is a float.
fn gen_coerced_operands(
    compiler: &mut Compiler,
    left: &Expr,
    right: &Expr,
) -> Result<(Type, Type), Error> {
    let left_type = compiler.resolve(left);
    let right_type = compiler.resolve(right);

    gen_expression(compiler, left)?;
    if left_type == Type::Int && right_type == Type::Float {
        compiler.emit(Instruction::Itof);
    }
    gen_expression(compiler, right)?;
    if right_type == Type::Int && left_type == Type::Float {
        compiler.emit(Instruction::Itof);
    }

    Ok((left_type, right_type))
}

/// Emits numeric operands and returns the tag of their widened type.
fn gen_numeric_operands(
    compiler: &mut Compiler,
    left: &Expr,
    right: &Expr,
    operator: &str,
) -> Result<TypeTag, Error> {
    let (left_type, right_type) = gen_coerced_operands(compiler, left, right)?;
    compiler.tag_for(
        Type::widen(left_type, right_type),
        &format!("operands of '{}'", operator),
    )
}

fn gen_branch(compiler: &mut Compiler, branch: &Expr, result_type: Type) -> Result<(), Error> {
    let branch_type = compiler.resolve(branch);
    gen_expression(compiler, branch)?;
    if branch_type == Type::Int && result_type == Type::Float {
        compiler.emit(Instruction::Itof);
    }
    Ok(())
}

/// `S` wins over `F`, which wins over `I`; two bools compare as `B`.
fn equality_tag(left: Type, right: Type) -> Option<TypeTag> {
    if left == Type::String || right == Type::String {
        Some(TypeTag::String)
    } else if left == Type::Float || right == Type::Float {
        Some(TypeTag::Float)
    } else if left == Type::Bool && right == Type::Bool {
        Some(TypeTag::Bool)
    } else if left == Type::Int && right == Type::Int {
        Some(TypeTag::Int)
    } else {
        None
    }
}
