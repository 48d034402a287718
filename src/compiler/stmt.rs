use crate::{
    ast::{
        expressions::Expr,
        statements::{ForInit, ForStmt, Stmt},
        types::Type,
    },
    bytecode::instruction::Instruction,
    errors::errors::{Error, ErrorImpl},
};

use super::{compiler::Compiler, expr::gen_expression};

pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Result<(), Error> {
    match statement {
        // Variables are created by their first `save`; reading one earlier
        // is a runtime error in the VM.
        Stmt::Declaration { var_type, names } => {
            for name in names {
                compiler.symbol_table.declare(name, *var_type)?;
            }
        }
        Stmt::Assign { name, value } => {
            let target = declared_type(compiler, name)?;
            gen_store(compiler, name, target, value)?;
        }
        Stmt::Expression(expression) => {
            gen_expression(compiler, expression)?;
            compiler.emit(Instruction::Pop);
        }
        Stmt::Write(expressions) => {
            for expression in expressions {
                gen_expression(compiler, expression)?;
            }
            compiler.emit(Instruction::Print(expressions.len()));
        }
        Stmt::Read(names) => {
            for name in names {
                let ty = declared_type(compiler, name)?;
                let tag = compiler.tag_for(ty, name)?;
                compiler.emit(Instruction::Read(tag));
                compiler.emit(Instruction::Save(name.clone()));
            }
        }
        Stmt::If {
            condition,
            then_body,
            else_body,
        } => {
            // Always the two-label form; a missing else is an empty else.
            let else_label = compiler.new_label();
            let end_label = compiler.new_label();

            gen_expression(compiler, condition)?;
            compiler.emit(Instruction::Fjmp(else_label.clone()));
            gen_statement(compiler, then_body)?;
            compiler.emit(Instruction::Jmp(end_label.clone()));
            compiler.emit(Instruction::Label(else_label));
            if let Some(else_body) = else_body {
                gen_statement(compiler, else_body)?;
            }
            compiler.emit(Instruction::Label(end_label));
        }
        Stmt::While { condition, body } => {
            let condition_label = compiler.new_label();
            let end_label = compiler.new_label();

            compiler.emit(Instruction::Label(condition_label.clone()));
            gen_expression(compiler, condition)?;
            compiler.emit(Instruction::Fjmp(end_label.clone()));
            gen_statement(compiler, body)?;
            compiler.emit(Instruction::Jmp(condition_label));
            compiler.emit(Instruction::Label(end_label));
        }
        Stmt::For(for_stmt) => {
            compiler.symbol_table.push_scope();
            let result = gen_for(compiler, for_stmt);
            compiler.symbol_table.pop_scope();
            result?;
        }
        Stmt::Block(body) => {
            compiler.symbol_table.push_scope();
            let result = body
                .iter()
                .try_for_each(|stmt| gen_statement(compiler, stmt));
            compiler.symbol_table.pop_scope();
            result?;
        }
    }

    Ok(())
}

fn gen_for(compiler: &mut Compiler, for_stmt: &ForStmt) -> Result<(), Error> {
    match &for_stmt.init {
        Some(ForInit::Declare {
            var_type,
            name,
            value,
        }) => {
            // The initializer is evaluated before the loop variable comes into scope.
            gen_store(compiler, name, *var_type, value)?;
            compiler.symbol_table.declare(name, *var_type)?;
        }
        Some(ForInit::Assign { name, value }) => {
            let target = declared_type(compiler, name)?;
            gen_store(compiler, name, target, value)?;
        }
        None => {}
    }

    let condition_label = compiler.new_label();
    let end_label = compiler.new_label();

    compiler.emit(Instruction::Label(condition_label.clone()));
    if let Some(condition) = &for_stmt.condition {
        gen_expression(compiler, condition)?;
        compiler.emit(Instruction::Fjmp(end_label.clone()));
    }
    gen_statement(compiler, &for_stmt.body)?;
    if let Some(step) = &for_stmt.step {
        gen_statement(compiler, step)?;
    }
    compiler.emit(Instruction::Jmp(condition_label));
    compiler.emit(Instruction::Label(end_label));

    Ok(())
}

/// Evaluates `value` and saves it into `name`, widening an int into a float variable.
fn gen_store(compiler: &mut Compiler, name: &str, target: Type, value: &Expr) -> Result<(), Error> {
    let value_type = compiler.resolve(value);

    gen_expression(compiler, value)?;
    if value_type == Type::Int && target == Type::Float {
        compiler.emit(Instruction::Itof);
    }
    compiler.emit(Instruction::Save(name.to_string()));

    Ok(())
}

fn declared_type(compiler: &Compiler, name: &str) -> Result<Type, Error> {
    compiler.symbol_table.lookup(name).ok_or_else(|| {
        Error::diagnostic(ErrorImpl::VariableNotDeclared {
            variable: name.to_string(),
        })
    })
}
