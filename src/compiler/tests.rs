//! Unit tests for code generation.
//!
//! Expected code is compared as text after label normalization, so the
//! tests do not depend on how labels are numbered.

use super::compiler::{compile, Compiler};
use crate::{
    ast::{
        ast::Program,
        expressions::{ArithOp, EqualityOp, Expr, LogicOp, RelationalOp},
        statements::{ForInit, Stmt},
        types::Type,
    },
    bytecode::instruction::{normalize_labels, to_text, Instruction},
};

fn gen(body: Vec<Stmt>) -> String {
    let instructions = compile(&Program::new(body)).unwrap();
    to_text(&normalize_labels(&instructions))
}

fn lines(expected: &[&str]) -> String {
    expected.join("\n")
}

#[test]
fn test_declaration_emits_no_code() {
    assert_eq!(gen(vec![Stmt::declare(Type::Int, &["a", "b"])]), "");
}

#[test]
fn test_assign_and_write() {
    let code = gen(vec![
        Stmt::declare(Type::Int, &["x"]),
        Stmt::assign("x", Expr::int(5)),
        Stmt::Write(vec![Expr::var("x")]),
    ]);

    assert_eq!(code, lines(&["push I 5", "save x", "load x", "print 1"]));
}

#[test]
fn test_int_assigned_to_float_is_converted() {
    let code = gen(vec![
        Stmt::declare(Type::Float, &["f"]),
        Stmt::assign("f", Expr::int(3)),
        Stmt::Write(vec![Expr::arith(ArithOp::Add, Expr::var("f"), Expr::int(1))]),
    ]);

    assert_eq!(
        code,
        lines(&[
            "push I 3", "itof", "save f", "load f", "push I 1", "itof", "add F", "print 1"
        ])
    );
}

#[test]
fn test_left_operand_widening() {
    let code = gen(vec![Stmt::Expression(Expr::relational(
        RelationalOp::Less,
        Expr::int(1),
        Expr::float("2.5"),
    ))]);

    assert_eq!(code, lines(&["push I 1", "itof", "push F 2.5", "lt F", "pop"]));
}

#[test]
fn test_int_arithmetic_has_no_conversion() {
    let code = gen(vec![Stmt::Write(vec![
        Expr::arith(ArithOp::Sub, Expr::int(7), Expr::int(2)),
        Expr::arith(ArithOp::Mod, Expr::int(7), Expr::int(2)),
        Expr::arith(ArithOp::Div, Expr::int(7), Expr::int(2)),
    ])]);

    assert_eq!(
        code,
        lines(&[
            "push I 7", "push I 2", "sub I", "push I 7", "push I 2", "mod", "push I 7", "push I 2",
            "div I", "print 3"
        ])
    );
}

#[test]
fn test_concat() {
    let code = gen(vec![Stmt::Write(vec![Expr::arith(
        ArithOp::Concat,
        Expr::string("a b"),
        Expr::string("c"),
    )])]);

    assert_eq!(code, lines(&["push S \"a b\"", "push S \"c\"", "concat", "print 1"]));
}

#[test]
fn test_equality_tags() {
    let code = gen(vec![
        Stmt::Expression(Expr::equality(EqualityOp::Equals, Expr::int(1), Expr::int(1))),
        Stmt::Expression(Expr::equality(
            EqualityOp::Equals,
            Expr::int(1),
            Expr::float("1.0"),
        )),
        Stmt::Expression(Expr::equality(
            EqualityOp::NotEquals,
            Expr::string("a"),
            Expr::string("b"),
        )),
        Stmt::Expression(Expr::equality(
            EqualityOp::Equals,
            Expr::bool(true),
            Expr::bool(true),
        )),
    ]);

    assert_eq!(
        code,
        lines(&[
            "push I 1", "push I 1", "eq I", "pop",
            "push I 1", "itof", "push F 1.0", "eq F", "pop",
            "push S \"a\"", "push S \"b\"", "eq S", "not", "pop",
            "push B true", "push B true", "eq B", "pop",
        ])
    );
}

#[test]
fn test_unary_minus_tags() {
    let code = gen(vec![
        Stmt::declare(Type::Float, &["f"]),
        Stmt::Expression(Expr::minus(Expr::int(4))),
        Stmt::Expression(Expr::minus(Expr::var("f"))),
    ]);

    assert_eq!(
        code,
        lines(&["push I 4", "uminus I", "pop", "load f", "uminus F", "pop"])
    );
}

#[test]
fn test_logic_is_not_short_circuited() {
    let code = gen(vec![Stmt::Expression(Expr::logic(
        LogicOp::Or,
        Expr::bool(true),
        Expr::not(Expr::bool(false)),
    ))]);

    assert_eq!(
        code,
        lines(&["push B true", "push B false", "not", "or", "pop"])
    );
}

#[test]
fn test_read_uses_declared_type() {
    let code = gen(vec![
        Stmt::declare(Type::Int, &["i"]),
        Stmt::declare(Type::String, &["s"]),
        Stmt::read(&["i", "s"]),
    ]);

    assert_eq!(code, lines(&["read I", "save i", "read S", "save s"]));
}

#[test]
fn test_if_else() {
    let code = gen(vec![Stmt::if_else(
        Expr::bool(true),
        Stmt::Write(vec![Expr::int(1)]),
        Some(Stmt::Write(vec![Expr::int(2)])),
    )]);

    assert_eq!(
        code,
        lines(&[
            "push B true",
            "fjmp L0",
            "push I 1",
            "print 1",
            "jmp L1",
            "label L0",
            "push I 2",
            "print 1",
            "label L1",
        ])
    );
}

#[test]
fn test_if_without_else_uses_empty_else() {
    let code = gen(vec![Stmt::if_else(
        Expr::bool(false),
        Stmt::Write(vec![Expr::int(1)]),
        None,
    )]);

    assert_eq!(
        code,
        lines(&[
            "push B false",
            "fjmp L0",
            "push I 1",
            "print 1",
            "jmp L1",
            "label L0",
            "label L1",
        ])
    );
}

#[test]
fn test_while() {
    let code = gen(vec![
        Stmt::declare(Type::Int, &["i"]),
        Stmt::while_loop(
            Expr::relational(RelationalOp::Less, Expr::var("i"), Expr::int(3)),
            Stmt::assign("i", Expr::arith(ArithOp::Add, Expr::var("i"), Expr::int(1))),
        ),
    ]);

    assert_eq!(
        code,
        lines(&[
            "label L0",
            "load i",
            "push I 3",
            "lt I",
            "fjmp L1",
            "load i",
            "push I 1",
            "add I",
            "save i",
            "jmp L0",
            "label L1",
        ])
    );
}

#[test]
fn test_for_loop() {
    let code = gen(vec![Stmt::for_loop(
        Some(ForInit::declare(Type::Float, "x", Expr::int(0))),
        Some(Expr::relational(RelationalOp::Less, Expr::var("x"), Expr::int(2))),
        Some(Stmt::assign(
            "x",
            Expr::arith(ArithOp::Add, Expr::var("x"), Expr::float("0.5")),
        )),
        Stmt::Write(vec![Expr::var("x")]),
    )]);

    assert_eq!(
        code,
        lines(&[
            "push I 0",
            "itof",
            "save x",
            "label L0",
            "load x",
            "push I 2",
            "itof",
            "lt F",
            "fjmp L1",
            "load x",
            "print 1",
            "load x",
            "push F 0.5",
            "add F",
            "save x",
            "jmp L0",
            "label L1",
        ])
    );
}

#[test]
fn test_ternary_widens_int_branch() {
    let code = gen(vec![Stmt::Write(vec![Expr::ternary(
        Expr::bool(true),
        Expr::int(1),
        Expr::float("2.5"),
    )])]);

    assert_eq!(
        code,
        lines(&[
            "push B true",
            "fjmp L0",
            "push I 1",
            "itof",
            "jmp L1",
            "label L0",
            "push F 2.5",
            "label L1",
            "print 1",
        ])
    );
}

#[test]
fn test_block_scopes_follow_shadowing() {
    // The inner `x` is a float, so the inner assignment converts.
    let code = gen(vec![
        Stmt::declare(Type::Int, &["x"]),
        Stmt::Block(vec![
            Stmt::declare(Type::Float, &["x"]),
            Stmt::assign("x", Expr::int(1)),
        ]),
        Stmt::assign("x", Expr::int(2)),
    ]);

    assert_eq!(
        code,
        lines(&["push I 1", "itof", "save x", "push I 2", "save x"])
    );
}

#[test]
fn test_labels_are_unique() {
    let mut body = vec![];
    for _ in 0..5 {
        body.push(Stmt::if_else(Expr::bool(true), Stmt::Block(vec![]), None));
        body.push(Stmt::while_loop(Expr::bool(false), Stmt::Block(vec![])));
    }
    let instructions = compile(&Program::new(body)).unwrap();

    let mut labels: Vec<&String> = instructions
        .iter()
        .filter_map(|instruction| match instruction {
            Instruction::Label(label) => Some(label),
            _ => None,
        })
        .collect();
    let total = labels.len();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), total);
    assert_eq!(total, 20);
}

#[test]
fn test_new_label_counts_up() {
    let mut compiler = Compiler::new();

    assert_eq!(compiler.new_label(), "L0");
    assert_eq!(compiler.new_label(), "L1");
    assert_eq!(compiler.new_label(), "L2");
}

#[test]
fn test_unchecked_tree_is_rejected() {
    let result = compile(&Program::new(vec![Stmt::assign("ghost", Expr::int(1))]));

    assert!(result.is_err());
}

#[test]
fn test_for_with_assignment_init() {
    let code = gen(vec![
        Stmt::declare(Type::Float, &["x"]),
        Stmt::for_loop(
            Some(ForInit::assign("x", Expr::int(0))),
            None,
            None,
            Stmt::Block(vec![]),
        ),
    ]);

    assert_eq!(
        code,
        lines(&["push I 0", "itof", "save x", "label L0", "jmp L0", "label L1"])
    );
}

#[test]
fn test_string_with_line_break_renders_on_one_line() {
    let code = gen(vec![Stmt::Write(vec![Expr::string("a\nb")])]);

    assert_eq!(code, lines(&["push S \"a\\nb\"", "print 1"]));
}
