//! Unit tests for the virtual machine.

use std::{
    io::{Cursor, Write},
    sync::{Arc, Mutex},
};

use super::{config::VmConfig, value::Value, vm::VM};
use crate::{
    bytecode::instruction::{Instruction, TypeTag},
    errors::errors::{Error, ErrorImpl},
};

fn run_text(source: &str) -> Result<String, Error> {
    run_with(source, VmConfig::new().with_inputs(Vec::<String>::new()))
}

fn run_with(source: &str, config: VmConfig) -> Result<String, Error> {
    let mut vm = VM::from_text(source, config)?;
    let mut output = Vec::new();
    vm.run(&mut output)?;
    Ok(String::from_utf8(output).unwrap())
}

fn run_error(source: &str) -> Error {
    run_text(source).unwrap_err()
}

#[test]
fn test_push_and_print() {
    assert_eq!(run_text("push I 5\nprint 1").unwrap(), "5\n");
    assert_eq!(run_text("push F 2.5\nprint 1").unwrap(), "2.5\n");
    assert_eq!(run_text("push B true\nprint 1").unwrap(), "true\n");
    assert_eq!(run_text("push S \"a b\"\nprint 1").unwrap(), "a b\n");
}

#[test]
fn test_whole_float_keeps_fraction() {
    assert_eq!(run_text("push I 4\nitof\nprint 1").unwrap(), "4.0\n");
}

#[test]
fn test_print_keeps_program_order() {
    let output = run_text("push S \"x\"\npush S \"y\"\nprint 2").unwrap();

    assert_eq!(output, "xy\n");
}

#[test]
fn test_print_mixed_values() {
    let output = run_text("push S \"n=\"\npush I 3\npush B false\nprint 3").unwrap();

    assert_eq!(output, "n=3false\n");
}

#[test]
fn test_save_and_load() {
    let mut vm = VM::from_text(
        "push I 7\nsave a\nload a\nload a\nadd I\nsave b",
        VmConfig::default(),
    )
    .unwrap();
    vm.run(&mut Vec::new()).unwrap();

    assert_eq!(vm.memory().get("a"), Some(&Value::Int(7)));
    assert_eq!(vm.memory().get("b"), Some(&Value::Int(14)));
    assert!(vm.stack().is_empty());
}

#[test]
fn test_integer_arithmetic() {
    let output = run_text(
        "push I 7\npush I 2\nsub I\n\
         push I 7\npush I 2\nmul I\n\
         push I 7\npush I 2\ndiv I\n\
         push I 7\npush I 2\nmod\n\
         print 4",
    )
    .unwrap();

    assert_eq!(output, "51431\n");
}

#[test]
fn test_float_arithmetic() {
    let output = run_text("push F 1.5\npush F 0.25\nadd F\npush F 1.0\npush F 4.0\ndiv F\nprint 2")
        .unwrap();

    assert_eq!(output, "1.750.25\n");
}

#[test]
fn test_unary_minus() {
    let output = run_text("push I 3\numinus I\npush F 1.5\numinus F\nprint 2").unwrap();

    assert_eq!(output, "-3-1.5\n");
}

#[test]
fn test_concat() {
    assert_eq!(
        run_text("push S \"ab\"\npush S \"cd\"\nconcat\nprint 1").unwrap(),
        "abcd\n"
    );
}

#[test]
fn test_logic() {
    let output = run_text(
        "push B true\npush B false\nand\n\
         push B true\npush B false\nor\n\
         push B false\nnot\n\
         print 3",
    )
    .unwrap();

    assert_eq!(output, "falsetruetrue\n");
}

#[test]
fn test_comparisons() {
    let output = run_text(
        "push I 1\npush I 2\nlt I\n\
         push I 1\npush I 2\ngt I\n\
         push F 2.5\npush F 2.5\neq F\n\
         push S \"a\"\npush S \"b\"\neq S\n\
         push B true\npush B true\neq B\n\
         print 5",
    )
    .unwrap();

    assert_eq!(output, "truefalsetruefalsetrue\n");
}

#[test]
fn test_dup_and_pop() {
    let mut vm = VM::from_text("push I 1\ndup\npush I 9\npop", VmConfig::default()).unwrap();
    vm.run(&mut Vec::new()).unwrap();

    assert_eq!(vm.stack(), &[Value::Int(1), Value::Int(1)]);
}

#[test]
fn test_jumps() {
    let source = "\
push B false
fjmp L0
push S \"skipped\"
print 1
label L0
jmp L1
push S \"skipped\"
print 1
label L1
push S \"end\"
print 1";

    assert_eq!(run_text(source).unwrap(), "end\n");
}

#[test]
fn test_fjmp_falls_through_on_true() {
    let source = "push B true\nfjmp L0\npush I 1\nprint 1\nlabel L0";

    assert_eq!(run_text(source).unwrap(), "1\n");
}

#[test]
fn test_counting_loop() {
    let source = "\
push I 0
save i
label L0
load i
push I 3
lt I
fjmp L1
load i
print 1
load i
push I 1
add I
save i
jmp L0
label L1";

    assert_eq!(run_text(source).unwrap(), "0\n1\n2\n");
}

#[test]
fn test_read_from_queue() {
    let config = VmConfig::new().with_inputs(["42", " 2.5 ", "true", "hello world"]);
    let output = run_with("read I\nread F\nread B\nread S\nprint 4", config).unwrap();

    assert_eq!(output, "422.5truehello world\n");
}

#[test]
fn test_read_interactive() {
    let reader = Box::new(Cursor::new(b"42\nabc\n".to_vec()));
    let mut vm = VM::with_reader(
        vec![
            Instruction::Read(TypeTag::Int),
            Instruction::Read(TypeTag::String),
            Instruction::Print(2),
        ],
        VmConfig::default(),
        reader,
    )
    .unwrap();
    let mut output = Vec::new();
    vm.run(&mut output).unwrap();

    assert_eq!(output, b"42abc\n");
}

#[test]
fn test_read_bad_input() {
    let config = VmConfig::new().with_inputs(["forty-two"]);
    let error = run_with("read I", config).unwrap_err();

    assert_eq!(
        error.get_kind(),
        &ErrorImpl::InputParseError {
            input: "forty-two".to_string(),
            expected: "int".to_string()
        }
    );
}

#[test]
fn test_read_rejects_non_boolean_words() {
    let config = VmConfig::new().with_inputs(["yes"]);
    let error = run_with("read B", config).unwrap_err();

    assert_eq!(error.get_error_name(), "InputParseError");
}

#[test]
fn test_read_exhausted() {
    let error = run_error("read I");

    assert_eq!(error.get_kind(), &ErrorImpl::InputExhausted);
}

#[test]
fn test_uninitialized_load() {
    let error = run_error("push I 1\nload x");

    assert_eq!(
        error.get_kind(),
        &ErrorImpl::UninitializedVariable {
            variable: "x".to_string()
        }
    );
    let position = error.get_position().unwrap();
    assert_eq!(position.0, 1);
    assert_eq!(position.1.as_str(), "load x");
}

#[test]
fn test_stack_underflow() {
    assert_eq!(run_error("add I").get_kind(), &ErrorImpl::StackUnderflow);
    assert_eq!(run_error("push I 1\nprint 2").get_kind(), &ErrorImpl::StackUnderflow);
    assert_eq!(run_error("pop").get_kind(), &ErrorImpl::StackUnderflow);
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        run_error("push I 1\npush I 0\ndiv I").get_kind(),
        &ErrorImpl::DivisionByZero
    );
    assert_eq!(
        run_error("push I 1\npush I 0\nmod").get_kind(),
        &ErrorImpl::DivisionByZero
    );
}

#[test]
fn test_operand_type_mismatch() {
    let error = run_error("push S \"a\"\npush I 1\nadd I");

    assert_eq!(error.get_error_name(), "OperandTypeMismatch");
    assert_eq!(run_error("push I 1\nnot").get_error_name(), "OperandTypeMismatch");
    assert_eq!(run_error("push I 1\nfjmp L0\nlabel L0").get_error_name(), "OperandTypeMismatch");
}

#[test]
fn test_numeric_tags_coerce_stray_operands() {
    // An int under a float tag is widened; a float under an int tag is truncated.
    let output = run_text("push I 1\npush F 0.5\nadd F\npush F 2.9\npush I 1\nadd I\nprint 2").unwrap();

    assert_eq!(output, "1.53\n");
}

#[test]
fn test_itof_accepts_float() {
    assert_eq!(run_text("push F 1.5\nitof\nprint 1").unwrap(), "1.5\n");
}

#[test]
fn test_unresolved_label_is_rejected_before_running() {
    let result = VM::from_text("push I 1\nprint 1\njmp nowhere", VmConfig::default());

    match result {
        Err(error) => {
            assert_eq!(
                error.get_kind(),
                &ErrorImpl::UnresolvedLabel {
                    label: "nowhere".to_string()
                }
            );
            assert_eq!(error.get_position().unwrap().0, 2);
        }
        Ok(_) => panic!("expected the program to be rejected"),
    }
}

#[test]
fn test_duplicate_label_is_rejected() {
    let result = VM::from_text("label L0\nlabel L0", VmConfig::default());

    assert!(matches!(
        result.err().map(|error| error.get_kind().clone()),
        Some(ErrorImpl::DuplicateLabel { .. })
    ));
}

#[test]
fn test_bad_push_constant() {
    assert_eq!(run_error("push I abc").get_error_name(), "MalformedInstruction");
}

#[test]
fn test_output_before_error_is_kept() {
    let mut vm = VM::from_text("push I 1\nprint 1\nload x", VmConfig::default()).unwrap();
    let mut output = Vec::new();

    assert!(vm.run(&mut output).is_err());
    assert_eq!(output, b"1\n");
}

#[test]
fn test_empty_program() {
    assert_eq!(run_text("").unwrap(), "");
}

#[derive(Clone)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn traced_run(debug: bool) -> (String, String) {
    let buffer = SharedBuffer(Arc::new(Mutex::new(Vec::new())));
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let output = tracing::subscriber::with_default(subscriber, || {
        run_with(
            "push I 2\npush I 3\nmul I\nprint 1",
            VmConfig::new().with_debug(debug),
        )
        .unwrap()
    });

    let trace = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (output, trace)
}

#[test]
fn test_debug_mode_traces_execution() {
    let (output, trace) = traced_run(true);

    assert_eq!(output, "6\n");
    assert!(trace.contains("stackc::vm"));
    assert!(trace.contains("executing"));
    assert!(trace.contains("mul I"));
    assert!(trace.contains("print"));
}

#[test]
fn test_debug_mode_does_not_change_output() {
    let (traced, _) = traced_run(true);
    let (quiet, trace) = traced_run(false);

    assert_eq!(traced, quiet);
    assert!(!trace.contains("executing"));
}
