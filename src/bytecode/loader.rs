//! Parses instruction text back into [`Instruction`]s.
//!
//! Blank lines and lines starting with `//` are skipped. Everything after a
//! `push` type tag is the constant, so string constants may contain spaces.
//! String constants use `\\`, `\n` and `\r` escapes (see
//! [`escape_constant`](super::instruction::escape_constant)). Error positions
//! are instruction indices, not source lines.

use std::{collections::HashMap, rc::Rc};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::instruction::{Instruction, TypeTag};

pub const COMMENT_MARKER: &str = "//";

lazy_static! {
    static ref INSTRUCTION_PATTERN: Regex =
        Regex::new(r"^(?P<opcode>\S+)(?:\s+(?P<operands>.*))?$").unwrap();
    static ref NAME_PATTERN: Regex = Regex::new(r"^\S+$").unwrap();
    static ref NULLARY_LOOKUP: HashMap<&'static str, Instruction> = {
        let mut map = HashMap::new();
        map.insert("mod", Instruction::Mod);
        map.insert("concat", Instruction::Concat);
        map.insert("and", Instruction::And);
        map.insert("or", Instruction::Or);
        map.insert("not", Instruction::Not);
        map.insert("itof", Instruction::Itof);
        map.insert("dup", Instruction::Dup);
        map.insert("pop", Instruction::Pop);
        map
    };
}

/// Parses a whole program. Fails on the first malformed line.
pub fn parse_program(source: &str) -> Result<Vec<Instruction>, Error> {
    let mut instructions = vec![];

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let position = Position(instructions.len(), Rc::new(line.to_string()));
        let instruction = parse_instruction(line).map_err(|error| Error::new(error, position))?;
        instructions.push(instruction);
    }

    Ok(instructions)
}

/// Parses one non-empty, non-comment line.
pub fn parse_instruction(line: &str) -> Result<Instruction, ErrorImpl> {
    let captures = INSTRUCTION_PATTERN
        .captures(line.trim())
        .ok_or_else(|| malformed(format!("empty instruction `{}`", line)))?;
    let opcode = &captures["opcode"];
    let operands = captures
        .name("operands")
        .map(|operands| operands.as_str().trim())
        .unwrap_or("");

    if let Some(instruction) = NULLARY_LOOKUP.get(opcode) {
        if !operands.is_empty() {
            return Err(malformed(format!("`{}` takes no operands", opcode)));
        }
        return Ok(instruction.clone());
    }

    match opcode {
        "push" => {
            let (tag, value) = operands
                .split_once(char::is_whitespace)
                .ok_or_else(|| malformed(String::from("`push` expects a type tag and a value")))?;
            let tag = parse_tag(tag)?;
            let value = value.trim_start();
            let value = match tag {
                TypeTag::String => unescape_constant(value),
                _ => value.to_string(),
            };
            Ok(Instruction::Push(tag, value))
        }
        "load" => Ok(Instruction::Load(parse_name(opcode, operands)?)),
        "save" => Ok(Instruction::Save(parse_name(opcode, operands)?)),
        "jmp" => Ok(Instruction::Jmp(parse_name(opcode, operands)?)),
        "fjmp" => Ok(Instruction::Fjmp(parse_name(opcode, operands)?)),
        "label" => Ok(Instruction::Label(parse_name(opcode, operands)?)),
        "add" => Ok(Instruction::Add(parse_tag(operands)?)),
        "sub" => Ok(Instruction::Sub(parse_tag(operands)?)),
        "mul" => Ok(Instruction::Mul(parse_tag(operands)?)),
        "div" => Ok(Instruction::Div(parse_tag(operands)?)),
        "uminus" => Ok(Instruction::UMinus(parse_tag(operands)?)),
        "lt" => Ok(Instruction::Lt(parse_tag(operands)?)),
        "gt" => Ok(Instruction::Gt(parse_tag(operands)?)),
        "eq" => Ok(Instruction::Eq(parse_tag(operands)?)),
        "read" => Ok(Instruction::Read(parse_tag(operands)?)),
        "print" => operands
            .parse::<usize>()
            .map(Instruction::Print)
            .map_err(|_| malformed(format!("`print` expects a count, found `{}`", operands))),
        _ => Err(ErrorImpl::UnknownOpcode {
            opcode: opcode.to_string(),
        }),
    }
}

/// Reverses `escape_constant`. Unknown escapes are kept as written.
fn unescape_constant(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('\\') => unescaped.push('\\'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

fn parse_tag(operand: &str) -> Result<TypeTag, ErrorImpl> {
    operand.parse::<TypeTag>().map_err(malformed)
}

fn parse_name(opcode: &str, operand: &str) -> Result<String, ErrorImpl> {
    if NAME_PATTERN.is_match(operand) {
        Ok(operand.to_string())
    } else {
        Err(malformed(format!(
            "`{}` expects a name, found `{}`",
            opcode, operand
        )))
    }
}

fn malformed(message: String) -> ErrorImpl {
    ErrorImpl::MalformedInstruction { message }
}
