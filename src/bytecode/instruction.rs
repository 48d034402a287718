//! The stack machine's instruction set.
//!
//! Each instruction renders as one line of text: the opcode followed by its
//! space-separated operands. That text is the contract between the code
//! generator and the virtual machine (see `loader` for the reverse
//! direction).

use std::{collections::HashMap, fmt::Display, str::FromStr};

/// Runtime type tag carried by typed instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Float,
    Bool,
    String,
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeTag::Int => write!(f, "I"),
            TypeTag::Float => write!(f, "F"),
            TypeTag::Bool => write!(f, "B"),
            TypeTag::String => write!(f, "S"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "I" => Ok(TypeTag::Int),
            "F" => Ok(TypeTag::Float),
            "B" => Ok(TypeTag::Bool),
            "S" => Ok(TypeTag::String),
            _ => Err(format!("unknown type tag `{}`", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Typed constant. The value is kept as raw text (string constants keep
    /// their quotes) and only interpreted when executed.
    Push(TypeTag, String),
    Load(String),
    Save(String),
    Add(TypeTag),
    Sub(TypeTag),
    Mul(TypeTag),
    Div(TypeTag),
    Mod,
    UMinus(TypeTag),
    Concat,
    And,
    Or,
    Not,
    Lt(TypeTag),
    Gt(TypeTag),
    Eq(TypeTag),
    Itof,
    Jmp(String),
    Fjmp(String),
    Label(String),
    /// Pops this many values and prints them on one line, in program order.
    Print(usize),
    Read(TypeTag),
    Dup,
    Pop,
}

impl Instruction {
    pub fn opcode(&self) -> &'static str {
        match self {
            Instruction::Push(..) => "push",
            Instruction::Load(_) => "load",
            Instruction::Save(_) => "save",
            Instruction::Add(_) => "add",
            Instruction::Sub(_) => "sub",
            Instruction::Mul(_) => "mul",
            Instruction::Div(_) => "div",
            Instruction::Mod => "mod",
            Instruction::UMinus(_) => "uminus",
            Instruction::Concat => "concat",
            Instruction::And => "and",
            Instruction::Or => "or",
            Instruction::Not => "not",
            Instruction::Lt(_) => "lt",
            Instruction::Gt(_) => "gt",
            Instruction::Eq(_) => "eq",
            Instruction::Itof => "itof",
            Instruction::Jmp(_) => "jmp",
            Instruction::Fjmp(_) => "fjmp",
            Instruction::Label(_) => "label",
            Instruction::Print(_) => "print",
            Instruction::Read(_) => "read",
            Instruction::Dup => "dup",
            Instruction::Pop => "pop",
        }
    }

    /// Target of a `jmp`/`fjmp`.
    pub fn jump_target(&self) -> Option<&str> {
        match self {
            Instruction::Jmp(label) | Instruction::Fjmp(label) => Some(label),
            _ => None,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let opcode = self.opcode();
        match self {
            Instruction::Push(TypeTag::String, value) => {
                write!(f, "{} {} {}", opcode, TypeTag::String, escape_constant(value))
            }
            Instruction::Push(tag, value) => write!(f, "{} {} {}", opcode, tag, value),
            Instruction::Load(name)
            | Instruction::Save(name)
            | Instruction::Jmp(name)
            | Instruction::Fjmp(name)
            | Instruction::Label(name) => write!(f, "{} {}", opcode, name),
            Instruction::Add(tag)
            | Instruction::Sub(tag)
            | Instruction::Mul(tag)
            | Instruction::Div(tag)
            | Instruction::UMinus(tag)
            | Instruction::Lt(tag)
            | Instruction::Gt(tag)
            | Instruction::Eq(tag)
            | Instruction::Read(tag) => write!(f, "{} {}", opcode, tag),
            Instruction::Print(count) => write!(f, "{} {}", opcode, count),
            Instruction::Mod
            | Instruction::Concat
            | Instruction::And
            | Instruction::Or
            | Instruction::Not
            | Instruction::Itof
            | Instruction::Dup
            | Instruction::Pop => write!(f, "{}", opcode),
        }
    }
}

/// Escapes backslashes and line breaks so a string constant stays on one line.
pub fn escape_constant(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders a program as instruction text, one instruction per line.
pub fn to_text(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(|instruction| instruction.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}

/// Renames every label to `L0`, `L1`, ... in order of first appearance.
///
/// Two programs that differ only by a consistent renaming of labels
/// normalize to the same sequence.
pub fn normalize_labels(instructions: &[Instruction]) -> Vec<Instruction> {
    let mut renamed: HashMap<String, String> = HashMap::new();
    let mut rename = |label: &String| -> String {
        let next = format!("L{}", renamed.len());
        renamed.entry(label.clone()).or_insert(next).clone()
    };

    instructions
        .iter()
        .map(|instruction| match instruction {
            Instruction::Label(label) => Instruction::Label(rename(label)),
            Instruction::Jmp(label) => Instruction::Jmp(rename(label)),
            Instruction::Fjmp(label) => Instruction::Fjmp(rename(label)),
            other => other.clone(),
        })
        .collect()
}
