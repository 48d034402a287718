use std::{
    collections::{HashMap, VecDeque},
    io::{self, BufRead, BufReader, Write},
    rc::Rc,
};

use crate::{
    bytecode::{
        instruction::{Instruction, TypeTag},
        loader::parse_program,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{config::VmConfig, input::Input, value::Value};

#[derive(Debug, Clone, Copy)]
enum ArithKind {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithKind {
    fn apply_int(self, left: i64, right: i64) -> Result<i64, ErrorImpl> {
        match self {
            ArithKind::Add => Ok(left.wrapping_add(right)),
            ArithKind::Sub => Ok(left.wrapping_sub(right)),
            ArithKind::Mul => Ok(left.wrapping_mul(right)),
            ArithKind::Div => {
                if right == 0 {
                    return Err(ErrorImpl::DivisionByZero);
                }
                Ok(left.wrapping_div(right))
            }
        }
    }

    fn apply_float(self, left: f64, right: f64) -> f64 {
        match self {
            ArithKind::Add => left + right,
            ArithKind::Sub => left - right,
            ArithKind::Mul => left * right,
            ArithKind::Div => left / right,
        }
    }
}

/// Stack machine executing a flat instruction list.
///
/// Labels are resolved once, up front: duplicate definitions and jumps to
/// undefined labels are rejected before the first instruction runs.
pub struct VM {
    instructions: Rc<Vec<Instruction>>,
    labels: HashMap<String, usize>,
    stack: Vec<Value>,
    memory: HashMap<String, Value>,
    ip: usize,
    debug: bool,
    input: Input,
}

impl VM {
    /// Builds a machine reading from the configured input list, or from
    /// standard input when the config has none.
    pub fn new(instructions: Vec<Instruction>, config: VmConfig) -> Result<Self, Error> {
        VM::with_reader(instructions, config, Box::new(BufReader::new(io::stdin())))
    }

    /// Like [`VM::new`], but interactive reads come from `reader`.
    pub fn with_reader(
        instructions: Vec<Instruction>,
        config: VmConfig,
        reader: Box<dyn BufRead>,
    ) -> Result<Self, Error> {
        let labels = resolve_labels(&instructions)?;
        let input = match config.inputs {
            Some(values) => Input::Queue(VecDeque::from(values)),
            None => Input::Interactive(reader),
        };

        Ok(VM {
            instructions: Rc::new(instructions),
            labels,
            stack: Vec::new(),
            memory: HashMap::new(),
            ip: 0,
            debug: config.debug,
            input,
        })
    }

    /// Parses instruction text and builds a machine for it.
    pub fn from_text(source: &str, config: VmConfig) -> Result<Self, Error> {
        VM::new(parse_program(source)?, config)
    }

    /// Runs until the instruction pointer falls off the end of the program.
    ///
    /// Output produced before a runtime error has already been written to
    /// `output` when the error is returned.
    pub fn run<W: Write>(&mut self, output: &mut W) -> Result<(), Error> {
        let program = Rc::clone(&self.instructions);

        while self.ip < program.len() {
            let current = self.ip;
            let instruction = &program[current];
            self.ip += 1;

            if self.debug {
                tracing::debug!(
                    target: "stackc::vm",
                    ip = current,
                    instruction = %instruction,
                    depth = self.stack.len(),
                    "executing"
                );
            }

            self.execute(instruction, output).map_err(|error| {
                Error::new(error, Position(current, Rc::new(instruction.to_string())))
            })?;
        }

        output.flush().map_err(|error| {
            Error::new(
                ErrorImpl::OutputError {
                    message: error.to_string(),
                },
                Position(program.len(), Rc::new(String::from("<end>"))),
            )
        })
    }

    pub fn memory(&self) -> &HashMap<String, Value> {
        &self.memory
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    fn execute<W: Write>(
        &mut self,
        instruction: &Instruction,
        output: &mut W,
    ) -> Result<(), ErrorImpl> {
        match instruction {
            Instruction::Push(tag, text) => {
                let value = Value::from_literal(*tag, text).map_err(|message| {
                    ErrorImpl::MalformedInstruction {
                        message: format!("bad {} constant `{}`: {}", tag, text, message),
                    }
                })?;
                self.stack.push(value);
            }
            Instruction::Load(name) => {
                let value = self.memory.get(name).cloned().ok_or_else(|| {
                    ErrorImpl::UninitializedVariable {
                        variable: name.clone(),
                    }
                })?;
                self.stack.push(value);
            }
            Instruction::Save(name) => {
                let value = self.pop()?;
                self.memory.insert(name.clone(), value);
            }
            Instruction::Add(tag) => self.arithmetic("add", *tag, ArithKind::Add)?,
            Instruction::Sub(tag) => self.arithmetic("sub", *tag, ArithKind::Sub)?,
            Instruction::Mul(tag) => self.arithmetic("mul", *tag, ArithKind::Mul)?,
            Instruction::Div(tag) => self.arithmetic("div", *tag, ArithKind::Div)?,
            Instruction::Mod => {
                let right = self.pop_int("mod")?;
                let left = self.pop_int("mod")?;
                if right == 0 {
                    return Err(ErrorImpl::DivisionByZero);
                }
                self.stack.push(Value::Int(left.wrapping_rem(right)));
            }
            Instruction::UMinus(tag) => {
                let value = match tag {
                    TypeTag::Int => Value::Int(self.pop_int("uminus")?.wrapping_neg()),
                    TypeTag::Float => Value::Float(-self.pop_float("uminus")?),
                    other => return Err(bad_tag("uminus", *other)),
                };
                self.stack.push(value);
            }
            Instruction::Concat => {
                let right = self.pop_string("concat")?;
                let left = self.pop_string("concat")?;
                self.stack.push(Value::String(left + &right));
            }
            Instruction::And => {
                let right = self.pop_bool("and")?;
                let left = self.pop_bool("and")?;
                self.stack.push(Value::Bool(left && right));
            }
            Instruction::Or => {
                let right = self.pop_bool("or")?;
                let left = self.pop_bool("or")?;
                self.stack.push(Value::Bool(left || right));
            }
            Instruction::Not => {
                let value = self.pop_bool("not")?;
                self.stack.push(Value::Bool(!value));
            }
            Instruction::Lt(tag) => {
                let result = self.compare("lt", *tag)?;
                self.stack.push(Value::Bool(result.is_lt()));
            }
            Instruction::Gt(tag) => {
                let result = self.compare("gt", *tag)?;
                self.stack.push(Value::Bool(result.is_gt()));
            }
            Instruction::Eq(tag) => {
                let result = self.equals(*tag)?;
                self.stack.push(Value::Bool(result));
            }
            Instruction::Itof => {
                let value = self.pop_float("itof")?;
                self.stack.push(Value::Float(value));
            }
            Instruction::Jmp(label) => self.ip = self.target(label)?,
            Instruction::Fjmp(label) => {
                if !self.pop_bool("fjmp")? {
                    self.ip = self.target(label)?;
                }
            }
            Instruction::Label(_) => {}
            Instruction::Print(count) => self.print(*count, output)?,
            Instruction::Read(tag) => {
                let text = self.input.next_value()?;
                let value = Value::parse(*tag, &text).map_err(|_| ErrorImpl::InputParseError {
                    input: text.clone(),
                    expected: tag_name(*tag).to_string(),
                })?;
                self.stack.push(value);
            }
            Instruction::Dup => {
                let top = self.stack.last().cloned().ok_or(ErrorImpl::StackUnderflow)?;
                self.stack.push(top);
            }
            Instruction::Pop => {
                self.pop()?;
            }
        }

        Ok(())
    }

    fn print<W: Write>(&mut self, count: usize, output: &mut W) -> Result<(), ErrorImpl> {
        if count > self.stack.len() {
            return Err(ErrorImpl::StackUnderflow);
        }

        // The last value pushed is the last one printed.
        let values = self.stack.split_off(self.stack.len() - count);
        let line: String = values.iter().map(|value| value.to_string()).collect();

        if self.debug {
            tracing::debug!(target: "stackc::vm", output = %line, "print");
        }

        writeln!(output, "{}", line).map_err(|error| ErrorImpl::OutputError {
            message: error.to_string(),
        })
    }

    fn arithmetic(&mut self, opcode: &str, tag: TypeTag, kind: ArithKind) -> Result<(), ErrorImpl> {
        let value = match tag {
            TypeTag::Int => {
                let right = self.pop_int(opcode)?;
                let left = self.pop_int(opcode)?;
                Value::Int(kind.apply_int(left, right)?)
            }
            TypeTag::Float => {
                let right = self.pop_float(opcode)?;
                let left = self.pop_float(opcode)?;
                Value::Float(kind.apply_float(left, right))
            }
            other => return Err(bad_tag(opcode, other)),
        };
        self.stack.push(value);
        Ok(())
    }

    fn compare(&mut self, opcode: &str, tag: TypeTag) -> Result<std::cmp::Ordering, ErrorImpl> {
        match tag {
            TypeTag::Int => {
                let right = self.pop_int(opcode)?;
                let left = self.pop_int(opcode)?;
                Ok(left.cmp(&right))
            }
            TypeTag::Float => {
                let right = self.pop_float(opcode)?;
                let left = self.pop_float(opcode)?;
                // NaN compares as neither less nor greater.
                Ok(left
                    .partial_cmp(&right)
                    .unwrap_or(std::cmp::Ordering::Equal))
            }
            other => Err(bad_tag(opcode, other)),
        }
    }

    fn equals(&mut self, tag: TypeTag) -> Result<bool, ErrorImpl> {
        match tag {
            TypeTag::Int => {
                let right = self.pop_int("eq")?;
                let left = self.pop_int("eq")?;
                Ok(left == right)
            }
            TypeTag::Float => {
                let right = self.pop_float("eq")?;
                let left = self.pop_float("eq")?;
                Ok(left == right)
            }
            TypeTag::Bool => {
                let right = self.pop_bool("eq")?;
                let left = self.pop_bool("eq")?;
                Ok(left == right)
            }
            TypeTag::String => {
                let right = self.pop_string("eq")?;
                let left = self.pop_string("eq")?;
                Ok(left == right)
            }
        }
    }

    fn target(&self, label: &str) -> Result<usize, ErrorImpl> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| ErrorImpl::UnresolvedLabel {
                label: label.to_string(),
            })
    }

    fn pop(&mut self) -> Result<Value, ErrorImpl> {
        self.stack.pop().ok_or(ErrorImpl::StackUnderflow)
    }

    fn pop_int(&mut self, opcode: &str) -> Result<i64, ErrorImpl> {
        let value = self.pop()?;
        value.as_int().ok_or_else(|| mismatch(opcode, "int", &value))
    }

    fn pop_float(&mut self, opcode: &str) -> Result<f64, ErrorImpl> {
        let value = self.pop()?;
        value
            .as_float()
            .ok_or_else(|| mismatch(opcode, "numeric", &value))
    }

    fn pop_bool(&mut self, opcode: &str) -> Result<bool, ErrorImpl> {
        let value = self.pop()?;
        value.as_bool().ok_or_else(|| mismatch(opcode, "bool", &value))
    }

    fn pop_string(&mut self, opcode: &str) -> Result<String, ErrorImpl> {
        match self.pop()? {
            Value::String(text) => Ok(text),
            other => Err(mismatch(opcode, "string", &other)),
        }
    }
}

/// Maps every label to its index, rejecting duplicates and dangling jumps.
fn resolve_labels(instructions: &[Instruction]) -> Result<HashMap<String, usize>, Error> {
    let mut labels = HashMap::new();

    for (index, instruction) in instructions.iter().enumerate() {
        if let Instruction::Label(label) = instruction {
            if labels.insert(label.clone(), index).is_some() {
                return Err(Error::new(
                    ErrorImpl::DuplicateLabel {
                        label: label.clone(),
                    },
                    Position(index, Rc::new(instruction.to_string())),
                ));
            }
        }
    }

    for (index, instruction) in instructions.iter().enumerate() {
        if let Some(label) = instruction.jump_target() {
            if !labels.contains_key(label) {
                return Err(Error::new(
                    ErrorImpl::UnresolvedLabel {
                        label: label.to_string(),
                    },
                    Position(index, Rc::new(instruction.to_string())),
                ));
            }
        }
    }

    tracing::trace!(count = labels.len(), "resolved labels");
    Ok(labels)
}

fn tag_name(tag: TypeTag) -> &'static str {
    match tag {
        TypeTag::Int => "int",
        TypeTag::Float => "float",
        TypeTag::Bool => "bool",
        TypeTag::String => "string",
    }
}

fn mismatch(opcode: &str, expected: &str, found: &Value) -> ErrorImpl {
    ErrorImpl::OperandTypeMismatch {
        instruction: opcode.to_string(),
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

fn bad_tag(opcode: &str, tag: TypeTag) -> ErrorImpl {
    ErrorImpl::MalformedInstruction {
        message: format!("{} does not accept type tag {}", opcode, tag),
    }
}
