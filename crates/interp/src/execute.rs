//! The dispatch loop and the opcode handlers.
//!
//! Handlers never touch the instruction pointer. Each one returns a
//! [`NextAction`] and the loop alone applies it, so control-flow opcodes
//! carry no ad hoc pointer arithmetic.

use std::io::Write;

use crate::error::RuntimeError;
use crate::io::InputSource;
use crate::machine::{Interpreter, LabelTable};
use ipp_common::{Arg, DataType, Instruction, Opcode, Value};

/// What the loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Step to the next instruction.
    Advance,
    /// Set the instruction pointer to this 0-based position.
    JumpTo(usize),
    /// Stop execution with this process exit code.
    Halt(i32),
}

fn io_err(err: std::io::Error) -> RuntimeError {
    RuntimeError::Io(err.to_string())
}

/// Format a value the way WRITE emits it. String values get their decimal
/// escapes decoded here and nowhere else.
fn format_value(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Str(s) => decode_escapes(s),
        Value::Nil => String::new(),
        Value::NilBoxed => "nil".to_string(),
        Value::Uninit => String::new(),
    }
}

/// Decode `\ddd` decimal escapes (exactly three digits). Anything else
/// after a backslash is kept verbatim.
fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut digits = String::new();
        while digits.len() < 3 {
            match chars.peek() {
                Some(d) if d.is_ascii_digit() => {
                    digits.push(*d);
                    chars.next();
                }
                _ => break,
            }
        }
        let decoded = if digits.len() == 3 {
            digits.parse::<u32>().ok().and_then(char::from_u32)
        } else {
            None
        };
        match decoded {
            Some(c) => out.push(c),
            None => {
                out.push('\\');
                out.push_str(&digits);
            }
        }
    }
    out
}

/// EQ-style comparison. Nil on either side is well-defined: true only when
/// both sides are nil. Mismatched non-nil types are a type error.
fn values_equal(a: &Value, b: &Value) -> Result<bool, RuntimeError> {
    if a.is_nil() || b.is_nil() {
        return Ok(a.is_nil() && b.is_nil());
    }
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x == y),
        (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
        (Value::Str(x), Value::Str(y)) => Ok(x == y),
        _ => Err(RuntimeError::TypeMismatch {
            expected: "operands of equal type",
        }),
    }
}

impl<I, O, D> Interpreter<'_, I, O, D>
where
    I: InputSource,
    O: Write,
    D: Write,
{
    /// Run the program to completion.
    ///
    /// The label pre-pass runs first so forward jumps resolve. Returns the
    /// process exit code: 0 when the pointer runs past the end, the EXIT
    /// operand when EXIT executes.
    pub fn execute(&mut self) -> Result<i32, RuntimeError> {
        self.labels = LabelTable::build(self.program)?;
        let program = self.program;
        while self.pc < program.instructions.len() {
            let instr = &program.instructions[self.pc];
            self.executed += 1;
            match self.dispatch(instr)? {
                NextAction::Advance => self.pc += 1,
                NextAction::JumpTo(position) => self.pc = position,
                NextAction::Halt(code) => return Ok(code),
            }
        }
        Ok(0)
    }

    fn dispatch(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        match instr.opcode {
            // Frames and variables
            Opcode::Move => self.exec_move(instr),
            Opcode::CreateFrame => self.exec_createframe(instr),
            Opcode::PushFrame => self.exec_pushframe(instr),
            Opcode::PopFrame => self.exec_popframe(instr),
            Opcode::DefVar => self.exec_defvar(instr),
            Opcode::Call => self.exec_call(instr),
            Opcode::Return => self.exec_return(instr),

            // Data stack
            Opcode::Pushs => self.exec_pushs(instr),
            Opcode::Pops => self.exec_pops(instr),

            // Arithmetic, relational, boolean, conversion
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::IDiv => self.exec_arith(instr),
            Opcode::Lt | Opcode::Gt => self.exec_ordering(instr),
            Opcode::Eq => self.exec_eq(instr),
            Opcode::And | Opcode::Or => self.exec_bool_binary(instr),
            Opcode::Not => self.exec_not(instr),
            Opcode::Int2Char => self.exec_int2char(instr),
            Opcode::Stri2Int => self.exec_stri2int(instr),

            // Input / output
            Opcode::Read => self.exec_read(instr),
            Opcode::Write => self.exec_write(instr),

            // Strings
            Opcode::Concat => self.exec_concat(instr),
            Opcode::StrLen => self.exec_strlen(instr),
            Opcode::GetChar => self.exec_getchar(instr),
            Opcode::SetChar => self.exec_setchar(instr),

            // Types
            Opcode::Type => self.exec_type(instr),

            // Control flow
            Opcode::Label => self.exec_label(instr),
            Opcode::Jump => self.exec_jump(instr),
            Opcode::JumpIfEq | Opcode::JumpIfNeq => self.exec_jumpif(instr),
            Opcode::Exit => self.exec_exit(instr),

            // Debugging
            Opcode::DPrint => self.exec_dprint(instr),
            Opcode::Break => self.exec_break(instr),
        }
    }

    // ----- frames and variables -------------------------------------------

    fn exec_move(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 2)?;
        let (frame, name) = self.dest(instr)?;
        // Nil arriving from anything but the nil literal (a variable
        // holding nil) becomes the boxed-nil marker, so WRITE later emits
        // the literal text `nil` instead of nothing.
        let value = match (self.resolve_raw(instr, 1)?, instr.args.get(1)) {
            (Value::Nil, Some(Arg::Nil)) => Value::Nil,
            (Value::Nil, _) => Value::NilBoxed,
            (value, _) => value,
        };
        self.memory.write(frame, name, value)?;
        Ok(NextAction::Advance)
    }

    fn exec_createframe(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 0)?;
        self.memory.create_temp();
        Ok(NextAction::Advance)
    }

    fn exec_pushframe(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 0)?;
        self.memory.push_temp_to_local()?;
        Ok(NextAction::Advance)
    }

    fn exec_popframe(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 0)?;
        self.memory.pop_local_to_temp()?;
        Ok(NextAction::Advance)
    }

    fn exec_defvar(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 1)?;
        let (frame, name) = self.dest(instr)?;
        self.memory.declare(frame, name)?;
        Ok(NextAction::Advance)
    }

    fn exec_call(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 1)?;
        let target = self.labels.resolve(self.label_arg(instr, 0)?)?;
        self.call_stack.push(self.pc + 1);
        Ok(NextAction::JumpTo(target))
    }

    fn exec_return(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 0)?;
        let position = self
            .call_stack
            .pop()
            .ok_or(RuntimeError::EmptyCallStack)?;
        Ok(NextAction::JumpTo(position))
    }

    // ----- data stack -----------------------------------------------------

    fn exec_pushs(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 1)?;
        // Uninitialized travels through the stack untouched.
        let value = self.resolve_raw(instr, 0)?;
        self.data_stack.push(value);
        Ok(NextAction::Advance)
    }

    fn exec_pops(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 1)?;
        let (frame, name) = self.dest(instr)?;
        let value = self.pop_data()?;
        self.memory.write(frame, name, value)?;
        Ok(NextAction::Advance)
    }

    // ----- arithmetic, relational, boolean, conversion --------------------

    fn exec_arith(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 3)?;
        let (frame, name) = self.dest(instr)?;
        let a = self.expect_int(instr, 1)?;
        let b = self.expect_int(instr, 2)?;
        let result = match instr.opcode {
            Opcode::Add => a.wrapping_add(b),
            Opcode::Sub => a.wrapping_sub(b),
            Opcode::Mul => a.wrapping_mul(b),
            Opcode::IDiv => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                a.wrapping_div(b)
            }
            _ => unreachable!("non-arithmetic opcode routed to exec_arith"),
        };
        self.memory.write(frame, name, Value::Int(result))?;
        Ok(NextAction::Advance)
    }

    fn exec_ordering(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 3)?;
        let (frame, name) = self.dest(instr)?;
        let a = self.resolve_value(instr, 1)?;
        let b = self.resolve_value(instr, 2)?;
        if a.is_nil() || b.is_nil() {
            return Err(RuntimeError::NilMisuse {
                opcode: instr.opcode.mnemonic(),
            });
        }
        let less = match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => x < y,
            (Value::Bool(x), Value::Bool(y)) => x < y,
            (Value::Str(x), Value::Str(y)) => x < y,
            _ => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "operands of equal type",
                })
            }
        };
        let result = if instr.opcode == Opcode::Lt {
            less
        } else {
            // GT: strict greater-than is "less" with the operands flipped,
            // but equality must stay false for both.
            !less && a != b
        };
        self.memory.write(frame, name, Value::Bool(result))?;
        Ok(NextAction::Advance)
    }

    fn exec_eq(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 3)?;
        let (frame, name) = self.dest(instr)?;
        let a = self.resolve_raw(instr, 1)?;
        let b = self.resolve_raw(instr, 2)?;
        // Two uninitialized operands are equal; one against a concrete
        // value is a type mismatch.
        let result = match (&a, &b) {
            (Value::Uninit, Value::Uninit) => true,
            (Value::Uninit, _) | (_, Value::Uninit) => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "operands of equal type",
                })
            }
            _ => values_equal(&a, &b)?,
        };
        self.memory.write(frame, name, Value::Bool(result))?;
        Ok(NextAction::Advance)
    }

    fn exec_bool_binary(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 3)?;
        let (frame, name) = self.dest(instr)?;
        let a = self.expect_bool(instr, 1)?;
        let b = self.expect_bool(instr, 2)?;
        let result = if instr.opcode == Opcode::And {
            a && b
        } else {
            a || b
        };
        self.memory.write(frame, name, Value::Bool(result))?;
        Ok(NextAction::Advance)
    }

    fn exec_not(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 2)?;
        let (frame, name) = self.dest(instr)?;
        let value = self.expect_bool(instr, 1)?;
        self.memory.write(frame, name, Value::Bool(!value))?;
        Ok(NextAction::Advance)
    }

    fn exec_int2char(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 2)?;
        let (frame, name) = self.dest(instr)?;
        let code = self.expect_int(instr, 1)?;
        let c = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or(RuntimeError::InvalidCodePoint { value: code })?;
        self.memory.write(frame, name, Value::Str(c.to_string()))?;
        Ok(NextAction::Advance)
    }

    fn exec_stri2int(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 3)?;
        let (frame, name) = self.dest(instr)?;
        let s = self.expect_string(instr, 1)?;
        let index = self.expect_int(instr, 2)?;
        let c = char_at(&s, index)?;
        self.memory.write(frame, name, Value::Int(c as i64))?;
        Ok(NextAction::Advance)
    }

    // ----- input / output -------------------------------------------------

    fn exec_read(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 2)?;
        let (frame, name) = self.dest(instr)?;
        // End of input and unparsable input both degrade to nil. The nil
        // type stores nil directly without consuming a line.
        let value = match self.type_arg(instr, 1)? {
            DataType::Int => self.input.read_int(),
            DataType::Bool => self.input.read_bool(),
            DataType::Str => self.input.read_string(),
            DataType::Nil => Some(Value::Nil),
        }
        .unwrap_or(Value::Nil);
        self.memory.write(frame, name, value)?;
        Ok(NextAction::Advance)
    }

    fn exec_write(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 1)?;
        let value = self.resolve_value(instr, 0)?;
        write!(self.output, "{}", format_value(&value)).map_err(io_err)?;
        Ok(NextAction::Advance)
    }

    // ----- strings --------------------------------------------------------

    fn exec_concat(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 3)?;
        let (frame, name) = self.dest(instr)?;
        let mut a = self.expect_string(instr, 1)?;
        let b = self.expect_string(instr, 2)?;
        a.push_str(&b);
        self.memory.write(frame, name, Value::Str(a))?;
        Ok(NextAction::Advance)
    }

    fn exec_strlen(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 2)?;
        let (frame, name) = self.dest(instr)?;
        let s = self.expect_string(instr, 1)?;
        let length = s.chars().count() as i64;
        self.memory.write(frame, name, Value::Int(length))?;
        Ok(NextAction::Advance)
    }

    fn exec_getchar(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 3)?;
        let (frame, name) = self.dest(instr)?;
        let s = self.expect_string(instr, 1)?;
        let index = self.expect_int(instr, 2)?;
        let c = char_at(&s, index)?;
        self.memory.write(frame, name, Value::Str(c.to_string()))?;
        Ok(NextAction::Advance)
    }

    fn exec_setchar(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 3)?;
        let (frame, name) = self.dest(instr)?;
        // The destination must already hold a string; SETCHAR edits it.
        let current = match self.memory.read(frame, name)? {
            Value::Str(s) => s,
            _ => return Err(RuntimeError::SetCharTargetNotString),
        };
        let index = self.expect_int(instr, 1)?;
        let replacement = self.expect_string(instr, 2)?;
        let replacement_char = replacement
            .chars()
            .next()
            .ok_or(RuntimeError::EmptyReplacement)?;
        let length = current.chars().count();
        let position = usize::try_from(index)
            .ok()
            .filter(|&i| i < length)
            .ok_or(RuntimeError::IndexOutOfRange { index, length })?;
        let updated: String = current
            .chars()
            .enumerate()
            .map(|(i, c)| if i == position { replacement_char } else { c })
            .collect();
        self.memory.write(frame, name, Value::Str(updated))?;
        Ok(NextAction::Advance)
    }

    // ----- types ----------------------------------------------------------

    fn exec_type(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 2)?;
        let (frame, name) = self.dest(instr)?;
        // Uninitialized is legal here and yields the empty string.
        let type_name = self.resolve_raw(instr, 1)?.type_name();
        self.memory
            .write(frame, name, Value::Str(type_name.to_string()))?;
        Ok(NextAction::Advance)
    }

    // ----- control flow ---------------------------------------------------

    fn exec_label(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        // Registered by the pre-pass; a no-op at execution time.
        self.check_arity(instr, 1)?;
        Ok(NextAction::Advance)
    }

    fn exec_jump(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 1)?;
        let target = self.labels.resolve(self.label_arg(instr, 0)?)?;
        Ok(NextAction::JumpTo(target))
    }

    fn exec_jumpif(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 3)?;
        // The label must exist whether or not the branch is taken.
        let target = self.labels.resolve(self.label_arg(instr, 0)?)?;
        let a = self.resolve_raw(instr, 1)?;
        let b = self.resolve_raw(instr, 2)?;
        // An uninitialized operand never type-fails here; it compares
        // equal only to another uninitialized one.
        let equal = match (&a, &b) {
            (Value::Uninit, _) | (_, Value::Uninit) => a == b,
            _ => values_equal(&a, &b)?,
        };
        let taken = if instr.opcode == Opcode::JumpIfEq {
            equal
        } else {
            !equal
        };
        if taken {
            Ok(NextAction::JumpTo(target))
        } else {
            Ok(NextAction::Advance)
        }
    }

    fn exec_exit(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 1)?;
        let code = self.expect_int(instr, 0)?;
        if !(0..=9).contains(&code) {
            return Err(RuntimeError::ExitCodeOutOfRange { code });
        }
        Ok(NextAction::Halt(code as i32))
    }

    // ----- debugging ------------------------------------------------------

    fn exec_dprint(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 1)?;
        // Diagnostics show strings raw, without escape decoding.
        let text = match self.resolve_raw(instr, 0)? {
            Value::Str(s) => s,
            Value::Uninit => String::new(),
            other => format_value(&other),
        };
        writeln!(self.diag, "{text}").map_err(io_err)?;
        Ok(NextAction::Advance)
    }

    fn exec_break(&mut self, instr: &Instruction) -> Result<NextAction, RuntimeError> {
        self.check_arity(instr, 0)?;
        let (gf_vars, tf_vars, lf_depth) = self.memory.snapshot();
        writeln!(
            self.diag,
            "BREAK at position {} (order {}), {} instruction(s) executed",
            self.pc, instr.order, self.executed
        )
        .map_err(io_err)?;
        let tf = match tf_vars {
            Some(n) => format!("{n} variable(s)"),
            None => "absent".to_string(),
        };
        writeln!(
            self.diag,
            "GF: {} variable(s), TF: {}, LF stack depth: {}",
            gf_vars, tf, lf_depth
        )
        .map_err(io_err)?;
        writeln!(
            self.diag,
            "data stack: {}, call stack: {}",
            self.data_stack.len(),
            self.call_stack.len()
        )
        .map_err(io_err)?;
        Ok(NextAction::Advance)
    }
}

/// Character at a 0-based index, counting code points. Out-of-range
/// indices (including any index into the empty string) are fatal.
fn char_at(s: &str, index: i64) -> Result<char, RuntimeError> {
    let length = s.chars().count();
    usize::try_from(index)
        .ok()
        .filter(|&i| i < length)
        .and_then(|i| s.chars().nth(i))
        .ok_or(RuntimeError::IndexOutOfRange { index, length })
}
