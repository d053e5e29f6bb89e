//! Operand resolution: from instruction arguments to runtime values.
//!
//! Two resolution levels exist. `resolve_raw` yields whatever a symbol
//! holds, including an uninitialized slot; the `expect_*` helpers demand a
//! concrete type and reject everything else, uninitialized included.

use std::io::Write;

use crate::error::RuntimeError;
use crate::io::InputSource;
use crate::machine::Interpreter;
use ipp_common::{Arg, DataType, FramePrefix, Instruction, Value};

impl<I, O, D> Interpreter<'_, I, O, D>
where
    I: InputSource,
    O: Write,
    D: Write,
{
    /// Check that the instruction carries exactly `expected` arguments.
    pub(crate) fn check_arity(
        &self,
        instr: &Instruction,
        expected: usize,
    ) -> Result<(), RuntimeError> {
        if instr.args.len() == expected {
            Ok(())
        } else {
            Err(RuntimeError::BadArity {
                opcode: instr.opcode.mnemonic(),
                expected,
                got: instr.args.len(),
            })
        }
    }

    /// The destination variable of a storing opcode.
    pub(crate) fn dest<'a>(
        &self,
        instr: &'a Instruction,
    ) -> Result<(FramePrefix, &'a str), RuntimeError> {
        match instr.args.first() {
            Some(Arg::Var { frame, name }) => Ok((*frame, name)),
            _ => Err(RuntimeError::NotAVariable {
                opcode: instr.opcode.mnemonic(),
            }),
        }
    }

    /// The label name at argument position `index`.
    pub(crate) fn label_arg<'a>(
        &self,
        instr: &'a Instruction,
        index: usize,
    ) -> Result<&'a str, RuntimeError> {
        match instr.args.get(index) {
            Some(Arg::Label(name)) => Ok(name),
            _ => Err(RuntimeError::MalformedOperand {
                opcode: instr.opcode.mnemonic(),
            }),
        }
    }

    /// The type name operand of READ.
    pub(crate) fn type_arg(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<DataType, RuntimeError> {
        match instr.args.get(index) {
            Some(Arg::Type(ty)) => Ok(*ty),
            _ => Err(RuntimeError::MalformedOperand {
                opcode: instr.opcode.mnemonic(),
            }),
        }
    }

    /// Resolve a symbol operand to whatever it holds: literals are taken
    /// as-is, variable references go through the frame lookup. An
    /// uninitialized variable resolves to [`Value::Uninit`] here.
    pub(crate) fn resolve_raw(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<Value, RuntimeError> {
        match instr.args.get(index) {
            Some(Arg::Var { frame, name }) => self.memory.read(*frame, name),
            Some(Arg::Int(n)) => Ok(Value::Int(*n)),
            Some(Arg::Bool(b)) => Ok(Value::Bool(*b)),
            Some(Arg::Str(s)) => Ok(Value::Str(s.clone())),
            Some(Arg::Nil) => Ok(Value::Nil),
            Some(Arg::Label(_)) | Some(Arg::Type(_)) | None => {
                Err(RuntimeError::MalformedOperand {
                    opcode: instr.opcode.mnemonic(),
                })
            }
        }
    }

    /// Resolve a symbol that must carry a concrete value of any type.
    /// An uninitialized variable is a missing-value error here, not a
    /// type mismatch.
    pub(crate) fn resolve_value(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<Value, RuntimeError> {
        match self.resolve_raw(instr, index)? {
            Value::Uninit => Err(RuntimeError::MissingValue),
            value => Ok(value),
        }
    }

    /// Resolve a symbol that must be an int.
    pub(crate) fn expect_int(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<i64, RuntimeError> {
        match self.resolve_raw(instr, index)? {
            Value::Int(n) => Ok(n),
            _ => Err(RuntimeError::TypeMismatch { expected: "int" }),
        }
    }

    /// Resolve a symbol that must be a bool.
    pub(crate) fn expect_bool(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<bool, RuntimeError> {
        match self.resolve_raw(instr, index)? {
            Value::Bool(b) => Ok(b),
            _ => Err(RuntimeError::TypeMismatch { expected: "bool" }),
        }
    }

    /// Resolve a symbol that must be a string.
    pub(crate) fn expect_string(
        &self,
        instr: &Instruction,
        index: usize,
    ) -> Result<String, RuntimeError> {
        match self.resolve_raw(instr, index)? {
            Value::Str(s) => Ok(s),
            _ => Err(RuntimeError::TypeMismatch { expected: "string" }),
        }
    }
}
