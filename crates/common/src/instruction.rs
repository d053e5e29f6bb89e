//! Instruction records: opcode plus positional typed arguments.
//!
//! An instruction is consumed pre-parsed: the front end (or any other
//! producer) supplies the opcode, an order value, and typed arguments.

use crate::error::ProgramError;
use crate::opcode::Opcode;

/// Frame prefix of a variable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePrefix {
    /// Global frame, lives for the whole run.
    Gf,
    /// Temporary frame, absent until CREATEFRAME.
    Tf,
    /// Top of the local-frame stack.
    Lf,
}

impl FramePrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            FramePrefix::Gf => "GF",
            FramePrefix::Tf => "TF",
            FramePrefix::Lf => "LF",
        }
    }

    /// Parse a frame prefix. Only the exact uppercase forms are accepted.
    pub fn from_str(s: &str) -> Option<FramePrefix> {
        match s {
            "GF" => Some(FramePrefix::Gf),
            "TF" => Some(FramePrefix::Tf),
            "LF" => Some(FramePrefix::Lf),
            _ => None,
        }
    }
}

/// Type operand of READ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    Bool,
    Str,
    Nil,
}

impl DataType {
    /// Parse a type name as written in source (`int`, `bool`, `string`, `nil`).
    pub fn from_str(s: &str) -> Option<DataType> {
        match s {
            "int" => Some(DataType::Int),
            "bool" => Some(DataType::Bool),
            "string" => Some(DataType::Str),
            "nil" => Some(DataType::Nil),
            _ => None,
        }
    }
}

/// One positional argument of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Variable reference: frame prefix plus local name.
    Var { frame: FramePrefix, name: String },
    /// Integer literal.
    Int(i64),
    /// Boolean literal.
    Bool(bool),
    /// String literal, stored raw (escape sequences undecoded).
    Str(String),
    /// The nil literal.
    Nil,
    /// Label name operand.
    Label(String),
    /// Type name operand (READ).
    Type(DataType),
}

/// A single order-tagged instruction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// External sequencing key, positive and unique within a program.
    pub order: u32,
    /// Positional arguments, already collapsed to 0-based positions.
    pub args: Vec<Arg>,
}

impl Instruction {
    /// Create an instruction from positional arguments.
    pub fn new(opcode: Opcode, order: u32, args: Vec<Arg>) -> Self {
        Self {
            opcode,
            order,
            args,
        }
    }

    /// Create an instruction from explicitly numbered arguments.
    ///
    /// Ordinals must form a contiguous, duplicate-free 1..=N set; anything
    /// else is a structural error in the external representation.
    pub fn with_numbered_args(
        opcode: Opcode,
        order: u32,
        numbered: Vec<(u32, Arg)>,
    ) -> Result<Self, ProgramError> {
        let mut numbered = numbered;
        numbered.sort_by_key(|(ordinal, _)| *ordinal);

        let mut args = Vec::with_capacity(numbered.len());
        for (expected, (ordinal, arg)) in numbered.into_iter().enumerate() {
            let expected = expected as u32 + 1;
            if ordinal == expected {
                args.push(arg);
            } else if ordinal != 0 && ordinal < expected {
                return Err(ProgramError::DuplicateArgOrdinal {
                    opcode: opcode.mnemonic(),
                    ordinal,
                });
            } else {
                return Err(ProgramError::ArgOrdinalOutOfSequence {
                    opcode: opcode.mnemonic(),
                    ordinal,
                });
            }
        }

        Ok(Self {
            opcode,
            order,
            args,
        })
    }
}
