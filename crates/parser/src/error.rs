//! Error types for the IPPcode24 source-text front end.

use ipp_common::ProgramError;
use thiserror::Error;

/// Errors produced while parsing IPPcode24 source text.
///
/// Every variant is a malformed-program error: exit code 32.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The `.IPPcode24` header line is missing or misspelled.
    #[error("missing .IPPcode24 header")]
    MissingHeader,

    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An instruction had the wrong number of operands.
    #[error("line {line}: {opcode} expects {expected} operand(s), got {got}")]
    WrongArity {
        line: usize,
        opcode: &'static str,
        expected: usize,
        got: usize,
    },

    /// An operand did not have the shape its position requires.
    #[error("line {line}: {opcode}: bad operand '{token}'")]
    BadOperand {
        line: usize,
        opcode: &'static str,
        token: String,
    },

    /// An integer literal could not be parsed or is out of range.
    #[error("line {line}: invalid integer literal '{token}'")]
    BadIntLiteral { line: usize, token: String },

    /// The parsed records violate the program-structure contract.
    #[error(transparent)]
    Structure(#[from] ProgramError),
}

impl ParseError {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(
            ParseError::MissingHeader.to_string(),
            "missing .IPPcode24 header"
        );
        assert_eq!(
            ParseError::UnknownOpcode {
                line: 3,
                token: "FROB".into()
            }
            .to_string(),
            "line 3: unknown opcode 'FROB'"
        );
        assert_eq!(
            ParseError::WrongArity {
                line: 2,
                opcode: "MOVE",
                expected: 2,
                got: 1
            }
            .to_string(),
            "line 2: MOVE expects 2 operand(s), got 1"
        );
    }

    #[test]
    fn every_variant_maps_to_32() {
        let variants = [
            ParseError::MissingHeader,
            ParseError::UnknownOpcode {
                line: 1,
                token: "X".into(),
            },
            ParseError::BadIntLiteral {
                line: 1,
                token: "int@z".into(),
            },
            ParseError::Structure(ProgramError::OrderNotPositive),
        ];
        for v in variants {
            assert_eq!(v.exit_code(), 32);
        }
    }
}
