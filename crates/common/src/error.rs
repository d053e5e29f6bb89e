//! Structural errors in externally supplied instruction records.

use thiserror::Error;

/// Violations of the instruction-record contract: order values and
/// argument ordinals supplied by the external representation.
///
/// All of these are malformed-program errors and map to exit code 32.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// An instruction order value was zero or otherwise not positive.
    #[error("instruction order must be a positive integer")]
    OrderNotPositive,

    /// Two instructions carried the same order value.
    #[error("duplicate instruction order {0}")]
    DuplicateOrder(u32),

    /// Argument ordinals have a gap or start past 1.
    #[error("{opcode}: argument ordinal {ordinal} out of sequence")]
    ArgOrdinalOutOfSequence { opcode: &'static str, ordinal: u32 },

    /// The same argument ordinal appeared twice.
    #[error("{opcode}: duplicate argument ordinal {ordinal}")]
    DuplicateArgOrdinal { opcode: &'static str, ordinal: u32 },
}

impl ProgramError {
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
            ProgramError::DuplicateOrder(4).to_string(),
            "duplicate instruction order 4"
        );
        assert_eq!(
            ProgramError::ArgOrdinalOutOfSequence {
                opcode: "MOVE",
                ordinal: 3
            }
            .to_string(),
            "MOVE: argument ordinal 3 out of sequence"
        );
    }

    #[test]
    fn every_variant_maps_to_32() {
        let variants = [
            ProgramError::OrderNotPositive,
            ProgramError::DuplicateOrder(1),
            ProgramError::ArgOrdinalOutOfSequence {
                opcode: "MOVE",
                ordinal: 2,
            },
            ProgramError::DuplicateArgOrdinal {
                opcode: "MOVE",
                ordinal: 1,
            },
        ];
        for v in variants {
            assert_eq!(v.exit_code(), 32);
        }
    }
}
