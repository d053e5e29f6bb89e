//! Runtime errors for the IPPcode24 engine.
//!
//! Every precondition violation is fatal: the error travels up to one
//! top-level point that maps it to the documented process exit code via
//! [`RuntimeError::exit_code`]. Handlers validate before mutating, so a
//! failing instruction performs no partial writes.

use thiserror::Error;

/// Errors that occur while executing a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An instruction carried the wrong number of arguments.
    #[error("{opcode} expects {expected} argument(s), got {got}")]
    BadArity {
        opcode: &'static str,
        expected: usize,
        got: usize,
    },

    /// An operand had a kind the opcode cannot use at that position
    /// (for example a label where a value is required).
    #[error("{opcode}: malformed operand")]
    MalformedOperand { opcode: &'static str },

    /// The destination argument of a storing opcode was not a variable.
    #[error("{opcode} expects a variable as the first argument")]
    NotAVariable { opcode: &'static str },

    /// LABEL tried to register a name that is already taken.
    #[error("label '{name}' already defined")]
    LabelRedefined { name: String },

    /// A jump or call targeted a label that does not exist.
    #[error("label '{name}' not found")]
    LabelNotFound { name: String },

    /// DEFVAR on a name already declared in its frame.
    #[error("variable '{name}' already defined")]
    VariableRedefined { name: String },

    /// An operand did not resolve to the type the opcode requires. Also
    /// raised when the operand is a declared but uninitialized variable.
    #[error("operand cannot be resolved to {expected}")]
    TypeMismatch { expected: &'static str },

    /// LT or GT applied to a nil operand.
    #[error("{opcode} cannot be applied to nil")]
    NilMisuse { opcode: &'static str },

    /// Access to a variable never declared in the addressed frame.
    #[error("variable '{name}' not declared")]
    UndeclaredVariable { name: String },

    /// TF accessed while absent, or LF while the local stack is empty.
    #[error("frame {prefix} is not available")]
    MissingFrame { prefix: &'static str },

    /// POPS on an empty data stack.
    #[error("pop from an empty data stack")]
    EmptyDataStack,

    /// RETURN with an empty call stack.
    #[error("return with an empty call stack")]
    EmptyCallStack,

    /// A concrete value was required but the variable is uninitialized.
    #[error("missing value")]
    MissingValue,

    /// IDIV with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// EXIT code outside 0..=9.
    #[error("exit code {code} out of range 0-9")]
    ExitCodeOutOfRange { code: i64 },

    /// String index outside `[0, length)`.
    #[error("index {index} out of bounds (length {length})")]
    IndexOutOfRange { index: i64, length: usize },

    /// INT2CHAR operand outside the Unicode scalar range.
    #[error("value {value} is not a valid Unicode code point")]
    InvalidCodePoint { value: i64 },

    /// SETCHAR destination variable does not hold a string.
    #[error("SETCHAR destination does not hold a string")]
    SetCharTargetNotString,

    /// SETCHAR replacement string is empty.
    #[error("SETCHAR replacement string is empty")]
    EmptyReplacement,

    /// Output stream failure. Outside the program-error taxonomy; callers
    /// treat it like any other I/O problem (exit code 1).
    #[error("output stream failure: {0}")]
    Io(String),
}

impl RuntimeError {
    /// The process exit code documented for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            RuntimeError::BadArity { .. } | RuntimeError::MalformedOperand { .. } => 32,
            RuntimeError::NotAVariable { .. }
            | RuntimeError::LabelRedefined { .. }
            | RuntimeError::LabelNotFound { .. }
            | RuntimeError::VariableRedefined { .. } => 52,
            RuntimeError::TypeMismatch { .. } | RuntimeError::NilMisuse { .. } => 53,
            RuntimeError::UndeclaredVariable { .. } => 54,
            RuntimeError::MissingFrame { .. } => 55,
            RuntimeError::EmptyDataStack
            | RuntimeError::EmptyCallStack
            | RuntimeError::MissingValue => 56,
            RuntimeError::DivisionByZero | RuntimeError::ExitCodeOutOfRange { .. } => 57,
            RuntimeError::IndexOutOfRange { .. }
            | RuntimeError::InvalidCodePoint { .. }
            | RuntimeError::SetCharTargetNotString
            | RuntimeError::EmptyReplacement => 58,
            RuntimeError::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::BadArity {
                opcode: "MOVE",
                expected: 2,
                got: 1
            }
            .to_string(),
            "MOVE expects 2 argument(s), got 1"
        );
        assert_eq!(
            RuntimeError::LabelNotFound {
                name: "loop".into()
            }
            .to_string(),
            "label 'loop' not found"
        );
        assert_eq!(RuntimeError::DivisionByZero.to_string(), "division by zero");
    }

    #[test]
    fn exit_code_taxonomy() {
        assert_eq!(
            RuntimeError::BadArity {
                opcode: "ADD",
                expected: 3,
                got: 2
            }
            .exit_code(),
            32
        );
        assert_eq!(
            RuntimeError::LabelNotFound { name: "x".into() }.exit_code(),
            52
        );
        assert_eq!(
            RuntimeError::TypeMismatch { expected: "int" }.exit_code(),
            53
        );
        assert_eq!(
            RuntimeError::UndeclaredVariable { name: "v".into() }.exit_code(),
            54
        );
        assert_eq!(RuntimeError::MissingFrame { prefix: "TF" }.exit_code(), 55);
        assert_eq!(RuntimeError::EmptyDataStack.exit_code(), 56);
        assert_eq!(RuntimeError::DivisionByZero.exit_code(), 57);
        assert_eq!(
            RuntimeError::IndexOutOfRange {
                index: 9,
                length: 3
            }
            .exit_code(),
            58
        );
    }
}
