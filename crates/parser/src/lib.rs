//! IPPcode24 source-text front end.
//!
//! Turns `.IPPcode24` source into the order-tagged [`Program`] the
//! execution engine consumes. The grammar is line-oriented: a header line,
//! then one instruction per line, `#` comments, operands validated against
//! the per-opcode signature table in `ipp-common`.
//!
//! ```
//! use ipp_parser::parse;
//!
//! let program = parse(".IPPcode24\nDEFVAR GF@x\nMOVE GF@x int@5\n").unwrap();
//! assert_eq!(program.len(), 2);
//! ```
//!
//! Every failure is a [`ParseError`] and maps to process exit code 32.

pub mod error;

mod lexer;
mod parser;

pub use error::ParseError;

use ipp_common::Program;
use parser::parse_source;

/// Parse IPPcode24 source text into a program.
///
/// Returns the first error encountered.
pub fn parse(text: &str) -> Result<Program, ParseError> {
    let instructions = parse_source(text)?;
    Ok(Program::new(instructions)?)
}
