//! IPPcode24 execution engine.
//!
//! Executes an order-sorted [`Program`](ipp_common::Program) against three
//! I/O collaborators: an [`InputSource`] for READ, an output sink for
//! WRITE, and a diagnostic sink for DPRINT/BREAK.
//!
//! ```no_run
//! use ipp_interp::{run, LineInput};
//! use ipp_common::Program;
//!
//! # fn demo(program: &Program) -> Result<(), ipp_interp::RuntimeError> {
//! let input = LineInput::new(std::io::stdin().lock());
//! let code = run(program, input, std::io::stdout(), std::io::stderr())?;
//! # let _ = code;
//! # Ok(())
//! # }
//! ```
//!
//! Every runtime failure is a [`RuntimeError`]; callers map it to the
//! documented process exit code through [`RuntimeError::exit_code`].

pub mod error;
pub mod execute;
pub mod io;
pub mod machine;
mod resolve;

pub use error::RuntimeError;
pub use execute::NextAction;
pub use io::{InputSource, LineInput};
pub use machine::{Frame, Interpreter, LabelTable, MemoryModel};

use std::io::Write;

use ipp_common::Program;

/// Execute a program to completion and return the process exit code.
pub fn run<I, O, D>(
    program: &Program,
    input: I,
    output: O,
    diag: D,
) -> Result<i32, RuntimeError>
where
    I: InputSource,
    O: Write,
    D: Write,
{
    Interpreter::new(program, input, output, diag).execute()
}
