//! IPPcode24 common types.
//!
//! This crate provides the foundational data structures shared by the
//! front end and the execution engine:
//!
//! - [`Opcode`] — the fixed 35-opcode catalogue with mnemonics and
//!   per-opcode operand signatures
//! - [`Arg`], [`FramePrefix`], [`DataType`] — typed instruction arguments
//! - [`Instruction`] — an order-tagged instruction record
//! - [`Program`] — the order-sorted instruction list with sequencing
//!   validation
//! - [`Value`] — runtime value representation for frames and the data stack
//! - [`ProgramError`] — structural errors in the external representation
//!
//! The only dependency is `thiserror` (compile-time proc-macro).

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod value;

pub use error::ProgramError;
pub use instruction::{Arg, DataType, FramePrefix, Instruction};
pub use opcode::{Opcode, Operand, ALL_OPCODES};
pub use program::Program;
pub use value::Value;
