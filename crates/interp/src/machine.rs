//! Engine state: variable frames, label table, data and call stacks.

use std::collections::HashMap;
use std::io::Write;

use crate::error::RuntimeError;
use crate::io::InputSource;
use ipp_common::{Arg, FramePrefix, Opcode, Program, Value};

/// A scope holding declared variables.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    vars: HashMap<String, Value>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable with no value yet.
    pub fn declare(&mut self, name: &str) -> Result<(), RuntimeError> {
        if self.vars.contains_key(name) {
            return Err(RuntimeError::VariableRedefined { name: name.into() });
        }
        self.vars.insert(name.into(), Value::Uninit);
        Ok(())
    }

    /// Current value of a declared variable. Uninitialized is a legal
    /// result here; consumers that need a concrete type reject it later.
    pub fn read(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.vars
            .get(name)
            .ok_or_else(|| RuntimeError::UndeclaredVariable { name: name.into() })
    }

    /// Overwrite a declared variable. Never declares implicitly.
    pub fn write(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::UndeclaredVariable { name: name.into() }),
        }
    }

    /// Number of declared variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Owns the global frame, the optional temporary frame, and the
/// local-frame stack. All variable access funnels through here.
#[derive(Debug, Default)]
pub struct MemoryModel {
    gf: Frame,
    tf: Option<Frame>,
    lf_stack: Vec<Frame>,
}

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// CREATEFRAME: always a fresh, empty TF; prior contents are discarded.
    pub fn create_temp(&mut self) {
        self.tf = Some(Frame::new());
    }

    /// PUSHFRAME: move TF onto the local stack; TF becomes absent.
    pub fn push_temp_to_local(&mut self) -> Result<(), RuntimeError> {
        let tf = self
            .tf
            .take()
            .ok_or(RuntimeError::MissingFrame { prefix: "TF" })?;
        self.lf_stack.push(tf);
        Ok(())
    }

    /// POPFRAME: pop the top LF into TF, replacing whatever TF held.
    pub fn pop_local_to_temp(&mut self) -> Result<(), RuntimeError> {
        let lf = self
            .lf_stack
            .pop()
            .ok_or(RuntimeError::MissingFrame { prefix: "LF" })?;
        self.tf = Some(lf);
        Ok(())
    }

    /// Resolve a frame prefix to its frame.
    pub fn frame(&self, prefix: FramePrefix) -> Result<&Frame, RuntimeError> {
        match prefix {
            FramePrefix::Gf => Ok(&self.gf),
            FramePrefix::Tf => self
                .tf
                .as_ref()
                .ok_or(RuntimeError::MissingFrame { prefix: "TF" }),
            FramePrefix::Lf => self
                .lf_stack
                .last()
                .ok_or(RuntimeError::MissingFrame { prefix: "LF" }),
        }
    }

    fn frame_mut(&mut self, prefix: FramePrefix) -> Result<&mut Frame, RuntimeError> {
        match prefix {
            FramePrefix::Gf => Ok(&mut self.gf),
            FramePrefix::Tf => self
                .tf
                .as_mut()
                .ok_or(RuntimeError::MissingFrame { prefix: "TF" }),
            FramePrefix::Lf => self
                .lf_stack
                .last_mut()
                .ok_or(RuntimeError::MissingFrame { prefix: "LF" }),
        }
    }

    pub fn declare(&mut self, prefix: FramePrefix, name: &str) -> Result<(), RuntimeError> {
        self.frame_mut(prefix)?.declare(name)
    }

    pub fn read(&self, prefix: FramePrefix, name: &str) -> Result<Value, RuntimeError> {
        self.frame(prefix)?.read(name).cloned()
    }

    pub fn write(
        &mut self,
        prefix: FramePrefix,
        name: &str,
        value: Value,
    ) -> Result<(), RuntimeError> {
        self.frame_mut(prefix)?.write(name, value)
    }

    /// Frame occupancy for the BREAK snapshot.
    pub fn snapshot(&self) -> (usize, Option<usize>, usize) {
        (
            self.gf.len(),
            self.tf.as_ref().map(Frame::len),
            self.lf_stack.len(),
        )
    }
}

/// Maps label names to 0-based instruction positions.
///
/// Built by a single forward pass before execution, immutable afterwards;
/// forward and backward jumps both resolve regardless of declaration order.
#[derive(Debug, Default)]
pub struct LabelTable {
    labels: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-pass over the sorted instruction list registering every LABEL.
    pub fn build(program: &Program) -> Result<Self, RuntimeError> {
        let mut table = Self::new();
        for (position, instr) in program.instructions.iter().enumerate() {
            if instr.opcode == Opcode::Label {
                match instr.args.first() {
                    Some(Arg::Label(name)) => table.register(name, position)?,
                    _ => {
                        return Err(RuntimeError::MalformedOperand {
                            opcode: Opcode::Label.mnemonic(),
                        })
                    }
                }
            }
        }
        Ok(table)
    }

    pub fn register(&mut self, name: &str, position: usize) -> Result<(), RuntimeError> {
        if self.labels.contains_key(name) {
            return Err(RuntimeError::LabelRedefined { name: name.into() });
        }
        self.labels.insert(name.into(), position);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<usize, RuntimeError> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeError::LabelNotFound { name: name.into() })
    }
}

/// The IPPcode24 interpreter.
///
/// Owns all mutable execution state exclusively; interpreting two programs
/// concurrently requires two independent instances.
pub struct Interpreter<'p, I, O, D> {
    /// The program being executed.
    pub(crate) program: &'p Program,
    /// Variable frames.
    pub(crate) memory: MemoryModel,
    /// Label table, populated by the pre-pass in `execute`.
    pub(crate) labels: LabelTable,
    /// Data stack for PUSHS/POPS.
    pub(crate) data_stack: Vec<Value>,
    /// Saved instruction positions for CALL/RETURN.
    pub(crate) call_stack: Vec<usize>,
    /// Instruction pointer (0-based index into the sorted list).
    pub(crate) pc: usize,
    /// Count of instructions executed so far (BREAK snapshot).
    pub(crate) executed: u64,
    /// READ collaborator.
    pub(crate) input: I,
    /// WRITE sink.
    pub(crate) output: O,
    /// DPRINT/BREAK diagnostic sink.
    pub(crate) diag: D,
}

impl<'p, I, O, D> Interpreter<'p, I, O, D>
where
    I: InputSource,
    O: Write,
    D: Write,
{
    /// Create an interpreter for the given program and I/O collaborators.
    pub fn new(program: &'p Program, input: I, output: O, diag: D) -> Self {
        Self {
            program,
            memory: MemoryModel::new(),
            labels: LabelTable::new(),
            data_stack: Vec::new(),
            call_stack: Vec::new(),
            pc: 0,
            executed: 0,
            input,
            output,
            diag,
        }
    }

    /// Pop the data stack.
    pub(crate) fn pop_data(&mut self) -> Result<Value, RuntimeError> {
        self.data_stack.pop().ok_or(RuntimeError::EmptyDataStack)
    }
}
