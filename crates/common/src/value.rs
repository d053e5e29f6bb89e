//! Runtime value representation for the IPPcode24 engine.
//!
//! Values are what live in variable frames and on the data stack.

/// Runtime value representation.
///
/// A variable holds at most one `Value` at a time; assignment overwrites,
/// nothing mutates in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Unicode string. Stored raw; decimal escapes are decoded only when
    /// the value is written to the output stream.
    Str(String),
    /// The nil literal (`nil@nil`).
    Nil,
    /// Nil that arrived through MOVE from a source whose declared type was
    /// not `nil`. Distinguished from [`Value::Nil`] only for WRITE
    /// formatting: plain nil prints nothing, boxed nil prints `nil`.
    NilBoxed,
    /// Declared but never assigned. Holding this is legal; consumers that
    /// need a concrete type reject it.
    Uninit,
}

impl Value {
    /// The textual type name TYPE stores for this value.
    ///
    /// An uninitialized variable yields the empty string; both nil forms
    /// yield `nil@nil`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Nil | Value::NilBoxed => "nil@nil",
            Value::Uninit => "",
        }
    }

    /// True for both nil forms.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil | Value::NilBoxed)
    }
}
