//! Opcode catalogue for the IPPcode24 instruction set.

/// Operand shape expected at each argument position of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// A variable reference (`GF@x`, `LF@x`, `TF@x`).
    Var,
    /// A symbol: a variable reference or a typed literal.
    Symb,
    /// A label name.
    Label,
    /// A type name (`int`, `bool`, `string`, `nil`).
    Type,
}

/// Identifies the operation an instruction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and variables
    Move,
    CreateFrame,
    PushFrame,
    PopFrame,
    DefVar,
    Call,
    Return,

    // Data stack
    Pushs,
    Pops,

    // Arithmetic, relational, boolean, conversion
    Add,
    Sub,
    Mul,
    IDiv,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,
    Int2Char,
    Stri2Int,

    // Input / output
    Read,
    Write,

    // Strings
    Concat,
    StrLen,
    GetChar,
    SetChar,

    // Types
    Type,

    // Control flow
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    Exit,

    // Debugging
    DPrint,
    Break,
}

/// All valid opcodes, in catalogue order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 35] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Call,
    Opcode::Return,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::IDiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::StrLen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::Exit,
    Opcode::DPrint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the source mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::IDiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::StrLen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::Exit => "EXIT",
            Opcode::DPrint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Look up an opcode by its mnemonic. Expects the uppercase form.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
    }

    /// The operand shapes this opcode takes, in positional order.
    ///
    /// Handlers re-check arity and destination shape at execution time;
    /// this table is the front end's source of truth.
    pub fn signature(&self) -> &'static [Operand] {
        use Operand::{Label, Symb, Type, Var};
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],

            Opcode::DefVar | Opcode::Pops => &[Var],

            Opcode::Call | Opcode::Label | Opcode::Jump => &[Label],

            Opcode::Pushs | Opcode::Write | Opcode::Exit | Opcode::DPrint => &[Symb],

            Opcode::Move
            | Opcode::Not
            | Opcode::Int2Char
            | Opcode::StrLen
            | Opcode::Type => &[Var, Symb],

            Opcode::Read => &[Var, Type],

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::IDiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar => &[Var, Symb, Symb],

            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[Label, Symb, Symb],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_opcodes_count() {
        assert_eq!(ALL_OPCODES.len(), 35);
    }

    #[test]
    fn mnemonic_roundtrip() {
        for &opcode in &ALL_OPCODES {
            let m = opcode.mnemonic();
            assert!(!m.is_empty(), "empty mnemonic for {opcode:?}");
            assert_eq!(m, m.to_uppercase(), "mnemonic should be uppercase: {m}");
            assert_eq!(Opcode::from_mnemonic(m), Some(opcode));
        }
    }

    #[test]
    fn unknown_mnemonic() {
        assert_eq!(Opcode::from_mnemonic("FROBNICATE"), None);
        // Lookup is exact; lowercase forms must be uppercased by the caller.
        assert_eq!(Opcode::from_mnemonic("move"), None);
    }

    #[test]
    fn signature_arity_spot_checks() {
        assert_eq!(Opcode::CreateFrame.signature().len(), 0);
        assert_eq!(Opcode::DefVar.signature(), &[Operand::Var]);
        assert_eq!(Opcode::Move.signature(), &[Operand::Var, Operand::Symb]);
        assert_eq!(Opcode::Read.signature(), &[Operand::Var, Operand::Type]);
        assert_eq!(
            Opcode::JumpIfEq.signature(),
            &[Operand::Label, Operand::Symb, Operand::Symb]
        );
        assert_eq!(
            Opcode::Add.signature(),
            &[Operand::Var, Operand::Symb, Operand::Symb]
        );
    }

    #[test]
    fn write_side_opcodes_start_with_var() {
        // Every opcode that stores a result declares Var at position 0.
        for op in [
            Opcode::Move,
            Opcode::DefVar,
            Opcode::Pops,
            Opcode::Add,
            Opcode::Sub,
            Opcode::Mul,
            Opcode::IDiv,
            Opcode::Lt,
            Opcode::Gt,
            Opcode::Eq,
            Opcode::And,
            Opcode::Or,
            Opcode::Not,
            Opcode::Int2Char,
            Opcode::Stri2Int,
            Opcode::Read,
            Opcode::Concat,
            Opcode::StrLen,
            Opcode::GetChar,
            Opcode::SetChar,
            Opcode::Type,
        ] {
            assert_eq!(op.signature()[0], Operand::Var, "{op:?}");
        }
    }
}
