//! Program representation: the order-sorted instruction list.

use crate::error::ProgramError;
use crate::instruction::Instruction;

/// An IPPcode24 program: instruction records sorted by their order values.
///
/// Construction validates the external sequencing contract (positive,
/// unique orders) so the engine can treat positions as plain 0-based
/// indices afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The instruction records, ascending by order.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Build a program from instruction records in any order.
    ///
    /// Records are sorted by their order value. A zero order or a duplicate
    /// order is a structural error.
    pub fn new(mut records: Vec<Instruction>) -> Result<Self, ProgramError> {
        records.sort_by_key(|r| r.order);

        let mut prev: Option<u32> = None;
        for record in &records {
            if record.order == 0 {
                return Err(ProgramError::OrderNotPositive);
            }
            if prev == Some(record.order) {
                return Err(ProgramError::DuplicateOrder(record.order));
            }
            prev = Some(record.order);
        }

        Ok(Self {
            instructions: records,
        })
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Arg;
    use crate::opcode::Opcode;

    fn record(opcode: Opcode, order: u32) -> Instruction {
        Instruction::new(opcode, order, vec![])
    }

    #[test]
    fn empty_program() {
        let program = Program::new(vec![]).unwrap();
        assert!(program.is_empty());
        assert_eq!(program.len(), 0);
    }

    #[test]
    fn sorts_by_order() {
        let program = Program::new(vec![
            record(Opcode::Break, 30),
            record(Opcode::CreateFrame, 10),
            record(Opcode::PushFrame, 20),
        ])
        .unwrap();
        assert_eq!(
            program
                .instructions
                .iter()
                .map(|i| i.opcode)
                .collect::<Vec<_>>(),
            vec![Opcode::CreateFrame, Opcode::PushFrame, Opcode::Break]
        );
    }

    #[test]
    fn orders_need_not_be_contiguous() {
        // 5, 17, 900 is fine; only positivity and uniqueness matter.
        let program = Program::new(vec![
            record(Opcode::CreateFrame, 5),
            record(Opcode::PushFrame, 17),
            record(Opcode::PopFrame, 900),
        ])
        .unwrap();
        assert_eq!(program.len(), 3);
    }

    #[test]
    fn rejects_zero_order() {
        let err = Program::new(vec![record(Opcode::CreateFrame, 0)]).unwrap_err();
        assert_eq!(err, ProgramError::OrderNotPositive);
    }

    #[test]
    fn rejects_duplicate_order() {
        let err = Program::new(vec![
            record(Opcode::CreateFrame, 3),
            record(Opcode::PushFrame, 3),
        ])
        .unwrap_err();
        assert_eq!(err, ProgramError::DuplicateOrder(3));
    }

    #[test]
    fn keeps_args_through_sorting() {
        let program = Program::new(vec![
            Instruction::new(Opcode::Write, 2, vec![Arg::Int(7)]),
            record(Opcode::CreateFrame, 1),
        ])
        .unwrap();
        assert_eq!(program.instructions[1].args, vec![Arg::Int(7)]);
    }
}
