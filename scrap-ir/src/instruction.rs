//! SCRAP IR Instruction
//!
//! An instruction is an opcode plus exactly `arity(opcode)` operand slots.
//! Construction is the only way to obtain a value, and every constructor
//! checks the operand count against the opcode's arity, so a malformed
//! instruction cannot be observed.
//!
//! Slots past the arity are stored as zero and are not reachable through the
//! public API.

use crate::error::{IrError, Result};
use crate::opcode::{Arity, Opcode, OperandKind};
use crate::MAX_OPERANDS;
use serde::{Deserialize, Serialize};

/// Operand slot: value reference, pool index, branch target or literal,
/// depending on the opcode and position.
pub type Operand = u16;

/// SCRAP IR Instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub struct Instruction {
    op: Opcode,
    args: [Operand; MAX_OPERANDS],
}

impl Instruction {
    /// Build a zero-operand instruction.
    ///
    /// # Panics
    /// Panics if `op` does not have arity 0.
    pub fn nullary(op: Opcode) -> Self {
        Self::checked(op, Arity::Zero, [0, 0, 0])
    }

    /// Build a one-operand instruction.
    ///
    /// # Panics
    /// Panics if `op` does not have arity 1.
    pub fn unary(op: Opcode, a: Operand) -> Self {
        Self::checked(op, Arity::One, [a, 0, 0])
    }

    /// Build a two-operand instruction.
    ///
    /// # Panics
    /// Panics if `op` does not have arity 2.
    pub fn binary(op: Opcode, a: Operand, b: Operand) -> Self {
        Self::checked(op, Arity::Two, [a, b, 0])
    }

    /// Build a three-operand instruction.
    ///
    /// # Panics
    /// Panics if `op` does not have arity 3.
    pub fn ternary(op: Opcode, a: Operand, b: Operand, c: Operand) -> Self {
        Self::checked(op, Arity::Three, [a, b, c])
    }

    /// Build an instruction from a slice of operands, for input that has not
    /// been checked yet (parsed text, decoded words).
    pub fn try_new(op: Opcode, operands: &[Operand]) -> Result<Self> {
        let expected = op.arity().count();
        if operands.len() != expected {
            return Err(IrError::ArityMismatch {
                op,
                expected,
                found: operands.len(),
            });
        }

        let mut args = [0; MAX_OPERANDS];
        args[..expected].copy_from_slice(operands);
        Ok(Self { op, args })
    }

    fn checked(op: Opcode, arity: Arity, args: [Operand; MAX_OPERANDS]) -> Self {
        assert!(
            op.arity() == arity,
            "arity mismatch: {} takes {} operands, constructed with {}",
            op,
            op.arity(),
            arity
        );
        Self { op, args }
    }

    /// Opcode of this instruction
    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.op
    }

    /// Arity of the opcode
    #[inline]
    pub fn arity(&self) -> Arity {
        self.op.arity()
    }

    /// The meaningful operand slots, in order
    #[inline]
    pub fn operands(&self) -> &[Operand] {
        &self.args[..self.op.arity().count()]
    }

    /// Operand in `slot`, if the opcode uses that slot
    #[inline]
    pub fn operand(&self, slot: usize) -> Option<Operand> {
        self.operands().get(slot).copied()
    }

    /// Operands paired with their interpretation
    pub fn typed_operands(&self) -> impl Iterator<Item = (OperandKind, Operand)> + '_ {
        self.op
            .operand_kinds()
            .iter()
            .copied()
            .zip(self.operands().iter().copied())
    }

    /// Branch target index, for JUMP/JT/JF
    pub fn branch_target(&self) -> Option<Operand> {
        self.op
            .branch_target_slot()
            .and_then(|slot| self.operand(slot))
    }

    /// Replace the operand in `slot`, which must be below the arity.
    pub(crate) fn set_operand(&mut self, slot: usize, value: Operand) -> Result<()> {
        let arity = self.op.arity().count();
        if slot >= arity {
            return Err(IrError::UnusedSlot {
                op: self.op,
                slot,
                arity,
            });
        }
        self.args[slot] = value;
        Ok(())
    }

    /// All three slots including the zeroed tail, for the encoder
    #[inline]
    pub(crate) fn raw_slots(&self) -> [Operand; MAX_OPERANDS] {
        self.args
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.op.mnemonic())?;
        for (i, operand) in self.operands().iter().enumerate() {
            if i == 0 {
                write!(f, " {}", operand)?;
            } else {
                write!(f, ", {}", operand)?;
            }
        }
        Ok(())
    }
}
