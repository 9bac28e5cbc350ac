//! # Error Types for SCRAP IR

use crate::opcode::Opcode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IrError {
    // Instruction construction errors
    #[error("Arity mismatch for {op}: expected {expected} operands, found {found}")]
    ArityMismatch {
        op: Opcode,
        expected: usize,
        found: usize,
    },

    #[error("Operand slot {slot} is not used by {op} (arity {arity})")]
    UnusedSlot { op: Opcode, slot: usize, arity: usize },

    // Encoding errors
    #[error("Invalid opcode: {0:#04x}")]
    UnknownOpcode(u8),

    #[error("Unknown mnemonic: {0}")]
    UnknownMnemonic(String),

    #[error("Invalid instruction encoding: {0:#018x}")]
    InvalidEncoding(u64),

    // Container errors
    #[error("Instruction index {index} out of range (stream length {len})")]
    InstructionOutOfRange { index: usize, len: usize },
}

impl IrError {
    /// Check if this error reports a front-end defect rather than bad input
    pub fn is_front_end_defect(&self) -> bool {
        matches!(
            self,
            IrError::ArityMismatch { .. }
                | IrError::UnusedSlot { .. }
                | IrError::InstructionOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IrError>;
