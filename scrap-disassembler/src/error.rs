//! Disassembler errors

use scrap_ir::IrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisassemblerError {
    #[error("Invalid instruction encoding: 0x{0:016X}")]
    InvalidEncoding(u64),

    #[error("Unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl DisassemblerError {
    /// Classify a decode failure for `word`
    pub(crate) fn from_ir(word: u64, err: IrError) -> Self {
        match err {
            IrError::UnknownOpcode(byte) => DisassemblerError::UnknownOpcode(byte),
            _ => DisassemblerError::InvalidEncoding(word),
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
