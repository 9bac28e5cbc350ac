//! Instruction decoder

use crate::error::{DisassemblerError, Result};
use scrap_ir::{encoding, Instruction};

/// Decode a 64-bit instruction word
pub fn decode(word: u64) -> Result<Instruction> {
    encoding::decode(word).map_err(|e| DisassemblerError::from_ir(word, e))
}
