//! # Instruction Encoding Constants and Helpers
//!
//! Every instruction occupies one fixed-width 64-bit word.
//!
//! ## Word Format
//!
//! ```text
//! [opcode:8][arg0:16][arg1:16][arg2:16][reserved:8]
//!  bit 0                                      bit 63
//! ```
//!
//! Slots past the opcode's arity and the reserved byte are always zero;
//! [`decode`] rejects words where they are not.

use crate::error::{IrError, Result};
use crate::function::Function;
use crate::instruction::{Instruction, Operand};
use crate::opcode::Opcode;
use crate::MAX_OPERANDS;

// ============================================================================
// Bit Position Constants
// ============================================================================

/// Opcode field: bits 0-7
pub const OPCODE_SHIFT: u32 = 0;

/// First operand slot: bits 8-23
pub const ARG0_SHIFT: u32 = 8;

/// Second operand slot: bits 24-39
pub const ARG1_SHIFT: u32 = 24;

/// Third operand slot: bits 40-55
pub const ARG2_SHIFT: u32 = 40;

/// Reserved field: bits 56-63
pub const RESERVED_SHIFT: u32 = 56;

/// Operand slot shifts, indexed by slot
pub const ARG_SHIFTS: [u32; MAX_OPERANDS] = [ARG0_SHIFT, ARG1_SHIFT, ARG2_SHIFT];

// ============================================================================
// Field Masks
// ============================================================================

/// Opcode mask (8 bits)
pub const OPCODE_MASK: u64 = 0xFF;

/// Operand slot mask (16 bits)
pub const ARG_MASK: u64 = 0xFFFF;

/// Reserved field mask (8 bits)
pub const RESERVED_MASK: u64 = 0xFF;

// ============================================================================
// Field Extraction Functions
// ============================================================================

/// Extract raw opcode byte (bits 0-7)
#[inline]
pub const fn extract_opcode(word: u64) -> u8 {
    ((word >> OPCODE_SHIFT) & OPCODE_MASK) as u8
}

/// Extract operand slot 0, 1 or 2
///
/// # Panics
/// Panics if `slot` is not below [`MAX_OPERANDS`].
#[inline]
pub const fn extract_arg(word: u64, slot: usize) -> Operand {
    ((word >> ARG_SHIFTS[slot]) & ARG_MASK) as Operand
}

/// Extract reserved byte (bits 56-63)
#[inline]
pub const fn extract_reserved(word: u64) -> u8 {
    ((word >> RESERVED_SHIFT) & RESERVED_MASK) as u8
}

// ============================================================================
// Encoding / Decoding
// ============================================================================

/// Pack raw fields into a word
#[inline]
pub const fn pack(opcode: Opcode, args: [Operand; MAX_OPERANDS]) -> u64 {
    ((opcode.to_u8() as u64) << OPCODE_SHIFT)
        | ((args[0] as u64) << ARG0_SHIFT)
        | ((args[1] as u64) << ARG1_SHIFT)
        | ((args[2] as u64) << ARG2_SHIFT)
}

/// Encode an instruction as a 64-bit word
#[inline]
pub fn encode(instr: &Instruction) -> u64 {
    pack(instr.opcode(), instr.raw_slots())
}

/// Decode a 64-bit word
pub fn decode(word: u64) -> Result<Instruction> {
    let opcode = Opcode::try_from(extract_opcode(word))?;

    if extract_reserved(word) != 0 {
        return Err(IrError::InvalidEncoding(word));
    }

    let arity = opcode.arity().count();
    if (arity..MAX_OPERANDS).any(|slot| extract_arg(word, slot) != 0) {
        return Err(IrError::InvalidEncoding(word));
    }

    let mut args = [0; MAX_OPERANDS];
    for (slot, arg) in args.iter_mut().enumerate().take(arity) {
        *arg = extract_arg(word, slot);
    }
    Instruction::try_new(opcode, &args[..arity])
}

/// Encode a function's instruction stream
pub fn encode_text(function: &Function) -> Vec<u64> {
    function.text().iter().map(encode).collect()
}

/// Decode an instruction stream, stopping at the first bad word
pub fn decode_text(words: &[u64]) -> Result<Vec<Instruction>> {
    words.iter().map(|&word| decode(word)).collect()
}

impl From<Instruction> for u64 {
    fn from(instr: Instruction) -> Self {
        encode(&instr)
    }
}

impl TryFrom<u64> for Instruction {
    type Error = IrError;

    fn try_from(word: u64) -> Result<Self> {
        decode(word)
    }
}
