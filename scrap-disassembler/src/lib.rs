//! # SCRAP IR Disassembler
//!
//! Render SCRAP IR as human-readable assembly.
//!
//! [`disassemble`] works on a sealed [`scrap_ir::Function`] and produces a
//! listing that `scrap-assembler` reads back into an equal function.
//! [`disassemble_words`] works on a bare encoded instruction stream and
//! reports words that fail to decode inline.
//!
//! ## Example
//!
//! ```rust
//! use scrap_ir::{FunctionBuilder, Instruction, Opcode};
//! use scrap_disassembler::disassemble;
//!
//! let mut builder = FunctionBuilder::new();
//! let k = builder.push_int(7);
//! builder.push(Instruction::unary(Opcode::Intk, k));
//! builder.push(Instruction::unary(Opcode::Ret, 0));
//!
//! let asm = disassemble(&builder.seal()).unwrap();
//! assert!(asm.contains("intk 0"));
//! ```

pub mod decoder;
pub mod disassembler;
pub mod error;
pub mod formatter;

pub use decoder::decode;
pub use disassembler::{disassemble, disassemble_words};
pub use error::{DisassemblerError, Result};
pub use formatter::{annotate, format};
