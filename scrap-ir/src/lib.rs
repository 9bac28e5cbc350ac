//! # SCRAP IR
//!
//! Register-based bytecode intermediate representation shared by front ends
//! (compilers) and back ends (interpreters, JITs).
//!
//! ## Key Features
//! - Closed opcode catalog with compile-time arity, role and operand kinds
//! - Instructions that cannot be constructed with the wrong operand count
//! - Fixed-width 64-bit instruction encoding
//! - Append-only function builder with backpatching, sealed into a
//!   read-only [`Function`] that can be shared across threads
//! - Verifier for the contracts left to consumers (branch targets, pools)
//!
//! ## Example
//!
//! ```rust
//! use scrap_ir::{FunctionBuilder, Instruction, Opcode};
//!
//! // x = 1 + 1; assert x == 2; return x
//! let mut builder = FunctionBuilder::new();
//! let one = builder.push_int(1);
//! let two = builder.push_int(2);
//! builder.push(Instruction::unary(Opcode::Intk, one));
//! builder.push(Instruction::binary(Opcode::Add, 0, 0));
//! builder.push(Instruction::unary(Opcode::Intk, two));
//! builder.push(Instruction::binary(Opcode::Eq, 2, 3));
//! builder.push(Instruction::unary(Opcode::Assert, 4));
//! builder.push(Instruction::unary(Opcode::Ret, 2));
//!
//! let function = builder.seal();
//! assert_eq!(function.len(), 6);
//! assert_eq!(function.intk_table(), &[1, 2]);
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod function;
pub mod instruction;
pub mod opcode;
pub mod verify;

pub use config::{ConfigError, VerifyConfig};
pub use error::{IrError, Result};
pub use function::{BuildState, Function, FunctionBuilder};
pub use instruction::{Instruction, Operand};
pub use opcode::{Arity, BranchKind, Opcode, OpcodeCategory, OperandKind, Role, TargetKind};
pub use verify::{verify, ValidationError, ValidationResult, ValidationWarning};

/// Operand slots per instruction
pub const MAX_OPERANDS: usize = 3;

/// Entries addressable by a 16-bit operand (pool size and stream length limit)
pub const MAX_ENTRIES: usize = 1 << 16;
