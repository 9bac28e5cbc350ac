//! SCRAP IR Assembler
//!
//! Assemble a textual SCRAP IR listing into a sealed [`scrap_ir::Function`].
//!
//! One statement per line: a directive (`.args`, `.upvalues`, `.int`,
//! `.str`) or an instruction, optionally preceded by a `label:`. Branch
//! operands may name a label as `@label`; forward references are
//! backpatched once the listing has been read. Comments start with `;` or
//! `#`.
//!
//! ## Example
//!
//! ```rust
//! use scrap_assembler::assemble;
//!
//! let source = r#"
//!     .int 1
//!     .int 2
//!     intk 0
//!     add 0, 0
//!     intk 1
//!     eq 2, 3
//!     assert 4
//!     ret 2
//! "#;
//!
//! let function = assemble(source).unwrap();
//! assert_eq!(function.len(), 6);
//! assert_eq!(function.intk_table(), &[1, 2]);
//! ```

pub mod assembler;
pub mod error;
pub mod lexer;
pub mod parser;

pub use assembler::assemble;
pub use error::{AssemblerError, Result};
pub use parser::{
    parse_instruction, parse_line, Directive, Line, OperandExpr, ParsedInstruction, Statement,
};
