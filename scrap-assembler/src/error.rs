//! Assembler errors

use scrap_ir::IrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unknown instruction at line {line}: {mnemonic}")]
    UnknownInstruction { line: usize, mnemonic: String },

    #[error("Invalid operand at line {line}: {message}")]
    InvalidOperand { line: usize, message: String },

    #[error("Undefined label at line {line}: {label}")]
    UndefinedLabel { line: usize, label: String },

    #[error("Duplicate label at line {line}: {label}")]
    DuplicateLabel { line: usize, label: String },

    #[error("Invalid directive at line {line}: {message}")]
    InvalidDirective { line: usize, message: String },

    #[error("Line {line}: {what} is full")]
    CapacityExceeded { line: usize, what: &'static str },

    #[error("Line {line}: {source}")]
    Ir {
        line: usize,
        #[source]
        source: IrError,
    },
}

impl AssemblerError {
    /// Source line (1-based) the error was reported on
    pub fn line(&self) -> usize {
        match self {
            AssemblerError::SyntaxError { line, .. }
            | AssemblerError::UnknownInstruction { line, .. }
            | AssemblerError::InvalidOperand { line, .. }
            | AssemblerError::UndefinedLabel { line, .. }
            | AssemblerError::DuplicateLabel { line, .. }
            | AssemblerError::InvalidDirective { line, .. }
            | AssemblerError::CapacityExceeded { line, .. }
            | AssemblerError::Ir { line, .. } => *line,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use scrap_ir::Opcode;

    #[test]
    fn test_error_display_carries_line() {
        let err = AssemblerError::UndefinedLabel {
            line: 7,
            label: "exit".to_string(),
        };
        assert_eq!(err.to_string(), "Undefined label at line 7: exit");
        assert_eq!(err.line(), 7);
    }

    #[test]
    fn test_ir_error_source() {
        let err = AssemblerError::Ir {
            line: 3,
            source: IrError::ArityMismatch {
                op: Opcode::Add,
                expected: 2,
                found: 1,
            },
        };
        assert!(err.to_string().starts_with("Line 3: Arity mismatch"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
