//! Function verification for SCRAP IR
//!
//! The container guarantees operand counts; this module checks the contracts
//! that are left to consumers of a sealed function:
//! - branch operands name an in-range marker of an accepted kind
//! - forward markers are reached from earlier instructions, loop markers
//!   from later ones (when [`VerifyConfig::check_direction`] is set)
//! - INTK/STRK operands are valid pool indices
//! - BOOLK literals are 0 or 1
//! - the JFOR exit operand is an in-range instruction index
//!
//! Value-reference operands are not checked. TYPEK/ATYPE operands index a
//! type table the container does not carry and are left to the back end.

use crate::config::VerifyConfig;
use crate::function::Function;
use crate::instruction::Operand;
use crate::opcode::{Opcode, OperandKind, TargetKind};
use thiserror::Error;

/// Verification error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Function has {len} instructions, limit is {max}")]
    TooManyInstructions { len: usize, max: usize },

    #[error("Instruction {at}: target {target} out of range (stream length {len})")]
    TargetOutOfRange { at: usize, target: Operand, len: usize },

    #[error("Instruction {at}: target {target} is {found}, not a branch target")]
    NotABranchTarget {
        at: usize,
        target: Operand,
        found: Opcode,
    },

    #[error("Instruction {at}: {op} may not target a {kind} marker")]
    IllegalTargetKind {
        at: usize,
        op: Opcode,
        kind: TargetKind,
    },

    #[error("Instruction {at}: {kind} marker {target} is on the wrong side of the jump")]
    WrongDirection {
        at: usize,
        target: Operand,
        kind: TargetKind,
    },

    #[error("Instruction {at}: integer constant {index} out of range (pool size {len})")]
    IntConstOutOfRange { at: usize, index: Operand, len: usize },

    #[error("Instruction {at}: string constant {index} out of range (pool size {len})")]
    StrConstOutOfRange { at: usize, index: Operand, len: usize },

    #[error("Instruction {at}: boolean literal must be 0 or 1, found {value}")]
    InvalidBoolLiteral { at: usize, value: Operand },

    #[error("Function can run past its last instruction")]
    MissingTerminator,
}

/// Verification warning types (not errors, but worth noting)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// The last instruction neither returns nor jumps
    MissingTerminator,

    /// A branch-target marker that no jump names
    UnreferencedTarget { at: usize },
}

/// Verification result
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create an empty verification result
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if verification passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify a sealed function
pub fn verify(function: &Function, config: &VerifyConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    let text = function.text();

    if text.len() > config.max_instructions {
        result.add_error(ValidationError::TooManyInstructions {
            len: text.len(),
            max: config.max_instructions,
        });
        return result;
    }

    let mut targeted = vec![false; text.len()];

    for (at, instr) in text.iter().enumerate() {
        let op = instr.opcode();
        for (kind, operand) in instr.typed_operands() {
            match kind {
                OperandKind::Target if op.branch_kind().is_some() => {
                    if check_branch(&mut result, function, config, at, op, operand) {
                        targeted[operand as usize] = true;
                    }
                }
                OperandKind::Target => {
                    // JFOR exit: any in-range instruction
                    if check_target_range(&mut result, at, operand, text.len()) {
                        targeted[operand as usize] = true;
                    }
                }
                OperandKind::IntConst => {
                    let len = function.intk_table().len();
                    if operand as usize >= len {
                        result.add_error(ValidationError::IntConstOutOfRange {
                            at,
                            index: operand,
                            len,
                        });
                    }
                }
                OperandKind::StrConst => {
                    let len = function.strk_table().len();
                    if operand as usize >= len {
                        result.add_error(ValidationError::StrConstOutOfRange {
                            at,
                            index: operand,
                            len,
                        });
                    }
                }
                OperandKind::Literal => {
                    if op == Opcode::Boolk && operand > 1 {
                        result.add_error(ValidationError::InvalidBoolLiteral {
                            at,
                            value: operand,
                        });
                    }
                }
                OperandKind::Value | OperandKind::TypeConst => {}
            }
        }
    }

    for (at, instr) in text.iter().enumerate() {
        if instr.opcode().is_branch_target() && !targeted[at] {
            result.add_warning(ValidationWarning::UnreferencedTarget { at });
        }
    }

    let terminated = text.last().map_or(false, |instr| {
        instr.opcode().is_terminal() || instr.opcode().is_unconditional_branch()
    });
    if !terminated {
        if config.require_terminator {
            result.add_error(ValidationError::MissingTerminator);
        } else {
            result.add_warning(ValidationWarning::MissingTerminator);
        }
    }

    tracing::debug!(
        instructions = text.len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "verified function"
    );

    result
}

// Helper functions

fn check_target_range(
    result: &mut ValidationResult,
    at: usize,
    target: Operand,
    len: usize,
) -> bool {
    if target as usize >= len {
        result.add_error(ValidationError::TargetOutOfRange { at, target, len });
        return false;
    }
    true
}

/// Returns true when `target` names a marker, even if the jump breaks a rule
fn check_branch(
    result: &mut ValidationResult,
    function: &Function,
    config: &VerifyConfig,
    at: usize,
    op: Opcode,
    target: Operand,
) -> bool {
    let text = function.text();
    if !check_target_range(result, at, target, text.len()) {
        return false;
    }

    let found = text[target as usize].opcode();
    let Some(kind) = found.target_kind() else {
        result.add_error(ValidationError::NotABranchTarget { at, target, found });
        return false;
    };

    if let Some(branch) = op.branch_kind() {
        if !branch.accepts(kind) {
            result.add_error(ValidationError::IllegalTargetKind { at, op, kind });
        }
    }

    if config.check_direction {
        let backward = (target as usize) < at;
        if backward != kind.is_backward() {
            result.add_error(ValidationError::WrongDirection { at, target, kind });
        }
    }

    true
}
