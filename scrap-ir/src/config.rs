//! # Verifier Configuration
//!
//! Which of the optional checks [`crate::verify`] runs, and the size limit
//! it enforces on instruction streams.

use crate::MAX_ENTRIES;
use std::fmt;

/// Verifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerifyConfig {
    /// Require forward markers to be reached from earlier instructions and
    /// loop markers from later ones
    pub check_direction: bool,
    /// Report a stream that can fall off its end as an error instead of a
    /// warning
    pub require_terminator: bool,
    /// Largest accepted instruction stream (at most [`MAX_ENTRIES`])
    pub max_instructions: usize,
}

impl VerifyConfig {
    /// Default configuration:
    /// - direction check on
    /// - missing terminator is a warning
    /// - full 16-bit index space
    pub const DEFAULT: Self = Self {
        check_direction: true,
        require_terminator: false,
        max_instructions: MAX_ENTRIES,
    };

    /// Everything enforced
    pub const STRICT: Self = Self {
        check_direction: true,
        require_terminator: true,
        max_instructions: MAX_ENTRIES,
    };

    /// Only the checks that cannot be switched off
    pub const PERMISSIVE: Self = Self {
        check_direction: false,
        require_terminator: false,
        max_instructions: MAX_ENTRIES,
    };

    /// Create a new configuration with validation
    pub const fn new(
        check_direction: bool,
        require_terminator: bool,
        max_instructions: usize,
    ) -> Result<Self, ConfigError> {
        if max_instructions == 0 {
            return Err(ConfigError::ZeroInstructionLimit);
        }
        if max_instructions > MAX_ENTRIES {
            return Err(ConfigError::InstructionLimitTooLarge);
        }

        Ok(Self {
            check_direction,
            require_terminator,
            max_instructions,
        })
    }

    /// Validate the configuration
    pub const fn validate(&self) -> Result<(), ConfigError> {
        match Self::new(
            self.check_direction,
            self.require_terminator,
            self.max_instructions,
        ) {
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for VerifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "direction={} terminator={} max_instructions={}",
            self.check_direction, self.require_terminator, self.max_instructions
        )
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Instruction limit is zero
    ZeroInstructionLimit,
    /// Instruction limit exceeds the 16-bit index space
    InstructionLimitTooLarge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroInstructionLimit => {
                write!(f, "instruction limit must be at least 1")
            }
            ConfigError::InstructionLimitTooLarge => {
                write!(f, "instruction limit must not exceed {}", MAX_ENTRIES)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
