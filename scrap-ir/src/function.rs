//! # Function Container for SCRAP IR
//!
//! A [`Function`] is the unit of compilation: declared argument and upvalue
//! counts, an integer constant pool, a string constant pool and the
//! instruction stream.
//!
//! Functions are built by a [`FunctionBuilder`] owned by the front end and
//! then sealed. A sealed function exposes no mutating API, so it can be
//! shared (for example behind an `Arc`) by any number of readers. A pass that
//! rewrites a function starts a new builder from it and seals a new value.
//!
//! ```text
//! Empty --declare/append--> Building --seal--> Function (sealed)
//! ```

use crate::error::{IrError, Result};
use crate::instruction::{Instruction, Operand};
use crate::MAX_ENTRIES;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sealed, read-only function
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    num_pos_args: u16,
    num_upvalues: u16,
    intk_table: Vec<i32>,
    strk_table: Vec<String>,
    text: Vec<Instruction>,
}

impl Function {
    /// Declared number of positional arguments
    #[inline]
    pub fn num_pos_args(&self) -> u16 {
        self.num_pos_args
    }

    /// Declared number of captured upvalues
    #[inline]
    pub fn num_upvalues(&self) -> u16 {
        self.num_upvalues
    }

    /// Integer constant pool
    #[inline]
    pub fn intk_table(&self) -> &[i32] {
        &self.intk_table
    }

    /// String constant pool
    #[inline]
    pub fn strk_table(&self) -> &[String] {
        &self.strk_table
    }

    /// Instruction stream in program order
    #[inline]
    pub fn text(&self) -> &[Instruction] {
        &self.text
    }

    /// Instruction at `index`
    #[inline]
    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.text.get(index)
    }

    /// Number of instructions
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the instruction stream is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SCRAP Function")?;
        writeln!(f, "  Positional args: {}", self.num_pos_args)?;
        writeln!(f, "  Upvalues:        {}", self.num_upvalues)?;
        writeln!(f, "  Int constants:   {}", self.intk_table.len())?;
        writeln!(f, "  Str constants:   {}", self.strk_table.len())?;
        writeln!(f, "  Instructions:    {}", self.text.len())?;
        Ok(())
    }
}

/// Construction phase of a [`FunctionBuilder`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildState {
    /// Nothing declared or appended yet
    Empty,
    /// At least one declaration or append happened
    Building,
}

/// Append-only builder for a [`Function`]
#[derive(Clone, Debug)]
pub struct FunctionBuilder {
    function: Function,
    state: BuildState,
}

impl FunctionBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            function: Function::default(),
            state: BuildState::Empty,
        }
    }

    /// Start a new builder holding a copy of `function`, for rewriting passes.
    ///
    /// The builder is [`BuildState::Empty`] only if `function` declares and
    /// holds nothing.
    pub fn from_function(function: &Function) -> Self {
        let state = if *function == Function::default() {
            BuildState::Empty
        } else {
            BuildState::Building
        };
        Self {
            function: function.clone(),
            state,
        }
    }

    /// Current construction phase
    #[inline]
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Declare the number of positional arguments
    pub fn set_num_pos_args(&mut self, count: u16) -> &mut Self {
        self.state = BuildState::Building;
        self.function.num_pos_args = count;
        self
    }

    /// Declare the number of captured upvalues
    pub fn set_num_upvalues(&mut self, count: u16) -> &mut Self {
        self.state = BuildState::Building;
        self.function.num_upvalues = count;
        self
    }

    /// Append an integer constant and return its pool index.
    ///
    /// # Panics
    /// Panics if the pool already holds [`MAX_ENTRIES`] constants.
    pub fn push_int(&mut self, value: i32) -> Operand {
        let index = next_slot(self.function.intk_table.len(), "integer pool");
        self.state = BuildState::Building;
        self.function.intk_table.push(value);
        tracing::trace!(index, value, "intk");
        index
    }

    /// Append a string constant and return its pool index.
    ///
    /// # Panics
    /// Panics if the pool already holds [`MAX_ENTRIES`] constants.
    pub fn push_str(&mut self, value: impl Into<String>) -> Operand {
        let index = next_slot(self.function.strk_table.len(), "string pool");
        let value = value.into();
        self.state = BuildState::Building;
        tracing::trace!(index, value = %value, "strk");
        self.function.strk_table.push(value);
        index
    }

    /// Append an instruction and return its index in the stream.
    ///
    /// The index is what branch operands use to name this instruction.
    ///
    /// # Panics
    /// Panics if the stream already holds [`MAX_ENTRIES`] instructions.
    pub fn push(&mut self, instr: Instruction) -> Operand {
        let index = next_slot(self.function.text.len(), "instruction stream");
        self.state = BuildState::Building;
        tracing::trace!(index, instr = %instr, "push");
        self.function.text.push(instr);
        index
    }

    /// Overwrite one operand of an already appended instruction.
    ///
    /// This is the backpatching hook for forward branches: emit the jump with
    /// a placeholder target, then patch it once the marker's index is known.
    pub fn patch_operand(&mut self, at: Operand, slot: usize, value: Operand) -> Result<()> {
        let len = self.function.text.len();
        let instr = self
            .function
            .text
            .get_mut(at as usize)
            .ok_or(IrError::InstructionOutOfRange {
                index: at as usize,
                len,
            })?;
        instr.set_operand(slot, value)?;
        tracing::trace!(at, slot, value, "patch");
        Ok(())
    }

    /// Index the next appended instruction will get
    #[inline]
    pub fn next_index(&self) -> usize {
        self.function.text.len()
    }

    /// Number of instructions appended so far
    #[inline]
    pub fn len(&self) -> usize {
        self.function.text.len()
    }

    /// Check if no instruction was appended yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.function.text.is_empty()
    }

    /// View of the function under construction
    #[inline]
    pub fn peek(&self) -> &Function {
        &self.function
    }

    /// Finish construction and hand the function off
    pub fn seal(self) -> Function {
        let function = self.function;
        tracing::debug!(
            instructions = function.text.len(),
            int_constants = function.intk_table.len(),
            str_constants = function.strk_table.len(),
            "sealed function"
        );
        function
    }
}

impl Default for FunctionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn next_slot(len: usize, what: &str) -> Operand {
    assert!(len < MAX_ENTRIES, "{} is full ({} entries)", what, MAX_ENTRIES);
    len as Operand
}
