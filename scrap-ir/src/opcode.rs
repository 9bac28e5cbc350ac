//! # SCRAP IR Opcode Catalog
//!
//! This module defines the closed set of operation tags and every static
//! property attached to them: arity, role, category and operand kinds.
//!
//! ## Opcode Numbering
//!
//! Discriminants are contiguous, grouped by category:
//! - 0x00-0x03: Utility (NOP, PHI, MOV, CMOV)
//! - 0x04-0x06: Branch targets (JTARG, JLOOP, JFOR)
//! - 0x07-0x09: Branching (JUMP, JT, JF)
//! - 0x0A-0x0B: Assertions (ASSERT, ATYPE)
//! - 0x0C-0x13: Predicates (EQ, NEQ, IN, NIN, LT, GEQ, GT, LEQ)
//! - 0x14-0x19: Boolean (AND, NOT2, OR, XOR, NOT, BOOL)
//! - 0x1A-0x1E: Calls (SARG, CALL, RET, RETV, TCALL)
//! - 0x1F-0x22: Constants (INTK, STRK, BOOLK, TYPEK)
//! - 0x23-0x2F: Arithmetic (ADD .. CEIL)
//! - 0x30-0x36: Bitwise (BITAND .. BITNOT)
//! - 0x37-0x38: String (CAT, FMT)
//! - 0x39-0x3B: Indexing (GETI, SETI, DELI)
//! - 0x3C:      Collection (LEN)
//!
//! Every classification below is an exhaustive `match` with no wildcard arm,
//! so adding an opcode without classifying it fails to compile. The `const`
//! block at the bottom additionally checks that [`Opcode::ALL`] lists every
//! discriminant in order and that operand kinds agree with arity.

use crate::error::IrError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operation tag (values 0x00-0x3C)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Opcode {
    // ========== Utility (0x00-0x03) ==========
    /// NOP: no operation
    Nop = 0x00,
    /// PHI a, b: SSA merge of a and b
    Phi = 0x01,
    /// MOV a: copy a
    Mov = 0x02,
    /// CMOV c, a, b: c ? a : b
    Cmov = 0x03,

    // ========== Branch targets (0x04-0x06) ==========
    /// JTARG: forward jump target
    Jtarg = 0x04,
    /// JLOOP: reverse jump target
    Jloop = 0x05,
    /// JFOR i, x, e: `for i in x { ... } e:` (reverse jump target)
    Jfor = 0x06,

    // ========== Branching (0x07-0x09) ==========
    /// JUMP t: goto t (t is a JTARG, JLOOP or JFOR)
    Jump = 0x07,
    /// JT c, t: if c goto t (t is a JTARG)
    Jt = 0x08,
    /// JF c, t: if !c goto t (t is a JTARG)
    Jf = 0x09,

    // ========== Assertions (0x0A-0x0B) ==========
    /// ASSERT c: assert c
    Assert = 0x0A,
    /// ATYPE c, t: assert c has type constant t
    Atype = 0x0B,

    // ========== Predicates (0x0C-0x13) ==========
    /// EQ a, b: a == b
    Eq = 0x0C,
    /// NEQ a, b: a != b
    Neq = 0x0D,
    /// IN a, b: a in b
    In = 0x0E,
    /// NIN a, b: a not in b
    Nin = 0x0F,
    /// LT a, b: a < b
    Lt = 0x10,
    /// GEQ a, b: a >= b
    Geq = 0x11,
    /// GT a, b: a > b
    Gt = 0x12,
    /// LEQ a, b: a <= b
    Leq = 0x13,

    // ========== Boolean (0x14-0x19) ==========
    /// AND a, b: a and b
    And = 0x14,
    /// NOT2 a, b: a and not b
    Not2 = 0x15,
    /// OR a, b: a or b
    Or = 0x16,
    /// XOR a, b: a xor b
    Xor = 0x17,
    /// NOT a: not a
    Not = 0x18,
    /// BOOL a: bool(a)
    Bool = 0x19,

    // ========== Calls (0x1A-0x1E) ==========
    /// SARG: start argument list
    Sarg = 0x1A,
    /// CALL f, a: f(a)
    Call = 0x1B,
    /// RET a: return a
    Ret = 0x1C,
    /// RETV: return (void)
    Retv = 0x1D,
    /// TCALL f, a: return f(a)
    Tcall = 0x1E,

    // ========== Constants (0x1F-0x22) ==========
    /// INTK i: load integer constant #i
    Intk = 0x1F,
    /// STRK i: load string constant #i
    Strk = 0x20,
    /// BOOLK x: load false (x == 0) or true (x == 1)
    Boolk = 0x21,
    /// TYPEK i: load type constant #i
    Typek = 0x22,

    // ========== Arithmetic (0x23-0x2F) ==========
    /// ADD a, b: a + b
    Add = 0x23,
    /// SUB a, b: a - b
    Sub = 0x24,
    /// MUL a, b: a * b
    Mul = 0x25,
    /// FDIV a, b: a // b
    Fdiv = 0x26,
    /// MOD a, b: a % b
    Mod = 0x27,
    /// POW a, b: a ** b
    Pow = 0x28,
    /// DIV a, b: a / b
    Div = 0x29,
    /// MIN a, b: min(a, b)
    Min = 0x2A,
    /// MAX a, b: max(a, b)
    Max = 0x2B,
    /// NEG a: -a
    Neg = 0x2C,
    /// ABS a: abs(a)
    Abs = 0x2D,
    /// FLOOR a: floor(a)
    Floor = 0x2E,
    /// CEIL a: ceil(a)
    Ceil = 0x2F,

    // ========== Bitwise (0x30-0x36) ==========
    /// BITAND a, b: a & b
    Bitand = 0x30,
    /// BITOR a, b: a | b
    Bitor = 0x31,
    /// BITXOR a, b: a ^ b
    Bitxor = 0x32,
    /// BITANOT a, b: a & ~b
    Bitanot = 0x33,
    /// BITSHR a, b: a >> b
    Bitshr = 0x34,
    /// BITSHL a, b: a << b
    Bitshl = 0x35,
    /// BITNOT a: ~a
    Bitnot = 0x36,

    // ========== String (0x37-0x38) ==========
    /// CAT a, b: a .. b
    Cat = 0x37,
    /// FMT a, b: a %% b
    Fmt = 0x38,

    // ========== Indexing (0x39-0x3B) ==========
    /// GETI a, i: a[i]
    Geti = 0x39,
    /// SETI a, i, v: a[i] = v
    Seti = 0x3A,
    /// DELI a, i: del a[i]
    Deli = 0x3B,

    // ========== Collection (0x3C) ==========
    /// LEN a: len(a)
    Len = 0x3C,
}

/// Number of operand slots an opcode uses
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Arity {
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
}

impl Arity {
    /// Operand count as a number
    #[inline]
    pub const fn count(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// Kind of branch-target marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// JTARG: reached only by jumps that skip forward
    Forward,
    /// JLOOP: reached by a jump closing a loop
    Loop,
    /// JFOR: head of a for-loop, reached by a jump closing it
    ForLoop,
}

impl TargetKind {
    /// Whether jumps to this marker come from later instructions
    #[inline]
    pub const fn is_backward(self) -> bool {
        matches!(self, TargetKind::Loop | TargetKind::ForLoop)
    }

    /// The marker opcode of this kind
    pub const fn marker(self) -> Opcode {
        match self {
            TargetKind::Forward => Opcode::Jtarg,
            TargetKind::Loop => Opcode::Jloop,
            TargetKind::ForLoop => Opcode::Jfor,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::Forward => "forward",
            TargetKind::Loop => "loop",
            TargetKind::ForLoop => "for-loop",
        };
        write!(f, "{}", name)
    }
}

/// Kind of jump
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchKind {
    /// JUMP
    Unconditional,
    /// JT, JF
    Conditional,
}

impl BranchKind {
    /// Whether a jump of this kind may name a marker of the given kind.
    ///
    /// An unconditional jump may close a loop or skip forward; a conditional
    /// jump may only skip forward.
    #[inline]
    pub const fn accepts(self, target: TargetKind) -> bool {
        match self {
            BranchKind::Unconditional => true,
            BranchKind::Conditional => matches!(target, TargetKind::Forward),
        }
    }
}

/// Semantic role of an opcode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Always redirects control (JUMP)
    UnconditionalBranch,
    /// Redirects control depending on a value (JT, JF)
    ConditionalBranch,
    /// Names a valid jump destination
    BranchTarget(TargetKind),
    /// Produces a value consumable by later instructions
    Value,
    /// Writes to an existing location such as a collection element
    Mutator,
    /// Leaves the function
    Terminal,
    /// Has an effect (or none) but produces no value
    Effect,
}

/// How an operand slot is interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandKind {
    /// Reference to a previously produced value
    Value,
    /// Index into the integer constant pool
    IntConst,
    /// Index into the string constant pool
    StrConst,
    /// Index of a type constant
    TypeConst,
    /// Instruction index of a branch-target marker
    Target,
    /// Small literal integer
    Literal,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperandKind::Value => "value",
            OperandKind::IntConst => "int-const",
            OperandKind::StrConst => "str-const",
            OperandKind::TypeConst => "type-const",
            OperandKind::Target => "target",
            OperandKind::Literal => "literal",
        };
        write!(f, "{}", name)
    }
}

const V: OperandKind = OperandKind::Value;
const T: OperandKind = OperandKind::Target;

impl Opcode {
    /// Number of opcodes
    pub const COUNT: usize = Opcode::Len as usize + 1;

    /// Every opcode, ordered by discriminant
    pub const ALL: [Opcode; Opcode::COUNT] = [
        Opcode::Nop,
        Opcode::Phi,
        Opcode::Mov,
        Opcode::Cmov,
        Opcode::Jtarg,
        Opcode::Jloop,
        Opcode::Jfor,
        Opcode::Jump,
        Opcode::Jt,
        Opcode::Jf,
        Opcode::Assert,
        Opcode::Atype,
        Opcode::Eq,
        Opcode::Neq,
        Opcode::In,
        Opcode::Nin,
        Opcode::Lt,
        Opcode::Geq,
        Opcode::Gt,
        Opcode::Leq,
        Opcode::And,
        Opcode::Not2,
        Opcode::Or,
        Opcode::Xor,
        Opcode::Not,
        Opcode::Bool,
        Opcode::Sarg,
        Opcode::Call,
        Opcode::Ret,
        Opcode::Retv,
        Opcode::Tcall,
        Opcode::Intk,
        Opcode::Strk,
        Opcode::Boolk,
        Opcode::Typek,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Fdiv,
        Opcode::Mod,
        Opcode::Pow,
        Opcode::Div,
        Opcode::Min,
        Opcode::Max,
        Opcode::Neg,
        Opcode::Abs,
        Opcode::Floor,
        Opcode::Ceil,
        Opcode::Bitand,
        Opcode::Bitor,
        Opcode::Bitxor,
        Opcode::Bitanot,
        Opcode::Bitshr,
        Opcode::Bitshl,
        Opcode::Bitnot,
        Opcode::Cat,
        Opcode::Fmt,
        Opcode::Geti,
        Opcode::Seti,
        Opcode::Deli,
        Opcode::Len,
    ];

    /// Try to convert from u8
    #[inline]
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Number of operand slots used by this opcode
    pub const fn arity(self) -> Arity {
        match self {
            Opcode::Nop | Opcode::Jtarg | Opcode::Jloop | Opcode::Sarg | Opcode::Retv => {
                Arity::Zero
            }

            Opcode::Mov
            | Opcode::Jump
            | Opcode::Assert
            | Opcode::Not
            | Opcode::Bool
            | Opcode::Ret
            | Opcode::Intk
            | Opcode::Strk
            | Opcode::Boolk
            | Opcode::Typek
            | Opcode::Neg
            | Opcode::Abs
            | Opcode::Floor
            | Opcode::Ceil
            | Opcode::Bitnot
            | Opcode::Len => Arity::One,

            Opcode::Phi
            | Opcode::Jt
            | Opcode::Jf
            | Opcode::Atype
            | Opcode::Eq
            | Opcode::Neq
            | Opcode::In
            | Opcode::Nin
            | Opcode::Lt
            | Opcode::Geq
            | Opcode::Gt
            | Opcode::Leq
            | Opcode::And
            | Opcode::Not2
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Call
            | Opcode::Tcall
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Fdiv
            | Opcode::Mod
            | Opcode::Pow
            | Opcode::Div
            | Opcode::Min
            | Opcode::Max
            | Opcode::Bitand
            | Opcode::Bitor
            | Opcode::Bitxor
            | Opcode::Bitanot
            | Opcode::Bitshr
            | Opcode::Bitshl
            | Opcode::Cat
            | Opcode::Fmt
            | Opcode::Geti
            | Opcode::Deli => Arity::Two,

            Opcode::Cmov | Opcode::Jfor | Opcode::Seti => Arity::Three,
        }
    }

    /// Semantic role
    pub const fn role(self) -> Role {
        match self {
            Opcode::Jump => Role::UnconditionalBranch,
            Opcode::Jt | Opcode::Jf => Role::ConditionalBranch,

            Opcode::Jtarg => Role::BranchTarget(TargetKind::Forward),
            Opcode::Jloop => Role::BranchTarget(TargetKind::Loop),
            Opcode::Jfor => Role::BranchTarget(TargetKind::ForLoop),

            Opcode::Ret | Opcode::Retv | Opcode::Tcall => Role::Terminal,

            Opcode::Seti | Opcode::Deli => Role::Mutator,

            Opcode::Nop | Opcode::Assert | Opcode::Atype | Opcode::Sarg => Role::Effect,

            Opcode::Phi
            | Opcode::Mov
            | Opcode::Cmov
            | Opcode::Eq
            | Opcode::Neq
            | Opcode::In
            | Opcode::Nin
            | Opcode::Lt
            | Opcode::Geq
            | Opcode::Gt
            | Opcode::Leq
            | Opcode::And
            | Opcode::Not2
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Not
            | Opcode::Bool
            | Opcode::Call
            | Opcode::Intk
            | Opcode::Strk
            | Opcode::Boolk
            | Opcode::Typek
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Fdiv
            | Opcode::Mod
            | Opcode::Pow
            | Opcode::Div
            | Opcode::Min
            | Opcode::Max
            | Opcode::Neg
            | Opcode::Abs
            | Opcode::Floor
            | Opcode::Ceil
            | Opcode::Bitand
            | Opcode::Bitor
            | Opcode::Bitxor
            | Opcode::Bitanot
            | Opcode::Bitshr
            | Opcode::Bitshl
            | Opcode::Bitnot
            | Opcode::Cat
            | Opcode::Fmt
            | Opcode::Geti
            | Opcode::Len => Role::Value,
        }
    }

    /// Interpretation of each operand slot; the slice length equals the arity
    pub const fn operand_kinds(self) -> &'static [OperandKind] {
        match self {
            Opcode::Nop | Opcode::Jtarg | Opcode::Jloop | Opcode::Sarg | Opcode::Retv => &[],

            Opcode::Jump => &[T],
            Opcode::Jt | Opcode::Jf => &[V, T],
            // i, x, e: e is the instruction index after the loop body
            Opcode::Jfor => &[V, V, T],

            Opcode::Intk => &[OperandKind::IntConst],
            Opcode::Strk => &[OperandKind::StrConst],
            Opcode::Typek => &[OperandKind::TypeConst],
            Opcode::Boolk => &[OperandKind::Literal],
            Opcode::Atype => &[V, OperandKind::TypeConst],

            Opcode::Mov
            | Opcode::Assert
            | Opcode::Not
            | Opcode::Bool
            | Opcode::Ret
            | Opcode::Neg
            | Opcode::Abs
            | Opcode::Floor
            | Opcode::Ceil
            | Opcode::Bitnot
            | Opcode::Len => &[V],

            Opcode::Phi
            | Opcode::Eq
            | Opcode::Neq
            | Opcode::In
            | Opcode::Nin
            | Opcode::Lt
            | Opcode::Geq
            | Opcode::Gt
            | Opcode::Leq
            | Opcode::And
            | Opcode::Not2
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Call
            | Opcode::Tcall
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Fdiv
            | Opcode::Mod
            | Opcode::Pow
            | Opcode::Div
            | Opcode::Min
            | Opcode::Max
            | Opcode::Bitand
            | Opcode::Bitor
            | Opcode::Bitxor
            | Opcode::Bitanot
            | Opcode::Bitshr
            | Opcode::Bitshl
            | Opcode::Cat
            | Opcode::Fmt
            | Opcode::Geti
            | Opcode::Deli => &[V, V],

            Opcode::Cmov | Opcode::Seti => &[V, V, V],
        }
    }

    /// Category of this opcode
    pub const fn category(self) -> OpcodeCategory {
        match self {
            Opcode::Nop | Opcode::Phi | Opcode::Mov | Opcode::Cmov => OpcodeCategory::Utility,
            Opcode::Jtarg | Opcode::Jloop | Opcode::Jfor => OpcodeCategory::BranchTarget,
            Opcode::Jump | Opcode::Jt | Opcode::Jf => OpcodeCategory::Branch,
            Opcode::Assert | Opcode::Atype => OpcodeCategory::Assertion,
            Opcode::Eq
            | Opcode::Neq
            | Opcode::In
            | Opcode::Nin
            | Opcode::Lt
            | Opcode::Geq
            | Opcode::Gt
            | Opcode::Leq => OpcodeCategory::Predicate,
            Opcode::And | Opcode::Not2 | Opcode::Or | Opcode::Xor | Opcode::Not | Opcode::Bool => {
                OpcodeCategory::Boolean
            }
            Opcode::Sarg | Opcode::Call | Opcode::Ret | Opcode::Retv | Opcode::Tcall => {
                OpcodeCategory::Call
            }
            Opcode::Intk | Opcode::Strk | Opcode::Boolk | Opcode::Typek => {
                OpcodeCategory::Constant
            }
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Fdiv
            | Opcode::Mod
            | Opcode::Pow
            | Opcode::Div
            | Opcode::Min
            | Opcode::Max
            | Opcode::Neg
            | Opcode::Abs
            | Opcode::Floor
            | Opcode::Ceil => OpcodeCategory::Arithmetic,
            Opcode::Bitand
            | Opcode::Bitor
            | Opcode::Bitxor
            | Opcode::Bitanot
            | Opcode::Bitshr
            | Opcode::Bitshl
            | Opcode::Bitnot => OpcodeCategory::Bitwise,
            Opcode::Cat | Opcode::Fmt => OpcodeCategory::String,
            Opcode::Geti | Opcode::Seti | Opcode::Deli => OpcodeCategory::Indexing,
            Opcode::Len => OpcodeCategory::Collection,
        }
    }

    /// Check if this is a conditional jump (JT, JF)
    #[inline]
    pub const fn is_conditional_branch(self) -> bool {
        matches!(self.role(), Role::ConditionalBranch)
    }

    /// Check if this is the unconditional jump (JUMP)
    #[inline]
    pub const fn is_unconditional_branch(self) -> bool {
        matches!(self.role(), Role::UnconditionalBranch)
    }

    /// Check if executing this opcode yields a value for later instructions
    #[inline]
    pub const fn produces_result(self) -> bool {
        matches!(self.role(), Role::Value)
    }

    /// Check if this opcode writes to an existing location
    #[inline]
    pub const fn is_mutator(self) -> bool {
        matches!(self.role(), Role::Mutator)
    }

    /// Check if this opcode leaves the function
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self.role(), Role::Terminal)
    }

    /// Check if this opcode marks a jump destination
    #[inline]
    pub const fn is_branch_target(self) -> bool {
        matches!(self.role(), Role::BranchTarget(_))
    }

    /// Marker kind, for branch-target opcodes
    #[inline]
    pub const fn target_kind(self) -> Option<TargetKind> {
        match self.role() {
            Role::BranchTarget(kind) => Some(kind),
            _ => None,
        }
    }

    /// Jump kind, for branch opcodes
    #[inline]
    pub const fn branch_kind(self) -> Option<BranchKind> {
        match self.role() {
            Role::UnconditionalBranch => Some(BranchKind::Unconditional),
            Role::ConditionalBranch => Some(BranchKind::Conditional),
            _ => None,
        }
    }

    /// Slot holding the branch target, for branch opcodes
    pub fn branch_target_slot(self) -> Option<usize> {
        self.branch_kind()?;
        self.operand_kinds()
            .iter()
            .position(|kind| *kind == OperandKind::Target)
    }

    /// Listing mnemonic
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::Phi => "phi",
            Opcode::Mov => "mov",
            Opcode::Cmov => "cmov",
            Opcode::Jtarg => "jtarg",
            Opcode::Jloop => "jloop",
            Opcode::Jfor => "jfor",
            Opcode::Jump => "jump",
            Opcode::Jt => "jt",
            Opcode::Jf => "jf",
            Opcode::Assert => "assert",
            Opcode::Atype => "atype",
            Opcode::Eq => "eq",
            Opcode::Neq => "neq",
            Opcode::In => "in",
            Opcode::Nin => "nin",
            Opcode::Lt => "lt",
            Opcode::Geq => "geq",
            Opcode::Gt => "gt",
            Opcode::Leq => "leq",
            Opcode::And => "and",
            Opcode::Not2 => "not2",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Not => "not",
            Opcode::Bool => "bool",
            Opcode::Sarg => "sarg",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Retv => "retv",
            Opcode::Tcall => "tcall",
            Opcode::Intk => "intk",
            Opcode::Strk => "strk",
            Opcode::Boolk => "boolk",
            Opcode::Typek => "typek",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Fdiv => "fdiv",
            Opcode::Mod => "mod",
            Opcode::Pow => "pow",
            Opcode::Div => "div",
            Opcode::Min => "min",
            Opcode::Max => "max",
            Opcode::Neg => "neg",
            Opcode::Abs => "abs",
            Opcode::Floor => "floor",
            Opcode::Ceil => "ceil",
            Opcode::Bitand => "bitand",
            Opcode::Bitor => "bitor",
            Opcode::Bitxor => "bitxor",
            Opcode::Bitanot => "bitanot",
            Opcode::Bitshr => "bitshr",
            Opcode::Bitshl => "bitshl",
            Opcode::Bitnot => "bitnot",
            Opcode::Cat => "cat",
            Opcode::Fmt => "fmt",
            Opcode::Geti => "geti",
            Opcode::Seti => "seti",
            Opcode::Deli => "deli",
            Opcode::Len => "len",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
            .ok_or_else(|| IrError::UnknownMnemonic(s.to_string()))
    }
}

impl TryFrom<u8> for Opcode {
    type Error = IrError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(IrError::UnknownOpcode(value))
    }
}

// Catalog consistency, checked at compile time.
const _: () = {
    let mut i = 0;
    while i < Opcode::COUNT {
        let op = Opcode::ALL[i];
        assert!(op as usize == i, "Opcode::ALL must list discriminants in order");
        assert!(
            op.operand_kinds().len() == op.arity().count(),
            "operand kinds must agree with arity"
        );
        i += 1;
    }
};

/// Opcode category
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpcodeCategory {
    /// NOP, PHI, MOV, CMOV
    Utility = 0,
    /// JTARG, JLOOP, JFOR
    BranchTarget = 1,
    /// JUMP, JT, JF
    Branch = 2,
    /// ASSERT, ATYPE
    Assertion = 3,
    /// EQ, NEQ, IN, NIN, LT, GEQ, GT, LEQ
    Predicate = 4,
    /// AND, NOT2, OR, XOR, NOT, BOOL
    Boolean = 5,
    /// SARG, CALL, RET, RETV, TCALL
    Call = 6,
    /// INTK, STRK, BOOLK, TYPEK
    Constant = 7,
    /// ADD .. CEIL
    Arithmetic = 8,
    /// BITAND .. BITNOT
    Bitwise = 9,
    /// CAT, FMT
    String = 10,
    /// GETI, SETI, DELI
    Indexing = 11,
    /// LEN
    Collection = 12,
}

impl OpcodeCategory {
    /// Total number of categories
    pub const COUNT: usize = 13;

    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OpcodeCategory::Utility),
            1 => Some(OpcodeCategory::BranchTarget),
            2 => Some(OpcodeCategory::Branch),
            3 => Some(OpcodeCategory::Assertion),
            4 => Some(OpcodeCategory::Predicate),
            5 => Some(OpcodeCategory::Boolean),
            6 => Some(OpcodeCategory::Call),
            7 => Some(OpcodeCategory::Constant),
            8 => Some(OpcodeCategory::Arithmetic),
            9 => Some(OpcodeCategory::Bitwise),
            10 => Some(OpcodeCategory::String),
            11 => Some(OpcodeCategory::Indexing),
            12 => Some(OpcodeCategory::Collection),
            _ => None,
        }
    }

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for OpcodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpcodeCategory::Utility => "utility",
            OpcodeCategory::BranchTarget => "branch-target",
            OpcodeCategory::Branch => "branch",
            OpcodeCategory::Assertion => "assertion",
            OpcodeCategory::Predicate => "predicate",
            OpcodeCategory::Boolean => "boolean",
            OpcodeCategory::Call => "call",
            OpcodeCategory::Constant => "constant",
            OpcodeCategory::Arithmetic => "arithmetic",
            OpcodeCategory::Bitwise => "bitwise",
            OpcodeCategory::String => "string",
            OpcodeCategory::Indexing => "indexing",
            OpcodeCategory::Collection => "collection",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(Opcode::Nop.to_u8(), 0x00);
        assert_eq!(Opcode::Jtarg.to_u8(), 0x04);
        assert_eq!(Opcode::Jump.to_u8(), 0x07);
        assert_eq!(Opcode::Eq.to_u8(), 0x0C);
        assert_eq!(Opcode::Intk.to_u8(), 0x1F);
        assert_eq!(Opcode::Add.to_u8(), 0x23);
        assert_eq!(Opcode::Bitand.to_u8(), 0x30);
        assert_eq!(Opcode::Len.to_u8(), 0x3C);
        assert_eq!(Opcode::COUNT, 61);
    }

    #[test]
    fn test_opcode_from_u8() {
        assert_eq!(Opcode::from_u8(0x00), Some(Opcode::Nop));
        assert_eq!(Opcode::from_u8(0x23), Some(Opcode::Add));
        assert_eq!(Opcode::from_u8(0x3C), Some(Opcode::Len));
        assert_eq!(Opcode::from_u8(0x3D), None);
        assert_eq!(Opcode::from_u8(0xFF), None);
    }

    #[test]
    fn test_all_roundtrips_through_u8() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_u8(op.to_u8()), Some(op));
        }
    }

    #[test]
    fn test_arity_is_total() {
        for op in Opcode::ALL {
            assert!(op.arity().count() <= 3, "{} has arity {}", op, op.arity());
            assert_eq!(op.operand_kinds().len(), op.arity().count());
        }
    }

    #[test]
    fn test_arity_samples() {
        assert_eq!(Opcode::Nop.arity(), Arity::Zero);
        assert_eq!(Opcode::Jtarg.arity(), Arity::Zero);
        assert_eq!(Opcode::Retv.arity(), Arity::Zero);
        assert_eq!(Opcode::Intk.arity(), Arity::One);
        assert_eq!(Opcode::Jump.arity(), Arity::One);
        assert_eq!(Opcode::Ret.arity(), Arity::One);
        assert_eq!(Opcode::Add.arity(), Arity::Two);
        assert_eq!(Opcode::Jt.arity(), Arity::Two);
        assert_eq!(Opcode::Phi.arity(), Arity::Two);
        assert_eq!(Opcode::Cmov.arity(), Arity::Three);
        assert_eq!(Opcode::Jfor.arity(), Arity::Three);
        assert_eq!(Opcode::Seti.arity(), Arity::Three);
    }

    #[test]
    fn test_branch_predicates() {
        let conditional: Vec<_> = Opcode::ALL
            .iter()
            .filter(|op| op.is_conditional_branch())
            .collect();
        assert_eq!(conditional, vec![&Opcode::Jt, &Opcode::Jf]);

        let unconditional: Vec<_> = Opcode::ALL
            .iter()
            .filter(|op| op.is_unconditional_branch())
            .collect();
        assert_eq!(unconditional, vec![&Opcode::Jump]);

        assert!(!Opcode::Jfor.is_conditional_branch());
    }

    #[test]
    fn test_branch_target_slot() {
        assert_eq!(Opcode::Jump.branch_target_slot(), Some(0));
        assert_eq!(Opcode::Jt.branch_target_slot(), Some(1));
        assert_eq!(Opcode::Jf.branch_target_slot(), Some(1));
        assert_eq!(Opcode::Jfor.branch_target_slot(), None);
        assert_eq!(Opcode::Add.branch_target_slot(), None);
    }

    #[test]
    fn test_target_kinds() {
        assert_eq!(Opcode::Jtarg.target_kind(), Some(TargetKind::Forward));
        assert_eq!(Opcode::Jloop.target_kind(), Some(TargetKind::Loop));
        assert_eq!(Opcode::Jfor.target_kind(), Some(TargetKind::ForLoop));
        assert_eq!(Opcode::Jump.target_kind(), None);

        for kind in [TargetKind::Forward, TargetKind::Loop, TargetKind::ForLoop] {
            assert_eq!(kind.marker().target_kind(), Some(kind));
        }
        assert!(!TargetKind::Forward.is_backward());
        assert!(TargetKind::Loop.is_backward());
    }

    #[test]
    fn test_branch_kind_accepts() {
        assert!(BranchKind::Unconditional.accepts(TargetKind::Forward));
        assert!(BranchKind::Unconditional.accepts(TargetKind::Loop));
        assert!(BranchKind::Unconditional.accepts(TargetKind::ForLoop));
        assert!(BranchKind::Conditional.accepts(TargetKind::Forward));
        assert!(!BranchKind::Conditional.accepts(TargetKind::Loop));
        assert!(!BranchKind::Conditional.accepts(TargetKind::ForLoop));
    }

    #[test]
    fn test_result_and_mutator() {
        assert!(Opcode::Add.produces_result());
        assert!(Opcode::Intk.produces_result());
        assert!(Opcode::Call.produces_result());
        assert!(Opcode::Geti.produces_result());
        assert!(!Opcode::Seti.produces_result());
        assert!(!Opcode::Jump.produces_result());
        assert!(!Opcode::Ret.produces_result());
        assert!(!Opcode::Assert.produces_result());

        let mutators: Vec<_> = Opcode::ALL.iter().filter(|op| op.is_mutator()).collect();
        assert_eq!(mutators, vec![&Opcode::Seti, &Opcode::Deli]);
    }

    #[test]
    fn test_terminals() {
        let terminals: Vec<_> = Opcode::ALL.iter().filter(|op| op.is_terminal()).collect();
        assert_eq!(terminals, vec![&Opcode::Ret, &Opcode::Retv, &Opcode::Tcall]);
    }

    #[test]
    fn test_category() {
        assert_eq!(Opcode::Cmov.category(), OpcodeCategory::Utility);
        assert_eq!(Opcode::Jloop.category(), OpcodeCategory::BranchTarget);
        assert_eq!(Opcode::Jf.category(), OpcodeCategory::Branch);
        assert_eq!(Opcode::Atype.category(), OpcodeCategory::Assertion);
        assert_eq!(Opcode::Leq.category(), OpcodeCategory::Predicate);
        assert_eq!(Opcode::Not2.category(), OpcodeCategory::Boolean);
        assert_eq!(Opcode::Tcall.category(), OpcodeCategory::Call);
        assert_eq!(Opcode::Typek.category(), OpcodeCategory::Constant);
        assert_eq!(Opcode::Ceil.category(), OpcodeCategory::Arithmetic);
        assert_eq!(Opcode::Bitnot.category(), OpcodeCategory::Bitwise);
        assert_eq!(Opcode::Fmt.category(), OpcodeCategory::String);
        assert_eq!(Opcode::Deli.category(), OpcodeCategory::Indexing);
        assert_eq!(Opcode::Len.category(), OpcodeCategory::Collection);
    }

    #[test]
    fn test_category_from_u8() {
        for value in 0..OpcodeCategory::COUNT as u8 {
            let category = OpcodeCategory::from_u8(value).unwrap();
            assert_eq!(category.to_u8(), value);
        }
        assert_eq!(OpcodeCategory::from_u8(OpcodeCategory::COUNT as u8), None);
    }

    #[test]
    fn test_mnemonic_parse() {
        for op in Opcode::ALL {
            assert_eq!(op.mnemonic().parse::<Opcode>().unwrap(), op);
        }
        assert_eq!("ADD".parse::<Opcode>().unwrap(), Opcode::Add);
        assert!(matches!(
            "addi".parse::<Opcode>(),
            Err(IrError::UnknownMnemonic(_))
        ));
    }

    #[test]
    fn test_try_from_u8() {
        assert_eq!(Opcode::try_from(0x1F).unwrap(), Opcode::Intk);
        assert!(matches!(Opcode::try_from(0x7F), Err(IrError::UnknownOpcode(0x7F))));
    }
}
