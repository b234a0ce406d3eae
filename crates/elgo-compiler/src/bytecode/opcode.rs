//! Abstract instruction set of the host VM.
//!
//! Instructions are kept symbolic: operands are pool indices, stack offsets
//! and [`Label`]s rather than encoded bytes. Turning an instruction stream
//! into the host's binary format is the job of an external assembler.
//!
//! Every instruction has a fixed [`stack effect`](Instr::stack_effect). The
//! emitter applies it to the compile-time stack model, so code generation
//! never adjusts the model by hand except where the runtime and the model
//! intentionally diverge (panic calls, `break`/`continue`).

use std::fmt;

/// A jump target, created before use and bound to a position exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub(crate) u32);

impl Label {
    /// Numeric identity of this label within its function.
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// An instruction with its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instr {
    // =========================================================================
    // Constants and variables
    // =========================================================================
    /// Push constant `k` from the pool.
    ConstRef(u16),
    /// Push the value of the dynamic variable named by constant `k`.
    VarRef(u16),
    /// Pop into the dynamic variable named by constant `k`.
    VarSet(u16),
    /// Duplicate the slot `i` positions below the top (0 = top).
    StackRef(u16),
    /// Pop the top and overwrite the slot `i` positions below it.
    StackSet(u16),

    // =========================================================================
    // Calls and stack management
    // =========================================================================
    /// Call the function whose symbol sits below `n` arguments.
    Call(u8),
    /// Drop the top `n` values.
    Discard(u16),
    /// End the function, yielding the top of the stack.
    Return,

    // =========================================================================
    // Control flow
    // =========================================================================
    Jmp(Label),
    /// Pop; jump if the value was nil.
    JmpNil(Label),
    /// Pop; jump if the value was not nil.
    JmpNotNil(Label),
    /// Jump keeping the value if nil, otherwise pop and fall through.
    JmpNilElsePop(Label),
    /// Jump keeping the value if not nil, otherwise pop and fall through.
    JmpNotNilElsePop(Label),

    // =========================================================================
    // Arrays
    // =========================================================================
    /// Pop index and array, push the element.
    ArrayRef,
    /// Pop value, index and array; store the value.
    ArraySet,

    // =========================================================================
    // Arithmetic and comparison (numbers)
    // =========================================================================
    Plus,
    Diff,
    Mult,
    Quo,
    Rem,
    Negate,
    NumEq,
    Lss,
    Leq,
    Gtr,
    Geq,
    Not,

    // =========================================================================
    // Strings
    // =========================================================================
    /// Concatenate the top `n` strings.
    Concat(u8),
    StringEq,
    StringLess,
}

impl Instr {
    /// Number of values popped and pushed, in that order.
    ///
    /// Conditional jumps report their fall-through effect.
    pub fn stack_effect(&self) -> (usize, usize) {
        match self {
            Instr::ConstRef(_) | Instr::VarRef(_) | Instr::StackRef(_) => (0, 1),
            Instr::VarSet(_) | Instr::StackSet(_) => (1, 0),
            Instr::Call(n) => (*n as usize + 1, 1),
            Instr::Discard(n) => (*n as usize, 0),
            Instr::Return => (1, 0),
            Instr::Jmp(_) => (0, 0),
            Instr::JmpNil(_)
            | Instr::JmpNotNil(_)
            | Instr::JmpNilElsePop(_)
            | Instr::JmpNotNilElsePop(_) => (1, 0),
            Instr::ArrayRef => (2, 1),
            Instr::ArraySet => (3, 0),
            Instr::Plus
            | Instr::Diff
            | Instr::Mult
            | Instr::Quo
            | Instr::Rem
            | Instr::NumEq
            | Instr::Lss
            | Instr::Leq
            | Instr::Gtr
            | Instr::Geq
            | Instr::StringEq
            | Instr::StringLess => (2, 1),
            Instr::Negate | Instr::Not => (1, 1),
            Instr::Concat(n) => (*n as usize, 1),
        }
    }

    /// The jump target, if this is a jump.
    pub fn label(&self) -> Option<Label> {
        match self {
            Instr::Jmp(l)
            | Instr::JmpNil(l)
            | Instr::JmpNotNil(l)
            | Instr::JmpNilElsePop(l)
            | Instr::JmpNotNilElsePop(l) => Some(*l),
            _ => None,
        }
    }

    /// The operand-free opcode of this instruction.
    pub fn opcode(&self) -> OpCode {
        match self {
            Instr::ConstRef(_) => OpCode::ConstRef,
            Instr::VarRef(_) => OpCode::VarRef,
            Instr::VarSet(_) => OpCode::VarSet,
            Instr::StackRef(_) => OpCode::StackRef,
            Instr::StackSet(_) => OpCode::StackSet,
            Instr::Call(_) => OpCode::Call,
            Instr::Discard(_) => OpCode::Discard,
            Instr::Return => OpCode::Return,
            Instr::Jmp(_) => OpCode::Jmp,
            Instr::JmpNil(_) => OpCode::JmpNil,
            Instr::JmpNotNil(_) => OpCode::JmpNotNil,
            Instr::JmpNilElsePop(_) => OpCode::JmpNilElsePop,
            Instr::JmpNotNilElsePop(_) => OpCode::JmpNotNilElsePop,
            Instr::ArrayRef => OpCode::ArrayRef,
            Instr::ArraySet => OpCode::ArraySet,
            Instr::Plus => OpCode::Plus,
            Instr::Diff => OpCode::Diff,
            Instr::Mult => OpCode::Mult,
            Instr::Quo => OpCode::Quo,
            Instr::Rem => OpCode::Rem,
            Instr::Negate => OpCode::Negate,
            Instr::NumEq => OpCode::NumEq,
            Instr::Lss => OpCode::Lss,
            Instr::Leq => OpCode::Leq,
            Instr::Gtr => OpCode::Gtr,
            Instr::Geq => OpCode::Geq,
            Instr::Not => OpCode::Not,
            Instr::Concat(_) => OpCode::Concat,
            Instr::StringEq => OpCode::StringEq,
            Instr::StringLess => OpCode::StringLess,
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode().name();
        match self {
            Instr::ConstRef(n)
            | Instr::VarRef(n)
            | Instr::VarSet(n)
            | Instr::StackRef(n)
            | Instr::StackSet(n)
            | Instr::Discard(n) => write!(f, "{name} {n}"),
            Instr::Call(n) | Instr::Concat(n) => write!(f, "{name} {n}"),
            _ => match self.label() {
                Some(label) => write!(f, "{name} {label}"),
                None => f.write_str(name),
            },
        }
    }
}

/// Operand-free view of an [`Instr`], for comparing instruction shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    ConstRef,
    VarRef,
    VarSet,
    StackRef,
    StackSet,
    Call,
    Discard,
    Return,
    Jmp,
    JmpNil,
    JmpNotNil,
    JmpNilElsePop,
    JmpNotNilElsePop,
    ArrayRef,
    ArraySet,
    Plus,
    Diff,
    Mult,
    Quo,
    Rem,
    Negate,
    NumEq,
    Lss,
    Leq,
    Gtr,
    Geq,
    Not,
    Concat,
    StringEq,
    StringLess,
}

impl OpCode {
    /// Host mnemonic.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::ConstRef => "constant",
            OpCode::VarRef => "varref",
            OpCode::VarSet => "varset",
            OpCode::StackRef => "stack-ref",
            OpCode::StackSet => "stack-set",
            OpCode::Call => "call",
            OpCode::Discard => "discardN",
            OpCode::Return => "return",
            OpCode::Jmp => "goto",
            OpCode::JmpNil => "goto-if-nil",
            OpCode::JmpNotNil => "goto-if-not-nil",
            OpCode::JmpNilElsePop => "goto-if-nil-else-pop",
            OpCode::JmpNotNilElsePop => "goto-if-not-nil-else-pop",
            OpCode::ArrayRef => "aref",
            OpCode::ArraySet => "aset",
            OpCode::Plus => "plus",
            OpCode::Diff => "diff",
            OpCode::Mult => "mult",
            OpCode::Quo => "quo",
            OpCode::Rem => "rem",
            OpCode::Negate => "negate",
            OpCode::NumEq => "eqlsign",
            OpCode::Lss => "lss",
            OpCode::Leq => "leq",
            OpCode::Gtr => "gtr",
            OpCode::Geq => "geq",
            OpCode::Not => "not",
            OpCode::Concat => "concatN",
            OpCode::StringEq => "string=",
            OpCode::StringLess => "string<",
        }
    }

    /// Whether this opcode transfers control.
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            OpCode::Jmp
                | OpCode::JmpNil
                | OpCode::JmpNotNil
                | OpCode::JmpNilElsePop
                | OpCode::JmpNotNilElsePop
        )
    }
}
