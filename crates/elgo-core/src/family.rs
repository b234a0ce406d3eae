//! Operand families.

use std::fmt;

/// The operand category that selects which host instruction an operator
/// compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Integer arithmetic (also used for characters).
    Int,
    /// Floating point arithmetic.
    Float,
    /// String operations.
    String,
}

impl Family {
    /// Lower-case name used in diagnostics and IR printing.
    pub fn name(self) -> &'static str {
        match self {
            Family::Int => "int",
            Family::Float => "float",
            Family::String => "string",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
