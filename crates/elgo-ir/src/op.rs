//! Operator kinds of typed IR operations.

use std::fmt;

/// Binary / variadic operator kind.
///
/// Combined with a [`Family`](elgo_core::Family) on the node it selects the
/// host instruction the operation compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitOr,
    BitAnd,
    BitXor,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl OpKind {
    /// Lisp-side spelling, used when printing.
    pub fn symbol(self) -> &'static str {
        match self {
            OpKind::Add => "+",
            OpKind::Sub => "-",
            OpKind::Mul => "*",
            OpKind::Div => "/",
            OpKind::Rem => "%",
            OpKind::BitOr => "|",
            OpKind::BitAnd => "&",
            OpKind::BitXor => "^",
            OpKind::Eq => "=",
            OpKind::NotEq => "!=",
            OpKind::Less => "<",
            OpKind::LessEq => "<=",
            OpKind::Greater => ">",
            OpKind::GreaterEq => ">=",
        }
    }

    /// Whether the operator accepts more than two operands.
    ///
    /// Only arithmetic that folds left is variadic; everything else is
    /// strictly binary.
    pub fn is_variadic(self) -> bool {
        matches!(self, OpKind::Add | OpKind::Sub | OpKind::Mul | OpKind::Div)
    }

    /// Whether the operator yields a boolean.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            OpKind::Eq
                | OpKind::NotEq
                | OpKind::Less
                | OpKind::LessEq
                | OpKind::Greater
                | OpKind::GreaterEq
        )
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryKind {
    /// Arithmetic negation.
    Neg,
    /// Bitwise complement (integers only).
    BitNot,
}

impl UnaryKind {
    pub fn name(self) -> &'static str {
        match self {
            UnaryKind::Neg => "neg",
            UnaryKind::BitNot => "bitnot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variadic_ops() {
        assert!(OpKind::Add.is_variadic());
        assert!(OpKind::Div.is_variadic());
        assert!(!OpKind::Rem.is_variadic());
        assert!(!OpKind::Less.is_variadic());
    }

    #[test]
    fn comparisons() {
        assert!(OpKind::NotEq.is_comparison());
        assert!(OpKind::GreaterEq.is_comparison());
        assert!(!OpKind::BitXor.is_comparison());
    }
}
