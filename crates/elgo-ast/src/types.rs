//! Static type classification attached to AST nodes by the front-end.

use elgo_core::Family;

/// Element classification of arrays and slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    String,
    Char,
    Symbol,
    /// Dynamically typed host value.
    Object,
}

impl ScalarKind {
    /// The scalar as a full type.
    pub fn as_type(self) -> TypeKind {
        match self {
            ScalarKind::Bool => TypeKind::Bool,
            ScalarKind::Int => TypeKind::Int,
            ScalarKind::Float => TypeKind::Float,
            ScalarKind::String => TypeKind::String,
            ScalarKind::Char => TypeKind::Char,
            ScalarKind::Symbol => TypeKind::Symbol,
            ScalarKind::Object => TypeKind::Object,
        }
    }
}

/// Static type of an expression, as resolved by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Bool,
    Int,
    Float,
    String,
    Char,
    Symbol,
    /// Dynamically typed host value.
    Object,
    /// Fixed-length array with value semantics.
    Array(ScalarKind, u32),
    /// Slice (reference semantics).
    Slice(ScalarKind),
    /// No value (call to a void function).
    Void,
    /// Several values (call to a multi-result function).
    Tuple(u8),
}

impl TypeKind {
    /// The operand family used to select typed operators.
    pub fn family(self) -> Option<Family> {
        match self {
            TypeKind::Int | TypeKind::Char => Some(Family::Int),
            TypeKind::Float => Some(Family::Float),
            TypeKind::String => Some(Family::String),
            _ => None,
        }
    }

    /// Whether values of this type are copied on assignment.
    pub fn is_array(self) -> bool {
        matches!(self, TypeKind::Array(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families() {
        assert_eq!(TypeKind::Int.family(), Some(Family::Int));
        assert_eq!(TypeKind::Char.family(), Some(Family::Int));
        assert_eq!(TypeKind::Float.family(), Some(Family::Float));
        assert_eq!(TypeKind::String.family(), Some(Family::String));
        assert_eq!(TypeKind::Bool.family(), None);
        assert_eq!(TypeKind::Array(ScalarKind::Int, 3).family(), None);
    }

    #[test]
    fn array_value_semantics() {
        assert!(TypeKind::Array(ScalarKind::Float, 2).is_array());
        assert!(!TypeKind::Slice(ScalarKind::Float).is_array());
    }
}
