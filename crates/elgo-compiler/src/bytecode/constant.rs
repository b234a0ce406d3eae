//! Per-function constant pool.
//!
//! Every literal an instruction refers to (symbols, integers, floats,
//! strings) lives here and is addressed by index. Inserting an equal value
//! twice yields the same index.

use std::fmt;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

/// A value stored in the constant pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Interned symbol; also names functions and dynamic variables.
    Symbol(String),
    /// Integer; characters are stored as their code point.
    Int(i64),
    /// Float, compared by value so equal floats share a slot.
    Float(OrderedFloat<f64>),
    /// String literal.
    Str(String),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Symbol(s) => f.write_str(s),
            Constant::Int(v) => write!(f, "{v}"),
            Constant::Float(v) => write!(f, "{:?}", v.0),
            Constant::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Append-only constant pool with deduplication.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    constants: Vec<Constant>,
    index: FxHashMap<Constant, usize>,
}

impl ConstantPool {
    /// Create a new empty constant pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get an existing constant, returning its index.
    pub fn add(&mut self, constant: Constant) -> usize {
        if let Some(&idx) = self.index.get(&constant) {
            return idx;
        }

        let idx = self.constants.len();
        self.constants.push(constant.clone());
        self.index.insert(constant, idx);
        idx
    }

    /// Add a symbol constant.
    pub fn add_symbol(&mut self, name: &str) -> usize {
        self.add(Constant::Symbol(name.to_string()))
    }

    /// Add an integer constant.
    pub fn add_int(&mut self, value: i64) -> usize {
        self.add(Constant::Int(value))
    }

    /// Add a float constant.
    pub fn add_float(&mut self, value: f64) -> usize {
        self.add(Constant::Float(OrderedFloat(value)))
    }

    /// Add a string constant.
    pub fn add_string(&mut self, value: &str) -> usize {
        self.add(Constant::Str(value.to_string()))
    }

    /// Get constant by index.
    pub fn get(&self, index: usize) -> Option<&Constant> {
        self.constants.get(index)
    }

    /// Index of `constant`, if it was added.
    pub fn find(&self, constant: &Constant) -> Option<usize> {
        self.index.get(constant).copied()
    }

    /// Get all constants, in index order.
    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}
