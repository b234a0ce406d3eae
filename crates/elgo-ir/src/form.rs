//! The `Form` node type.

use elgo_core::{Family, FunctionTable};

use crate::{OpKind, UnaryKind};

/// A node of the intermediate representation.
///
/// Statements and expressions share one type. Whether a form is used for
/// its value or its effect is decided by the position it appears in;
/// [`Form::is_stmt`] names the variants that never produce a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    // ==========================================================================
    // Atoms
    // ==========================================================================
    Bool(bool),
    Char(char),
    Int(i64),
    Float(f64),
    Str(String),
    /// Interned symbol literal.
    Symbol(String),

    /// Reference to a lexical or dynamic variable.
    Var(String),

    // ==========================================================================
    // Composite literals
    // ==========================================================================
    /// Dense array literal.
    ArrayLit(Vec<Form>),
    /// Array literal with only some indices initialized.
    ///
    /// `ctor` allocates the full backing array; each `(index, value)` pair is
    /// stored into it afterwards.
    SparseArrayLit {
        ctor: Box<Form>,
        vals: Vec<(i64, Form)>,
    },

    // ==========================================================================
    // Control flow
    // ==========================================================================
    Block(Block),
    If {
        cond: Box<Form>,
        then: Block,
        /// Either another `If` or a `Block`.
        els: Option<Box<Form>>,
    },
    /// Pre-test loop. `post` runs after each iteration and is the target of
    /// `continue`.
    Loop {
        cond: Box<Form>,
        body: Block,
        post: Option<Box<Form>>,
    },
    Return(Vec<Form>),
    Break,
    Continue,

    // ==========================================================================
    // Bindings
    // ==========================================================================
    /// Introduce a new lexical binding.
    Bind { name: String, init: Box<Form> },
    /// Update an existing lexical binding or a dynamic variable.
    Rebind { name: String, expr: Box<Form> },

    // ==========================================================================
    // Operators
    // ==========================================================================
    /// Typed operation; all `args` belong to `family`.
    Op {
        kind: OpKind,
        family: Family,
        args: Vec<Form>,
    },
    Unary {
        kind: UnaryKind,
        family: Family,
        arg: Box<Form>,
    },
    Not(Box<Form>),
    And(Box<Form>, Box<Form>),
    Or(Box<Form>, Box<Form>),

    // ==========================================================================
    // Calls
    // ==========================================================================
    /// Direct call by name. The calling convention comes from the
    /// [`FunctionTable`].
    Call { name: String, args: Vec<Form> },
    /// Call through a callable value.
    DynCall {
        callable: Box<Form>,
        args: Vec<Form>,
    },
    /// Result `n` (0-based, `n >= 1`) of the most recent multi-result call.
    MultiValueRef(usize),

    // ==========================================================================
    // Arrays
    // ==========================================================================
    /// Duplicate an array so the new binding does not alias the source.
    ArrayCopy(Box<Form>),
    ArrayIndex {
        array: Box<Form>,
        index: Box<Form>,
    },
    ArrayUpdate {
        array: Box<Form>,
        index: Box<Form>,
        value: Box<Form>,
    },
}

impl Form {
    pub fn var(name: impl Into<String>) -> Self {
        Form::Var(name.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Form::Str(s.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Form>) -> Self {
        Form::Call {
            name: name.into(),
            args,
        }
    }

    pub fn bind(name: impl Into<String>, init: Form) -> Self {
        Form::Bind {
            name: name.into(),
            init: Box::new(init),
        }
    }

    pub fn rebind(name: impl Into<String>, expr: Form) -> Self {
        Form::Rebind {
            name: name.into(),
            expr: Box::new(expr),
        }
    }

    pub fn op(kind: OpKind, family: Family, args: Vec<Form>) -> Self {
        Form::Op { kind, family, args }
    }

    /// Whether this form is a literal atom.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Form::Bool(_)
                | Form::Char(_)
                | Form::Int(_)
                | Form::Float(_)
                | Form::Str(_)
                | Form::Symbol(_)
        )
    }

    /// The operand family of an atom, if it has one.
    pub fn atom_family(&self) -> Option<Family> {
        match self {
            Form::Int(_) | Form::Char(_) => Some(Family::Int),
            Form::Float(_) => Some(Family::Float),
            Form::Str(_) => Some(Family::String),
            _ => None,
        }
    }

    /// Whether this form is a call to a function that yields no value.
    pub fn is_void_call(&self, functions: &FunctionTable) -> bool {
        matches!(self, Form::Call { name, .. } if functions.is_void(name))
    }

    /// Whether this form is a call to a function that never returns.
    pub fn is_panic_call(&self, functions: &FunctionTable) -> bool {
        matches!(self, Form::Call { name, .. } if functions.is_panic(name))
    }

    /// Whether this form is only meaningful in statement position.
    pub fn is_stmt(&self) -> bool {
        matches!(
            self,
            Form::Block(_)
                | Form::If { .. }
                | Form::Loop { .. }
                | Form::Return(_)
                | Form::Break
                | Form::Continue
                | Form::Bind { .. }
                | Form::Rebind { .. }
                | Form::ArrayUpdate { .. }
        )
    }
}

/// A statement list that owns the lexical bindings made at its own level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    forms: Vec<Form>,
    locals: usize,
}

impl Block {
    /// Create a block; the local count is derived from the top-level `Bind`
    /// forms so it cannot disagree with the body.
    pub fn new(forms: Vec<Form>) -> Self {
        let locals = forms
            .iter()
            .filter(|f| matches!(f, Form::Bind { .. }))
            .count();
        Self { forms, locals }
    }

    /// The statements of this block.
    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    /// Number of stack slots this block binds at its own level.
    pub fn locals(&self) -> usize {
        self.locals
    }

    /// The last statement, if any.
    pub fn last(&self) -> Option<&Form> {
        self.forms.last()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Append a statement, keeping the local count in sync.
    pub fn push(&mut self, form: Form) {
        if matches!(form, Form::Bind { .. }) {
            self.locals += 1;
        }
        self.forms.push(form);
    }
}

impl From<Vec<Form>> for Block {
    fn from(forms: Vec<Form>) -> Self {
        Block::new(forms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elgo_core::FuncFlags;

    #[test]
    fn block_counts_own_level_binds() {
        let inner = Block::new(vec![Form::bind("z", Form::Int(3))]);
        let block = Block::new(vec![
            Form::bind("x", Form::Int(1)),
            Form::rebind("x", Form::Int(2)),
            Form::Block(inner),
            Form::bind("y", Form::var("x")),
        ]);
        assert_eq!(block.locals(), 2);
    }

    #[test]
    fn block_push_tracks_locals() {
        let mut block = Block::default();
        block.push(Form::call("f", vec![]));
        block.push(Form::bind("a", Form::Bool(true)));
        assert_eq!(block.locals(), 1);
        assert_eq!(block.forms().len(), 2);
    }

    #[test]
    fn atoms() {
        assert!(Form::Int(1).is_atom());
        assert!(Form::Symbol("foo".into()).is_atom());
        assert!(!Form::var("x").is_atom());
        assert_eq!(Form::Char('a').atom_family(), Some(Family::Int));
        assert_eq!(Form::Bool(true).atom_family(), None);
    }

    #[test]
    fn call_predicates() {
        let mut table = FunctionTable::new();
        table.declare("log", FuncFlags::VOID).unwrap();
        table.declare("Go--panic", FuncFlags::PANIC).unwrap();

        assert!(Form::call("log", vec![]).is_void_call(&table));
        assert!(Form::call("Go--panic", vec![]).is_panic_call(&table));
        assert!(!Form::call("length", vec![]).is_void_call(&table));
        assert!(!Form::var("log").is_void_call(&table));
    }

    #[test]
    fn stmt_classification() {
        assert!(Form::Break.is_stmt());
        assert!(Form::bind("x", Form::Int(0)).is_stmt());
        assert!(!Form::call("f", vec![]).is_stmt());
        assert!(!Form::MultiValueRef(1).is_stmt());
    }
}
