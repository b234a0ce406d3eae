//! Expression AST nodes.
//!
//! Every expression carries the static type the front-end resolved for it.
//! Identifiers additionally carry a definition flag and, for constants,
//! the folded value.

use elgo_core::Span;

use crate::{BinaryOp, TypeKind, UnaryOp};

/// A compile-time constant value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue<'ast> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(&'ast str),
}

impl<'ast> ConstValue<'ast> {
    /// The string payload, if this is a string constant.
    pub fn as_str(&self) -> Option<&'ast str> {
        match self {
            ConstValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A name with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    /// The name.
    pub name: &'ast str,
    /// Source location.
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create a new identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }

    /// Whether this is the blank identifier `_`.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Lit(LitExpr<'ast>),
    /// Identifier reference or definition
    Ident(IdentExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Function, intrinsic or method call
    Call(&'ast CallExpr<'ast>),
    /// Array indexing
    Index(&'ast IndexExpr<'ast>),
    /// Array composite literal
    CompositeLit(&'ast CompositeLit<'ast>),
    /// Parenthesized expression
    Paren(&'ast ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Lit(e) => e.span,
            Self::Ident(e) => e.ident.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Call(e) => e.span,
            Self::Index(e) => e.span,
            Self::CompositeLit(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    /// Get the static type of this expression.
    pub fn ty(&self) -> TypeKind {
        match self {
            Self::Lit(e) => e.ty,
            Self::Ident(e) => e.ty,
            Self::Binary(e) => e.ty,
            Self::Unary(e) => e.ty,
            Self::Call(e) => e.ty,
            Self::Index(e) => e.ty,
            Self::CompositeLit(e) => e.ty,
            Self::Paren(e) => e.expr.ty(),
        }
    }

    /// The compile-time value of this expression, if the front-end knows it.
    pub fn const_value(&self) -> Option<ConstValue<'ast>> {
        match self {
            Self::Lit(e) => Some(e.value),
            Self::Ident(e) => e.value,
            Self::Paren(e) => e.expr.const_value(),
            _ => None,
        }
    }

    /// Whether evaluating this expression calls anything.
    pub fn contains_call(&self) -> bool {
        match self {
            Self::Lit(_) | Self::Ident(_) => false,
            Self::Call(_) => true,
            Self::Binary(e) => e.left.contains_call() || e.right.contains_call(),
            Self::Unary(e) => e.operand.contains_call(),
            Self::Index(e) => e.base.contains_call() || e.index.contains_call(),
            Self::CompositeLit(e) => e.elems.iter().any(|el| el.value.contains_call()),
            Self::Paren(e) => e.expr.contains_call(),
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr<'ast> {
        match self {
            Self::Paren(p) => p.expr.unparen(),
            other => other,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LitExpr<'ast> {
    pub value: ConstValue<'ast>,
    pub ty: TypeKind,
    pub span: Span,
}

/// An identifier occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    pub ident: Ident<'ast>,
    /// True when this occurrence defines a fresh variable (`x := ...`).
    pub is_def: bool,
    pub ty: TypeKind,
    /// Folded value when the identifier names a constant.
    pub value: Option<ConstValue<'ast>>,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    /// Result type (`Bool` for comparisons).
    pub ty: TypeKind,
    pub span: Span,
}

/// A unary prefix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: &'ast Expr<'ast>,
    pub ty: TypeKind,
    pub span: Span,
}

/// What a call expression invokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallTarget<'ast> {
    /// A package function or Go builtin, by qualified name.
    Func(&'ast str),
    /// A function of the host intrinsic package (`lisp.Intern`, `lisp.Call`, FFI).
    Intrinsic(&'ast str),
    /// A method on a host value (`x.Int()`).
    Method {
        recv: &'ast Expr<'ast>,
        name: &'ast str,
    },
}

/// A call expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub target: CallTarget<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub ty: TypeKind,
    pub span: Span,
}

/// An index expression `base[index]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    pub base: &'ast Expr<'ast>,
    pub index: &'ast Expr<'ast>,
    /// Element type.
    pub ty: TypeKind,
    pub span: Span,
}

/// One element of a composite literal, optionally keyed by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element<'ast> {
    pub key: Option<i64>,
    pub value: Expr<'ast>,
}

/// An array composite literal `[N]T{...}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeLit<'ast> {
    pub ty: TypeKind,
    pub elems: &'ast [Element<'ast>],
    pub span: Span,
}

/// A parenthesized expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}
