//! Statement and declaration AST nodes.

use elgo_core::Span;

use crate::expr::{Expr, Ident};
use crate::{AssignOp, TypeKind};

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// Expression statement
    Expr(ExprStmt<'ast>),
    /// `var` / `const` declaration
    Decl(DeclStmt<'ast>),
    /// Assignment or short variable declaration
    Assign(&'ast AssignStmt<'ast>),
    /// `x++` / `x--`
    IncDec(IncDecStmt<'ast>),
    /// Return statement
    Return(ReturnStmt<'ast>),
    /// Block statement
    Block(BlockStmt<'ast>),
    /// If statement
    If(&'ast IfStmt<'ast>),
    /// For loop
    For(&'ast ForStmt<'ast>),
    /// Break statement
    Break(Span),
    /// Continue statement
    Continue(Span),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(s) => s.span,
            Self::Decl(s) => s.span,
            Self::Assign(s) => s.span,
            Self::IncDec(s) => s.span,
            Self::Return(s) => s.span,
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::For(s) => s.span,
            Self::Break(span) | Self::Continue(span) => *span,
        }
    }
}

/// An expression evaluated for its side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

/// Declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Const,
    Type,
}

/// A declaration statement with one or more value specs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeclStmt<'ast> {
    pub kind: DeclKind,
    pub specs: &'ast [ValueSpec<'ast>],
    pub span: Span,
}

/// `names [ty] [= values]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSpec<'ast> {
    pub names: &'ast [Ident<'ast>],
    pub ty: TypeKind,
    /// Empty when the names are zero-initialized.
    pub values: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `lhs tok rhs`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    pub lhs: &'ast [Expr<'ast>],
    pub op: AssignOp,
    pub rhs: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `target++` or `target--`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncDecStmt<'ast> {
    pub target: &'ast Expr<'ast>,
    pub inc: bool,
    pub span: Span,
}

/// `return results...`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub results: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `{ stmts... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStmt<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// `if [init;] cond { then } [else els]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub init: Option<&'ast Stmt<'ast>>,
    pub cond: &'ast Expr<'ast>,
    pub then: BlockStmt<'ast>,
    /// Either another `If` or a `Block`.
    pub els: Option<&'ast Stmt<'ast>>,
    pub span: Span,
}

/// `for [init]; [cond]; [post] { body }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForStmt<'ast> {
    pub init: Option<&'ast Stmt<'ast>>,
    pub cond: Option<&'ast Expr<'ast>>,
    pub post: Option<&'ast Stmt<'ast>>,
    pub body: BlockStmt<'ast>,
    pub span: Span,
}

/// A function parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub name: Ident<'ast>,
    pub ty: TypeKind,
}

/// A function declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuncDecl<'ast> {
    /// Qualified host-level name.
    pub name: &'ast str,
    pub params: &'ast [Param<'ast>],
    pub results: &'ast [TypeKind],
    pub body: BlockStmt<'ast>,
    pub span: Span,
}

/// A type-checked package.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Package<'ast> {
    pub name: &'ast str,
    pub funcs: &'ast [FuncDecl<'ast>],
}

impl<'ast> Package<'ast> {
    /// Find a function by name.
    pub fn func(&self, name: &str) -> Option<&FuncDecl<'ast>> {
        self.funcs.iter().find(|f| f.name == name)
    }
}
