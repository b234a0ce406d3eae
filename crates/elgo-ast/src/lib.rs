//! Typed source AST for elgo.
//!
//! This is the contract between an external front-end (parser plus type
//! checker) and the converter. Nodes are arena-allocated with
//! [`bumpalo`] and are `Copy`; every expression carries its resolved
//! static type and every node its [`Span`](elgo_core::Span).
//!
//! Use [`AstBuilder`] to construct trees by hand.

mod builder;
mod expr;
mod ops;
mod stmt;
mod types;

pub use builder::AstBuilder;
pub use expr::{
    BinaryExpr, CallExpr, CallTarget, CompositeLit, ConstValue, Element, Expr, Ident, IdentExpr,
    IndexExpr, LitExpr, ParenExpr, UnaryExpr,
};
pub use ops::{AssignOp, BinaryOp, UnaryOp};
pub use stmt::{
    AssignStmt, BlockStmt, DeclKind, DeclStmt, ExprStmt, ForStmt, FuncDecl, IfStmt, IncDecStmt,
    Package, Param, ReturnStmt, Stmt, ValueSpec,
};
pub use types::{ScalarKind, TypeKind};
