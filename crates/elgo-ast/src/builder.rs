//! Arena-backed AST construction helpers.
//!
//! Front-ends (and tests) use [`AstBuilder`] to allocate typed nodes in a
//! [`Bump`] arena without spelling out every struct literal. Leaves get a
//! synthetic span; binary and index nodes cover their operands.
//!
//! ```
//! use bumpalo::Bump;
//! use elgo_ast::{AstBuilder, BinaryOp, TypeKind};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let a = b.var("a", TypeKind::Int);
//! let sum = b.binary(a, BinaryOp::Add, b.int(1));
//! assert_eq!(sum.ty(), TypeKind::Int);
//! ```

use bumpalo::Bump;
use elgo_core::Span;

use crate::*;

/// Allocates AST nodes in an arena.
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder over `arena`.
    pub fn new(arena: &'ast Bump) -> Self {
        Self { arena }
    }

    /// The underlying arena.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    fn str(&self, s: &str) -> &'ast str {
        self.arena.alloc_str(s)
    }

    fn expr(&self, e: Expr<'ast>) -> &'ast Expr<'ast> {
        self.arena.alloc(e)
    }

    fn exprs(&self, es: &[Expr<'ast>]) -> &'ast [Expr<'ast>] {
        self.arena.alloc_slice_copy(es)
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn lit(&self, value: ConstValue<'ast>, ty: TypeKind) -> Expr<'ast> {
        Expr::Lit(LitExpr {
            value,
            ty,
            span: Span::default(),
        })
    }

    pub fn int(&self, v: i64) -> Expr<'ast> {
        self.lit(ConstValue::Int(v), TypeKind::Int)
    }

    pub fn float(&self, v: f64) -> Expr<'ast> {
        self.lit(ConstValue::Float(v), TypeKind::Float)
    }

    pub fn string(&self, s: &str) -> Expr<'ast> {
        self.lit(ConstValue::Str(self.str(s)), TypeKind::String)
    }

    pub fn boolean(&self, v: bool) -> Expr<'ast> {
        self.lit(ConstValue::Bool(v), TypeKind::Bool)
    }

    pub fn char(&self, c: char) -> Expr<'ast> {
        self.lit(ConstValue::Char(c), TypeKind::Char)
    }

    fn ident_expr(
        &self,
        name: &str,
        ty: TypeKind,
        is_def: bool,
        value: Option<ConstValue<'ast>>,
    ) -> Expr<'ast> {
        Expr::Ident(IdentExpr {
            ident: Ident::new(self.str(name), Span::default()),
            is_def,
            ty,
            value,
        })
    }

    /// A use of an existing variable.
    pub fn var(&self, name: &str, ty: TypeKind) -> Expr<'ast> {
        self.ident_expr(name, ty, false, None)
    }

    /// A defining occurrence (left side of `:=`).
    pub fn def(&self, name: &str, ty: TypeKind) -> Expr<'ast> {
        self.ident_expr(name, ty, true, None)
    }

    /// A use of a named constant with its folded value.
    pub fn constant(&self, name: &str, ty: TypeKind, value: ConstValue<'ast>) -> Expr<'ast> {
        self.ident_expr(name, ty, false, Some(value))
    }

    /// A binary expression; comparisons and logical operators yield `Bool`.
    pub fn binary(&self, left: Expr<'ast>, op: BinaryOp, right: Expr<'ast>) -> Expr<'ast> {
        let ty = match op {
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Less
            | BinaryOp::LessEq
            | BinaryOp::Greater
            | BinaryOp::GreaterEq
            | BinaryOp::LogicalAnd
            | BinaryOp::LogicalOr => TypeKind::Bool,
            _ => left.ty(),
        };
        Expr::Binary(self.arena.alloc(BinaryExpr {
            left: self.expr(left),
            op,
            right: self.expr(right),
            ty,
            span: left.span().cover(right.span()),
        }))
    }

    pub fn unary(&self, op: UnaryOp, operand: Expr<'ast>) -> Expr<'ast> {
        let ty = match op {
            UnaryOp::Not => TypeKind::Bool,
            _ => operand.ty(),
        };
        Expr::Unary(self.arena.alloc(UnaryExpr {
            op,
            operand: self.expr(operand),
            ty,
            span: Span::default(),
        }))
    }

    fn call_expr(&self, target: CallTarget<'ast>, args: &[Expr<'ast>], ty: TypeKind) -> Expr<'ast> {
        Expr::Call(self.arena.alloc(CallExpr {
            target,
            args: self.exprs(args),
            ty,
            span: Span::default(),
        }))
    }

    /// Call of a package function or Go builtin.
    pub fn call(&self, name: &str, args: &[Expr<'ast>], ty: TypeKind) -> Expr<'ast> {
        self.call_expr(CallTarget::Func(self.str(name)), args, ty)
    }

    /// Call of a host intrinsic (`lisp.Name(...)`).
    pub fn intrinsic(&self, name: &str, args: &[Expr<'ast>], ty: TypeKind) -> Expr<'ast> {
        self.call_expr(CallTarget::Intrinsic(self.str(name)), args, ty)
    }

    /// Method call on a host value (`recv.Name()`).
    pub fn method(&self, recv: Expr<'ast>, name: &str, ty: TypeKind) -> Expr<'ast> {
        let target = CallTarget::Method {
            recv: self.expr(recv),
            name: self.str(name),
        };
        self.call_expr(target, &[], ty)
    }

    pub fn index(&self, base: Expr<'ast>, index: Expr<'ast>, elem: TypeKind) -> Expr<'ast> {
        Expr::Index(self.arena.alloc(IndexExpr {
            base: self.expr(base),
            index: self.expr(index),
            ty: elem,
            span: base.span().cover(index.span()),
        }))
    }

    /// Array literal; `None` keys are positional.
    pub fn array_lit(&self, ty: TypeKind, elems: &[(Option<i64>, Expr<'ast>)]) -> Expr<'ast> {
        let elems = self
            .arena
            .alloc_slice_fill_iter(elems.iter().map(|&(key, value)| Element { key, value }));
        Expr::CompositeLit(self.arena.alloc(CompositeLit {
            ty,
            elems,
            span: Span::default(),
        }))
    }

    pub fn paren(&self, e: Expr<'ast>) -> Expr<'ast> {
        Expr::Paren(self.arena.alloc(ParenExpr {
            expr: self.expr(e),
            span: Span::default(),
        }))
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    pub fn expr_stmt(&self, e: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr: self.expr(e),
            span: Span::default(),
        })
    }

    pub fn assign_op(&self, lhs: &[Expr<'ast>], op: AssignOp, rhs: &[Expr<'ast>]) -> Stmt<'ast> {
        Stmt::Assign(self.arena.alloc(AssignStmt {
            lhs: self.exprs(lhs),
            op,
            rhs: self.exprs(rhs),
            span: Span::default(),
        }))
    }

    /// `lhs := rhs`; every `lhs` must be built with [`AstBuilder::def`].
    pub fn define(&self, lhs: &[Expr<'ast>], rhs: &[Expr<'ast>]) -> Stmt<'ast> {
        self.assign_op(lhs, AssignOp::Define, rhs)
    }

    /// `lhs = rhs`
    pub fn assign(&self, lhs: &[Expr<'ast>], rhs: &[Expr<'ast>]) -> Stmt<'ast> {
        self.assign_op(lhs, AssignOp::Assign, rhs)
    }

    /// `var names ty [= values]`
    pub fn var_decl(&self, names: &[&str], ty: TypeKind, values: &[Expr<'ast>]) -> Stmt<'ast> {
        let names = self.arena.alloc_slice_fill_iter(
            names
                .iter()
                .map(|n| Ident::new(self.str(n), Span::default())),
        );
        let spec = ValueSpec {
            names,
            ty,
            values: self.exprs(values),
            span: Span::default(),
        };
        Stmt::Decl(DeclStmt {
            kind: DeclKind::Var,
            specs: self.arena.alloc_slice_copy(&[spec]),
            span: Span::default(),
        })
    }

    pub fn inc(&self, target: Expr<'ast>) -> Stmt<'ast> {
        Stmt::IncDec(IncDecStmt {
            target: self.expr(target),
            inc: true,
            span: Span::default(),
        })
    }

    pub fn dec(&self, target: Expr<'ast>) -> Stmt<'ast> {
        Stmt::IncDec(IncDecStmt {
            target: self.expr(target),
            inc: false,
            span: Span::default(),
        })
    }

    pub fn ret(&self, results: &[Expr<'ast>]) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            results: self.exprs(results),
            span: Span::default(),
        })
    }

    pub fn block(&self, stmts: &[Stmt<'ast>]) -> BlockStmt<'ast> {
        BlockStmt {
            stmts: self.arena.alloc_slice_copy(stmts),
            span: Span::default(),
        }
    }

    pub fn block_stmt(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(self.block(stmts))
    }

    pub fn if_stmt(
        &self,
        cond: Expr<'ast>,
        then: &[Stmt<'ast>],
        els: Option<Stmt<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::If(self.arena.alloc(IfStmt {
            init: None,
            cond: self.expr(cond),
            then: self.block(then),
            els: els.map(|s| &*self.arena.alloc(s)),
            span: Span::default(),
        }))
    }

    /// `if init; cond { then }`
    pub fn if_init(&self, init: Stmt<'ast>, cond: Expr<'ast>, then: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::If(self.arena.alloc(IfStmt {
            init: Some(self.arena.alloc(init)),
            cond: self.expr(cond),
            then: self.block(then),
            els: None,
            span: Span::default(),
        }))
    }

    pub fn for_stmt(
        &self,
        init: Option<Stmt<'ast>>,
        cond: Option<Expr<'ast>>,
        post: Option<Stmt<'ast>>,
        body: &[Stmt<'ast>],
    ) -> Stmt<'ast> {
        Stmt::For(self.arena.alloc(ForStmt {
            init: init.map(|s| &*self.arena.alloc(s)),
            cond: cond.map(|e| self.expr(e)),
            post: post.map(|s| &*self.arena.alloc(s)),
            body: self.block(body),
            span: Span::default(),
        }))
    }

    /// `for cond { body }`
    pub fn while_stmt(&self, cond: Expr<'ast>, body: &[Stmt<'ast>]) -> Stmt<'ast> {
        self.for_stmt(None, Some(cond), None, body)
    }

    pub fn brk(&self) -> Stmt<'ast> {
        Stmt::Break(Span::default())
    }

    pub fn cont(&self) -> Stmt<'ast> {
        Stmt::Continue(Span::default())
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    pub fn param(&self, name: &str, ty: TypeKind) -> Param<'ast> {
        Param {
            name: Ident::new(self.str(name), Span::default()),
            ty,
        }
    }

    pub fn func(
        &self,
        name: &str,
        params: &[Param<'ast>],
        results: &[TypeKind],
        body: &[Stmt<'ast>],
    ) -> FuncDecl<'ast> {
        FuncDecl {
            name: self.str(name),
            params: self.arena.alloc_slice_copy(params),
            results: self.arena.alloc_slice_copy(results),
            body: self.block(body),
            span: Span::default(),
        }
    }

    pub fn package(&self, name: &str, funcs: &[FuncDecl<'ast>]) -> Package<'ast> {
        Package {
            name: self.str(name),
            funcs: self.arena.alloc_slice_copy(funcs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_is_bool() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let e = b.binary(b.string("a"), BinaryOp::Less, b.string("b"));
        assert_eq!(e.ty(), TypeKind::Bool);
    }

    #[test]
    fn binary_span_covers_operands() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let lit = |col, value| {
            Expr::Lit(LitExpr {
                value: ConstValue::Int(value),
                ty: TypeKind::Int,
                span: Span::new(7, col, 1),
            })
        };
        let sum = b.binary(lit(3, 1), BinaryOp::Add, lit(7, 2));
        assert_eq!(sum.span(), Span::new(7, 3, 5));
        let generated = b.binary(b.int(1), BinaryOp::Add, b.int(2));
        assert!(generated.span().is_synthetic());
    }

    #[test]
    fn define_marks_definitions() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let s = b.define(&[b.def("x", TypeKind::Int)], &[b.int(1)]);
        let Stmt::Assign(assign) = s else {
            panic!("expected assignment");
        };
        assert_eq!(assign.op, AssignOp::Define);
        assert!(matches!(
            assign.lhs[0],
            Expr::Ident(IdentExpr { is_def: true, .. })
        ));
    }

    #[test]
    fn package_lookup() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let pkg = b.package("main", &[b.func("main.f", &[], &[], &[])]);
        assert!(pkg.func("main.f").is_some());
        assert!(pkg.func("main.g").is_none());
    }
}
