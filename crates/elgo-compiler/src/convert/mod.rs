//! AST-to-IR converter.
//!
//! The [`Converter`] lowers the typed source AST into [`Form`]s. It is the
//! only place that looks at source-level types: operator families, array
//! value semantics, zero values and the intrinsic call surface are all
//! resolved here, so the bytecode compiler only sees host-representable
//! primitives.
//!
//! Conversion never produces partial output. Anything it does not
//! recognize is [`CompilationError::Unsupported`]; a call to a name that is
//! neither an intrinsic, a declared function nor an FFI binding is
//! [`CompilationError::UnresolvedSymbol`].
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use elgo_ast::{AstBuilder, BinaryOp, TypeKind};
//! use elgo_compiler::convert::Converter;
//! use elgo_core::{FfiTable, FunctionTable};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let a = b.var("a", TypeKind::Int);
//! let decl = b.func(
//!     "main.inc",
//!     &[b.param("a", TypeKind::Int)],
//!     &[TypeKind::Int],
//!     &[b.ret(&[b.binary(a, BinaryOp::Add, b.int(1))])],
//! );
//!
//! let (functions, ffi) = (FunctionTable::new(), FfiTable::new());
//! let body = Converter::new(&functions, &ffi).function(&decl).unwrap();
//! assert_eq!(body.to_string(), "(block (return (int+ a 1)))");
//! ```

mod expr;
mod intrinsics;
mod stmt;

use elgo_ast::{BlockStmt, Expr, FuncDecl, Stmt};
use elgo_core::{CompilationError, FfiTable, FunctionTable, Span};
use elgo_ir::{Block, Form};

type Result<T> = std::result::Result<T, CompilationError>;

/// Converts source AST nodes into IR forms.
pub struct Converter<'a> {
    /// Declared functions; a direct call must name one of these
    functions: &'a FunctionTable,
    /// Intrinsic identifiers bound to host functions
    ffi: &'a FfiTable,
    /// Number of enclosing `for` loops
    loop_depth: usize,
}

/// Where an assignment stores its value.
#[derive(Debug, Clone, Copy)]
enum Target<'e, 'ast> {
    /// `_`
    Blank,
    /// A fresh binding.
    Define(&'ast str),
    /// An existing variable.
    Assign(&'ast str),
    /// `base[index]`
    Index {
        base: &'e Expr<'ast>,
        index: &'e Expr<'ast>,
    },
}

impl<'a> Converter<'a> {
    pub fn new(functions: &'a FunctionTable, ffi: &'a FfiTable) -> Self {
        Self {
            functions,
            ffi,
            loop_depth: 0,
        }
    }

    /// Convert a function body.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn function(&mut self, decl: &FuncDecl<'_>) -> Result<Block> {
        self.loop_depth = 0;
        self.block(&decl.body)
    }

    /// Convert a block; its bindings become the block's locals.
    pub fn block(&mut self, block: &BlockStmt<'_>) -> Result<Block> {
        let mut forms = Vec::with_capacity(block.stmts.len());
        for stmt in block.stmts {
            forms.extend(self.stmt(stmt)?);
        }
        Ok(Block::new(forms))
    }

    /// Convert a statement that must be a single form.
    fn stmt_form(&mut self, stmt: &Stmt<'_>) -> Result<Form> {
        let forms = self.stmt(stmt)?;
        Ok(match <[Form; 1]>::try_from(forms) {
            Ok([form]) => form,
            Err(forms) => Form::Block(Block::new(forms)),
        })
    }

    fn target<'e, 'ast>(&self, lhs: &'e Expr<'ast>) -> Result<Target<'e, 'ast>> {
        match lhs {
            Expr::Ident(ident) if ident.ident.is_blank() => Ok(Target::Blank),
            Expr::Ident(ident) if ident.is_def => Ok(Target::Define(ident.ident.name)),
            Expr::Ident(ident) => Ok(Target::Assign(ident.ident.name)),
            Expr::Index(index) => Ok(Target::Index {
                base: index.base,
                index: index.index,
            }),
            Expr::Paren(paren) => self.target(paren.expr),
            other => Err(CompilationError::unsupported(
                "assignment target",
                other.span(),
            )),
        }
    }

    /// Store `value` into `target`.
    ///
    /// A blank target keeps the value only when evaluating it can have an
    /// effect.
    fn store(&mut self, target: Target<'_, '_>, value: Form) -> Result<Option<Form>> {
        Ok(match target {
            Target::Blank if is_pure(&value) => None,
            Target::Blank => Some(value),
            Target::Define(name) => Some(Form::bind(name, value)),
            Target::Assign(name) => Some(Form::rebind(name, value)),
            Target::Index { base, index } => Some(Form::ArrayUpdate {
                array: Box::new(self.expr(base)?),
                index: Box::new(self.expr(index)?),
                value: Box::new(value),
            }),
        })
    }

    fn loop_control(&self, what: &str, span: Span) -> Result<()> {
        if self.loop_depth == 0 {
            return Err(CompilationError::unsupported(
                format!("{what} outside of a loop"),
                span,
            ));
        }
        Ok(())
    }
}

/// Forms whose evaluation has no effect.
fn is_pure(form: &Form) -> bool {
    form.is_atom() || matches!(form, Form::Var(_) | Form::MultiValueRef(_))
}
