//! Compilation unit API.
//!
//! A unit compiles one package against a sealed [`Context`]. Building runs
//! two passes: every package function's calling convention is registered
//! first, so calls may target functions declared later in the package;
//! then each function is converted and compiled independently.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use elgo::ast::{AstBuilder, BinaryOp, TypeKind};
//! use elgo::Context;
//! use std::sync::Arc;
//!
//! let mut ctx = Context::with_runtime().unwrap();
//! ctx.seal();
//! let ctx = Arc::new(ctx);
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let a = b.var("a", TypeKind::Int);
//! let inc = b.func(
//!     "main.inc",
//!     &[b.param("a", TypeKind::Int)],
//!     &[TypeKind::Int],
//!     &[b.ret(&[b.binary(a, BinaryOp::Add, b.int(1))])],
//! );
//! let package = b.package("main", &[inc]);
//!
//! let mut unit = ctx.create_unit().unwrap();
//! let module = unit.build(&package).unwrap();
//! assert_eq!(module.len(), 1);
//! ```

use std::sync::Arc;

use elgo_ast::Package;
use elgo_compiler::{CompiledModule, Compiler};
use elgo_core::{CompilationError, ElgoError, FuncFlags, RegistrationError};
use tracing::{debug, debug_span};

use crate::context::Context;

/// A compilation unit.
#[derive(Debug)]
pub struct Unit {
    /// Sealed configuration shared with other units
    context: Arc<Context>,

    /// Compiled module (available after build)
    compiled: Option<CompiledModule>,
}

impl Unit {
    /// Create a compilation unit with a context.
    ///
    /// This is typically called via `Context::create_unit()`.
    pub fn with_context(context: Arc<Context>) -> Self {
        Self {
            context,
            compiled: None,
        }
    }

    /// Build the unit by compiling every function of `package`.
    ///
    /// # Errors
    ///
    /// Stops at the first function that fails to compile; nothing is kept
    /// from a failed build.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&mut self, package: &Package<'_>) -> Result<&CompiledModule, BuildError> {
        if self.compiled.is_some() {
            return Err(BuildError::AlreadyBuilt);
        }
        if package.funcs.is_empty() {
            return Err(BuildError::NoFunctions);
        }

        let _span = debug_span!("build", package = package.name).entered();

        // Pass 1: signatures
        let mut functions = self.context.functions().clone();
        for decl in package.funcs {
            let flags = if decl.results.is_empty() {
                FuncFlags::VOID
            } else {
                FuncFlags::empty()
            };
            functions.declare(decl.name, flags)?;
        }

        // Pass 2: bodies
        let compiler = Compiler::new(&functions, self.context.ffi());
        let mut module = CompiledModule::default();
        for decl in package.funcs {
            let compiled = compiler
                .compile_function(decl)
                .map_err(|source| BuildError::Compilation {
                    function: decl.name.to_string(),
                    source,
                })?;
            module.functions.push(compiled);
        }

        debug!(functions = module.len(), "unit built");
        Ok(self.compiled.insert(module))
    }

    /// Check if the unit has been built.
    pub fn is_built(&self) -> bool {
        self.compiled.is_some()
    }

    /// Get the compiled module (available after build).
    pub fn compiled(&self) -> Option<&CompiledModule> {
        self.compiled.as_ref()
    }

    /// Get the number of compiled functions (available after build).
    pub fn function_count(&self) -> usize {
        self.compiled.as_ref().map_or(0, CompiledModule::len)
    }

    /// Reset to the unbuilt state so another package can be compiled.
    pub fn clear(&mut self) {
        self.compiled = None;
    }
}

/// Errors that can occur during unit building.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// Unit has already been built
    #[error("Unit has already been built")]
    AlreadyBuilt,

    /// The package declares no functions
    #[error("No functions in package")]
    NoFunctions,

    /// A package function clashes with a declared one
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A function failed to compile
    #[error("in function '{function}': {source}")]
    Compilation {
        function: String,
        source: CompilationError,
    },
}

impl BuildError {
    /// Get the underlying error as an `ElgoError`, if any.
    pub fn as_elgo_error(&self) -> Option<ElgoError> {
        match self {
            BuildError::Registration(err) => Some(ElgoError::from(err.clone())),
            BuildError::Compilation { source, .. } => Some(ElgoError::from(source.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use elgo_ast::{AstBuilder, TypeKind};

    fn unit() -> Unit {
        let mut ctx = Context::with_runtime().unwrap();
        ctx.seal();
        Arc::new(ctx).create_unit().unwrap()
    }

    #[test]
    fn build_simple_unit() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let package = b.package("main", &[b.func("main.main", &[], &[], &[])]);

        let mut unit = unit();
        unit.build(&package).unwrap();

        assert!(unit.is_built());
        assert_eq!(unit.function_count(), 1);
    }

    #[test]
    fn build_twice_fails() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let package = b.package("main", &[b.func("main.main", &[], &[], &[])]);

        let mut unit = unit();
        unit.build(&package).unwrap();
        assert_eq!(unit.build(&package).unwrap_err(), BuildError::AlreadyBuilt);

        unit.clear();
        assert!(unit.build(&package).is_ok());
    }

    #[test]
    fn build_fails_with_no_functions() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let package = b.package("main", &[]);
        assert_eq!(unit().build(&package).unwrap_err(), BuildError::NoFunctions);
    }

    #[test]
    fn duplicate_function() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.func("main.f", &[], &[], &[]);
        let package = b.package("main", &[f, f]);

        let err = unit().build(&package).unwrap_err();
        assert_eq!(
            err,
            BuildError::Registration(RegistrationError::DuplicateFunction("main.f".into()))
        );
        assert!(err.as_elgo_error().unwrap().is_registration());
    }

    #[test]
    fn compilation_error_names_function() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.call("main.missing", &[], TypeKind::Int);
        let package = b.package(
            "main",
            &[b.func("main.f", &[], &[TypeKind::Int], &[b.ret(&[call])])],
        );

        let mut unit = unit();
        let err = unit.build(&package).unwrap_err();
        assert!(matches!(
            &err,
            BuildError::Compilation { function, source: CompilationError::UnresolvedSymbol { .. } }
                if function == "main.f"
        ));
        assert!(err.as_elgo_error().unwrap().is_compilation());
        assert!(!unit.is_built());
    }
}
