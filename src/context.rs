//! Compilation context.
//!
//! A `Context` collects everything compilation needs to know about the
//! host: the calling convention of host functions and the FFI bindings
//! of the intrinsic package. Once sealed it is immutable and can be shared
//! by any number of units.
//!
//! # Example
//!
//! ```
//! use elgo::{Context, FuncFlags};
//! use std::sync::Arc;
//!
//! let mut ctx = Context::with_runtime().unwrap();
//! ctx.declare_function("message", FuncFlags::empty()).unwrap();
//! ctx.register_ffi("Insert", "insert").unwrap();
//! ctx.seal();
//!
//! let ctx = Arc::new(ctx);
//! let unit = ctx.create_unit().unwrap();
//! assert!(!unit.is_built());
//! ```

use std::sync::Arc;
use thiserror::Error;

use elgo_core::{FfiTable, FuncFlags, FunctionTable, RegistrationError, runtime::func};
use tracing::debug;

use crate::unit::Unit;

/// Sealed, shareable compilation configuration.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Host function signatures
    functions: FunctionTable,
    /// Intrinsic identifier to host function bindings
    ffi: FfiTable,
    /// No more registration once set
    sealed: bool,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with the host runtime support functions declared.
    ///
    /// The runtime panic never returns; coercions and interning yield a
    /// value. The context is NOT sealed.
    pub fn with_runtime() -> Result<Self, ContextError> {
        let mut ctx = Self::new();
        ctx.declare_function(func::PANIC, FuncFlags::PANIC)?;
        for name in [
            func::COERCE_BOOL,
            func::COERCE_INT,
            func::COERCE_FLOAT,
            func::COERCE_STRING,
            func::COERCE_SYMBOL,
            func::INTERN,
        ] {
            ctx.declare_function(name, FuncFlags::empty())?;
        }
        Ok(ctx)
    }

    /// Declare the calling convention of a host function.
    ///
    /// # Errors
    ///
    /// `ContextError::AlreadySealed` after [`seal`](Self::seal), or a
    /// registration error for duplicates and conflicting flags.
    pub fn declare_function(
        &mut self,
        name: impl Into<String>,
        flags: FuncFlags,
    ) -> Result<(), ContextError> {
        if self.sealed {
            return Err(ContextError::AlreadySealed);
        }
        self.functions.declare(name, flags)?;
        Ok(())
    }

    /// Bind an intrinsic-package identifier to a host function.
    pub fn register_ffi(
        &mut self,
        ident: impl Into<String>,
        host_name: impl Into<String>,
    ) -> Result<(), ContextError> {
        if self.sealed {
            return Err(ContextError::AlreadySealed);
        }
        self.ffi.register(ident, host_name)?;
        Ok(())
    }

    /// Seal the context. Calling it more than once is a no-op.
    pub fn seal(&mut self) {
        if !self.sealed {
            debug!(
                functions = self.functions.len(),
                ffi = self.ffi.len(),
                "context sealed"
            );
        }
        self.sealed = true;
    }

    /// Check if the context has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Declared host functions.
    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// FFI bindings.
    pub fn ffi(&self) -> &FfiTable {
        &self.ffi
    }

    /// Create a new compilation unit from this context.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::NotSealed` if the context has not been sealed.
    pub fn create_unit(self: &Arc<Self>) -> Result<Unit, ContextError> {
        if !self.is_sealed() {
            return Err(ContextError::NotSealed);
        }
        Ok(Unit::with_context(Arc::clone(self)))
    }
}

/// Errors that can occur during context operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    /// Context is already sealed
    #[error("context is already sealed - cannot register after seal()")]
    AlreadySealed,

    /// Context is not sealed
    #[error("context is not sealed - call seal() before create_unit()")]
    NotSealed,

    /// A signature or binding could not be registered
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}
