//! Unified error types for elgo.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ElgoError (top-level wrapper)
//! ├── RegistrationError - signature / FFI table construction errors
//! └── CompilationError  - conversion and bytecode generation errors
//! ```
//!
//! Every compilation error is fatal for the function being compiled.
//! There is no partial output; recovering (reporting and moving on to the
//! next function) is up to the caller.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur while building the function-signature or FFI tables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A function with this name was already declared.
    #[error("function '{0}' is already declared")]
    DuplicateFunction(String),

    /// An FFI binding with this source identifier already exists.
    #[error("FFI binding '{0}' is already registered")]
    DuplicateFfi(String),

    /// A function was declared both as void and as never-returning.
    #[error("function '{0}' cannot be both void and never-returning")]
    ConflictingFlags(String),
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors that occur during conversion or bytecode generation.
///
/// The variants follow the four fatal categories of the compiler core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A source construct the converter does not handle.
    #[error("at {span}: unsupported {what}")]
    Unsupported {
        /// Description of the construct.
        what: String,
        /// Where the construct appears.
        span: Span,
    },

    /// A call to a name that is neither an intrinsic nor a registered function.
    #[error("at {span}: unresolved symbol '{name}'")]
    UnresolvedSymbol {
        /// The name that could not be resolved.
        name: String,
        /// Where the call appears.
        span: Span,
    },

    /// A fixed-size host table was asked for more entries than it has.
    #[error("{what}: requested {requested}, limit is {limit}")]
    CapacityExceeded {
        /// Which table overflowed.
        what: &'static str,
        /// The requested index or count.
        requested: usize,
        /// The table size.
        limit: usize,
    },

    /// A broken invariant inside the converter or compiler.
    #[error("internal compiler error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },
}

impl CompilationError {
    /// Shorthand for an [`CompilationError::Unsupported`] error.
    pub fn unsupported(what: impl Into<String>, span: Span) -> Self {
        CompilationError::Unsupported {
            what: what.into(),
            span,
        }
    }

    /// Shorthand for an [`CompilationError::Internal`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        CompilationError::Internal {
            message: message.into(),
        }
    }

    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::Unsupported { span, .. } => *span,
            CompilationError::UnresolvedSymbol { span, .. } => *span,
            CompilationError::CapacityExceeded { .. } => Span::default(),
            CompilationError::Internal { .. } => Span::default(),
        }
    }

    /// Whether this error is a compiler bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, CompilationError::Internal { .. })
    }
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Top-level error wrapping every phase-specific error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElgoError {
    /// A registration error.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A compilation error.
    #[error(transparent)]
    Compilation(#[from] CompilationError),
}

impl ElgoError {
    /// Check if this is a registration error.
    pub fn is_registration(&self) -> bool {
        matches!(self, ElgoError::Registration(_))
    }

    /// Check if this is a compilation error.
    pub fn is_compilation(&self) -> bool {
        matches!(self, ElgoError::Compilation(_))
    }
}
