//! Core types shared by every elgo crate.
//!
//! - [`Span`] - source locations
//! - [`CompilationError`], [`RegistrationError`], [`ElgoError`] - error taxonomy
//! - [`SymbolHash`] - deterministic name hashing
//! - [`Family`] - operand families (int / float / string)
//! - [`FunctionTable`], [`FfiTable`] - calling conventions and FFI bindings
//! - [`runtime`] - names the host VM must provide

mod error;
mod family;
pub mod runtime;
mod signature;
mod span;
mod symbol_hash;

pub use error::{CompilationError, ElgoError, RegistrationError};
pub use family::Family;
pub use signature::{FfiTable, FuncFlags, FuncSig, FunctionTable};
pub use span::Span;
pub use symbol_hash::SymbolHash;
