//! Intermediate representation for elgo.
//!
//! A [`Form`] tree sits between the typed source AST and the bytecode
//! compiler. It keeps source semantics the host VM cannot express directly
//! (typed arithmetic, multi-value returns, array value semantics) while
//! using only host-representable primitives.
//!
//! Forms are plain data: built once per function by the converter, consumed
//! once by the compiler, never mutated in between. `Display` prints a form
//! in Lisp notation.

mod form;
mod op;
mod print;

pub use form::{Block, Form};
pub use op::{OpKind, UnaryKind};
