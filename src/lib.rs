//! elgo
//!
//! Compiles a statically typed Go subset to bytecode for an Emacs Lisp
//! style stack VM. The front-end (parsing and type checking) is external:
//! it hands over a typed [`ast::Package`], and this crate turns every
//! function in it into an instruction stream plus a constant pool.
//!
//! ```
//! use bumpalo::Bump;
//! use elgo::ast::AstBuilder;
//! use elgo::Context;
//! use std::sync::Arc;
//!
//! let mut ctx = Context::with_runtime().unwrap();
//! ctx.seal();
//! let ctx = Arc::new(ctx);
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let package = b.package("main", &[b.func("main.main", &[], &[], &[])]);
//!
//! let mut unit = ctx.create_unit().unwrap();
//! let module = unit.build(&package).unwrap();
//! assert!(module.get("main.main").is_some());
//! ```

mod context;
mod unit;

pub use context::{Context, ContextError};
pub use unit::{BuildError, Unit};

pub use elgo_compiler::{CompiledFunction, CompiledModule, Compiler};
pub use elgo_core::{CompilationError, ElgoError, FuncFlags, RegistrationError, Span, runtime};

/// Arena the source AST is allocated in.
pub use bumpalo::Bump;

/// The typed source AST.
pub use elgo_ast as ast;
/// The intermediate representation.
pub use elgo_ir as ir;
/// Instruction set, chunk and constant pool.
pub use elgo_compiler::bytecode;

pub mod prelude {
    pub use crate::{BuildError, Context, ContextError, Unit};
    pub use elgo_compiler::bytecode::{BytecodeChunk, Constant, ConstantPool, Instr, OpCode};
    pub use elgo_compiler::{CompiledFunction, CompiledModule};
    pub use elgo_core::{CompilationError, FuncFlags};
}
