//! Function compiler for generating bytecode from function bodies.
//!
//! This module provides [`FunctionCompiler`] which compiles a single
//! converted function body to bytecode. It handles:
//!
//! - Seeding the stack model with the parameters (the caller pushes them)
//! - Compiling the body forms
//! - Adding an implicit `return` when the body does not end in one
//!
//! # Example
//!
//! ```
//! use elgo_compiler::FunctionCompiler;
//! use elgo_core::{Family, FunctionTable};
//! use elgo_ir::{Block, Form, OpKind};
//!
//! let functions = FunctionTable::new();
//! let body = Block::new(vec![Form::Return(vec![Form::op(
//!     OpKind::Add,
//!     Family::Int,
//!     vec![Form::var("a"), Form::Int(1)],
//! )])]);
//!
//! let mut compiler = FunctionCompiler::new(&functions, "main.inc", vec!["a".into()]);
//! compiler.compile_body(&body).unwrap();
//! let compiled = compiler.finish().unwrap();
//! assert_eq!(compiled.chunk.len(), 4);
//! ```

use elgo_core::{CompilationError, FunctionTable};
use elgo_ir::{Block, Form};

use crate::bytecode::{BytecodeChunk, ConstantPool};
use crate::emit::BytecodeEmitter;
use crate::stmt::StmtCompiler;

type Result<T> = std::result::Result<T, CompilationError>;

/// A function compiled to bytecode.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    /// Host-level function name.
    pub name: String,
    /// Parameter names in call order.
    pub params: Vec<String>,
    /// The instruction stream.
    pub chunk: BytecodeChunk,
    /// Constants referenced by `chunk`.
    pub constants: ConstantPool,
}

/// Compiles a single function body to bytecode.
pub struct FunctionCompiler<'a> {
    /// Calling conventions of every callee
    functions: &'a FunctionTable,
    /// Bytecode emitter
    emitter: BytecodeEmitter,
    name: String,
    params: Vec<String>,
}

impl<'a> FunctionCompiler<'a> {
    /// Create a new function compiler with the parameters already in scope.
    pub fn new(functions: &'a FunctionTable, name: impl Into<String>, params: Vec<String>) -> Self {
        let mut emitter = BytecodeEmitter::new();
        for param in &params {
            emitter.declare_param(param);
        }

        Self {
            functions,
            emitter,
            name: name.into(),
            params,
        }
    }

    /// Compile the function body.
    ///
    /// The body's bindings are not discarded: the function's `return`
    /// abandons the whole frame.
    pub fn compile_body(&mut self, body: &Block) -> Result<()> {
        let mut stmt_compiler = StmtCompiler::new(&mut self.emitter, self.functions);
        stmt_compiler.compile_forms(body.forms())?;

        if !matches!(body.last(), Some(Form::Return(_))) {
            stmt_compiler.compile_return(&[])?;
        }
        Ok(())
    }

    /// Finish compilation and return the compiled function.
    pub fn finish(self) -> Result<CompiledFunction> {
        let (chunk, constants) = self.emitter.finish()?;
        Ok(CompiledFunction {
            name: self.name,
            params: self.params,
            chunk,
            constants,
        })
    }
}
