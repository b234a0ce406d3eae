//! elgo compiler
//!
//! Translates the typed source AST into bytecode for a stack-based Emacs
//! Lisp style host VM, in two steps per function.
//!
//! ## Architecture
//!
//! - **Conversion**: lower the source AST into IR forms ([`convert`])
//! - **Code generation**: compile the forms into one instruction stream
//!   plus a deduplicated constant pool ([`FunctionCompiler`])
//!
//! ## Modules
//!
//! - [`bytecode`]: Abstract instruction set, chunk and constant pool
//! - [`convert`]: AST-to-IR converter with the intrinsic call surface
//! - [`emit`]: Bytecode emitter with label table and loop contexts
//! - [`expr`]: Expression compiler
//! - [`scope`]: Compile-time stack model
//! - [`stmt`]: Statement compiler for control flow and bindings

pub mod bytecode;
pub mod convert;
pub mod emit;
pub mod expr;
mod function_compiler;
pub mod scope;
pub mod stmt;

pub use convert::Converter;
pub use emit::BytecodeEmitter;
pub use expr::{CallKind, ExprCompiler};
pub use function_compiler::{CompiledFunction, FunctionCompiler};
pub use scope::StackModel;
pub use stmt::StmtCompiler;

// Re-export CompilationError from core for convenience
pub use elgo_core::CompilationError;

use elgo_ast::FuncDecl;
use elgo_core::{FfiTable, FunctionTable, runtime};
use elgo_ir::Block;
use tracing::{debug, trace};

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiled functions of one package, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CompiledModule {
    /// Compiled functions.
    pub functions: Vec<CompiledFunction>,
}

impl CompiledModule {
    /// Find a compiled function by name.
    pub fn get(&self, name: &str) -> Option<&CompiledFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// The main compiler entry point.
///
/// Borrows the sealed function-signature and FFI tables; any number of
/// functions can be compiled against them, independently of each other.
#[derive(Clone, Copy)]
pub struct Compiler<'a> {
    functions: &'a FunctionTable,
    ffi: &'a FfiTable,
}

impl<'a> Compiler<'a> {
    pub fn new(functions: &'a FunctionTable, ffi: &'a FfiTable) -> Self {
        Self { functions, ffi }
    }

    /// Convert a function body to IR.
    pub fn convert(&self, decl: &FuncDecl<'_>) -> Result<Block> {
        Converter::new(self.functions, self.ffi).function(decl)
    }

    /// Compile an already converted body.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_form(
        &self,
        name: &str,
        params: Vec<String>,
        body: &Block,
    ) -> Result<CompiledFunction> {
        let mut compiler = FunctionCompiler::new(self.functions, name, params);
        compiler.compile_body(body)?;
        compiler.finish()
    }

    /// Convert and compile a function.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_function(&self, decl: &FuncDecl<'_>) -> Result<CompiledFunction> {
        if decl.results.len() > runtime::MAX_RESULTS {
            return Err(CompilationError::CapacityExceeded {
                what: "return values",
                requested: decl.results.len(),
                limit: runtime::MAX_RESULTS,
            });
        }

        let body = self.convert(decl)?;
        trace!(function = decl.name, ir = %body, "converted");

        let params = decl
            .params
            .iter()
            .map(|p| p.name.name.to_string())
            .collect();
        let compiled = self.compile_form(decl.name, params, &body)?;
        debug!(
            function = decl.name,
            instructions = compiled.chunk.len(),
            constants = compiled.constants.len(),
            max_depth = compiled.chunk.max_depth(),
            "compiled function"
        );
        Ok(compiled)
    }
}
