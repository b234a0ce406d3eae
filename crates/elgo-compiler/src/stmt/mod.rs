//! Statement compiler.
//!
//! The [`StmtCompiler`] compiles forms for their side effects. A statement
//! leaves the stack model as it found it, with one exception: `bind`
//! introduces a new named slot that the enclosing block discards when it
//! ends.
//!
//! # Example
//!
//! ```
//! use elgo_compiler::emit::BytecodeEmitter;
//! use elgo_compiler::stmt::StmtCompiler;
//! use elgo_core::FunctionTable;
//! use elgo_ir::{Block, Form};
//!
//! let functions = FunctionTable::new();
//! let mut emitter = BytecodeEmitter::new();
//! let block = Block::new(vec![Form::bind("x", Form::Int(1))]);
//!
//! StmtCompiler::new(&mut emitter, &functions)
//!     .compile(&Form::Block(block))
//!     .unwrap();
//! assert_eq!(emitter.stack().depth(), 0);
//! ```

mod if_stmt;
mod loop_stmt;
mod return_stmt;

use elgo_core::{CompilationError, FunctionTable};
use elgo_ir::{Block, Form};

use crate::bytecode::Instr;
use crate::emit::BytecodeEmitter;
use crate::expr::{CallKind, ExprCompiler};

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles statement forms to bytecode.
pub struct StmtCompiler<'a> {
    /// Bytecode emitter
    emitter: &'a mut BytecodeEmitter,
    /// Calling conventions, consulted at every call
    functions: &'a FunctionTable,
}

impl<'a> StmtCompiler<'a> {
    /// Create a new statement compiler.
    pub fn new(emitter: &'a mut BytecodeEmitter, functions: &'a FunctionTable) -> Self {
        Self { emitter, functions }
    }

    /// Compile a form in statement position.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&mut self, form: &Form) -> Result<()> {
        match form {
            Form::Block(block) => self.compile_block(block),
            Form::If { cond, then, els } => self.compile_if(cond, then, els.as_deref()),
            Form::Loop { cond, body, post } => self.compile_loop(cond, body, post.as_deref()),
            Form::Return(results) => self.compile_return(results),
            Form::Break => self.emitter.emit_break(),
            Form::Continue => self.emitter.emit_continue(),

            Form::Bind { name, init } => {
                self.expr_compiler().compile(init)?;
                self.emitter.bind_local(name)
            }
            Form::Rebind { name, expr } => {
                self.expr_compiler().compile(expr)?;
                self.emitter.emit_var_set(name)
            }
            Form::ArrayUpdate {
                array,
                index,
                value,
            } => {
                let mut expr = self.expr_compiler();
                expr.compile(array)?;
                expr.compile(index)?;
                expr.compile(value)?;
                self.emitter.emit(Instr::ArraySet)
            }

            Form::Call { name, args } => match self.expr_compiler().compile_call(name, args)? {
                CallKind::Value => self.emitter.emit_discard(1),
                CallKind::Void | CallKind::Panic => Ok(()),
            },

            // Anything else is evaluated and dropped.
            _ => {
                self.expr_compiler().compile(form)?;
                self.emitter.emit_discard(1)
            }
        }
    }

    /// Compile a block, then drop the slots its bindings introduced.
    pub fn compile_block(&mut self, block: &Block) -> Result<()> {
        self.compile_forms(block.forms())?;
        self.emitter.emit_discard(block.locals())
    }

    /// Compile forms in sequence without any cleanup.
    pub fn compile_forms(&mut self, forms: &[Form]) -> Result<()> {
        for form in forms {
            self.compile(form)?;
        }
        Ok(())
    }

    fn expr_compiler(&mut self) -> ExprCompiler<'_> {
        ExprCompiler::new(self.emitter, self.functions)
    }

    /// Whether control never falls off the end of `form`.
    fn terminates(&self, form: &Form) -> bool {
        match form {
            Form::Return(_) | Form::Break | Form::Continue => true,
            Form::Block(block) => block.last().is_some_and(|last| self.terminates(last)),
            other => other.is_panic_call(self.functions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::OpCode;
    use elgo_core::{FuncFlags, runtime};

    pub(super) fn functions() -> FunctionTable {
        let mut table = FunctionTable::new();
        table.declare("log", FuncFlags::VOID).unwrap();
        table.declare(runtime::func::PANIC, FuncFlags::PANIC).unwrap();
        table
    }

    pub(super) fn compile_with(params: &[&str], form: &Form) -> Result<BytecodeEmitter> {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        for param in params {
            emitter.declare_param(param);
        }
        StmtCompiler::new(&mut emitter, &table).compile(form)?;
        Ok(emitter)
    }

    #[test]
    fn block_discards_its_locals() {
        let block = Block::new(vec![
            Form::bind("x", Form::Int(1)),
            Form::bind("y", Form::var("x")),
            Form::rebind("x", Form::var("y")),
        ]);
        let emitter = compile_with(&["a"], &Form::Block(block)).unwrap();

        assert_eq!(emitter.stack().depth(), 1);
        assert_eq!(emitter.chunk().last(), Some(&Instr::Discard(2)));
    }

    #[test]
    fn rebind_of_unknown_name_is_dynamic() {
        let emitter = compile_with(&[], &Form::rebind("counter", Form::Int(0))).unwrap();
        emitter
            .chunk()
            .assert_opcodes(&[OpCode::ConstRef, OpCode::VarSet]);
        assert_eq!(emitter.stack().depth(), 0);
    }

    #[test]
    fn value_call_statement_discards() {
        let emitter = compile_with(&[], &Form::call("length", vec![Form::string("x")])).unwrap();
        assert_eq!(emitter.chunk().last(), Some(&Instr::Discard(1)));
        assert_eq!(emitter.stack().depth(), 0);
    }

    #[test]
    fn void_call_statement_discards_once() {
        let emitter = compile_with(&[], &Form::call("log", vec![])).unwrap();
        emitter
            .chunk()
            .assert_opcodes(&[OpCode::ConstRef, OpCode::Call, OpCode::Discard]);
    }

    #[test]
    fn panic_statement_keeps_model_level() {
        let block = Block::new(vec![
            Form::bind("x", Form::Int(1)),
            Form::call(runtime::func::PANIC, vec![Form::string("boom")]),
            Form::rebind("x", Form::Int(2)),
        ]);
        let emitter = compile_with(&[], &Form::Block(block)).unwrap();
        assert_eq!(emitter.stack().depth(), 0);
        // No discard between the panic call and the next statement.
        assert_eq!(emitter.chunk().get(3), Some(&Instr::Call(1)));
        assert_eq!(emitter.chunk().get(4), Some(&Instr::ConstRef(3)));
    }

    #[test]
    fn array_update_operand_order() {
        let form = Form::ArrayUpdate {
            array: Box::new(Form::var("arr")),
            index: Box::new(Form::Int(0)),
            value: Box::new(Form::Int(9)),
        };
        let emitter = compile_with(&["arr"], &form).unwrap();
        emitter.chunk().assert_opcodes(&[
            OpCode::StackRef,
            OpCode::ConstRef,
            OpCode::ConstRef,
            OpCode::ArraySet,
        ]);
        assert_eq!(emitter.stack().depth(), 1);
    }

    #[test]
    fn expression_statement_is_dropped() {
        let emitter = compile_with(&["a"], &Form::var("a")).unwrap();
        emitter
            .chunk()
            .assert_opcodes(&[OpCode::StackRef, OpCode::Discard]);
        assert_eq!(emitter.stack().depth(), 1);
    }
}
