//! Expression compiler.
//!
//! [`ExprCompiler`] compiles value-producing forms. Every successful
//! [`compile`](ExprCompiler::compile) leaves exactly one new slot on the
//! stack model; statement forms are rejected as internal errors.
//!
//! Calls are the one place where the calling convention matters:
//! [`compile_call`](ExprCompiler::compile_call) consults the function table
//! and reports what the call left behind, so statement position can decide
//! whether a discard is still needed.

mod arrays;
mod ops;

use elgo_core::{CompilationError, FunctionTable, runtime};
use elgo_ir::Form;

use crate::emit::BytecodeEmitter;

type Result<T> = std::result::Result<T, CompilationError>;

/// What a compiled call left on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// The result is on the stack.
    Value,
    /// The result was discarded.
    Void,
    /// The call never returns; nothing is on the stack.
    Panic,
}

/// Compiles expression forms.
pub struct ExprCompiler<'a> {
    emitter: &'a mut BytecodeEmitter,
    functions: &'a FunctionTable,
}

impl<'a> ExprCompiler<'a> {
    pub fn new(emitter: &'a mut BytecodeEmitter, functions: &'a FunctionTable) -> Self {
        Self { emitter, functions }
    }

    /// Compile `form` for exactly one value.
    pub fn compile(&mut self, form: &Form) -> Result<()> {
        match form {
            Form::Bool(v) => self.emitter.emit_bool(*v),
            Form::Char(c) => self.emitter.emit_int(i64::from(u32::from(*c))),
            Form::Int(v) => self.emitter.emit_int(*v),
            Form::Float(v) => self.emitter.emit_float(*v),
            Form::Str(s) => self.emitter.emit_string(s),
            Form::Symbol(s) => self.emitter.emit_symbol(s),
            Form::Var(name) => self.emitter.emit_var_ref(name),

            Form::ArrayLit(vals) => self.compile_array_lit(vals),
            Form::SparseArrayLit { ctor, vals } => self.compile_sparse_array_lit(ctor, vals),
            Form::ArrayCopy(array) => self.compile_array_copy(array),
            Form::ArrayIndex { array, index } => self.compile_array_index(array, index),

            Form::Op { kind, family, args } => self.compile_op(*kind, *family, args),
            Form::Unary { kind, family, arg } => self.compile_unary(*kind, *family, arg),
            Form::Not(arg) => self.compile_not(arg),
            Form::And(a, b) => self.compile_and(a, b),
            Form::Or(a, b) => self.compile_or(a, b),

            Form::Call { name, args } => match self.compile_call(name, args)? {
                CallKind::Value => Ok(()),
                CallKind::Void | CallKind::Panic => Err(CompilationError::internal(format!(
                    "call to '{name}' produces no value but is used as one"
                ))),
            },
            Form::DynCall { callable, args } => self.compile_dyn_call(callable, args),
            Form::MultiValueRef(index) => self.compile_multi_value_ref(*index),

            Form::Block(_)
            | Form::If { .. }
            | Form::Loop { .. }
            | Form::Return(_)
            | Form::Break
            | Form::Continue
            | Form::Bind { .. }
            | Form::Rebind { .. }
            | Form::ArrayUpdate { .. } => Err(CompilationError::internal(format!(
                "statement {form} in expression position"
            ))),
        }
    }

    /// Compile each form in order.
    pub fn compile_list(&mut self, forms: &[Form]) -> Result<()> {
        for form in forms {
            self.compile(form)?;
        }
        Ok(())
    }

    /// Compile a direct call.
    ///
    /// Pushes the callee symbol, then the arguments, then `call n`. A void
    /// callee's result is discarded right away; a callee that never returns
    /// leaves the stack model one slot short of the call instruction's
    /// nominal effect.
    pub fn compile_call(&mut self, name: &str, args: &[Form]) -> Result<CallKind> {
        self.emitter.emit_symbol(name)?;
        self.compile_list(args)?;
        self.emitter.emit_call(args.len())?;

        if self.functions.is_panic(name) {
            self.emitter.discard_model(1)?;
            Ok(CallKind::Panic)
        } else if self.functions.is_void(name) {
            self.emitter.emit_discard(1)?;
            Ok(CallKind::Void)
        } else {
            Ok(CallKind::Value)
        }
    }

    /// Call a host function that is known to return a value.
    fn compile_host_call(&mut self, name: &str, args: &[Form]) -> Result<()> {
        self.emitter.emit_symbol(name)?;
        self.compile_list(args)?;
        self.emitter.emit_call(args.len())
    }

    fn compile_dyn_call(&mut self, callable: &Form, args: &[Form]) -> Result<()> {
        self.emitter.emit_symbol(runtime::func::FUNCALL)?;
        self.compile(callable)?;
        self.compile_list(args)?;
        self.emitter.emit_call(args.len() + 1)
    }

    fn compile_multi_value_ref(&mut self, index: usize) -> Result<()> {
        if index == 0 {
            return Err(CompilationError::internal(
                "multi-value reference to the primary result",
            ));
        }
        let var = runtime::result_var(index).ok_or(CompilationError::CapacityExceeded {
            what: "multi-value reference",
            requested: index + 1,
            limit: runtime::MAX_RESULTS,
        })?;
        self.emitter.emit_dynamic_ref(var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{Constant, Instr, OpCode};
    use elgo_core::FuncFlags;

    fn functions() -> FunctionTable {
        let mut table = FunctionTable::new();
        table.declare("log", FuncFlags::VOID).unwrap();
        table.declare(runtime::func::PANIC, FuncFlags::PANIC).unwrap();
        table
    }

    #[test]
    fn atoms_go_through_pool() {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        let mut expr = ExprCompiler::new(&mut emitter, &table);
        expr.compile(&Form::Int(7)).unwrap();
        expr.compile(&Form::Char('a')).unwrap();
        expr.compile(&Form::Bool(true)).unwrap();
        expr.compile(&Form::Symbol("foo".into())).unwrap();

        assert_eq!(emitter.stack().depth(), 4);
        let pool = emitter.constants();
        assert_eq!(pool.get(0), Some(&Constant::Int(7)));
        assert_eq!(pool.get(1), Some(&Constant::Int(97)));
        assert_eq!(pool.get(2), Some(&Constant::Symbol("t".into())));
        assert_eq!(pool.get(3), Some(&Constant::Symbol("foo".into())));
    }

    #[test]
    fn value_call() {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        let mut expr = ExprCompiler::new(&mut emitter, &table);
        let kind = expr
            .compile_call("length", &[Form::string("abc")])
            .unwrap();

        assert_eq!(kind, CallKind::Value);
        assert_eq!(emitter.stack().depth(), 1);
        emitter.chunk().assert_opcodes(&[OpCode::ConstRef, OpCode::ConstRef, OpCode::Call]);
    }

    #[test]
    fn void_call_discards() {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        let mut expr = ExprCompiler::new(&mut emitter, &table);
        assert_eq!(expr.compile_call("log", &[]).unwrap(), CallKind::Void);

        assert_eq!(emitter.stack().depth(), 0);
        assert_eq!(emitter.chunk().last(), Some(&Instr::Discard(1)));
    }

    #[test]
    fn panic_call_adjusts_model_only() {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        let mut expr = ExprCompiler::new(&mut emitter, &table);
        let kind = expr
            .compile_call(runtime::func::PANIC, &[Form::string("boom")])
            .unwrap();

        assert_eq!(kind, CallKind::Panic);
        assert_eq!(emitter.stack().depth(), 0);
        assert_eq!(emitter.chunk().last(), Some(&Instr::Call(1)));
    }

    #[test]
    fn void_call_as_value_is_internal() {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        let mut expr = ExprCompiler::new(&mut emitter, &table);
        let err = expr.compile(&Form::call("log", vec![])).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn statement_in_expression_position() {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        let mut expr = ExprCompiler::new(&mut emitter, &table);
        let err = expr.compile(&Form::Break).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn dyn_call_goes_through_funcall() {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        emitter.declare_param("f");
        let mut expr = ExprCompiler::new(&mut emitter, &table);
        expr.compile(&Form::DynCall {
            callable: Box::new(Form::var("f")),
            args: vec![Form::Int(1)],
        })
        .unwrap();

        assert_eq!(
            emitter.chunk().instructions(),
            &[
                Instr::ConstRef(0),
                Instr::StackRef(1),
                Instr::ConstRef(1),
                Instr::Call(2)
            ]
        );
        assert_eq!(
            emitter.constants().get(0),
            Some(&Constant::Symbol("funcall".into()))
        );
    }

    #[test]
    fn multi_value_ref_reads_reserved_var() {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        let mut expr = ExprCompiler::new(&mut emitter, &table);
        expr.compile(&Form::MultiValueRef(1)).unwrap();

        assert_eq!(emitter.chunk().instructions(), &[Instr::VarRef(0)]);
        assert_eq!(
            emitter.constants().get(0),
            Some(&Constant::Symbol("Go--ret-2".into()))
        );
    }

    #[test]
    fn multi_value_ref_bounds() {
        let table = functions();
        let mut emitter = BytecodeEmitter::new();
        let mut expr = ExprCompiler::new(&mut emitter, &table);

        let err = expr.compile(&Form::MultiValueRef(0)).unwrap_err();
        assert!(err.is_internal());
        let err = expr.compile(&Form::MultiValueRef(8)).unwrap_err();
        assert_eq!(
            err,
            CompilationError::CapacityExceeded {
                what: "multi-value reference",
                requested: 9,
                limit: 8,
            }
        );
    }
}
