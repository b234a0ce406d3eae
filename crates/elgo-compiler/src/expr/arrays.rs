//! Array literals, copies and indexing.

use elgo_core::runtime::func;
use elgo_ir::Form;

use crate::bytecode::Instr;

use super::{ExprCompiler, Result};

impl<'a> ExprCompiler<'a> {
    /// `(vector v0 v1 ...)`
    pub(super) fn compile_array_lit(&mut self, vals: &[Form]) -> Result<()> {
        self.compile_host_call(func::VECTOR, vals)
    }

    /// Build the backing array, then store each explicit element.
    ///
    /// The array stays on the stack throughout; every store works on a
    /// fresh reference to it.
    pub(super) fn compile_sparse_array_lit(
        &mut self,
        ctor: &Form,
        vals: &[(i64, Form)],
    ) -> Result<()> {
        self.compile(ctor)?;
        for (index, value) in vals {
            self.emitter.emit(Instr::StackRef(0))?;
            self.emitter.emit_int(*index)?;
            self.compile(value)?;
            self.emitter.emit(Instr::ArraySet)?;
        }
        Ok(())
    }

    pub(super) fn compile_array_copy(&mut self, array: &Form) -> Result<()> {
        self.compile_host_call(func::COPY_SEQUENCE, std::slice::from_ref(array))
    }

    pub(super) fn compile_array_index(&mut self, array: &Form, index: &Form) -> Result<()> {
        self.compile(array)?;
        self.compile(index)?;
        self.emitter.emit(Instr::ArrayRef)
    }
}
