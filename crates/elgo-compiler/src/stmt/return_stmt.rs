//! Return statement compilation.
//!
//! The host VM returns exactly one value. A bare `return` yields `nil`;
//! additional results travel through the reserved result variables.

use elgo_core::{CompilationError, runtime};
use elgo_ir::Form;

use super::{Result, StmtCompiler};

impl<'a> StmtCompiler<'a> {
    /// Compile a return statement.
    pub fn compile_return(&mut self, results: &[Form]) -> Result<()> {
        let Some((first, rest)) = results.split_first() else {
            self.emitter.emit_nil()?;
            return self.emitter.emit_return();
        };

        if results.len() > runtime::MAX_RESULTS {
            return Err(CompilationError::CapacityExceeded {
                what: "return values",
                requested: results.len(),
                limit: runtime::MAX_RESULTS,
            });
        }

        self.expr_compiler().compile(first)?;
        for (i, result) in rest.iter().enumerate() {
            let var = runtime::result_var(i + 1)
                .ok_or_else(|| CompilationError::internal("result slot out of range"))?;
            self.expr_compiler().compile(result)?;
            self.emitter.emit_dynamic_set(var)?;
        }
        self.emitter.emit_return()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::compile_with;
    use crate::bytecode::{Constant, Instr, OpCode};
    use elgo_core::CompilationError;
    use elgo_ir::Form;

    #[test]
    fn bare_return_pushes_nil() {
        let emitter = compile_with(&[], &Form::Return(vec![])).unwrap();
        assert_eq!(
            emitter.chunk().instructions(),
            &[Instr::ConstRef(0), Instr::Return]
        );
        assert_eq!(
            emitter.constants().get(0),
            Some(&Constant::Symbol("nil".into()))
        );
    }

    #[test]
    fn two_results_use_slot_two() {
        let form = Form::Return(vec![Form::var("x"), Form::var("y")]);
        let emitter = compile_with(&["x", "y"], &form).unwrap();

        emitter.chunk().assert_opcodes(&[
            OpCode::StackRef,
            OpCode::StackRef,
            OpCode::VarSet,
            OpCode::Return,
        ]);
        assert_eq!(emitter.chunk().get(0), Some(&Instr::StackRef(1)));
        // x's copy sits on top of y now
        assert_eq!(emitter.chunk().get(1), Some(&Instr::StackRef(1)));
        assert_eq!(
            emitter.constants().get(0),
            Some(&Constant::Symbol("Go--ret-2".into()))
        );
        assert_eq!(emitter.stack().depth(), 2);
    }

    #[test]
    fn too_many_results() {
        let results = (0..9).map(Form::Int).collect();
        let err = compile_with(&[], &Form::Return(results)).err().unwrap();
        assert_eq!(
            err,
            CompilationError::CapacityExceeded {
                what: "return values",
                requested: 9,
                limit: 8,
            }
        );
    }
}
