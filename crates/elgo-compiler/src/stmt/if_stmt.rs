//! If/else statement compilation.

use elgo_ir::{Block, Form};

use super::{Result, StmtCompiler};

impl<'a> StmtCompiler<'a> {
    /// Compile an if statement.
    ///
    /// Bytecode layout:
    /// ```text
    /// [condition]
    /// goto-if-nil -> else
    /// [then block]
    /// goto -> endif        (omitted when the then block cannot fall through)
    /// else:
    /// [else branch]
    /// endif:
    /// ```
    pub fn compile_if(&mut self, cond: &Form, then: &Block, els: Option<&Form>) -> Result<()> {
        let else_label = self.emitter.create_label("else");
        self.expr_compiler().compile(cond)?;
        self.emitter.emit_jmp_nil(else_label)?;
        self.compile_block(then)?;

        let Some(els) = els else {
            return self.emitter.bind_label(else_label);
        };

        if then.last().is_some_and(|last| self.terminates(last)) {
            self.emitter.bind_label(else_label)?;
            return self.compile(els);
        }

        let endif = self.emitter.create_label("endif");
        self.emitter.emit_jmp(endif)?;
        self.emitter.bind_label(else_label)?;
        self.compile(els)?;
        self.emitter.bind_label(endif)
    }
}
