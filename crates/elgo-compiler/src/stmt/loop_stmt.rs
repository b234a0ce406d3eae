//! Loop compilation.
//!
//! Loops test at the bottom: one unconditional jump into the condition,
//! then the body falls straight into the test, which jumps back while it
//! holds.

use elgo_ir::{Block, Form};

use super::{Result, StmtCompiler};

impl<'a> StmtCompiler<'a> {
    /// Compile a loop.
    ///
    /// Bytecode layout:
    /// ```text
    /// goto -> cond
    /// body:
    /// [body block]
    /// continue:            (only with a post statement)
    /// [post]
    /// cond:
    /// [condition]
    /// goto-if-not-nil -> body
    /// break:
    /// ```
    ///
    /// Without a post statement `continue` jumps straight to the condition.
    pub fn compile_loop(&mut self, cond: &Form, body: &Block, post: Option<&Form>) -> Result<()> {
        let cond_label = self.emitter.create_label("loop-cond");
        let body_label = self.emitter.create_label("loop-body");

        self.emitter.emit_jmp(cond_label)?;
        self.emitter.bind_label(body_label)?;

        self.emitter
            .enter_loop(if post.is_none() { Some(cond_label) } else { None });

        self.compile_block(body)?;

        if let Some(post) = post {
            if let Some(continue_label) = self.emitter.pending_continue() {
                self.emitter.bind_label(continue_label)?;
            }
            self.compile(post)?;
        }

        self.emitter.bind_label(cond_label)?;
        self.expr_compiler().compile(cond)?;
        self.emitter.emit_jmp_not_nil(body_label)?;

        self.emitter.exit_loop()
    }
}
