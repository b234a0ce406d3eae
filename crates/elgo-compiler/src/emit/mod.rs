//! Bytecode emitter for the elgo compiler.
//!
//! The [`BytecodeEmitter`] owns everything that is built up while one
//! function is compiled: the instruction stream, the constant pool, the
//! compile-time [`StackModel`], the label table and the loop contexts.
//!
//! Every instruction goes through [`BytecodeEmitter::emit`], which applies
//! its stack effect to the model. The only exceptions are the two places
//! where the runtime stack and the model are meant to differ:
//! [`BytecodeEmitter::discard_model`] (a call that never returns) and the
//! slot cleanup in front of `break`/`continue` jumps.
//!
//! # Example
//!
//! ```
//! use elgo_compiler::bytecode::OpCode;
//! use elgo_compiler::emit::BytecodeEmitter;
//!
//! let mut emitter = BytecodeEmitter::new();
//! emitter.declare_param("a");
//! emitter.emit_var_ref("a").unwrap();
//! emitter.emit_int(1).unwrap();
//! emitter.emit(elgo_compiler::bytecode::Instr::Plus).unwrap();
//! emitter.emit_return().unwrap();
//!
//! let (chunk, _constants) = emitter.finish().unwrap();
//! chunk.assert_opcodes(&[OpCode::StackRef, OpCode::ConstRef, OpCode::Plus, OpCode::Return]);
//! ```

mod labels;
mod loops;

use elgo_core::{CompilationError, runtime};
use tracing::trace;

use crate::bytecode::{BytecodeChunk, Constant, ConstantPool, Instr, Label};
use crate::scope::StackModel;
pub use labels::LabelTable;
pub use loops::{LoopContext, LoopStack};

type Result<T> = std::result::Result<T, CompilationError>;

/// Narrow an operand to its encoded width.
fn operand<T: TryFrom<usize>>(value: usize, what: &'static str, limit: usize) -> Result<T> {
    T::try_from(value).map_err(|_| CompilationError::CapacityExceeded {
        what,
        requested: value,
        limit,
    })
}

fn wide(value: usize, what: &'static str) -> Result<u16> {
    operand(value, what, u16::MAX as usize)
}

/// Emits instructions for a single function.
#[derive(Debug, Default)]
pub struct BytecodeEmitter {
    /// The instruction stream being built
    chunk: BytecodeChunk,
    /// Literals referenced by the stream
    constants: ConstantPool,
    /// Compile-time mirror of the value stack
    stack: StackModel,
    /// Jump targets
    labels: LabelTable,
    /// Enclosing loops
    loops: LoopStack,
}

impl BytecodeEmitter {
    /// Create a new emitter with an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The compile-time stack model.
    pub fn stack(&self) -> &StackModel {
        &self.stack
    }

    /// Constants added so far.
    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    /// Instructions emitted so far.
    pub fn chunk(&self) -> &BytecodeChunk {
        &self.chunk
    }

    /// Declare a parameter; the caller has already pushed it.
    pub fn declare_param(&mut self, name: &str) {
        self.stack.push_named(name);
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Emit an instruction, applying its stack effect to the model.
    pub fn emit(&mut self, instr: Instr) -> Result<()> {
        let (pops, pushes) = instr.stack_effect();
        self.stack.pop(pops)?;
        self.stack.push(pushes);
        if let Some(label) = instr.label() {
            self.labels.mark_used(label)?;
        }
        self.chunk.push(instr);
        Ok(())
    }

    /// Drop `n` slots from the model without emitting anything.
    ///
    /// Used after calls that never return: no result materializes at
    /// runtime, so the slot the call instruction accounts for is removed.
    pub fn discard_model(&mut self, n: usize) -> Result<()> {
        self.stack.pop(n)
    }

    /// Label the top slot with a lexical name.
    pub fn bind_local(&mut self, name: &str) -> Result<()> {
        self.stack.bind(name)
    }

    /// Make the top slot anonymous.
    ///
    /// Used where control paths merge and the top slot may hold a value
    /// other than the variable read last.
    pub fn unbind_top(&mut self) -> Result<()> {
        self.stack.unbind_top()
    }

    /// Emit `discardN n`; nothing for zero.
    pub fn emit_discard(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Ok(());
        }
        self.emit(Instr::Discard(wide(n, "discard count")?))
    }

    // ==========================================================================
    // Constants
    // ==========================================================================

    fn pooled(index: usize) -> Result<u16> {
        wide(index, "constant pool")
    }

    fn symbol_index(&mut self, name: &str) -> Result<u16> {
        Self::pooled(self.constants.add_symbol(name))
    }

    fn const_ref(&mut self, index: usize) -> Result<()> {
        let index = Self::pooled(index)?;
        self.emit(Instr::ConstRef(index))
    }

    /// Push a pooled constant.
    pub fn emit_constant(&mut self, constant: Constant) -> Result<()> {
        let index = self.constants.add(constant);
        self.const_ref(index)
    }

    /// Push a symbol.
    pub fn emit_symbol(&mut self, name: &str) -> Result<()> {
        let index = self.constants.add_symbol(name);
        self.const_ref(index)
    }

    pub fn emit_int(&mut self, value: i64) -> Result<()> {
        let index = self.constants.add_int(value);
        self.const_ref(index)
    }

    pub fn emit_float(&mut self, value: f64) -> Result<()> {
        let index = self.constants.add_float(value);
        self.const_ref(index)
    }

    pub fn emit_string(&mut self, value: &str) -> Result<()> {
        let index = self.constants.add_string(value);
        self.const_ref(index)
    }

    /// Push the nil sentinel.
    pub fn emit_nil(&mut self) -> Result<()> {
        self.emit_symbol(runtime::NIL)
    }

    /// Push `t` or `nil`; the host has no dedicated booleans.
    pub fn emit_bool(&mut self, value: bool) -> Result<()> {
        self.emit_symbol(if value { runtime::T } else { runtime::NIL })
    }

    // ==========================================================================
    // Variables
    // ==========================================================================

    /// Push the value of `name`.
    ///
    /// A lexical hit becomes `stack-ref`, anything else a dynamic variable
    /// read. The pushed copy is itself labeled `name`.
    pub fn emit_var_ref(&mut self, name: &str) -> Result<()> {
        match self.stack.find(name) {
            Some(offset) => self.emit(Instr::StackRef(wide(offset, "stack offset")?))?,
            None => {
                let index = self.symbol_index(name)?;
                self.emit(Instr::VarRef(index))?;
            }
        }
        self.stack.bind(name)
    }

    /// Pop the top of the stack into `name`.
    pub fn emit_var_set(&mut self, name: &str) -> Result<()> {
        match self.stack.find(name) {
            Some(offset) => self.emit(Instr::StackSet(wide(offset, "stack offset")?)),
            None => self.emit_dynamic_set(name),
        }
    }

    /// Push a dynamic variable, bypassing lexical lookup.
    pub fn emit_dynamic_ref(&mut self, name: &str) -> Result<()> {
        let index = self.symbol_index(name)?;
        self.emit(Instr::VarRef(index))
    }

    /// Pop into a dynamic variable, bypassing lexical lookup.
    pub fn emit_dynamic_set(&mut self, name: &str) -> Result<()> {
        let index = self.symbol_index(name)?;
        self.emit(Instr::VarSet(index))
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    /// Emit `call argc`; the callee symbol and arguments are already pushed.
    pub fn emit_call(&mut self, argc: usize) -> Result<()> {
        let argc = operand(argc, "call arguments", u8::MAX as usize)?;
        self.emit(Instr::Call(argc))
    }

    /// Emit `concatN n`.
    pub fn emit_concat(&mut self, n: usize) -> Result<()> {
        let n = operand(n, "concat operands", u8::MAX as usize)?;
        self.emit(Instr::Concat(n))
    }

    pub fn emit_return(&mut self) -> Result<()> {
        self.emit(Instr::Return)
    }

    // ==========================================================================
    // Labels and Jumps
    // ==========================================================================

    /// Reserve a label.
    pub fn create_label(&mut self, name: &'static str) -> Label {
        self.labels.create(name)
    }

    /// Bind a label to the next instruction.
    pub fn bind_label(&mut self, label: Label) -> Result<()> {
        self.labels.bind(label, self.chunk.current_offset())
    }

    pub fn emit_jmp(&mut self, label: Label) -> Result<()> {
        self.emit(Instr::Jmp(label))
    }

    pub fn emit_jmp_nil(&mut self, label: Label) -> Result<()> {
        self.emit(Instr::JmpNil(label))
    }

    pub fn emit_jmp_not_nil(&mut self, label: Label) -> Result<()> {
        self.emit(Instr::JmpNotNil(label))
    }

    // ==========================================================================
    // Loop Control (Break/Continue)
    // ==========================================================================

    /// Enter a loop at the current stack depth.
    ///
    /// Pass the condition label as `continue_label` for loops without a
    /// post statement; with `None` a label is created when first needed and
    /// must be bound via [`pending_continue`](Self::pending_continue).
    pub fn enter_loop(&mut self, continue_label: Option<Label>) {
        self.loops.enter_loop(self.stack.depth(), continue_label);
    }

    /// The continue label of the innermost loop, if one exists yet.
    pub fn pending_continue(&self) -> Option<Label> {
        self.loops.current().and_then(|ctx| ctx.continue_label)
    }

    /// Exit the innermost loop, binding its break label here.
    pub fn exit_loop(&mut self) -> Result<()> {
        let ctx = self
            .loops
            .exit_loop()
            .ok_or_else(|| CompilationError::internal("exit_loop outside of a loop"))?;
        if let Some(label) = ctx.break_label {
            self.bind_label(label)?;
        }
        Ok(())
    }

    /// Emit `break`.
    pub fn emit_break(&mut self) -> Result<()> {
        let Some(ctx) = self.loops.current_mut() else {
            return Err(CompilationError::internal("break outside of a loop"));
        };
        let depth = ctx.depth;
        let labels = &mut self.labels;
        let label = *ctx
            .break_label
            .get_or_insert_with(|| labels.create("loop-break"));
        self.jump_out_of_loop(depth, label)
    }

    /// Emit `continue`.
    pub fn emit_continue(&mut self) -> Result<()> {
        let Some(ctx) = self.loops.current_mut() else {
            return Err(CompilationError::internal("continue outside of a loop"));
        };
        let depth = ctx.depth;
        let labels = &mut self.labels;
        let label = *ctx
            .continue_label
            .get_or_insert_with(|| labels.create("loop-continue"));
        self.jump_out_of_loop(depth, label)
    }

    /// Drop loop-local slots at runtime and jump.
    ///
    /// The model is left alone: it still describes the fall-through path.
    fn jump_out_of_loop(&mut self, loop_depth: usize, label: Label) -> Result<()> {
        let extra = self.stack.depth().checked_sub(loop_depth).ok_or_else(|| {
            CompilationError::internal("stack is shallower than at loop entry")
        })?;
        if extra > 0 {
            self.chunk
                .push(Instr::Discard(wide(extra, "discard count")?));
        }
        self.emit_jmp(label)
    }

    /// Check if currently inside a loop.
    pub fn in_loop(&self) -> bool {
        self.loops.in_loop()
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Resolve labels and hand out the finished chunk and its pool.
    pub fn finish(mut self) -> Result<(BytecodeChunk, ConstantPool)> {
        if self.loops.in_loop() {
            return Err(CompilationError::internal("function ended inside a loop"));
        }
        let positions = self.labels.resolve()?;
        trace!(labels = positions.len(), "labels resolved");
        self.chunk.set_labels(positions);
        self.chunk.set_max_depth(self.stack.max_depth());
        Ok((self.chunk, self.constants))
    }
}
