//! Compile-time model of the runtime value stack.
//!
//! The host VM has no local variable slots: lexical variables live on the
//! value stack and are addressed relative to its top. [`StackModel`] mirrors
//! the occupied slots while code is generated, each slot optionally labeled
//! with the name bound there, so a variable can be turned into a
//! `stack-ref`/`stack-set` offset.
//!
//! Names are resolved innermost-first; a name that is not on the stack is a
//! dynamic (global) variable.

use elgo_core::CompilationError;

type Result<T> = std::result::Result<T, CompilationError>;

/// Labeled slots of the value stack, bottom first.
#[derive(Debug, Clone, Default)]
pub struct StackModel {
    slots: Vec<Option<String>>,
    max_depth: usize,
}

impl StackModel {
    /// Create an empty stack model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Deepest the stack has been.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Push `n` anonymous slots.
    pub fn push(&mut self, n: usize) {
        self.slots.extend(std::iter::repeat_n(None, n));
        self.max_depth = self.max_depth.max(self.slots.len());
    }

    /// Push a slot already labeled with `name` (a function parameter).
    pub fn push_named(&mut self, name: impl Into<String>) {
        self.slots.push(Some(name.into()));
        self.max_depth = self.max_depth.max(self.slots.len());
    }

    /// Drop the top `n` slots.
    pub fn pop(&mut self, n: usize) -> Result<()> {
        let depth = self.slots.len();
        if n > depth {
            return Err(CompilationError::internal(format!(
                "stack underflow: popping {n} of {depth} slots"
            )));
        }
        self.slots.truncate(depth - n);
        Ok(())
    }

    /// Label the top slot with `name`.
    pub fn bind(&mut self, name: impl Into<String>) -> Result<()> {
        match self.slots.last_mut() {
            Some(slot) => {
                *slot = Some(name.into());
                Ok(())
            }
            None => Err(CompilationError::internal(
                "binding a name on an empty stack",
            )),
        }
    }

    /// Clear the label of the top slot.
    pub fn unbind_top(&mut self) -> Result<()> {
        match self.slots.last_mut() {
            Some(slot) => {
                *slot = None;
                Ok(())
            }
            None => Err(CompilationError::internal(
                "unbinding the top of an empty stack",
            )),
        }
    }

    /// Offset from the top (0 = top) of the innermost slot bound to `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .rev()
            .position(|slot| slot.as_deref() == Some(name))
    }

    /// Names of all slots, bottom first.
    pub fn slots(&self) -> impl Iterator<Item = Option<&str>> {
        self.slots.iter().map(Option::as_deref)
    }
}
