//! Loop contexts for `break` and `continue`.
//!
//! Each context remembers the stack depth at loop entry, so a jump out of
//! the body knows how many loop-local slots it has to drop, and the labels
//! `break`/`continue` jump to. Labels are created on first use only.

use crate::bytecode::Label;

/// Context for a single loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopContext {
    /// Stack depth when the loop was entered.
    pub depth: usize,
    /// Target of `continue`, once known.
    pub continue_label: Option<Label>,
    /// Target of `break`, once used.
    pub break_label: Option<Label>,
}

/// Stack of loop contexts (innermost last).
#[derive(Debug, Default)]
pub struct LoopStack {
    loops: Vec<LoopContext>,
}

impl LoopStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new loop.
    ///
    /// `continue_label` is the condition label for loops without a post
    /// statement; `None` defers creation until a `continue` needs it.
    pub fn enter_loop(&mut self, depth: usize, continue_label: Option<Label>) {
        self.loops.push(LoopContext {
            depth,
            continue_label,
            break_label: None,
        });
    }

    /// Exit the current loop, returning its context.
    pub fn exit_loop(&mut self) -> Option<LoopContext> {
        self.loops.pop()
    }

    /// The innermost loop.
    pub fn current(&self) -> Option<&LoopContext> {
        self.loops.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut LoopContext> {
        self.loops.last_mut()
    }

    /// Check if we're currently inside a loop.
    pub fn in_loop(&self) -> bool {
        !self.loops.is_empty()
    }

    /// Get the current loop nesting depth.
    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }
}
