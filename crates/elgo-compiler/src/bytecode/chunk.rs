//! Instruction stream of a compiled function.
//!
//! A `BytecodeChunk` holds the instructions of one function, the resolved
//! position of every label the instructions jump to, and the deepest stack
//! the function reaches.

use std::fmt;

use super::{Instr, Label, OpCode};

/// A finished instruction stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BytecodeChunk {
    /// The instructions.
    code: Vec<Instr>,
    /// Instruction index of each label, indexed by label id.
    labels: Vec<usize>,
    /// Maximum stack depth reached.
    max_depth: usize,
}

impl BytecodeChunk {
    /// Create a new empty chunk.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, instr: Instr) {
        self.code.push(instr);
    }

    pub(crate) fn set_labels(&mut self, labels: Vec<usize>) {
        self.labels = labels;
    }

    pub(crate) fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }

    /// Index the next instruction will get.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// All instructions.
    pub fn instructions(&self) -> &[Instr] {
        &self.code
    }

    /// Get the instruction at `index`.
    pub fn get(&self, index: usize) -> Option<&Instr> {
        self.code.get(index)
    }

    /// The last instruction.
    pub fn last(&self) -> Option<&Instr> {
        self.code.last()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Maximum stack depth the function reaches, parameters included.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Instruction index a label was bound to.
    pub fn label_position(&self, label: Label) -> Option<usize> {
        self.labels.get(label.0 as usize).copied()
    }

    /// Resolved target of the jump at `index`.
    pub fn jump_target(&self, index: usize) -> Option<usize> {
        self.get(index)
            .and_then(Instr::label)
            .and_then(|label| self.label_position(label))
    }

    /// Extract all opcodes from the chunk, dropping operands.
    ///
    /// This is useful for testing instruction sequences without worrying
    /// about pool indices or label numbering.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.code.iter().map(Instr::opcode).collect()
    }

    /// Check that this chunk contains exactly the given opcode sequence.
    ///
    /// Panics with a descriptive message if the sequences don't match.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        assert_eq!(
            actual,
            expected,
            "Bytecode mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(|op| op.name()).collect::<Vec<_>>(),
            actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
        );
    }

    /// Check that this chunk contains the given opcodes in order, though not
    /// necessarily contiguously.
    #[track_caller]
    pub fn assert_contains_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        let mut expected_iter = expected.iter().peekable();

        for op in &actual {
            if expected_iter.peek() == Some(&op) {
                expected_iter.next();
            }
        }

        if expected_iter.peek().is_some() {
            let remaining: Vec<_> = expected_iter.map(|op| op.name()).collect();
            panic!(
                "Missing opcodes in sequence.\nExpected to find: {:?}\nActual bytecode:  {:?}",
                remaining,
                actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
            );
        }
    }
}

/// Disassembly listing, one instruction per line with label markers.
impl fmt::Display for BytecodeChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, instr) in self.code.iter().enumerate() {
            for (id, _) in self.labels.iter().enumerate().filter(|(_, p)| **p == index) {
                writeln!(f, "L{id}:")?;
            }
            writeln!(f, "  {index:4}  {instr}")?;
        }
        for (id, _) in self
            .labels
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == self.code.len())
        {
            writeln!(f, "L{id}:")?;
        }
        Ok(())
    }
}
