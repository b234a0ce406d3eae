//! Bytecode types for the elgo compiler.
//!
//! This module contains the core bytecode types:
//!
//! - [`Instr`] / [`OpCode`] - the abstract host instruction set
//! - [`Label`] - symbolic jump targets
//! - [`BytecodeChunk`] - the instruction stream of a function
//! - [`Constant`] and [`ConstantPool`] - per-function literal storage

mod chunk;
mod constant;
mod opcode;

pub use chunk::BytecodeChunk;
pub use constant::{Constant, ConstantPool};
pub use opcode::{Instr, Label, OpCode};
