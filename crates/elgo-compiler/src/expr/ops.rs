//! Typed operators and logical connectives.
//!
//! Instruction selection is keyed on `(operator, family)`. Numeric families
//! map onto the host's arithmetic and comparison instructions; strings use
//! the string instructions where the host has them and runtime functions
//! where it does not. Any other pairing is an internal error: the converter
//! is not supposed to produce it.

use elgo_core::{CompilationError, Family, runtime::func};
use elgo_ir::{Form, OpKind, UnaryKind};

use crate::bytecode::Instr;

use super::{ExprCompiler, Result};

impl<'a> ExprCompiler<'a> {
    pub(super) fn compile_op(&mut self, kind: OpKind, family: Family, args: &[Form]) -> Result<()> {
        check_operands(kind, family, args)?;

        match (kind, family) {
            (OpKind::Add, Family::String) => {
                self.compile_list(args)?;
                self.emitter.emit_concat(args.len())
            }
            (OpKind::Add, Family::Int | Family::Float) => self.compile_fold(Instr::Plus, args),
            (OpKind::Sub, Family::Int | Family::Float) => self.compile_fold(Instr::Diff, args),
            (OpKind::Mul, Family::Int | Family::Float) => self.compile_fold(Instr::Mult, args),
            (OpKind::Div, Family::Int | Family::Float) => self.compile_fold(Instr::Quo, args),
            (OpKind::Rem, Family::Int) => self.compile_binary(Instr::Rem, args),

            (OpKind::BitOr, Family::Int) => self.compile_host_call(func::LOGIOR, args),
            (OpKind::BitAnd, Family::Int) => self.compile_host_call(func::LOGAND, args),
            (OpKind::BitXor, Family::Int) => self.compile_host_call(func::LOGXOR, args),

            (OpKind::Eq, Family::Int | Family::Float) => self.compile_binary(Instr::NumEq, args),
            (OpKind::Eq, Family::String) => self.compile_binary(Instr::StringEq, args),
            (OpKind::NotEq, _) => {
                self.compile_op(OpKind::Eq, family, args)?;
                self.emitter.emit(Instr::Not)
            }

            (OpKind::Less, Family::Int | Family::Float) => self.compile_binary(Instr::Lss, args),
            (OpKind::LessEq, Family::Int | Family::Float) => self.compile_binary(Instr::Leq, args),
            (OpKind::Greater, Family::Int | Family::Float) => self.compile_binary(Instr::Gtr, args),
            (OpKind::GreaterEq, Family::Int | Family::Float) => {
                self.compile_binary(Instr::Geq, args)
            }

            (OpKind::Less, Family::String) => self.compile_binary(Instr::StringLess, args),
            (OpKind::LessEq, Family::String) => self.compile_host_call(func::STRING_LE, args),
            (OpKind::Greater, Family::String) => self.compile_host_call(func::STRING_GT, args),
            (OpKind::GreaterEq, Family::String) => self.compile_host_call(func::STRING_GE, args),

            (kind, family) => Err(CompilationError::internal(format!(
                "operator {kind} is not defined for {family} operands"
            ))),
        }
    }

    /// Left fold: `a b op c op ...`.
    fn compile_fold(&mut self, instr: Instr, args: &[Form]) -> Result<()> {
        let Some((first, rest)) = args.split_first() else {
            return Err(CompilationError::internal("operation without operands"));
        };
        self.compile(first)?;
        for arg in rest {
            self.compile(arg)?;
            self.emitter.emit(instr)?;
        }
        Ok(())
    }

    fn compile_binary(&mut self, instr: Instr, args: &[Form]) -> Result<()> {
        self.compile_list(args)?;
        self.emitter.emit(instr)
    }

    pub(super) fn compile_unary(
        &mut self,
        kind: UnaryKind,
        family: Family,
        arg: &Form,
    ) -> Result<()> {
        match (kind, family) {
            (UnaryKind::Neg, Family::Int | Family::Float) => {
                self.compile(arg)?;
                self.emitter.emit(Instr::Negate)
            }
            (UnaryKind::BitNot, Family::Int) => {
                self.compile_host_call(func::LOGNOT, std::slice::from_ref(arg))
            }
            (kind, family) => Err(CompilationError::internal(format!(
                "{} is not defined for {family} operands",
                kind.name()
            ))),
        }
    }

    pub(super) fn compile_not(&mut self, arg: &Form) -> Result<()> {
        self.compile(arg)?;
        self.emitter.emit(Instr::Not)
    }

    /// `a && b`: keep a nil `a` as the result, otherwise evaluate `b`.
    pub(super) fn compile_and(&mut self, a: &Form, b: &Form) -> Result<()> {
        let end = self.emitter.create_label("and-end");
        self.compile(a)?;
        self.emitter.emit(Instr::JmpNilElsePop(end))?;
        self.compile(b)?;
        self.emitter.bind_label(end)?;
        self.emitter.unbind_top()
    }

    /// `a || b`: keep a non-nil `a` as the result, otherwise evaluate `b`.
    pub(super) fn compile_or(&mut self, a: &Form, b: &Form) -> Result<()> {
        let end = self.emitter.create_label("or-end");
        self.compile(a)?;
        self.emitter.emit(Instr::JmpNotNilElsePop(end))?;
        self.compile(b)?;
        self.emitter.bind_label(end)?;
        self.emitter.unbind_top()
    }
}

/// Validate arity and literal operand families.
fn check_operands(kind: OpKind, family: Family, args: &[Form]) -> Result<()> {
    let arity_ok = if kind.is_variadic()
        || matches!(kind, OpKind::BitOr | OpKind::BitAnd | OpKind::BitXor)
    {
        args.len() >= 2
    } else {
        args.len() == 2
    };
    if !arity_ok {
        return Err(CompilationError::internal(format!(
            "{family}{kind} applied to {} operands",
            args.len()
        )));
    }

    if let Some(arg) = args
        .iter()
        .find(|arg| arg.is_atom() && arg.atom_family() != Some(family))
    {
        return Err(CompilationError::internal(format!(
            "operand family mismatch: {arg} in {family}{kind}"
        )));
    }
    Ok(())
}
