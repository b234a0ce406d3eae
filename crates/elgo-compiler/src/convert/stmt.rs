//! Statement conversion.
//!
//! A statement converts to a list of forms: multi-name declarations and
//! assignments desugar into one binding or store per name.

use elgo_ast::{
    AssignOp, AssignStmt, DeclKind, DeclStmt, Expr, ForStmt, IfStmt, IncDecStmt, ReturnStmt,
    Stmt, TypeKind, ValueSpec,
};
use elgo_core::{CompilationError, Family, Span};
use elgo_ir::{Block, Form, OpKind};

use super::{Converter, Result, Target, is_pure};

/// Prefix of the temporaries used by parallel assignment.
///
/// `#` cannot appear in a source identifier, so these never collide.
const TEMP_PREFIX: &str = "#tmp";

impl<'a> Converter<'a> {
    /// Convert a statement.
    pub fn stmt(&mut self, stmt: &Stmt<'_>) -> Result<Vec<Form>> {
        match stmt {
            Stmt::Expr(s) => Ok(vec![self.expr(s.expr)?]),
            Stmt::Decl(decl) => self.decl(decl),
            Stmt::Assign(assign) => self.assign(assign),
            Stmt::IncDec(s) => Ok(self.inc_dec(s)?.into_iter().collect()),
            Stmt::Return(ret) => Ok(vec![self.ret(ret)?]),
            Stmt::Block(block) => Ok(vec![Form::Block(self.block(block)?)]),
            Stmt::If(if_stmt) => Ok(vec![self.if_stmt(if_stmt)?]),
            Stmt::For(for_stmt) => Ok(vec![self.for_stmt(for_stmt)?]),
            Stmt::Break(span) => {
                self.loop_control("break", *span)?;
                Ok(vec![Form::Break])
            }
            Stmt::Continue(span) => {
                self.loop_control("continue", *span)?;
                Ok(vec![Form::Continue])
            }
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    fn decl(&mut self, decl: &DeclStmt<'_>) -> Result<Vec<Form>> {
        match decl.kind {
            // Constants are folded into their uses by the front-end.
            DeclKind::Const => Ok(Vec::new()),
            DeclKind::Type => Err(CompilationError::unsupported(
                "local type declaration",
                decl.span,
            )),
            DeclKind::Var => {
                let mut forms = Vec::new();
                for spec in decl.specs {
                    forms.extend(self.var_spec(spec)?);
                }
                Ok(forms)
            }
        }
    }

    fn var_spec(&mut self, spec: &ValueSpec<'_>) -> Result<Vec<Form>> {
        let targets: Vec<Target<'_, '_>> = spec
            .names
            .iter()
            .map(|name| {
                if name.is_blank() {
                    Target::Blank
                } else {
                    Target::Define(name.name)
                }
            })
            .collect();

        if spec.values.is_empty() {
            let mut forms = Vec::with_capacity(targets.len());
            for target in targets {
                if let Target::Define(name) = target {
                    forms.push(Form::bind(name, self.zero_value(spec.ty, spec.span)?));
                }
            }
            return Ok(forms);
        }

        self.assign_values(&targets, spec.values, spec.span)
    }

    // ==========================================================================
    // Assignments
    // ==========================================================================

    fn assign(&mut self, assign: &AssignStmt<'_>) -> Result<Vec<Form>> {
        let targets = assign
            .lhs
            .iter()
            .map(|lhs| self.target(lhs))
            .collect::<Result<Vec<_>>>()?;

        match assign.op.binary_op() {
            None => self.assign_values(&targets, assign.rhs, assign.span),
            Some(op) => {
                let ([target], [lhs], [rhs]) = (targets.as_slice(), assign.lhs, assign.rhs) else {
                    return Err(CompilationError::unsupported(
                        format!("multi-value {}", assign_token(assign.op)),
                        assign.span,
                    ));
                };
                let current = self.expr(lhs)?;
                let operand = self.expr(rhs)?;
                let value = self.binary_form(op, lhs.ty().family(), current, operand, assign.span)?;
                Ok(self.store(*target, value)?.into_iter().collect())
            }
        }
    }

    /// Store `values` into `targets`, pairwise or by destructuring a call.
    fn assign_values(
        &mut self,
        targets: &[Target<'_, '_>],
        values: &[Expr<'_>],
        span: Span,
    ) -> Result<Vec<Form>> {
        if targets.len() == values.len() {
            return self.assign_pairwise(targets, values);
        }

        match values {
            [call @ Expr::Call(c)] => match c.ty {
                TypeKind::Tuple(n) if usize::from(n) == targets.len() => {
                    self.destructure(targets, call)
                }
                _ => Err(CompilationError::unsupported(
                    format!(
                        "assignment of {} values from a single expression",
                        targets.len()
                    ),
                    span,
                )),
            },
            _ => Err(CompilationError::unsupported(
                format!(
                    "assignment of {} values to {} targets",
                    values.len(),
                    targets.len()
                ),
                span,
            )),
        }
    }

    fn assign_pairwise(
        &mut self,
        targets: &[Target<'_, '_>],
        values: &[Expr<'_>],
    ) -> Result<Vec<Form>> {
        let mut converted = Vec::with_capacity(values.len());
        for value in values {
            converted.push(self.value(value)?);
        }

        // Every right-hand side is evaluated before any store happens.
        let parallel = targets.len() > 1
            && targets.iter().any(|t| !matches!(t, Target::Blank))
            && !converted.iter().all(Form::is_atom);
        if !parallel {
            let mut forms = Vec::with_capacity(targets.len());
            for (target, value) in targets.iter().zip(converted) {
                forms.extend(self.store(*target, value)?);
            }
            return Ok(forms);
        }

        let mut forms = Vec::with_capacity(targets.len() * 2);
        let mut stores = Vec::with_capacity(targets.len());
        for (i, (target, value)) in targets.iter().zip(converted).enumerate() {
            if is_pure(&value) && matches!(target, Target::Blank) {
                continue;
            }
            let temp = format!("{TEMP_PREFIX}{i}");
            forms.push(Form::bind(temp.clone(), value));
            stores.extend(self.store(*target, Form::var(temp))?);
        }
        forms.extend(stores);

        if targets.iter().any(|t| matches!(t, Target::Define(_))) {
            // New bindings must outlive the statement.
            Ok(forms)
        } else {
            Ok(vec![Form::Block(Block::new(forms))])
        }
    }

    /// `a, b := f()`: the call yields `a`, the reserved slots the rest.
    ///
    /// The reserved slots are read right after the call, so no target may
    /// call anything before its slot is read.
    fn destructure(&mut self, targets: &[Target<'_, '_>], call: &Expr<'_>) -> Result<Vec<Form>> {
        let Some((first, rest)) = targets.split_first() else {
            return Ok(Vec::new());
        };
        for target in rest {
            if let Target::Index { base, index } = target
                && (base.contains_call() || index.contains_call())
            {
                return Err(CompilationError::unsupported(
                    "call in an index target of a multi-value assignment",
                    index.span(),
                ));
            }
        }
        let mut forms = Vec::with_capacity(targets.len());
        let value = self.expr(call)?;
        forms.extend(self.store(*first, value)?);
        for (i, target) in rest.iter().enumerate() {
            forms.extend(self.store(*target, Form::MultiValueRef(i + 1))?);
        }
        Ok(forms)
    }

    fn inc_dec(&mut self, s: &IncDecStmt<'_>) -> Result<Option<Form>> {
        let (family, one) = match s.target.ty().family() {
            Some(Family::Int) => (Family::Int, Form::Int(1)),
            Some(Family::Float) => (Family::Float, Form::Float(1.0)),
            _ => {
                return Err(CompilationError::unsupported(
                    format!("{} of a non-numeric value", if s.inc { "++" } else { "--" }),
                    s.span,
                ));
            }
        };
        let kind = if s.inc { OpKind::Add } else { OpKind::Sub };

        let target = self.target(s.target)?;
        let current = self.expr(s.target)?;
        self.store(target, Form::op(kind, family, vec![current, one]))
    }

    // ==========================================================================
    // Control flow
    // ==========================================================================

    fn ret(&mut self, ret: &ReturnStmt<'_>) -> Result<Form> {
        if matches!(ret.results, [single] if matches!(single.ty(), TypeKind::Tuple(_))) {
            return Err(CompilationError::unsupported(
                "return of a multi-value call",
                ret.span,
            ));
        }
        let results = ret
            .results
            .iter()
            .map(|result| self.value(result))
            .collect::<Result<Vec<_>>>()?;
        Ok(Form::Return(results))
    }

    fn if_stmt(&mut self, s: &IfStmt<'_>) -> Result<Form> {
        if s.init.is_some() {
            return Err(CompilationError::unsupported(
                "if statement with init clause",
                s.span,
            ));
        }
        let cond = self.expr(s.cond)?;
        let then = self.block(&s.then)?;
        let els = s
            .els
            .map(|els| self.stmt_form(els))
            .transpose()?
            .map(Box::new);
        Ok(Form::If {
            cond: Box::new(cond),
            then,
            els,
        })
    }

    fn for_stmt(&mut self, s: &ForStmt<'_>) -> Result<Form> {
        let init = s.init.map(|init| self.stmt(init)).transpose()?;
        let cond = match s.cond {
            Some(cond) => self.expr(cond)?,
            None => Form::Bool(true),
        };

        self.loop_depth += 1;
        let body = self.block(&s.body);
        self.loop_depth -= 1;
        let body = body?;

        let post = s
            .post
            .map(|post| self.stmt_form(post))
            .transpose()?
            .map(Box::new);

        let form = Form::Loop {
            cond: Box::new(cond),
            body,
            post,
        };
        Ok(match init {
            Some(mut forms) => {
                forms.push(form);
                Form::Block(Block::new(forms))
            }
            None => form,
        })
    }
}

fn assign_token(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Define => ":=",
        AssignOp::Assign => "=",
        AssignOp::AddAssign => "+=",
        AssignOp::SubAssign => "-=",
        AssignOp::MulAssign => "*=",
        AssignOp::DivAssign => "/=",
        AssignOp::RemAssign => "%=",
    }
}
