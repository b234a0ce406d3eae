//! Expression conversion.

use elgo_ast::{
    BinaryExpr, BinaryOp, CompositeLit, ConstValue, Expr, ScalarKind, TypeKind, UnaryExpr,
    UnaryOp,
};
use elgo_core::{CompilationError, Family, Span, runtime::func};
use elgo_ir::{Form, OpKind, UnaryKind};

use super::{Converter, Result};

impl<'a> Converter<'a> {
    /// Convert an expression to a value-producing form.
    pub fn expr(&mut self, e: &Expr<'_>) -> Result<Form> {
        if let Some(value) = e.const_value() {
            return Ok(atom(value, e.ty()));
        }

        match e {
            Expr::Lit(lit) => Ok(atom(lit.value, lit.ty)),
            Expr::Ident(ident) if ident.ident.is_blank() => Err(CompilationError::unsupported(
                "use of the blank identifier as a value",
                ident.ident.span,
            )),
            Expr::Ident(ident) => Ok(Form::var(ident.ident.name)),
            Expr::Binary(binary) => self.binary(binary),
            Expr::Unary(unary) => self.unary(unary),
            Expr::Call(call) => self.call(call),
            Expr::Index(index) => Ok(Form::ArrayIndex {
                array: Box::new(self.expr(index.base)?),
                index: Box::new(self.expr(index.index)?),
            }),
            Expr::CompositeLit(lit) => self.composite(lit),
            Expr::Paren(paren) => self.expr(paren.expr),
        }
    }

    /// Convert an expression whose value is stored somewhere.
    ///
    /// Arrays have value semantics: anything that is not already a fresh
    /// array is copied.
    pub fn value(&mut self, e: &Expr<'_>) -> Result<Form> {
        let form = self.expr(e)?;
        let fresh = matches!(e.unparen(), Expr::CompositeLit(_) | Expr::Call(_));
        if e.ty().is_array() && !fresh {
            Ok(Form::ArrayCopy(Box::new(form)))
        } else {
            Ok(form)
        }
    }

    fn binary(&mut self, binary: &BinaryExpr<'_>) -> Result<Form> {
        let family = binary.left.ty().family().or(binary.right.ty().family());
        let left = self.expr(binary.left)?;
        let right = self.expr(binary.right)?;
        self.binary_form(binary.op, family, left, right, binary.span)
    }

    /// Build the form for `left op right` on operands of `family`.
    ///
    /// Operands without a family (booleans, symbols, host objects) only
    /// support identity comparison.
    pub(super) fn binary_form(
        &self,
        op: BinaryOp,
        family: Option<Family>,
        left: Form,
        right: Form,
        span: Span,
    ) -> Result<Form> {
        let kind = match op {
            BinaryOp::LogicalAnd => return Ok(Form::And(Box::new(left), Box::new(right))),
            BinaryOp::LogicalOr => return Ok(Form::Or(Box::new(left), Box::new(right))),
            BinaryOp::AndNot | BinaryOp::Shl | BinaryOp::Shr => {
                return Err(CompilationError::unsupported(
                    format!("operator {op}"),
                    span,
                ));
            }
            BinaryOp::Add => OpKind::Add,
            BinaryOp::Sub => OpKind::Sub,
            BinaryOp::Mul => OpKind::Mul,
            BinaryOp::Div => OpKind::Div,
            BinaryOp::Rem => OpKind::Rem,
            BinaryOp::BitAnd => OpKind::BitAnd,
            BinaryOp::BitOr => OpKind::BitOr,
            BinaryOp::BitXor => OpKind::BitXor,
            BinaryOp::Eq => OpKind::Eq,
            BinaryOp::NotEq => OpKind::NotEq,
            BinaryOp::Less => OpKind::Less,
            BinaryOp::LessEq => OpKind::LessEq,
            BinaryOp::Greater => OpKind::Greater,
            BinaryOp::GreaterEq => OpKind::GreaterEq,
        };

        let Some(family) = family else {
            let eq = || Form::call(func::EQ, vec![left, right]);
            return match kind {
                OpKind::Eq => Ok(eq()),
                OpKind::NotEq => Ok(Form::Not(Box::new(eq()))),
                _ => Err(CompilationError::unsupported(
                    format!("operator {op} on operands without a numeric or string type"),
                    span,
                )),
            };
        };

        if kind.is_variadic() {
            if let Form::Op {
                kind: left_kind,
                family: left_family,
                mut args,
            } = left
            {
                if left_kind == kind && left_family == family {
                    args.push(right);
                    return Ok(Form::op(kind, family, args));
                }
                let left = Form::op(left_kind, left_family, args);
                return Ok(Form::op(kind, family, vec![left, right]));
            }
        }
        Ok(Form::op(kind, family, vec![left, right]))
    }

    fn unary(&mut self, unary: &UnaryExpr<'_>) -> Result<Form> {
        match unary.op {
            UnaryOp::Plus => self.expr(unary.operand),
            UnaryOp::Not => Ok(Form::Not(Box::new(self.expr(unary.operand)?))),
            UnaryOp::Neg => match unary.operand.const_value() {
                Some(ConstValue::Int(v)) => v.checked_neg().map(Form::Int).ok_or_else(|| {
                    CompilationError::unsupported("integer constant overflow", unary.span)
                }),
                Some(ConstValue::Float(v)) => Ok(Form::Float(-v)),
                _ => self.typed_unary(UnaryKind::Neg, unary, &[Family::Int, Family::Float]),
            },
            UnaryOp::BitNot => self.typed_unary(UnaryKind::BitNot, unary, &[Family::Int]),
        }
    }

    fn typed_unary(
        &mut self,
        kind: UnaryKind,
        unary: &UnaryExpr<'_>,
        allowed: &[Family],
    ) -> Result<Form> {
        let family = unary
            .operand
            .ty()
            .family()
            .filter(|family| allowed.contains(family))
            .ok_or_else(|| {
                CompilationError::unsupported(
                    format!("unary {} on this operand type", unary.op),
                    unary.span,
                )
            })?;
        Ok(Form::Unary {
            kind,
            family,
            arg: Box::new(self.expr(unary.operand)?),
        })
    }

    // ==========================================================================
    // Arrays
    // ==========================================================================

    /// Convert an array or slice literal.
    ///
    /// Keys run on from the previous element. A literal that spells out
    /// every element in order becomes a dense `vector` call; anything else
    /// starts from a zero-filled array and stores the given elements.
    fn composite(&mut self, lit: &CompositeLit<'_>) -> Result<Form> {
        let (elem, declared_len) = match lit.ty {
            TypeKind::Array(elem, len) => (elem, Some(i64::from(len))),
            TypeKind::Slice(elem) => (elem, None),
            _ => {
                return Err(CompilationError::unsupported(
                    "composite literal of a non-array type",
                    lit.span,
                ));
            }
        };

        let mut vals = Vec::with_capacity(lit.elems.len());
        let mut next = 0i64;
        for element in lit.elems {
            let index = element.key.unwrap_or(next);
            if index < 0 || declared_len.is_some_and(|len| index >= len) {
                return Err(CompilationError::unsupported(
                    format!("array literal index {index} out of range"),
                    element.value.span(),
                ));
            }
            vals.push((index, self.value(&element.value)?));
            next = index + 1;
        }

        let len = match declared_len {
            Some(len) => len,
            None => vals.iter().map(|(i, _)| i + 1).max().unwrap_or(0),
        };
        let dense = usize::try_from(len).is_ok_and(|len| len == vals.len())
            && vals
                .iter()
                .enumerate()
                .all(|(pos, (index, _))| usize::try_from(*index).is_ok_and(|i| i == pos));

        if dense {
            return Ok(Form::ArrayLit(vals.into_iter().map(|(_, v)| v).collect()));
        }

        let ctor = Form::call(
            func::MAKE_VECTOR,
            vec![Form::Int(len), zero_scalar(elem)],
        );
        Ok(Form::SparseArrayLit {
            ctor: Box::new(ctor),
            vals,
        })
    }

    /// The zero value of a declared type.
    pub(super) fn zero_value(&self, ty: TypeKind, span: Span) -> Result<Form> {
        match ty {
            TypeKind::Bool => Ok(zero_scalar(ScalarKind::Bool)),
            TypeKind::Int => Ok(zero_scalar(ScalarKind::Int)),
            TypeKind::Float => Ok(zero_scalar(ScalarKind::Float)),
            TypeKind::String => Ok(zero_scalar(ScalarKind::String)),
            TypeKind::Char => Ok(zero_scalar(ScalarKind::Char)),
            TypeKind::Symbol => Ok(zero_scalar(ScalarKind::Symbol)),
            TypeKind::Object => Ok(zero_scalar(ScalarKind::Object)),
            TypeKind::Slice(_) => Ok(Form::Bool(false)),
            TypeKind::Array(elem, len) => Ok(Form::call(
                func::MAKE_VECTOR,
                vec![Form::Int(i64::from(len)), zero_scalar(elem)],
            )),
            TypeKind::Void | TypeKind::Tuple(_) => Err(CompilationError::unsupported(
                "variable without a value type",
                span,
            )),
        }
    }
}

fn zero_scalar(kind: ScalarKind) -> Form {
    match kind {
        ScalarKind::Int => Form::Int(0),
        ScalarKind::Float => Form::Float(0.0),
        ScalarKind::String => Form::string(""),
        ScalarKind::Char => Form::Char('\0'),
        ScalarKind::Bool | ScalarKind::Symbol | ScalarKind::Object => Form::Bool(false),
    }
}

/// Turn a folded constant into an atom of the expression's type.
fn atom(value: ConstValue<'_>, ty: TypeKind) -> Form {
    match (value, ty) {
        (ConstValue::Int(v), TypeKind::Float) => Form::Float(v as f64),
        (ConstValue::Char(c), TypeKind::Int) => Form::Int(i64::from(u32::from(c))),
        (ConstValue::Bool(v), _) => Form::Bool(v),
        (ConstValue::Int(v), _) => Form::Int(v),
        (ConstValue::Float(v), _) => Form::Float(v),
        (ConstValue::Char(c), _) => Form::Char(c),
        (ConstValue::Str(s), _) => Form::string(s),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::convert_body;
    use bumpalo::Bump;
    use elgo_ast::{AstBuilder, BinaryOp, ScalarKind, TypeKind, UnaryOp};
    use elgo_core::CompilationError;

    fn ret_of<'ast>(b: &AstBuilder<'ast>, e: elgo_ast::Expr<'ast>) -> String {
        convert_body(b, &[b.ret(&[e])]).unwrap()
    }

    #[test]
    fn additive_chain_flattens() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let (x, y) = (b.var("x", TypeKind::Int), b.var("y", TypeKind::Int));
        let sum = b.binary(b.binary(x, BinaryOp::Add, y), BinaryOp::Add, b.int(3));
        assert_eq!(ret_of(&b, sum), "(return (int+ x y 3))");

        // a different operator on the left stays nested
        let mixed = b.binary(b.binary(x, BinaryOp::Mul, y), BinaryOp::Add, b.int(3));
        assert_eq!(ret_of(&b, mixed), "(return (int+ (int* x y) 3))");

        // right nesting is not reassociated
        let inner = b.paren(b.binary(y, BinaryOp::Sub, b.int(1)));
        let right = b.binary(x, BinaryOp::Sub, inner);
        assert_eq!(ret_of(&b, right), "(return (int- x (int- y 1)))");
    }

    #[test]
    fn string_and_float_families() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let s = b.var("s", TypeKind::String);
        let cmp = b.binary(s, BinaryOp::GreaterEq, b.string("m"));
        assert_eq!(ret_of(&b, cmp), r#"(return (string>= s "m"))"#);

        let f = b.var("f", TypeKind::Float);
        assert_eq!(
            ret_of(&b, b.binary(f, BinaryOp::Div, b.float(2.0))),
            "(return (float/ f 2.0))"
        );
    }

    #[test]
    fn logical_operators() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let (p, q) = (b.var("p", TypeKind::Bool), b.var("q", TypeKind::Bool));
        let e = b.binary(p, BinaryOp::LogicalAnd, b.unary(UnaryOp::Not, q));
        assert_eq!(ret_of(&b, e), "(return (and p (not q)))");
    }

    #[test]
    fn familyless_equality_uses_eq() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let (p, q) = (b.var("p", TypeKind::Symbol), b.var("q", TypeKind::Symbol));
        assert_eq!(
            ret_of(&b, b.binary(p, BinaryOp::NotEq, q)),
            "(return (not (eq p q)))"
        );
        let err = convert_body(&b, &[b.ret(&[b.binary(p, BinaryOp::Less, q)])]).unwrap_err();
        assert!(matches!(err, CompilationError::Unsupported { .. }));
    }

    #[test]
    fn shifts_are_unsupported() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let x = b.var("x", TypeKind::Int);
        let err = convert_body(&b, &[b.ret(&[b.binary(x, BinaryOp::Shl, b.int(2))])]).unwrap_err();
        assert!(err.to_string().contains("operator <<"));
    }

    #[test]
    fn negation_folds_constants() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        assert_eq!(ret_of(&b, b.unary(UnaryOp::Neg, b.int(5))), "(return -5)");
        assert_eq!(
            ret_of(&b, b.unary(UnaryOp::Neg, b.float(1.5))),
            "(return -1.5)"
        );

        let x = b.var("x", TypeKind::Float);
        assert_eq!(
            ret_of(&b, b.unary(UnaryOp::Neg, x)),
            "(return (float-neg x))"
        );
        assert_eq!(ret_of(&b, b.unary(UnaryOp::Plus, x)), "(return x)");
    }

    #[test]
    fn bit_not_needs_int() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let i = b.var("i", TypeKind::Int);
        assert_eq!(
            ret_of(&b, b.unary(UnaryOp::BitNot, i)),
            "(return (int-bitnot i))"
        );

        let f = b.var("f", TypeKind::Float);
        let not_float = b.ret(&[b.unary(UnaryOp::BitNot, f)]);
        assert!(convert_body(&b, &[not_float]).is_err());
    }

    #[test]
    fn array_literals() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let ty = TypeKind::Array(ScalarKind::Int, 3);

        let dense = b.array_lit(ty, &[(None, b.int(1)), (None, b.int(2)), (None, b.int(3))]);
        assert_eq!(ret_of(&b, dense), "(return [1 2 3])");

        let short = b.array_lit(ty, &[(None, b.int(1))]);
        assert_eq!(
            ret_of(&b, short),
            "(return (sparse-array (make-vector 3 0) (0 . 1)))"
        );

        let keyed = b.array_lit(
            ty,
            &[(Some(2), b.int(9)), (Some(0), b.int(7)), (None, b.int(8))],
        );
        assert_eq!(
            ret_of(&b, keyed),
            "(return (sparse-array (make-vector 3 0) (2 . 9) (0 . 7) (1 . 8)))"
        );
    }

    #[test]
    fn slice_literal_length_from_keys() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let ty = TypeKind::Slice(ScalarKind::String);
        let lit = b.array_lit(ty, &[(Some(4), b.string("x"))]);
        assert_eq!(
            ret_of(&b, lit),
            r#"(return (sparse-array (make-vector 5 "") (4 . "x")))"#
        );
    }

    #[test]
    fn array_index_out_of_range() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let lit = b.array_lit(TypeKind::Array(ScalarKind::Int, 2), &[(Some(2), b.int(1))]);
        assert!(convert_body(&b, &[b.ret(&[lit])]).is_err());
    }

    #[test]
    fn arrays_are_copied_on_assignment() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let ty = TypeKind::Array(ScalarKind::Float, 2);
        let out = convert_body(
            &b,
            &[
                b.define(&[b.def("a", ty)], &[b.array_lit(ty, &[])]),
                b.define(&[b.def("c", ty)], &[b.var("a", ty)]),
            ],
        )
        .unwrap();
        assert_eq!(
            out,
            "(bind a (sparse-array (make-vector 2 0.0))) (bind c (copy-array a))"
        );
    }

    #[test]
    fn untyped_int_constant_in_float_context() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.var("f", TypeKind::Float);
        let one = elgo_ast::Expr::Lit(elgo_ast::LitExpr {
            value: elgo_ast::ConstValue::Int(1),
            ty: TypeKind::Float,
            span: Default::default(),
        });
        assert_eq!(
            ret_of(&b, b.binary(f, BinaryOp::Add, one)),
            "(return (float+ f 1.0))"
        );
    }

    #[test]
    fn blank_as_value() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let err = convert_body(&b, &[b.ret(&[b.var("_", TypeKind::Int)])]).unwrap_err();
        assert!(matches!(err, CompilationError::Unsupported { .. }));
    }
}
