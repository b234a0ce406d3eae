//! Calls and the intrinsic surface.
//!
//! Three kinds of call reach the converter:
//!
//! - package functions and the Go builtins `panic` / `len`
//! - functions of the host intrinsic package: typed-value constructors,
//!   `DynCall`, `Call`, `Intern`, and FFI bindings
//! - methods on host objects, which are type coercions

use elgo_ast::{CallExpr, CallTarget, ConstValue, Expr, TypeKind};
use elgo_core::{CompilationError, Span, runtime, runtime::func};
use elgo_ir::Form;

use super::{Converter, Result};

impl<'a> Converter<'a> {
    pub(super) fn call(&mut self, call: &CallExpr<'_>) -> Result<Form> {
        if let Some(arg) = call
            .args
            .iter()
            .find(|arg| matches!(arg.ty(), TypeKind::Tuple(_)))
        {
            return Err(CompilationError::unsupported(
                "multi-value call as an argument",
                arg.span(),
            ));
        }

        match call.target {
            CallTarget::Func(name) => self.func_call(name, call.args, call.span),
            CallTarget::Intrinsic(name) => self.intrinsic(name, call.args, call.span),
            CallTarget::Method { recv, name } => self.method(recv, name, call.args, call.span),
        }
    }

    fn args(&mut self, args: &[Expr<'_>]) -> Result<Vec<Form>> {
        args.iter().map(|arg| self.value(arg)).collect()
    }

    fn func_call(&mut self, name: &str, args: &[Expr<'_>], span: Span) -> Result<Form> {
        let host = match name {
            "panic" => func::PANIC,
            "len" => func::LENGTH,
            name if self.functions.contains(name) => name,
            name => {
                return Err(CompilationError::UnresolvedSymbol {
                    name: name.to_string(),
                    span,
                });
            }
        };
        if matches!(name, "panic" | "len") && args.len() != 1 {
            return Err(CompilationError::unsupported(
                format!("{name} with {} arguments", args.len()),
                span,
            ));
        }
        Ok(Form::call(host, self.args(args)?))
    }

    fn intrinsic(&mut self, name: &str, args: &[Expr<'_>], span: Span) -> Result<Form> {
        match (name, args) {
            // Values of these types need no runtime conversion.
            ("Int" | "Float" | "Str" | "Symbol" | "Bool", [arg]) => self.expr(arg),

            ("DynCall", [callable, rest @ ..]) => Ok(Form::DynCall {
                callable: Box::new(self.expr(callable)?),
                args: self.args(rest)?,
            }),

            ("Call", [callee, rest @ ..]) => match callee.const_value() {
                Some(ConstValue::Str(name)) => Ok(Form::call(name, self.args(rest)?)),
                _ => Ok(Form::DynCall {
                    callable: Box::new(self.expr(callee)?),
                    args: self.args(rest)?,
                }),
            },

            ("Intern", [arg]) => match arg.const_value() {
                Some(ConstValue::Str("")) => Ok(Form::Symbol(runtime::EMPTY_SYMBOL.to_string())),
                Some(ConstValue::Str(s)) => Ok(Form::Symbol(s.to_string())),
                _ => Ok(Form::call(func::INTERN, vec![self.expr(arg)?])),
            },

            ("Int" | "Float" | "Str" | "Symbol" | "Bool" | "DynCall" | "Call" | "Intern", _) => {
                Err(CompilationError::unsupported(
                    format!("lisp.{name} with {} arguments", args.len()),
                    span,
                ))
            }

            (name, args) => match self.ffi.get(name) {
                Some(host) => Ok(Form::call(host, self.args(args)?)),
                None => Err(CompilationError::UnresolvedSymbol {
                    name: name.to_string(),
                    span,
                }),
            },
        }
    }

    fn method(
        &mut self,
        recv: &Expr<'_>,
        name: &str,
        args: &[Expr<'_>],
        span: Span,
    ) -> Result<Form> {
        let coerce = match name {
            "Bool" => func::COERCE_BOOL,
            "Int" => func::COERCE_INT,
            "Float" => func::COERCE_FLOAT,
            "String" => func::COERCE_STRING,
            "Symbol" => func::COERCE_SYMBOL,
            _ => {
                return Err(CompilationError::UnresolvedSymbol {
                    name: name.to_string(),
                    span,
                });
            }
        };
        if !args.is_empty() {
            return Err(CompilationError::unsupported(
                format!("{name} method with arguments"),
                span,
            ));
        }
        Ok(Form::call(coerce, vec![self.expr(recv)?]))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::convert_body;
    use bumpalo::Bump;
    use elgo_ast::{AstBuilder, ConstValue, ScalarKind, TypeKind};
    use elgo_core::CompilationError;

    fn ret_of<'ast>(
        b: &AstBuilder<'ast>,
        e: elgo_ast::Expr<'ast>,
    ) -> Result<String, CompilationError> {
        convert_body(b, &[b.ret(&[e])])
    }

    #[test]
    fn declared_function_call() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.call("main.pair", &[b.int(1)], TypeKind::Int);
        assert_eq!(ret_of(&b, call).unwrap(), "(return (main.pair 1))");
    }

    #[test]
    fn undeclared_function_is_unresolved() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.call("main.nope", &[], TypeKind::Int);
        assert!(matches!(
            ret_of(&b, call).unwrap_err(),
            CompilationError::UnresolvedSymbol { name, .. } if name == "main.nope"
        ));
    }

    #[test]
    fn builtins() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let s = b.var("s", TypeKind::String);
        assert_eq!(
            ret_of(&b, b.call("len", &[s], TypeKind::Int)).unwrap(),
            "(return (length s))"
        );
        let out = convert_body(
            &b,
            &[b.expr_stmt(b.call("panic", &[b.string("bad")], TypeKind::Void))],
        )
        .unwrap();
        assert_eq!(out, r#"(Go--panic "bad")"#);
    }

    #[test]
    fn typed_constructors_are_transparent() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let x = b.var("x", TypeKind::Int);
        assert_eq!(
            ret_of(&b, b.intrinsic("Int", &[x], TypeKind::Object)).unwrap(),
            "(return x)"
        );
    }

    #[test]
    fn intern() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        assert_eq!(
            ret_of(
                &b,
                b.intrinsic("Intern", &[b.string("foo")], TypeKind::Symbol)
            )
            .unwrap(),
            "(return 'foo)"
        );
        assert_eq!(
            ret_of(&b, b.intrinsic("Intern", &[b.string("")], TypeKind::Symbol)).unwrap(),
            "(return '##)"
        );
        let s = b.var("s", TypeKind::String);
        assert_eq!(
            ret_of(&b, b.intrinsic("Intern", &[s], TypeKind::Symbol)).unwrap(),
            "(return (intern s))"
        );
    }

    #[test]
    fn call_by_name() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let name = b.constant("fn", TypeKind::String, ConstValue::Str("message"));
        assert_eq!(
            ret_of(&b, b.intrinsic("Call", &[name, b.int(1)], TypeKind::Object)).unwrap(),
            "(return (message 1))"
        );

        let dynamic = b.var("f", TypeKind::String);
        assert_eq!(
            ret_of(
                &b,
                b.intrinsic("Call", &[dynamic, b.int(1)], TypeKind::Object)
            )
            .unwrap(),
            "(return (funcall f 1))"
        );
    }

    #[test]
    fn dyn_call() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.var("f", TypeKind::Object);
        assert_eq!(
            ret_of(&b, b.intrinsic("DynCall", &[f], TypeKind::Object)).unwrap(),
            "(return (funcall f))"
        );
        let no_target = b.intrinsic("DynCall", &[], TypeKind::Object);
        assert!(ret_of(&b, no_target).is_err());
    }

    #[test]
    fn ffi_binding() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let out = convert_body(
            &b,
            &[b.expr_stmt(b.intrinsic("Insert", &[b.string("x")], TypeKind::Void))],
        )
        .unwrap();
        assert_eq!(out, r#"(insert "x")"#);

        let err = ret_of(&b, b.intrinsic("Message", &[], TypeKind::Object)).unwrap_err();
        assert!(matches!(err, CompilationError::UnresolvedSymbol { .. }));
    }

    #[test]
    fn method_coercions() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let o = b.var("o", TypeKind::Object);
        assert_eq!(
            ret_of(&b, b.method(o, "Int", TypeKind::Int)).unwrap(),
            "(return (Go--coerce-int o))"
        );
        assert!(matches!(
            ret_of(&b, b.method(o, "Frob", TypeKind::Int)).unwrap_err(),
            CompilationError::UnresolvedSymbol { .. }
        ));
    }

    #[test]
    fn arrays_passed_by_value() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let a = b.var("a", TypeKind::Array(ScalarKind::Int, 2));
        assert_eq!(
            ret_of(&b, b.call("main.pair", &[a], TypeKind::Int)).unwrap(),
            "(return (main.pair (copy-array a)))"
        );
    }

    #[test]
    fn tuple_argument_is_unsupported() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.call("main.pair", &[], TypeKind::Tuple(2));
        let outer = b.call("main.pair", &[inner], TypeKind::Int);
        assert!(matches!(
            ret_of(&b, outer).unwrap_err(),
            CompilationError::Unsupported { .. }
        ));
    }
}
