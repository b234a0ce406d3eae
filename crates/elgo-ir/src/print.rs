//! Lisp-notation printing of forms.

use std::fmt::{self, Display, Formatter};

use crate::{Block, Form};

fn write_list(f: &mut Formatter<'_>, head: &str, items: &[Form]) -> fmt::Result {
    write!(f, "({head}")?;
    for item in items {
        write!(f, " {item}")?;
    }
    f.write_str(")")
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_list(f, "block", self.forms())
    }
}

impl Display for Form {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Form::Bool(true) => f.write_str("t"),
            Form::Bool(false) => f.write_str("nil"),
            Form::Char(c) => write!(f, "?{}", c.escape_default()),
            Form::Int(v) => write!(f, "{v}"),
            Form::Float(v) => write!(f, "{v:?}"),
            Form::Str(s) => write!(f, "{s:?}"),
            Form::Symbol(s) => write!(f, "'{s}"),
            Form::Var(name) => f.write_str(name),

            Form::ArrayLit(vals) => {
                f.write_str("[")?;
                for (i, v) in vals.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Form::SparseArrayLit { ctor, vals } => {
                write!(f, "(sparse-array {ctor}")?;
                for (index, val) in vals {
                    write!(f, " ({index} . {val})")?;
                }
                f.write_str(")")
            }

            Form::Block(block) => write!(f, "{block}"),
            Form::If { cond, then, els } => {
                write!(f, "(if {cond} {then}")?;
                if let Some(els) = els {
                    write!(f, " {els}")?;
                }
                f.write_str(")")
            }
            Form::Loop { cond, body, post } => {
                write!(f, "(while {cond} {body}")?;
                if let Some(post) = post {
                    write!(f, " {post}")?;
                }
                f.write_str(")")
            }
            Form::Return(results) => write_list(f, "return", results),
            Form::Break => f.write_str("(break)"),
            Form::Continue => f.write_str("(continue)"),

            Form::Bind { name, init } => write!(f, "(bind {name} {init})"),
            Form::Rebind { name, expr } => write!(f, "(rebind {name} {expr})"),

            Form::Op { kind, family, args } => write_list(f, &format!("{family}{kind}"), args),
            Form::Unary { kind, family, arg } => {
                write!(f, "({family}-{} {arg})", kind.name())
            }
            Form::Not(arg) => write!(f, "(not {arg})"),
            Form::And(a, b) => write!(f, "(and {a} {b})"),
            Form::Or(a, b) => write!(f, "(or {a} {b})"),

            Form::Call { name, args } => write_list(f, name, args),
            Form::DynCall { callable, args } => {
                write!(f, "(funcall {callable}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
            Form::MultiValueRef(index) => write!(f, "(multi-value-ref {index})"),

            Form::ArrayCopy(array) => write!(f, "(copy-array {array})"),
            Form::ArrayIndex { array, index } => write!(f, "(aref {array} {index})"),
            Form::ArrayUpdate {
                array,
                index,
                value,
            } => write!(f, "(aset {array} {index} {value})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OpKind, UnaryKind};
    use elgo_core::Family;

    #[test]
    fn atoms() {
        assert_eq!(Form::Bool(true).to_string(), "t");
        assert_eq!(Form::Bool(false).to_string(), "nil");
        assert_eq!(Form::Float(1.0).to_string(), "1.0");
        assert_eq!(Form::string("a\"b").to_string(), r#""a\"b""#);
        assert_eq!(Form::Symbol("##".into()).to_string(), "'##");
        assert_eq!(Form::Char('x').to_string(), "?x");
    }

    #[test]
    fn typed_ops() {
        let form = Form::op(
            OpKind::Add,
            Family::Int,
            vec![Form::var("a"), Form::Int(1), Form::Int(2)],
        );
        assert_eq!(form.to_string(), "(int+ a 1 2)");

        let neg = Form::Unary {
            kind: UnaryKind::Neg,
            family: Family::Float,
            arg: Box::new(Form::var("x")),
        };
        assert_eq!(neg.to_string(), "(float-neg x)");
    }

    #[test]
    fn statements() {
        let form = Form::If {
            cond: Box::new(Form::var("c")),
            then: Block::new(vec![Form::Return(vec![Form::Int(1)])]),
            els: Some(Box::new(Form::Block(Block::new(vec![Form::Return(
                vec![],
            )])))),
        };
        assert_eq!(
            form.to_string(),
            "(if c (block (return 1)) (block (return)))"
        );
    }

    #[test]
    fn sparse_array() {
        let form = Form::SparseArrayLit {
            ctor: Box::new(Form::call("make-vector", vec![Form::Int(4), Form::Int(0)])),
            vals: vec![(1, Form::var("x"))],
        };
        assert_eq!(
            form.to_string(),
            "(sparse-array (make-vector 4 0) (1 . x))"
        );
    }
}
