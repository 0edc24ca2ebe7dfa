use std::fmt;

use itertools::Itertools;

/// Name given to the prototype wrapping a bare top-level expression.
pub const ANON_FN_NAME: &str = "__anon_expr";

// Closed set of expression nodes, children exclusively owned
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Binary {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn number(val: f64) -> Self {
        Expr::Number(val)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn binary(op: char, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: callee.into(),
            args,
        }
    }
}

// Binary nodes print as s-expressions so grouping is visible
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(val) => write!(f, "{val}"),
            Expr::Variable(name) => write!(f, "{name}"),
            Expr::Binary { op, left, right } => write!(f, "({op} {left} {right})"),
            Expr::Call { callee, args } => write!(f, "{callee}({})", args.iter().join(", ")),
        }
    }
}

/// A function's name and parameter names, shared by definitions and
/// `extern` declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub args: Vec<String>,
}

impl Prototype {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn anonymous() -> Self {
        Self::new(ANON_FN_NAME, vec![])
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.iter().join(" "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub proto: Prototype,
    pub body: Expr,
}

impl Function {
    pub fn is_anonymous(&self) -> bool {
        self.proto.name == ANON_FN_NAME
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            write!(f, "{}", self.body)
        } else {
            write!(f, "def {} {}", self.proto, self.body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displaying_expressions() {
        let expr = Expr::binary(
            '+',
            Expr::variable("a"),
            Expr::binary('*', Expr::variable("b"), Expr::number(2.0)),
        );
        assert_eq!(expr.to_string(), "(+ a (* b 2))");

        let call = Expr::call("foo", vec![Expr::number(1.5), Expr::variable("x")]);
        assert_eq!(call.to_string(), "foo(1.5, x)");

        assert_eq!(Expr::call("bar", vec![]).to_string(), "bar()");
    }

    #[test]
    fn displaying_functions() {
        let proto = Prototype::new("foo", vec!["a".into(), "b".into()]);
        assert_eq!(proto.to_string(), "foo(a b)");

        let func = Function {
            proto,
            body: Expr::binary('+', Expr::variable("a"), Expr::variable("b")),
        };
        assert_eq!(func.to_string(), "def foo(a b) (+ a b)");
        assert!(!func.is_anonymous());

        let anon = Function {
            proto: Prototype::anonymous(),
            body: Expr::number(4.0),
        };
        assert!(anon.is_anonymous());
        assert_eq!(anon.to_string(), "4");
    }
}
