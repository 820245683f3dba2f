use super::lexer::escape;
use crate::common::{fmt_float, Float, Priority};
use crate::eval::{Number, Value};
use crate::ops::{BinaryOperator, Operate, PostfixOperator, PrefixOperator};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Number),
    List(Vec<Expression>),
    Str(String),
    /// A `{name}` reference; names that are positive integers refer to the
    /// arguments of the enclosing function call.
    Var(String),
    Operation(Operation),
    /// A `{name, args...}` call of a saved function.
    Call(String, Vec<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Prefix(PrefixOperator, Box<Expression>),
    Binary(Box<Expression>, BinaryOperator, Box<Expression>),
    Postfix(Box<Expression>, PostfixOperator),
}

impl Expression {
    pub fn literal(x: impl Into<Float>) -> Self {
        Self::Literal(Number::new(x.into()))
    }

    pub fn prefix(op: impl Into<PrefixOperator>, right: Expression) -> Self {
        Self::Operation(Operation::Prefix(op.into(), Box::new(right)))
    }

    pub fn binary(left: Expression, op: impl Into<BinaryOperator>, right: Expression) -> Self {
        Self::Operation(Operation::Binary(Box::new(left), op.into(), Box::new(right)))
    }

    pub fn postfix(left: Expression, op: impl Into<PostfixOperator>) -> Self {
        Self::Operation(Operation::Postfix(Box::new(left), op.into()))
    }

    /// The round-trippable source form.
    pub fn to_code(&self) -> String {
        self.to_string()
    }
}

impl Operation {
    pub fn priority(&self) -> Priority {
        match self {
            Self::Prefix(op, _) => op.priority(),
            Self::Binary(_, op, _) => op.priority(),
            Self::Postfix(_, op) => op.priority(),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Prefix(op, _) => op.symbol(),
            Self::Binary(_, op, _) => op.symbol(),
            Self::Postfix(_, op) => op.symbol(),
        }
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(x) => Self::Literal(x),
            Value::List(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::String(s) => Self::Str(s),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Negative literals only come from stored values; parenthesize them so
            // the text parses back to the same shape.
            Self::Literal(x) if x.value < 0.0 => write!(f, "(-{})", fmt_float(-x.value)),
            Self::Literal(x) => f.write_str(&fmt_float(x.value)),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Str(s) => f.write_str(&escape(s)),
            Self::Var(name) => write!(f, "{{{}}}", name),
            Self::Call(name, args) => {
                write!(f, "{{{}", name)?;
                for arg in args {
                    write!(f, ",{}", arg)?;
                }
                f.write_str("}")
            }
            Self::Operation(op) => fmt::Display::fmt(op, f),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(op, r) => write!(f, "({}{})", op.symbol(), r),
            Self::Binary(l, op, r) => write!(f, "({}{}{})", l, op.symbol(), r),
            Self::Postfix(l, op) => write!(f, "({}{})", l, op.symbol()),
        }
    }
}
