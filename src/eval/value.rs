use crate::common::{fmt_float, Float, DISPLAY_DEPTH};
use crate::parse::lexer::escape;
use std::fmt;

/// A real number together with the largest value it could have taken.
#[derive(Debug, Copy, Clone)]
pub struct Number {
    pub value: Float,
    pub potential: Float,
}

impl Number {
    pub const ZERO: Self = Self::new(0.0);

    /// A constant, whose potential is itself.
    pub const fn new(value: Float) -> Self {
        Self {
            value,
            potential: value,
        }
    }

    /// The result of a die with `sides` sides.
    pub const fn die(value: Float, sides: Float) -> Self {
        Self {
            value,
            potential: sides,
        }
    }

    pub fn floor(self) -> Float {
        self.value.floor()
    }
}

impl std::ops::Neg for Number {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::die(-self.value, self.potential)
    }
}

impl std::ops::Add for Number {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::die(self.value + rhs.value, self.potential + rhs.potential)
    }
}

macro_rules! num_impl_bin_op {
    ($Name:ident, $fn_name:ident) => {
        impl std::ops::$Name for Number {
            type Output = Self;

            fn $fn_name(self, rhs: Self) -> Self::Output {
                Self::new(std::ops::$Name::$fn_name(self.value, rhs.value))
            }
        }
    };
}

num_impl_bin_op!(Mul, mul);
num_impl_bin_op!(Div, div);

impl std::iter::Sum for Number {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

// Potential is bookkeeping; two numbers are equal when their values are.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq(&other.value)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl From<Float> for Number {
    fn from(x: Float) -> Self {
        Self::new(x)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_float(self.value))
    }
}

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Number),
    List(Vec<Value>),
    String(String),
}

impl Value {
    /// Collapses to one number: lists sum their items, strings sum their
    /// code points.
    pub fn as_single(&self) -> Number {
        match self {
            Self::Number(x) => *x,
            Self::List(items) => items.iter().map(Self::as_single).sum(),
            Self::String(s) => s.chars().map(|c| Number::new(c as u32 as Float)).sum(),
        }
    }

    /// A fresh list: lists copy their items, anything else becomes a
    /// one-element list.
    pub fn as_list(&self) -> Vec<Value> {
        match self {
            Self::List(items) => items.clone(),
            _ => vec![self.clone()],
        }
    }

    pub fn into_list(self) -> Vec<Value> {
        match self {
            Self::List(items) => items,
            x => vec![x],
        }
    }

    /// Lists become text one code point per item.
    pub fn as_string(&self) -> String {
        match self {
            Self::Number(x) => fmt_float(x.value),
            Self::List(items) => items
                .iter()
                .map(|item| code_point(item.as_single().floor()))
                .collect(),
            Self::String(s) => s.clone(),
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Whether a string appears anywhere inside, sublists included.
    pub fn contains_string(&self) -> bool {
        match self {
            Self::String(_) => true,
            Self::List(items) => items.iter().any(Self::contains_string),
            Self::Number(_) => false,
        }
    }

    /// Whether every number inside is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Number(x) => x.value.is_finite(),
            Self::List(items) => items.iter().all(Self::is_finite),
            Self::String(_) => true,
        }
    }

    /// Negates every number, descending into lists. Strings negate their
    /// code points.
    pub fn negate(&self) -> Value {
        match self {
            Self::Number(x) => Self::Number(-*x),
            Self::List(items) => Self::List(items.iter().map(Self::negate).collect()),
            Self::String(s) => Self::List(
                s.chars()
                    .map(|c| Self::Number(-Number::new(c as u32 as Float)))
                    .collect(),
            ),
        }
    }

    /// How many items a list has; anything else counts as one.
    pub fn size(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            _ => 1,
        }
    }

    /// The canonical text form, which parses back to an equal value.
    pub fn to_code(&self) -> String {
        match self {
            Self::Number(x) if x.value < 0.0 => format!("(-{})", fmt_float(-x.value)),
            Self::Number(x) => fmt_float(x.value),
            Self::List(items) => {
                let items: Vec<_> = items.iter().map(Self::to_code).collect();
                format!("[{}]", items.join(","))
            }
            Self::String(s) => escape(s),
        }
    }

    /// Human-readable form. Lists of numbers lead with their total; lists
    /// nested deeper than `depth` are elided.
    pub fn to_display(&self, depth: usize) -> String {
        match self {
            Self::Number(x) => fmt_float(x.value),
            Self::String(s) => escape(s),
            Self::List(items) if items.is_empty() => "[]".to_string(),
            Self::List(items) => {
                let prefix = if self.contains_string() {
                    String::new()
                } else {
                    format!("{} ", fmt_float(self.as_single().value))
                };
                if depth == 0 {
                    return format!("{}[...]", prefix);
                }
                let items: Vec<_> = items.iter().map(|item| item.to_display(depth - 1)).collect();
                format!("{}[{}]", prefix, items.join(", "))
            }
        }
    }
}

fn code_point(x: Float) -> char {
    if x < 0.0 || x > u32::MAX as Float {
        return char::REPLACEMENT_CHARACTER;
    }
    char::from_u32(x as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl From<Number> for Value {
    fn from(x: Number) -> Self {
        Self::Number(x)
    }
}

impl From<Float> for Value {
    fn from(x: Float) -> Self {
        Self::Number(Number::new(x))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display(DISPLAY_DEPTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[f64]) -> Value {
        Value::List(items.iter().copied().map(Value::from).collect())
    }

    #[test]
    fn test_number_equality_ignores_potential() {
        assert_eq!(Number::die(3.0, 6.0), Number::new(3.0));
        assert!(Number::die(2.0, 6.0) < Number::new(3.0));
    }

    #[test]
    fn test_number_arith() {
        let x = Number::die(3.0, 6.0) + Number::die(2.0, 4.0);
        assert_eq!(x.value, 5.0);
        assert_eq!(x.potential, 10.0);

        let x = -Number::die(3.0, 6.0);
        assert_eq!(x.value, -3.0);
        assert_eq!(x.potential, 6.0);

        assert_eq!((Number::new(3.0) / Number::new(-2.0)).value, -1.5);
    }

    #[test]
    fn test_as_single() {
        assert_eq!(list(&[1.0, 2.0, 3.0]).as_single(), Number::new(6.0));
        assert_eq!(Value::List(vec![]).as_single(), Number::ZERO);
        assert_eq!(Value::from("AB").as_single(), Number::new(131.0));
        let nested = Value::List(vec![list(&[1.0, 2.0]), Value::from(4.0)]);
        assert_eq!(nested.as_single(), Number::new(7.0));
    }

    #[test]
    fn test_as_string() {
        assert_eq!(list(&[72.0, 105.9]).as_string(), "Hi");
        assert_eq!(list(&[-1.0]).as_string(), "\u{FFFD}");
        assert_eq!(list(&[55296.0]).as_string(), "\u{FFFD}");
        assert_eq!(Value::from(2.5).as_string(), "2.5");
        assert_eq!(Value::List(vec![]).as_string(), "");
    }

    #[test]
    fn test_as_list() {
        assert_eq!(Value::from(2.0).as_list(), vec![Value::from(2.0)]);
        assert_eq!(Value::from("ab").as_list(), vec![Value::from("ab")]);
        assert_eq!(list(&[1.0, 2.0]).into_list().len(), 2);
    }

    #[test]
    fn test_negate() {
        assert_eq!(Value::from(2.0).negate(), Value::from(-2.0));
        assert_eq!(
            Value::List(vec![list(&[1.0]), Value::from(-3.0)]).negate(),
            Value::List(vec![list(&[-1.0]), Value::from(3.0)]),
        );
        assert_eq!(Value::from("A").negate(), list(&[-65.0]));
    }

    #[test]
    fn test_to_code() {
        assert_eq!(list(&[3.0, 1.0, 5.0, 2.0]).to_code(), "[3,1,5,2]");
        assert_eq!(Value::from(-1.5).to_code(), "(-1.5)");
        assert_eq!(Value::from("say \"hi\"").to_code(), r#""say \"hi\"""#);
    }

    #[test]
    fn test_to_display() {
        assert_eq!(list(&[3.0, 1.0, 5.0, 2.0]).to_string(), "11 [3, 1, 5, 2]");
        assert_eq!(Value::List(vec![]).to_string(), "[]");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::from(1.0)]).to_string(),
            "[\"a\", 1]"
        );
        let nested = Value::List(vec![Value::List(vec![list(&[1.0, 2.0])])]);
        assert_eq!(nested.to_string(), "3 [3 [3 [...]]]");
        assert_eq!(nested.to_display(0), "3 [...]");
        assert_eq!(Value::from("x").to_string(), "\"x\"");

        let deep_string = Value::List(vec![Value::List(vec![Value::from("a")]), Value::from(1.0)]);
        assert_eq!(deep_string.to_string(), "[[\"a\"], 1]");
    }

    #[test]
    fn test_is_finite() {
        assert!(list(&[1.0, -2.5]).is_finite());
        assert!(Value::from("inf").is_finite());
        assert!(!Value::from(Float::INFINITY).is_finite());
        assert!(!Value::List(vec![Value::from(1.0), list(&[Float::NAN])]).is_finite());
    }
}
