use super::{BinaryOperate, Operate};
use crate::common::Priority;
use crate::error::{DResult, DiceError};
use crate::eval::{Number, Randomizer, Session, Value};
use crate::parse::ast::Expression;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Multiply;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Divide;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Power;

/// Evaluates both operands down to single numbers.
fn operands<R: Randomizer>(
    ctx: &mut Session<R>,
    left: &Expression,
    right: &Expression,
) -> DResult<(Number, Number)> {
    let x = ctx.eval(left)?.as_single();
    let y = ctx.eval(right)?.as_single();
    Ok((x, y))
}

macro_rules! arith_op_impl {
    ($name:ident, $symbol:literal, $priority:ident, |$x:ident, $y:ident| $body:expr) => {
        impl Operate for $name {
            fn symbol(&self) -> &'static str {
                $symbol
            }

            fn priority(&self) -> Priority {
                Priority::$priority
            }
        }

        impl BinaryOperate for $name {
            fn operate<R: Randomizer>(
                &self,
                ctx: &mut Session<R>,
                left: &Expression,
                right: &Expression,
            ) -> DResult<Value> {
                let ($x, $y) = operands(ctx, left, right)?;
                $body.map(Value::Number)
            }
        }
    };
}

arith_op_impl!(Multiply, "*", Multiply, |x, y| Ok::<_, DiceError>(x * y));
arith_op_impl!(Divide, "/", Multiply, |x, y| {
    if y.value == 0.0 {
        Err(DiceError::argument("cannot divide by zero"))
    } else {
        Ok(x / y)
    }
});
arith_op_impl!(Power, "^", Exponent, |x, y| Ok::<_, DiceError>(Number::new(
    x.value.powf(y.value)
)));

#[cfg(test)]
mod tests {
    use crate::error::DiceError;
    use crate::test_utils::scripted;

    fn eval(s: &str) -> Result<String, DiceError> {
        scripted(&[4]).evaluate(s).map(|e| e.value.to_code())
    }

    #[test]
    fn test_arith() {
        assert_eq!(eval("3/-2"), Ok("(-1.5)".to_string()));
        assert_eq!(eval("2*(-1+5)"), Ok("8".to_string()));
        assert_eq!(eval("2^3^2"), Ok("64".to_string()));
        assert_eq!(eval("[1,2]*[3]"), Ok("9".to_string()));
        assert_eq!(eval("2d6 * 2"), Ok("16".to_string()));
        assert_eq!(eval("1 + 2 * 3"), Ok("7".to_string()));
        assert_eq!(eval("(1 + 2) * 3"), Ok("9".to_string()));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(eval("1/0"), Err(DiceError::argument("cannot divide by zero")));
        assert_eq!(eval("1/[]"), Err(DiceError::argument("cannot divide by zero")));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(eval("2^2000"), Err(DiceError::argument("(2^2000) is out of range")));
        for s in ["(0-1)^0.5", "0^(0-1)", "10^200*10^200", "10^300/0.5^100", "$[10^308, 10^308]"] {
            assert!(matches!(eval(s), Err(DiceError::Argument(_))), "{}", s);
        }
        assert_eq!(eval("10^2 * 10^3"), Ok("100000".to_string()));
    }
}
