use super::{BinaryOperate, Comparison, Operate, PrefixOperate, PrefixOperator};
use crate::common::{Float, Priority};
use crate::error::{DResult, DiceError};
use crate::eval::{Randomizer, Session, Value};
use crate::parse::ast::{Expression, Operation};

/// `d` prefix: one die.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Die;

/// `d` binary: several dice of the same size.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Dice;

/// `u` followed by a comparison: roll until a die satisfies it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RollUntil(pub Comparison);

fn sides(x: Float) -> DResult<u64> {
    let x = x.floor();
    if x >= 1.0 {
        Ok(x as u64)
    } else {
        Err(DiceError::argument("dice must have at least one side"))
    }
}

impl Operate for Die {
    fn symbol(&self) -> &'static str {
        "d"
    }

    fn priority(&self) -> Priority {
        Priority::Dice
    }
}

impl PrefixOperate for Die {
    fn operate<R: Randomizer>(&self, ctx: &mut Session<R>, right: &Expression) -> DResult<Value> {
        let sides = sides(ctx.eval(right)?.as_single().value)?;
        ctx.check_limit(1)?;
        Ok(Value::Number(ctx.roll_die(sides)))
    }
}

impl Operate for Dice {
    fn symbol(&self) -> &'static str {
        "d"
    }

    fn priority(&self) -> Priority {
        Priority::Dice
    }
}

impl BinaryOperate for Dice {
    fn operate<R: Randomizer>(
        &self,
        ctx: &mut Session<R>,
        left: &Expression,
        right: &Expression,
    ) -> DResult<Value> {
        let count = ctx.eval(left)?.as_single().floor();
        let size = ctx.eval(right)?.as_single().value;

        if !(count >= 1.0) {
            return Err(DiceError::argument("you must roll at least one die"));
        }
        if count > ctx.limit() as Float {
            return Err(DiceError::LimitExceeded(ctx.limit()));
        }
        let size = sides(size)?;

        let dice = (0..count as usize)
            .map(|_| Value::Number(ctx.roll_die(size)))
            .collect();
        Ok(Value::List(dice))
    }
}

impl Operate for RollUntil {
    fn symbol(&self) -> &'static str {
        self.0.until_symbol()
    }

    fn priority(&self) -> Priority {
        Priority::Dice
    }
}

impl BinaryOperate for RollUntil {
    fn operate<R: Randomizer>(
        &self,
        ctx: &mut Session<R>,
        left: &Expression,
        right: &Expression,
    ) -> DResult<Value> {
        ctx.clear_variable("_u");

        // `dN u... x` repeats the die itself rather than rolling it once for a size.
        let size = match left {
            Expression::Operation(Operation::Prefix(PrefixOperator::Die(_), inner)) => {
                ctx.eval(inner)?
            }
            _ => ctx.eval(left)?,
        };
        let size = sides(size.as_single().value)?;
        let cutoff = ctx.eval(right)?.as_single().value;
        let cutoff = until_cutoff(self.0, size, cutoff)?;

        ctx.check_limit(1)?;
        let mut rolled = Vec::new();
        for _ in 0..ctx.limit() {
            let die = ctx.roll_die(size);
            if self.0.compares(die.value, cutoff) {
                ctx.set_variable("_u", Value::Number(die));
                return Ok(Value::List(rolled));
            }
            rolled.push(Value::Number(die));
        }
        Ok(Value::List(rolled))
    }
}

/// The largest value below one; the top of a decimal die's range.
fn below_one() -> Float {
    Float::from_bits(1.0f64.to_bits() - 1)
}

/// Checks that a die of `sides` could both meet and miss `cutoff`, and
/// returns the cutoff the rolls should be compared against.
fn until_cutoff(cmp: Comparison, sides: u64, cutoff: Float) -> DResult<Float> {
    let mut cutoff = cutoff;
    let pointless = if cutoff.is_nan() {
        true
    } else if sides == 1 {
        if cmp.is_modulo() || cutoff < 0.0 || cutoff >= 1.0 {
            true
        } else if cutoff == 0.0 {
            cmp.compares(0.0, cutoff) == cmp.compares(below_one(), cutoff)
        } else {
            false
        }
    } else {
        let max = sides as Float;
        if cutoff < 1.0 || cutoff > max {
            true
        } else if cutoff == 1.0 || cutoff == max {
            cmp.compares(1.0, cutoff) == cmp.compares(max, cutoff)
        } else if cutoff.fract() != 0.0 && cmp.is_modulo() {
            cutoff = integral_multiple(cutoff);
            cutoff > max
        } else if cutoff.fract() != 0.0 {
            // Whole faces never equal a fractional cutoff.
            matches!(cmp, Comparison::Eq | Comparison::Ne)
        } else {
            false
        }
    };

    if pointless {
        Err(DiceError::PointlessRoll)
    } else {
        Ok(cutoff)
    }
}

/// The smallest integer multiple of `x`, found from the continued fraction
/// expansion of `x`.
fn integral_multiple(x: Float) -> Float {
    let (mut num, mut prev_num) = (1.0, 0.0);
    let (mut den, mut prev_den) = (0.0, 1.0);
    let mut rest = x;

    for _ in 0..64 {
        let whole = rest.floor();
        (num, prev_num) = (whole * num + prev_num, num);
        (den, prev_den) = (whole * den + prev_den, den);
        if (num / den - x).abs() <= Float::EPSILON * x.abs().max(1.0) {
            break;
        }
        let frac = rest - whole;
        if frac == 0.0 {
            break;
        }
        rest = 1.0 / frac;
    }
    num
}
