use super::{BinaryOperate, Operate, PostfixOperate, PrefixOperate};
use crate::common::{Float, Priority};
use crate::error::DResult;
use crate::eval::{Number, Randomizer, Session, Value};
use crate::parse::ast::Expression;

/// `+`: numeric sum, string concatenation or list concatenation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Join;

/// `-` binary: joins the negated right operand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NegJoin;

/// `-` prefix.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Negative;

/// `#`: number of top-level items.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Size;

/// `$`: the total as a single number.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Sum;

/// `?`: a random permutation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Shuffle;

pub(crate) fn join(left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Number(x), Value::Number(y)) => Value::Number(x + y),
        (x, y) if x.is_string() || y.is_string() => {
            Value::String(x.as_string() + &y.as_string())
        }
        (x, y) => {
            let mut items = x.into_list();
            items.extend(y.into_list());
            Value::List(items)
        }
    }
}

macro_rules! list_op_impl {
    ($name:ident, $symbol:literal, $priority:ident) => {
        impl Operate for $name {
            fn symbol(&self) -> &'static str {
                $symbol
            }

            fn priority(&self) -> Priority {
                Priority::$priority
            }
        }
    };
}

list_op_impl!(Join, "+", Join);
list_op_impl!(NegJoin, "-", Join);
list_op_impl!(Negative, "-", Negative);
list_op_impl!(Size, "#", List);
list_op_impl!(Sum, "$", List);
list_op_impl!(Shuffle, "?", List);

impl BinaryOperate for Join {
    fn operate<R: Randomizer>(
        &self,
        ctx: &mut Session<R>,
        left: &Expression,
        right: &Expression,
    ) -> DResult<Value> {
        let left = ctx.eval(left)?;
        let right = ctx.eval(right)?;
        Ok(join(left, right))
    }
}

impl BinaryOperate for NegJoin {
    fn operate<R: Randomizer>(
        &self,
        ctx: &mut Session<R>,
        left: &Expression,
        right: &Expression,
    ) -> DResult<Value> {
        let left = ctx.eval(left)?;
        let right = ctx.eval(right)?;
        Ok(join(left, right.negate()))
    }
}

impl PrefixOperate for Negative {
    fn operate<R: Randomizer>(&self, ctx: &mut Session<R>, right: &Expression) -> DResult<Value> {
        Ok(ctx.eval(right)?.negate())
    }
}

impl PrefixOperate for Size {
    fn operate<R: Randomizer>(&self, ctx: &mut Session<R>, right: &Expression) -> DResult<Value> {
        let size = ctx.eval(right)?.size();
        Ok(Value::Number(Number::new(size as Float)))
    }
}

impl PrefixOperate for Sum {
    fn operate<R: Randomizer>(&self, ctx: &mut Session<R>, right: &Expression) -> DResult<Value> {
        Ok(Value::Number(ctx.eval(right)?.as_single()))
    }
}

impl PostfixOperate for Shuffle {
    fn operate<R: Randomizer>(&self, ctx: &mut Session<R>, left: &Expression) -> DResult<Value> {
        let mut items = ctx.eval(left)?.into_list();
        ctx.roller().shuffle(&mut items);
        Ok(Value::List(items))
    }
}
