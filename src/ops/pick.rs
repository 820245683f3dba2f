use super::{BinaryOperate, Operate, PrefixOperate};
use crate::common::{Float, Priority};
use crate::error::{DResult, DiceError};
use crate::eval::{Randomizer, Session, Value};
use crate::parse::ast::Expression;

/// `p` binary: draw without replacement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Pick;

/// `pr` binary: draw with replacement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PickReplace;

/// `p` prefix: one item.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PickOne;

fn pick_count<R: Randomizer>(ctx: &Session<R>, count: Float) -> DResult<usize> {
    let count = count.floor();
    if !(count >= 0.0) {
        return Err(DiceError::argument("can't pick a negative number of items"));
    }
    if count > ctx.limit() as Float {
        return Err(DiceError::LimitExceeded(ctx.limit()));
    }
    Ok(count as usize)
}

fn check_pool(pool: &[Value], count: usize) -> DResult<()> {
    if count > 0 && pool.is_empty() {
        Err(DiceError::argument("can't pick from an empty list"))
    } else {
        Ok(())
    }
}

fn draw<R: Randomizer>(ctx: &mut Session<R>, pool: &[Value]) -> Value {
    let i = ctx.roller().next_int(pool.len() as u64) as usize;
    pool[i].clone()
}

impl Operate for Pick {
    fn symbol(&self) -> &'static str {
        "p"
    }

    fn priority(&self) -> Priority {
        Priority::Pick
    }
}

impl BinaryOperate for Pick {
    fn operate<R: Randomizer>(
        &self,
        ctx: &mut Session<R>,
        left: &Expression,
        right: &Expression,
    ) -> DResult<Value> {
        let count = ctx.eval(left)?.as_single().value;
        let mut pool = ctx.eval(right)?.into_list();
        let count = pick_count(ctx, count)?;
        check_pool(&pool, count)?;

        let mut picked = Vec::with_capacity(count);
        // Whole passes over the pool while the request outlasts it.
        while !pool.is_empty() && count - picked.len() > pool.len() {
            let mut pass = pool.clone();
            ctx.roller().shuffle(&mut pass);
            picked.extend(pass);
        }
        while picked.len() < count {
            let i = ctx.roller().next_int(pool.len() as u64) as usize;
            picked.push(pool.remove(i));
        }

        ctx.set_variable("_p", Value::List(pool));
        Ok(Value::List(picked))
    }
}

impl Operate for PickReplace {
    fn symbol(&self) -> &'static str {
        "pr"
    }

    fn priority(&self) -> Priority {
        Priority::Pick
    }
}

impl BinaryOperate for PickReplace {
    fn operate<R: Randomizer>(
        &self,
        ctx: &mut Session<R>,
        left: &Expression,
        right: &Expression,
    ) -> DResult<Value> {
        let count = ctx.eval(left)?.as_single().value;
        let pool = ctx.eval(right)?.into_list();
        let count = pick_count(ctx, count)?;
        check_pool(&pool, count)?;

        let picked = (0..count).map(|_| draw(ctx, &pool)).collect();
        Ok(Value::List(picked))
    }
}

impl Operate for PickOne {
    fn symbol(&self) -> &'static str {
        "p"
    }

    fn priority(&self) -> Priority {
        Priority::Pick
    }
}

impl PrefixOperate for PickOne {
    fn operate<R: Randomizer>(&self, ctx: &mut Session<R>, right: &Expression) -> DResult<Value> {
        let pool = ctx.eval(right)?.into_list();
        ctx.check_limit(1)?;
        check_pool(&pool, 1)?;
        Ok(draw(ctx, &pool))
    }
}
