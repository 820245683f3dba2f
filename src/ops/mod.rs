//! The operator catalogue. Each operator is a unit struct wired into one of
//! the three arity enums through `enum_dispatch`.

mod arith;
mod comparison;
mod dice;
mod list;
mod pick;

pub use arith::{Divide, Multiply, Power};
pub use comparison::Comparison;
pub use dice::{Dice, Die, RollUntil};
pub use list::{Join, NegJoin, Negative, Shuffle, Size, Sum};
pub use pick::{Pick, PickOne, PickReplace};

use crate::common::Priority;
use crate::error::DResult;
use crate::eval::{Randomizer, Session, Value};
use crate::parse::ast::Expression;
use std::collections::HashMap;
use std::sync::OnceLock;

#[enum_dispatch::enum_dispatch]
pub trait Operate {
    fn symbol(&self) -> &'static str;

    fn priority(&self) -> Priority;
}

#[enum_dispatch::enum_dispatch]
pub trait PrefixOperate {
    fn operate<R: Randomizer>(&self, ctx: &mut Session<R>, right: &Expression) -> DResult<Value>;
}

#[enum_dispatch::enum_dispatch]
pub trait BinaryOperate {
    fn operate<R: Randomizer>(
        &self,
        ctx: &mut Session<R>,
        left: &Expression,
        right: &Expression,
    ) -> DResult<Value>;
}

#[enum_dispatch::enum_dispatch]
pub trait PostfixOperate {
    fn operate<R: Randomizer>(&self, ctx: &mut Session<R>, left: &Expression) -> DResult<Value>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[enum_dispatch::enum_dispatch(Operate, PrefixOperate)]
pub enum PrefixOperator {
    Die(Die),
    PickOne(PickOne),
    Negative(Negative),
    Size(Size),
    Sum(Sum),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[enum_dispatch::enum_dispatch(Operate, BinaryOperate)]
pub enum BinaryOperator {
    Dice(Dice),
    RollUntil(RollUntil),
    Pick(Pick),
    PickReplace(PickReplace),
    Join(Join),
    NegJoin(NegJoin),
    Multiply(Multiply),
    Divide(Divide),
    Power(Power),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[enum_dispatch::enum_dispatch(Operate, PostfixOperate)]
pub enum PostfixOperator {
    Shuffle(Shuffle),
}

/// Symbol lookup for every operator, one table per arity.
#[derive(Debug)]
pub struct OperatorRegistry {
    prefix: HashMap<&'static str, PrefixOperator>,
    binary: HashMap<&'static str, BinaryOperator>,
    postfix: HashMap<&'static str, PostfixOperator>,
}

fn by_symbol<T: Operate + Copy>(ops: impl IntoIterator<Item = T>) -> HashMap<&'static str, T> {
    ops.into_iter().map(|op| (op.symbol(), op)).collect()
}

impl OperatorRegistry {
    fn new() -> Self {
        let prefix = by_symbol::<PrefixOperator>([
            Die.into(),
            PickOne.into(),
            Negative.into(),
            Size.into(),
            Sum.into(),
        ]);

        let mut binary = by_symbol::<BinaryOperator>([
            Dice.into(),
            Pick.into(),
            PickReplace.into(),
            Join.into(),
            NegJoin.into(),
            Multiply.into(),
            Divide.into(),
            Power.into(),
        ]);
        binary.extend(by_symbol(
            Comparison::ALL.into_iter().map(|cmp| BinaryOperator::from(RollUntil(cmp))),
        ));

        let postfix = by_symbol::<PostfixOperator>([Shuffle.into()]);

        Self {
            prefix,
            binary,
            postfix,
        }
    }

    pub fn prefix(&self, symbol: &str) -> Option<PrefixOperator> {
        self.prefix.get(symbol).copied()
    }

    pub fn binary(&self, symbol: &str) -> Option<BinaryOperator> {
        self.binary.get(symbol).copied()
    }

    pub fn postfix(&self, symbol: &str) -> Option<PostfixOperator> {
        self.postfix.get(symbol).copied()
    }

    /// Every registered symbol, in no particular order.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.prefix
            .keys()
            .chain(self.binary.keys())
            .chain(self.postfix.keys())
            .copied()
    }
}

/// The process-wide operator table, built on first use.
pub fn registry() -> &'static OperatorRegistry {
    static REGISTRY: OnceLock<OperatorRegistry> = OnceLock::new();
    REGISTRY.get_or_init(OperatorRegistry::new)
}
