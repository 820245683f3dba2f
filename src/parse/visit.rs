use super::ast::{Expression, Operation};
use crate::eval::Number;

pub trait AstVisitor {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<Self>,
    {
        node.accept(self)
    }

    fn visit_literal(&mut self, x: &Number) -> Self::Output;

    fn visit_list(&mut self, items: &[Expression]) -> Self::Output;

    fn visit_string(&mut self, s: &str) -> Self::Output;

    fn visit_var(&mut self, name: &str) -> Self::Output;

    fn visit_operation(&mut self, op: &Operation) -> Self::Output;

    fn visit_call(&mut self, name: &str, args: &[Expression]) -> Self::Output;
}

pub trait Accept<V: AstVisitor + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<V: AstVisitor + ?Sized> Accept<V> for Expression {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Literal(x) => v.visit_literal(x),
            Self::List(items) => v.visit_list(items),
            Self::Str(s) => v.visit_string(s),
            Self::Var(name) => v.visit_var(name),
            Self::Operation(op) => v.visit_operation(op),
            Self::Call(name, args) => v.visit_call(name, args),
        }
    }
}
