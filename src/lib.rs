//! A small expression language for dice arithmetic: `3d6+4`, `d20u>=15`,
//! `2p["sword", "bow", "staff"]`, `{attack, 5}`.

pub mod common;
pub mod config;
pub mod error;
pub mod eval;
pub mod ops;
pub mod parse;

pub use config::Config;
pub use error::{DResult, DiceError};
pub use eval::{Evaluation, FunctionHistory, Number, Session, Value};
pub use parse::{ast::Expression, ParseError};

/// Parses `s` into an expression tree without evaluating it.
pub fn parse(s: &str) -> Result<Expression, ParseError> {
    parse::parse(s)
}

/// Evaluates `s` in a fresh [`Session`] configured from the environment.
pub fn roll(s: &str) -> DResult<Evaluation> {
    Session::default().evaluate(s)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll() {
        let eval = roll("2 * (1 + 2)").unwrap();
        assert_eq!(eval.value, Value::from(6.0));
        assert_eq!(eval.expression.to_code(), "(2*(1+2))");
    }

    #[test]
    fn test_roll_in_range() {
        for _ in 0..50 {
            let total = roll("3d6").unwrap().value.as_single().value;
            assert!((3.0..=18.0).contains(&total));
        }
    }

    #[test]
    fn test_parse_error() {
        let err = roll("3 +").unwrap_err();
        assert_eq!(err.position(), Some(3));
        assert!(parse("(1").is_err());
    }
}
