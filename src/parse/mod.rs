pub mod ast;
mod error;
pub mod lexer;
mod parser;
pub mod visit;

pub use error::{Arity, ParseError, ParseErrorKind};
pub use parser::Parser;

pub fn parse(s: &str) -> Result<ast::Expression, ParseError> {
    let expr = Parser::new(s)?.parse()?;
    tracing::debug!("parsed {:?} as {}", s, expr);
    Ok(expr)
}
