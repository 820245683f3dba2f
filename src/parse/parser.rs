use super::ast::Expression;
use super::error::{Arity, ParseError, ParseErrorKind};
use super::lexer::{split, Token, TokenKind};
use crate::common::{vec1, NonEmpty, Priority};
use crate::ops::{registry, Operate};

type PResult<T = Expression> = Result<T, ParseError>;

/// Operator-precedence parser over a flat token sequence.
///
/// The parser alternates between expecting an operand and expecting an
/// operator; an operator token resolves to its prefix entry in the first state
/// and to its binary or postfix entry in the second.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> PResult<Self> {
        Self::with_offset(s, 0)
    }

    /// Parses a fragment of a larger input that starts at `offset`.
    pub(crate) fn with_offset(s: &'a str, offset: usize) -> PResult<Self> {
        Ok(Self {
            tokens: split(s, offset)?,
            current: 0,
            end: offset + s.len(),
        })
    }

    pub fn parse(mut self) -> PResult {
        if self.tokens.is_empty() {
            return self.error(ParseErrorKind::EmptyExpression);
        }

        let expr = self.parse_expression(None)?;
        if self.peek().is_some() {
            return self.unexpected_token(vec1!["an operator"]);
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.current)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.current).copied();
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn matches(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |t| t.kind == kind)
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.advance();
            Ok(())
        } else {
            self.unexpected_token(vec1![expected.as_str()])
        }
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.end, |t| t.position)
    }

    fn error<T>(&self, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError::new(self.position(), kind))
    }

    fn unexpected_token<T>(&self, expected: NonEmpty<&'static str>) -> PResult<T> {
        let found = self.peek().map(|t| t.slice.to_string());
        self.error(ParseErrorKind::UnexpectedToken { found, expected })
    }

    /// Parses operands joined by operators that bind tighter than `floor`.
    fn parse_expression(&mut self, floor: Option<Priority>) -> PResult {
        let mut lhs = self.parse_term()?;

        while let Some(token) = self.peek().copied() {
            if token.kind.starts_operand() {
                return self.error(ParseErrorKind::ExpectedOperator);
            }
            if token.kind != TokenKind::Operator {
                break;
            }

            let binds = |p: Priority| floor.map_or(true, |floor| p > floor);
            if let Some(op) = registry().binary(token.slice) {
                if !binds(op.priority()) {
                    break;
                }
                self.advance();
                let rhs = self.parse_expression(Some(op.priority()))?;
                lhs = Expression::binary(lhs, op, rhs);
            } else if let Some(op) = registry().postfix(token.slice) {
                if !binds(op.priority()) {
                    break;
                }
                self.advance();
                lhs = Expression::postfix(lhs, op);
            } else {
                return self.error(ParseErrorKind::UnknownOperator {
                    symbol: token.slice.to_string(),
                    arity: vec1![Arity::Binary, Arity::Postfix],
                });
            }
        }

        Ok(lhs)
    }

    fn parse_term(&mut self) -> PResult {
        let token = match self.peek().copied() {
            Some(token) => token,
            None => return self.error(ParseErrorKind::MissingOperand),
        };

        match token.kind {
            TokenKind::Operator => self.parse_prefix(token),
            TokenKind::Number => self.parse_number(),
            TokenKind::StringLit => {
                self.advance();
                Ok(Expression::Str(token.string().unwrap_or_default()))
            }
            TokenKind::VarRef => self.parse_reference(token),
            TokenKind::OpenParen => self.parse_grouping(),
            TokenKind::OpenBracket => self.parse_list(),
            _ => self.error(ParseErrorKind::MissingOperand),
        }
    }

    fn parse_prefix(&mut self, token: Token<'a>) -> PResult {
        let op = match registry().prefix(token.slice) {
            Some(op) => op,
            None => {
                return self.error(ParseErrorKind::UnknownOperator {
                    symbol: token.slice.to_string(),
                    arity: vec1![Arity::Prefix],
                })
            }
        };
        self.advance();
        let rhs = self.parse_expression(Some(op.priority()))?;
        Ok(Expression::prefix(op, rhs))
    }

    fn parse_number(&mut self) -> PResult {
        let x = self.peek().and_then(Token::number);
        match x {
            Some(x) => {
                self.advance();
                Ok(Expression::literal(x))
            }
            None => self.unexpected_token(vec1![TokenKind::Number.as_str()]),
        }
    }

    fn parse_grouping(&mut self) -> PResult {
        self.consume(TokenKind::OpenParen)?;
        let inner = self.parse_expression(None)?;
        self.consume(TokenKind::CloseParen)?;
        Ok(inner)
    }

    fn parse_list(&mut self) -> PResult {
        self.consume(TokenKind::OpenBracket)?;

        let mut items = Vec::new();
        if !self.matches(TokenKind::CloseBracket) {
            items.push(self.parse_expression(None)?);
            while self.matches(TokenKind::Comma) {
                self.advance();
                items.push(self.parse_expression(None)?);
            }
        }

        if self.matches(TokenKind::CloseBracket) {
            self.advance();
            Ok(Expression::List(items))
        } else {
            self.unexpected_token(vec1!["','", "']'"])
        }
    }

    fn parse_reference(&mut self, token: Token<'a>) -> PResult {
        let (name, args) = match token.reference() {
            Some(parts) => parts,
            None => return self.unexpected_token(vec1![TokenKind::VarRef.as_str()]),
        };
        if name.is_empty() {
            return self.error(ParseErrorKind::EmptyReferenceName);
        }
        self.advance();

        if args.is_empty() {
            return Ok(Expression::Var(name.to_string()));
        }

        let args = args
            .into_iter()
            .map(|(src, offset)| Parser::with_offset(src, offset)?.parse())
            .collect::<PResult<Vec<_>>>()?;
        Ok(Expression::Call(name.to_string(), args))
    }
}
