use crate::common::NonEmpty;
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {position}: {kind}")]
pub struct ParseError {
    pub position: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(position: usize, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Arity {
    Prefix,
    Binary,
    Postfix,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prefix => "prefix",
            Self::Binary => "binary",
            Self::Postfix => "postfix",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedCharacter(char),
    UnterminatedString,
    UnterminatedReference,
    EmptyExpression,
    EmptyReferenceName,
    MissingOperand,
    ExpectedOperator,
    UnknownOperator {
        symbol: String,
        arity: NonEmpty<Arity>,
    },
    UnexpectedToken {
        found: Option<String>,
        expected: NonEmpty<&'static str>,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter(c) => write!(f, "unexpected character {:?}", c),
            Self::UnterminatedString => f.write_str("unterminated string literal"),
            Self::UnterminatedReference => f.write_str("unterminated '{' reference"),
            Self::EmptyExpression => f.write_str("empty expression"),
            Self::EmptyReferenceName => f.write_str("references need a name"),
            Self::MissingOperand => f.write_str("missing operand"),
            Self::ExpectedOperator => f.write_str("expected an operator between operands"),
            Self::UnknownOperator { symbol, arity } => {
                let arity: Vec<_> = arity.iter().map(ToString::to_string).collect();
                write!(f, "{:?} is not a {} operator", symbol, arity.fmt_expected())
            }
            Self::UnexpectedToken { found, expected } => {
                let expected: Vec<_> = expected.iter().map(|s| s.to_string()).collect();
                match found {
                    Some(found) => write!(
                        f,
                        "unexpected token; found {:?}, expected {}",
                        found,
                        expected.fmt_expected()
                    ),
                    None => write!(
                        f,
                        "unexpected end of input, expected {}",
                        expected.fmt_expected()
                    ),
                }
            }
        }
    }
}

trait FormatExpected {
    fn fmt_expected(&self) -> String;
}

impl FormatExpected for [String] {
    fn fmt_expected(&self) -> String {
        match self {
            [] => String::new(),
            [a] => a.to_owned(),
            [a, b] => format!("{} or {}", a, b),
            s => format!("{}, or {}", s[..s.len() - 1].join(", "), &s[s.len() - 1]),
        }
    }
}
