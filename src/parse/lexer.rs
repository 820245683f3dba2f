use super::error::{ParseError, ParseErrorKind};
use crate::common::Float;
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenKind {
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[token("d")]
    #[token("u=")]
    #[token("u!=")]
    #[token("u<")]
    #[token("u<=")]
    #[token("u>")]
    #[token("u>=")]
    #[token("u%")]
    #[token("u!%")]
    #[token("p")]
    #[token("pr")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("^")]
    #[token("#")]
    #[token("$")]
    #[token("?")]
    Operator,

    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(",")]
    Comma,

    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLit,
    #[regex(r#""([^"\\]|\\.)*"#)]
    ErrUnterminatedString,

    #[token("{", lex_reference)]
    VarRef,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Number => "<number>",
            Operator => "<operator>",
            OpenParen => "'('",
            CloseParen => "')'",
            OpenBracket => "'['",
            CloseBracket => "']'",
            Comma => "','",
            StringLit => "<string>",
            VarRef => "<reference>",
            ErrUnterminatedString | Error => "<error>",
        }
    }

    /// Whether a token of this kind can begin an operand.
    pub fn starts_operand(&self) -> bool {
        use TokenKind::*;
        matches!(self, Number | StringLit | VarRef | OpenParen | OpenBracket)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumes a balanced `{ ... }` group; the opening brace has already been matched.
fn lex_reference(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match closing_brace(lex.remainder()) {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

fn closing_brace(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub slice: &'a str,
    pub position: usize,
}

impl<'a> Token<'a> {
    pub fn number(&self) -> Option<Float> {
        match self.kind {
            TokenKind::Number => self.slice.parse().ok(),
            _ => None,
        }
    }

    /// The unescaped body of a string literal.
    pub fn string(&self) -> Option<String> {
        match self.kind {
            TokenKind::StringLit => Some(unescape(&self.slice[1..self.slice.len() - 1])),
            _ => None,
        }
    }

    /// The name and the raw argument sources of a `{name, arg, ...}` reference,
    /// each argument paired with its absolute source position.
    pub fn reference(&self) -> Option<(&'a str, Vec<(&'a str, usize)>)> {
        if self.kind != TokenKind::VarRef {
            return None;
        }
        let inner = &self.slice[1..self.slice.len() - 1];
        let base = self.position + 1;
        let mut parts = split_top_level(inner)
            .into_iter()
            .map(|(start, part)| (part, base + start));
        let (name, _) = parts.next()?;
        Some((name.trim(), parts.collect()))
    }
}

fn split_top_level(s: &str) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push((start, &s[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((start, &s[start..]));
    parts
}

pub fn unescape(s: &str) -> String {
    let mut ret = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                ret.push(next);
            }
        } else {
            ret.push(c);
        }
    }
    ret
}

pub fn escape(s: &str) -> String {
    let mut ret = String::with_capacity(s.len() + 2);
    ret.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            ret.push('\\');
        }
        ret.push(c);
    }
    ret.push('"');
    ret
}

/// Splits `s` into a flat token sequence. `offset` is added to every position so
/// that nested reference arguments report positions in the original input.
pub fn split(s: &str, offset: usize) -> Result<Vec<Token<'_>>, ParseError> {
    let mut lexer = TokenKind::lexer(s);
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        let slice = lexer.slice();
        let position = offset + lexer.span().start;
        match kind {
            TokenKind::ErrUnterminatedString => {
                return Err(ParseError::new(position, ParseErrorKind::UnterminatedString))
            }
            TokenKind::Error => {
                let kind = match slice.chars().next() {
                    Some('{') => ParseErrorKind::UnterminatedReference,
                    Some(c) => ParseErrorKind::UnexpectedCharacter(c),
                    None => ParseErrorKind::EmptyExpression,
                };
                return Err(ParseError::new(position, kind));
            }
            _ => tokens.push(Token {
                kind,
                slice,
                position,
            }),
        }
    }

    tracing::trace!("split {:?} into {} tokens", s, tokens.len());
    Ok(tokens)
}
