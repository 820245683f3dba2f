use crate::parse::ParseError;

pub type DResult<T> = Result<T, DiceError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DiceError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("no saved function or variable named {{{0}}}")]
    UnknownReference(String),
    #[error("{0}")]
    Argument(String),
    #[error("the range you have selected would result in a pointless roll")]
    PointlessRoll,
    #[error("operation limit exceeded: at most {0} dice may be rolled at once")]
    LimitExceeded(usize),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DiceError {
    pub fn argument(msg: impl ToString) -> Self {
        Self::Argument(msg.to_string())
    }

    /// The source position, for errors raised while parsing.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse(e) => Some(e.position),
            _ => None,
        }
    }
}
