use crate::common::Float;
use std::fmt;

/// The relation a roll-until operator tests each die against.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// The die is a multiple of the cutoff.
    Mod,
    NotMod,
}

impl Comparison {
    pub const ALL: [Self; 8] = [
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
        Self::Mod,
        Self::NotMod,
    ];

    pub fn compares(self, x: Float, cutoff: Float) -> bool {
        match self {
            Self::Eq => x == cutoff,
            Self::Ne => x != cutoff,
            Self::Lt => x < cutoff,
            Self::Le => x <= cutoff,
            Self::Gt => x > cutoff,
            Self::Ge => x >= cutoff,
            Self::Mod => x % cutoff == 0.0,
            Self::NotMod => x % cutoff != 0.0,
        }
    }

    pub fn is_modulo(self) -> bool {
        matches!(self, Self::Mod | Self::NotMod)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Mod => "%",
            Self::NotMod => "!%",
        }
    }

    /// The spelling of the roll-until operator using this comparison.
    pub(crate) fn until_symbol(self) -> &'static str {
        match self {
            Self::Eq => "u=",
            Self::Ne => "u!=",
            Self::Lt => "u<",
            Self::Le => "u<=",
            Self::Gt => "u>",
            Self::Ge => "u>=",
            Self::Mod => "u%",
            Self::NotMod => "u!%",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
