use std::fmt;
pub use vec1::vec1;

pub type Float = f64;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// How many list levels [`Value::to_display`](crate::eval::Value::to_display) expands by default.
pub const DISPLAY_DEPTH: usize = 2;

/// Precedence classes for the operator catalogue. Higher binds tighter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Priority {
    Join = 1,
    Multiply = 2,
    Exponent = 3,
    Negative = 4,
    Pick = 5,
    Dice = 6,
    List = 7,
}

impl Priority {
    pub const fn level(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Join => "join",
            Self::Multiply => "multiply",
            Self::Exponent => "exponent",
            Self::Negative => "negative",
            Self::Pick => "pick",
            Self::Dice => "dice",
            Self::List => "list",
        };
        f.write_str(s)
    }
}

/// Formats a float the way expressions spell it: integral values drop the
/// fractional part and negative zero is printed as `0`.
pub(crate) fn fmt_float(x: Float) -> String {
    if x == 0.0 {
        "0".to_string()
    } else {
        x.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Priority::Dice > Priority::Pick);
        assert!(Priority::Negative > Priority::Join);
        assert!(Priority::List > Priority::Dice);
        assert_eq!(Priority::Join.level(), 1);
    }

    #[test]
    fn test_fmt_float() {
        assert_eq!(fmt_float(3.0), "3");
        assert_eq!(fmt_float(-1.5), "-1.5");
        assert_eq!(fmt_float(-0.0), "0");
        assert_eq!(fmt_float(0.1 + 0.2), "0.30000000000000004");
    }
}
