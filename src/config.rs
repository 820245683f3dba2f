/// Environment variable holding the operation limit.
pub const LIMIT_VAR: &str = "DICE_OPERATION_LIMIT";

pub const DEFAULT_LIMIT: usize = 1000;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Config {
    /// The most dice a single operation may roll. `0` disables dice entirely.
    pub operation_limit: usize,
}

impl Config {
    pub const fn new(operation_limit: usize) -> Self {
        Self { operation_limit }
    }

    pub fn from_env() -> Self {
        Self::new(Self::parse_limit(std::env::var(LIMIT_VAR).ok().as_deref()))
    }

    fn parse_limit(raw: Option<&str>) -> usize {
        match raw.map(str::trim) {
            None | Some("") => DEFAULT_LIMIT,
            Some(s) => match s.parse() {
                Ok(limit) => limit,
                Err(why) => {
                    tracing::warn!(
                        "{}={:?} is not a valid limit ({}); using {}",
                        LIMIT_VAR,
                        s,
                        why,
                        DEFAULT_LIMIT
                    );
                    DEFAULT_LIMIT
                }
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(Config::parse_limit(None), DEFAULT_LIMIT);
        assert_eq!(Config::parse_limit(Some("")), DEFAULT_LIMIT);
        assert_eq!(Config::parse_limit(Some(" 25 ")), 25);
        assert_eq!(Config::parse_limit(Some("0")), 0);
        assert_eq!(Config::parse_limit(Some("-3")), DEFAULT_LIMIT);
        assert_eq!(Config::parse_limit(Some("lots")), DEFAULT_LIMIT);
    }

    #[test]
    fn test_from_env() {
        // Other tests roll a few dice through `Session::default`, so the
        // limits set here stay above that.
        std::env::set_var(LIMIT_VAR, "25");
        assert_eq!(Config::from_env(), Config::new(25));
        std::env::set_var(LIMIT_VAR, "lots");
        assert_eq!(Config::from_env(), Config::default());
        std::env::remove_var(LIMIT_VAR);
        assert_eq!(Config::from_env().operation_limit, DEFAULT_LIMIT);
    }
}
