use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ParseModeError;

/// Whether a selector validates its configuration and arguments.
///
/// Development mode rejects incomplete selectors at construction and
/// composite arguments on the default key path. Production mode skips both
/// checks: an incomplete selector fails on first use and composite arguments
/// silently share a cache slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    /// Whether this mode performs validation.
    #[inline]
    pub fn validates(self) -> bool {
        self == Self::Development
    }
}

/// Development for debug builds, production otherwise.
impl Default for Mode {
    fn default() -> Self {
        if cfg!(debug_assertions) { Self::Development } else { Self::Production }
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("development") => Ok(Self::Development),
            s if s.eq_ignore_ascii_case("production") => Ok(Self::Production),
            other => Err(ParseModeError(other.into())),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!("production".parse::<Mode>(), Ok(Mode::Production));
        assert_eq!(" Development ".parse::<Mode>(), Ok(Mode::Development));
        assert_eq!(
            "staging".parse::<Mode>(),
            Err(ParseModeError("staging".into()))
        );
        assert_eq!(Mode::Production.to_string(), "production");
    }

    #[test]
    fn test_default_follows_build() {
        assert_eq!(Mode::default().validates(), cfg!(debug_assertions));
    }
}
