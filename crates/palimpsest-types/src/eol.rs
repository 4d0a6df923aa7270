//! End-of-line markers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// End-of-line marker of a file.
///
/// Fixed per file at load time; every split and join in the core uses it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Eol {
    /// Unix line endings (`"\n"`).
    #[default]
    #[strum(serialize = "lf", serialize = "\n")]
    Lf,
    /// Windows line endings (`"\r\n"`).
    #[strum(serialize = "crlf", serialize = "\r\n")]
    CrLf,
}

impl Eol {
    /// Parse from either the literal marker or its name ("lf" / "crlf").
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// The literal marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Eol::Lf => "\n",
            Eol::CrLf => "\r\n",
        }
    }

    /// The marker's name, for logs and config.
    pub fn name(&self) -> &'static str {
        match self {
            Eol::Lf => "lf",
            Eol::CrLf => "crlf",
        }
    }
}

impl std::fmt::Display for Eol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_and_name() {
        assert_eq!(Eol::from_str("\n"), Some(Eol::Lf));
        assert_eq!(Eol::from_str("\r\n"), Some(Eol::CrLf));
        assert_eq!(Eol::from_str("lf"), Some(Eol::Lf));
        assert_eq!(Eol::from_str("CRLF"), Some(Eol::CrLf));
        assert_eq!(Eol::from_str("cr"), None);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Eol::Lf.as_str(), "\n");
        assert_eq!(Eol::CrLf.as_str(), "\r\n");
    }
}
