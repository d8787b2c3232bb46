//! Clock action enum as the single source of truth for action strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two things a worker can do with the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    In,
    Out,
}

impl Action {
    /// String representation for storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }

    /// Upper-case label used in report narratives.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown action strings.
#[derive(Debug, Clone)]
pub struct UnknownAction(String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown clock action: {}", self.0)
    }
}

impl std::error::Error for UnknownAction {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_storage_strings() {
        assert_eq!("in".parse::<Action>().unwrap(), Action::In);
        assert_eq!("out".parse::<Action>().unwrap(), Action::Out);
    }

    #[test]
    fn storage_strings_are_lowercase() {
        assert_eq!(Action::In.to_string(), "in");
        assert_eq!(Action::Out.to_string(), "out");
    }

    #[test]
    fn labels_are_uppercase() {
        assert_eq!(Action::In.label(), "IN");
        assert_eq!(Action::Out.label(), "OUT");
    }

    #[test]
    fn unknown_action_errors() {
        let err = "IN".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "unknown clock action: IN");
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Action::Out).unwrap(), "\"out\"");
        let parsed: Action = serde_json::from_str("\"in\"").unwrap();
        assert_eq!(parsed, Action::In);
    }
}
