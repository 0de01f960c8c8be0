// ── Record identity ──
//
// Backend records carry numeric ids today; the console treats them as
// opaque so a backend issuing string keys keeps working.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use shelterly_api::types::WireId;

/// Canonical identifier for any backend record (shelter, client, task).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Numeric(i64),
    Opaque(String),
}

impl RecordId {
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Opaque(_) => None,
        }
    }

    /// Wire form used in request paths and bodies.
    pub fn to_wire(&self) -> WireId {
        match self {
            Self::Numeric(n) => WireId::Number(*n),
            Self::Opaque(s) => WireId::Text(s.clone()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Opaque(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Opaque(trimmed.to_owned()), Self::Numeric)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<WireId> for RecordId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => Self::Numeric(n),
            WireId::Text(s) => Self::Opaque(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_opaque_ids() {
        assert_eq!(RecordId::from("42"), RecordId::Numeric(42));
        assert_eq!(RecordId::from(" 7 "), RecordId::Numeric(7));
        assert_eq!(RecordId::from("abc-1"), RecordId::Opaque("abc-1".into()));
    }

    #[test]
    fn round_trips_through_wire_form() {
        let id = RecordId::Numeric(9);
        assert_eq!(RecordId::from(id.to_wire()), id);
        assert_eq!(id.to_string(), "9");
    }
}
