/// Dilithium parameter-set selector
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DigisignError;

/// Security-level variant of the signature scheme
///
/// Parses from `"2"`, `"3"`, `"5"` or `"dilithium2"`, `"dilithium3"`,
/// `"dilithium5"` (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Kind {
    #[default]
    Dilithium2,
    Dilithium3,
    Dilithium5,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Dilithium2, Kind::Dilithium3, Kind::Dilithium5];

    /// NIST security level
    pub fn level(self) -> u8 {
        match self {
            Kind::Dilithium2 => 2,
            Kind::Dilithium3 => 3,
            Kind::Dilithium5 => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Dilithium2 => "dilithium2",
            Kind::Dilithium3 => "dilithium3",
            Kind::Dilithium5 => "dilithium5",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = DigisignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let level = normalized.strip_prefix("dilithium").unwrap_or(&normalized);

        match level {
            "2" => Ok(Kind::Dilithium2),
            "3" => Ok(Kind::Dilithium3),
            "5" => Ok(Kind::Dilithium5),
            _ => Err(DigisignError::UnsupportedKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for Kind {
    type Error = DigisignError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Kind> for String {
    fn from(kind: Kind) -> Self {
        kind.as_str().to_string()
    }
}
