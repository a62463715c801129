//! Code generation optimization levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Optimization level requested by the driver. Passed through to the
/// target machine unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptLevel {
    /// -O0
    None,
    /// -O1
    Less,
    /// -O2
    #[default]
    Default,
    /// -O3
    Aggressive,
}

impl OptLevel {
    /// Numeric level, 0 through 3.
    pub fn level(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Less => 1,
            Self::Default => 2,
            Self::Aggressive => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::None),
            1 => Some(Self::Less),
            2 => Some(Self::Default),
            3 => Some(Self::Aggressive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Less => "less",
            Self::Default => "default",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for OptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptLevel {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        let by_number = normalized.parse::<u8>().ok().and_then(Self::from_level);
        by_number
            .or_else(|| {
                [Self::None, Self::Less, Self::Default, Self::Aggressive]
                    .into_iter()
                    .find(|l| l.as_str() == normalized)
            })
            .ok_or_else(|| TargetError::InvalidValue {
                kind: "optimization level",
                value: s.to_string(),
                expected: "0, 1, 2, 3, none, less, default, aggressive",
            })
    }
}
