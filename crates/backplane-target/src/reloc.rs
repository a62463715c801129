//! Relocation models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// How address references in generated code are encoded and patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelocModel {
    /// Absolute addresses fixed at link time.
    Static,
    /// Fully position-independent code.
    Pic,
    /// Position-dependent code that may reference external symbols
    /// through the dynamic linker (Mach-O only).
    DynamicNoPic,
    /// Read-only position independence: code and read-only data move together.
    Ropi,
    /// Read-write position independence: writable data is addressed off a base register.
    Rwpi,
    /// Both `Ropi` and `Rwpi`.
    RopiRwpi,
}

impl RelocModel {
    pub const ALL: [RelocModel; 6] = [
        Self::Static,
        Self::Pic,
        Self::DynamicNoPic,
        Self::Ropi,
        Self::Rwpi,
        Self::RopiRwpi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Pic => "pic",
            Self::DynamicNoPic => "dynamic-no-pic",
            Self::Ropi => "ropi",
            Self::Rwpi => "rwpi",
            Self::RopiRwpi => "ropi-rwpi",
        }
    }

    /// Whether code generated under this model can be loaded at any address.
    pub fn is_position_independent(self) -> bool {
        matches!(self, Self::Pic | Self::Ropi | Self::RopiRwpi)
    }
}

impl fmt::Display for RelocModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelocModel {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| TargetError::InvalidValue {
                kind: "relocation model",
                value: s.to_string(),
                expected: "static, pic, dynamic-no-pic, ropi, rwpi, ropi-rwpi",
            })
    }
}
