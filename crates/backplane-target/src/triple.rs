//! Target triple model.
//!
//! A triple names the architecture, vendor, operating system, and optional
//! environment of a compilation target: `arch-vendor-os[-environment]`.
//! Missing components normalize to `unknown`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

const UNKNOWN: &str = "unknown";

/// Coarse classification of the operating-system component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OsKind {
    /// `unknown`.
    Unknown,
    /// `none`: freestanding, no operating system.
    None,
    Linux,
    /// `darwin`, `macos`, `ios` and friends.
    Darwin,
    Windows,
    /// Any other operating system name.
    Other,
}

impl OsKind {
    fn classify(os: &str) -> Self {
        match os {
            UNKNOWN => Self::Unknown,
            "none" | "elf" => Self::None,
            "linux" => Self::Linux,
            "darwin" | "macos" | "macosx" | "ios" | "tvos" | "watchos" => Self::Darwin,
            "windows" | "win32" => Self::Windows,
            _ => Self::Other,
        }
    }
}

/// A parsed, normalized target triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Triple {
    arch: String,
    vendor: String,
    os: String,
    environment: Option<String>,
}

impl Triple {
    /// Parse a triple string. Equivalent to `str::parse`.
    pub fn parse(input: &str) -> Result<Self> {
        input.parse()
    }

    /// Build a triple for `arch` with every other component `unknown`.
    pub fn for_arch(arch: &str) -> Self {
        Self {
            arch: arch.to_ascii_lowercase(),
            vendor: UNKNOWN.into(),
            os: UNKNOWN.into(),
            environment: None,
        }
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Classification of the OS component.
    pub fn os_kind(&self) -> OsKind {
        OsKind::classify(&self.os)
    }

    /// Whether the platform only loads position-independent code.
    pub fn requires_pic(&self) -> bool {
        self.is_darwin()
    }

    /// Whether the platform uses Mach-O style dynamic linking.
    pub fn is_darwin(&self) -> bool {
        self.os_kind() == OsKind::Darwin
    }
}

impl FromStr for Triple {
    type Err = TargetError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = |detail: &str| TargetError::InvalidTriple {
            input: input.to_string(),
            detail: detail.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("triple is empty"));
        }

        let parts: Vec<String> = trimmed
            .split('-')
            .map(|p| p.to_ascii_lowercase())
            .collect();
        if parts.len() > 4 {
            return Err(invalid("expected at most 4 components"));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty component"));
        }

        let component = |i: usize| parts.get(i).cloned().unwrap_or_else(|| UNKNOWN.into());
        Ok(Self {
            arch: component(0),
            vendor: component(1),
            os: component(2),
            environment: parts.get(3).cloned(),
        })
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.vendor, self.os)?;
        if let Some(env) = &self.environment {
            write!(f, "-{env}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Triple {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Triple> for String {
    fn from(triple: Triple) -> Self {
        triple.to_string()
    }
}
