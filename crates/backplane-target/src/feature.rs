//! Subtarget feature strings.
//!
//! A feature string is a comma-separated list of `+name` (enable) and
//! `-name` (disable) entries. A bare name enables the feature. When a
//! feature is mentioned more than once, the last mention wins.

use std::collections::BTreeMap;
use std::fmt;

/// A parsed feature string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    features: BTreeMap<String, bool>,
}

impl FeatureSet {
    /// Parse a feature string. Empty entries are skipped.
    pub fn parse(input: &str) -> Self {
        let mut features = BTreeMap::new();
        for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (enabled, name) = match entry.as_bytes()[0] {
                b'+' => (true, &entry[1..]),
                b'-' => (false, &entry[1..]),
                _ => (true, entry),
            };
            if !name.is_empty() {
                features.insert(name.to_ascii_lowercase(), enabled);
            }
        }
        Self { features }
    }

    /// Whether the feature is explicitly enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }

    /// Whether the feature is explicitly disabled.
    pub fn is_disabled(&self, name: &str) -> bool {
        self.features.get(name) == Some(&false)
    }

    /// All mentioned features with their state, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.features.iter().map(|(n, e)| (n.as_str(), *e))
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .iter()
            .map(|(name, on)| format!("{}{name}", if on { '+' } else { '-' }))
            .collect();
        f.write_str(&entries.join(","))
    }
}
