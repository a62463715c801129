//! TOML machine requests.
//!
//! A driver can keep the inputs of a target-machine request in a
//! `.machine.toml` file: the backend identifier, the subtarget, and the
//! unresolved [`MachineOptions`]. This module loads, serializes, and
//! discovers those files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};
use crate::machine::{MachineOptions, TargetMachine};
use crate::registry::TargetRegistry;
use crate::triple::Triple;

/// File suffix of machine request files.
pub const REQUEST_SUFFIX: &str = ".machine.toml";

/// Everything needed to ask the registry for a target machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MachineRequest {
    /// Backend identifier.
    pub target: String,
    /// Target triple. Defaults to the backend's architecture with every
    /// other component unknown.
    #[serde(default)]
    pub triple: Option<Triple>,
    #[serde(default)]
    pub cpu: String,
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub options: MachineOptions,
}

impl MachineRequest {
    /// A request for `target` with everything else defaulted.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            triple: None,
            cpu: String::new(),
            features: String::new(),
            options: MachineOptions::default(),
        }
    }

    /// Look up the backend and build the machine this request describes.
    pub fn create(&self, registry: &TargetRegistry) -> Result<TargetMachine> {
        let target = registry.get(&self.target)?;
        let triple = self
            .triple
            .clone()
            .unwrap_or_else(|| Triple::for_arch(&target.descriptor().arch));
        target.create_target_machine(&triple, &self.cpu, &self.features, &self.options)
    }
}

/// Load a request from a `.machine.toml` file.
pub fn load_request_toml(path: &Path) -> Result<MachineRequest> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_request_toml(&content)
}

/// Parse a request from a TOML string.
pub fn parse_request_toml(toml_str: &str) -> Result<MachineRequest> {
    let request: MachineRequest = toml::from_str(toml_str)?;
    Ok(request)
}

/// Serialize a request to pretty TOML.
pub fn request_to_toml(request: &MachineRequest) -> Result<String> {
    let toml_str = toml::to_string_pretty(request)?;
    Ok(toml_str)
}

/// Generate a template request for `target` with the default options spelled out.
pub fn generate_template(target: &str, triple: &Triple) -> Result<String> {
    let mut request = MachineRequest::new(target);
    request.triple = Some(triple.clone());
    request_to_toml(&request)
}

/// Discover all `.machine.toml` files directly inside `dir`.
///
/// Returns (request name, file path) pairs sorted by name. A missing
/// directory yields an empty list.
pub fn discover_requests(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut requests = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(REQUEST_SUFFIX))
            .map(str::to_string);
        if let Some(name) = name {
            requests.push((name, path));
        }
    }
    requests.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(requests)
}
