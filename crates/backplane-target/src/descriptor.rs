//! Target descriptors.
//!
//! A descriptor is the declarative identity of one backend: the key it is
//! registered under, how it presents itself, and which machine
//! configurations it accepts. Two registrations are identical exactly when
//! their descriptors compare equal.

use serde::{Deserialize, Serialize};

use crate::code_model::CodeModel;
use crate::reloc::RelocModel;

/// Declarative description of a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetDescriptor {
    /// Registry key (e.g. "mmix").
    pub identifier: String,
    /// Human-readable name. Independent of the identifier.
    pub name: String,
    /// One-line description shown in target listings.
    pub description: String,
    /// Architecture component this backend accepts in triples.
    pub arch: String,
    /// Whether the backend can generate code for in-process execution.
    pub has_jit: bool,
    /// Code model used when the caller does not request one.
    pub default_code_model: CodeModel,
    /// Code models the backend can generate code for.
    pub code_models: Vec<CodeModel>,
    /// Relocation models the backend can generate code for.
    pub reloc_models: Vec<RelocModel>,
}

impl TargetDescriptor {
    /// A descriptor whose triple architecture equals its identifier, without
    /// JIT support, accepting the small code model and static or PIC code.
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let identifier = identifier.into();
        Self {
            arch: identifier.to_ascii_lowercase(),
            identifier,
            name: name.into(),
            description: description.into(),
            has_jit: false,
            default_code_model: CodeModel::Small,
            code_models: vec![CodeModel::Small],
            reloc_models: vec![RelocModel::Static, RelocModel::Pic],
        }
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn with_jit(mut self, has_jit: bool) -> Self {
        self.has_jit = has_jit;
        self
    }

    /// Set the default and the supported code models. The default is added
    /// to the supported set if missing.
    pub fn with_code_models(mut self, default: CodeModel, supported: &[CodeModel]) -> Self {
        self.default_code_model = default;
        self.code_models = supported.to_vec();
        if !self.code_models.contains(&default) {
            self.code_models.push(default);
        }
        self.code_models.sort();
        self
    }

    pub fn with_reloc_models(mut self, supported: &[RelocModel]) -> Self {
        self.reloc_models = supported.to_vec();
        self.reloc_models.sort();
        self
    }

    pub fn supports_code_model(&self, model: CodeModel) -> bool {
        self.code_models.contains(&model)
    }

    pub fn supports_reloc_model(&self, model: RelocModel) -> bool {
        self.reloc_models.contains(&model)
    }
}
