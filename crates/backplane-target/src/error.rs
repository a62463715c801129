//! Error types for target registration and machine resolution.

use std::path::PathBuf;

use crate::code_model::CodeModel;
use crate::reloc::RelocModel;

/// Errors that can occur while registering targets or resolving a target machine.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// No backend is registered under the requested identifier.
    #[error("unknown target: '{identifier}'")]
    UnknownTarget {
        /// The identifier that was looked up.
        identifier: String,
    },

    /// A different descriptor is already registered under this identifier.
    #[error("target '{identifier}' is already registered with a conflicting descriptor")]
    DuplicateRegistration {
        /// The contested identifier.
        identifier: String,
    },

    /// The backend cannot derive a data layout for the triple.
    #[error("target '{target}' does not support triple '{triple}'")]
    UnsupportedTriple {
        /// Backend identifier.
        target: String,
        /// The rejected triple, normalized.
        triple: String,
    },

    /// An explicit relocation model conflicts with the triple or backend.
    #[error("relocation model '{model}' is not valid for triple '{triple}': {reason}")]
    IncompatibleRelocationModel {
        /// The requested model.
        model: RelocModel,
        /// The triple it was requested for.
        triple: String,
        /// Why the combination was rejected.
        reason: String,
    },

    /// An explicit code model is outside the backend's supported set.
    #[error("code model '{model}' is not supported by target '{target}'")]
    UnsupportedCodeModel {
        /// The requested model.
        model: CodeModel,
        /// Backend identifier.
        target: String,
    },

    /// Malformed target triple string.
    #[error("invalid target triple '{input}': {detail}")]
    InvalidTriple {
        /// The input string.
        input: String,
        /// Description of the problem.
        detail: String,
    },

    /// Malformed data layout string.
    #[error("invalid data layout '{input}': {detail}")]
    InvalidDataLayout {
        /// The input string.
        input: String,
        /// Description of the problem.
        detail: String,
    },

    /// A string did not name a member of an option enum.
    #[error("invalid {kind} '{value}' (expected one of: {expected})")]
    InvalidValue {
        /// Which option was being parsed (e.g. "code model").
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Comma-separated accepted spellings.
        expected: &'static str,
    },

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading an options file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file not found.
    #[error("options file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
