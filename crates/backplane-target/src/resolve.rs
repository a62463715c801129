//! Layered default resolution and per-field validation.
//!
//! Every optional request field is settled in three tiers: the caller's
//! explicit value, then the backend's default, then a global fallback.
//! Explicit values are validated, never silently replaced.

use crate::code_model::CodeModel;
use crate::descriptor::TargetDescriptor;
use crate::error::{Result, TargetError};
use crate::reloc::RelocModel;
use crate::triple::Triple;

/// Settle an optional value: explicit, else backend default, else fallback.
pub fn resolve<T>(explicit: Option<T>, backend_default: Option<T>, global_fallback: T) -> T {
    explicit.or(backend_default).unwrap_or(global_fallback)
}

/// Relocation model used when neither caller nor backend states one.
pub fn default_reloc_model(triple: &Triple) -> RelocModel {
    if triple.requires_pic() {
        RelocModel::Pic
    } else {
        RelocModel::Static
    }
}

/// Check an explicit relocation model against the triple and the backend.
pub fn check_reloc_model(
    descriptor: &TargetDescriptor,
    triple: &Triple,
    model: RelocModel,
) -> Result<RelocModel> {
    let reject = |reason: String| TargetError::IncompatibleRelocationModel {
        model,
        triple: triple.to_string(),
        reason,
    };

    if !descriptor.supports_reloc_model(model) {
        return Err(reject(format!(
            "target '{}' does not implement it",
            descriptor.identifier
        )));
    }
    if model == RelocModel::DynamicNoPic && !triple.is_darwin() {
        return Err(reject("dynamic-no-pic requires a Darwin-family OS".into()));
    }
    if triple.requires_pic() && !model.is_position_independent() && model != RelocModel::DynamicNoPic {
        return Err(reject(format!("OS '{}' only loads position-independent code", triple.os())));
    }
    Ok(model)
}

/// Check an explicit code model against the backend's supported set.
pub fn check_code_model(descriptor: &TargetDescriptor, model: CodeModel) -> Result<CodeModel> {
    if descriptor.supports_code_model(model) {
        Ok(model)
    } else {
        Err(TargetError::UnsupportedCodeModel {
            model,
            target: descriptor.identifier.clone(),
        })
    }
}

/// Resolve the effective relocation model for a request.
///
/// A backend default is held to the same rules as an explicit value.
pub fn effective_reloc_model(
    descriptor: &TargetDescriptor,
    triple: &Triple,
    explicit: Option<RelocModel>,
    backend_default: Option<RelocModel>,
) -> Result<RelocModel> {
    match explicit.or(backend_default) {
        Some(model) => check_reloc_model(descriptor, triple, model),
        None => Ok(default_reloc_model(triple)),
    }
}

/// Resolve the effective code model for a request.
pub fn effective_code_model(
    descriptor: &TargetDescriptor,
    explicit: Option<CodeModel>,
) -> Result<CodeModel> {
    let explicit = explicit.map(|m| check_code_model(descriptor, m)).transpose()?;
    Ok(resolve(explicit, Some(descriptor.default_code_model), CodeModel::Small))
}
