//! The backend seam.
//!
//! A backend plugs into the registry by implementing [`TargetBackend`]: it
//! supplies its descriptor and the hooks the shared target machine cannot
//! derive on its own (data layout, triple acceptance, relocation default).

use std::fmt;

use crate::descriptor::TargetDescriptor;
use crate::error::{Result, TargetError};
use crate::feature::FeatureSet;
use crate::layout::DataLayout;
use crate::reloc::RelocModel;
use crate::triple::Triple;

/// Hooks a backend provides to the shared target machine.
pub trait TargetBackend: Send + Sync + fmt::Debug {
    /// The backend's declarative identity.
    fn descriptor(&self) -> &TargetDescriptor;

    /// Whether the backend can generate code for `triple`.
    ///
    /// The default accepts any triple whose architecture matches the
    /// descriptor.
    fn supports_triple(&self, triple: &Triple) -> bool {
        triple.arch() == self.descriptor().arch
    }

    /// Derive the data layout for a supported triple and subtarget.
    ///
    /// Must return [`TargetError::UnsupportedTriple`] for any triple the
    /// backend does not claim rather than a fallback layout.
    fn data_layout(&self, triple: &Triple, cpu: &str, features: &FeatureSet) -> Result<DataLayout>;

    /// Backend-preferred relocation model for `triple`, if it has one.
    fn default_reloc_model(&self, _triple: &Triple) -> Option<RelocModel> {
        None
    }

    /// Processor names the backend recognizes, excluding "generic".
    fn cpus(&self) -> &[&'static str] {
        &[]
    }

    /// Subtarget feature names the backend recognizes.
    fn features(&self) -> &[&'static str] {
        &[]
    }
}

/// The error a backend reports for a triple it does not claim.
pub fn unsupported_triple(backend: &dyn TargetBackend, triple: &Triple) -> TargetError {
    TargetError::UnsupportedTriple {
        target: backend.descriptor().identifier.clone(),
        triple: triple.to_string(),
    }
}
