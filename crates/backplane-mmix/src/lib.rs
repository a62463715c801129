//! MMIX backend.
//!
//! MMIX is a big-endian 64-bit RISC architecture with 256 general-purpose
//! registers. This crate registers the backend and supplies the hooks the
//! shared target machine needs; code generation lives elsewhere.

mod backend;

pub use backend::MmixBackend;

use std::sync::Arc;

use backplane_target::{Registration, Result, TargetRegistry};

/// Backend identifier.
pub const IDENTIFIER: &str = "mmix";

/// Registration entry point. Calling it more than once is harmless.
pub fn initialize_mmix_target(registry: &mut TargetRegistry) -> Result<Registration> {
    log::debug!("initializing MMIX target");
    registry.register(Arc::new(MmixBackend::new()))
}
