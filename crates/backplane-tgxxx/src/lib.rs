//! TGXXX backend.
//!
//! TGXXX is a placeholder ISA used to bring up the registration and
//! machine-configuration path for a new target before any instruction
//! selection exists. It is little-endian with 32-bit pointers, or 64-bit
//! pointers when the `64bit` feature is enabled.

mod backend;

pub use backend::TgxxxBackend;

use std::sync::Arc;

use backplane_target::{Registration, Result, TargetRegistry};

/// Backend identifier.
pub const IDENTIFIER: &str = "tgxxx";

/// Registration entry point. Calling it more than once is harmless.
pub fn initialize_tgxxx_target(registry: &mut TargetRegistry) -> Result<Registration> {
    log::debug!("initializing TGXXX target");
    registry.register(Arc::new(TgxxxBackend::new()))
}
