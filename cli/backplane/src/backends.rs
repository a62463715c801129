//! Backends compiled into the driver.

use anyhow::{Context, Result};
use backplane_target::{Initializer, TargetRegistry};

/// Registration entry points of every bundled backend.
pub const BACKENDS: &[Initializer] = &[
    backplane_mmix::initialize_mmix_target,
    backplane_tgxxx::initialize_tgxxx_target,
];

/// Build the registry the driver runs against.
pub fn registry() -> Result<TargetRegistry> {
    let registry =
        TargetRegistry::with_backends(BACKENDS).context("failed to register bundled targets")?;
    log::debug!("{} bundled targets registered", registry.len());
    Ok(registry)
}
