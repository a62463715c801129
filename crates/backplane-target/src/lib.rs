//! Target registration and target-machine resolution for the Backplane
//! code generation framework.
//!
//! Backends plug into the shared pipeline in two steps:
//! - **Registration:** each backend's entry point inserts a
//!   [`TargetBackend`] into an explicit [`TargetRegistry`] at startup.
//! - **Resolution:** a driver asks a registered target for a
//!   [`TargetMachine`], supplying a triple, CPU, feature string, and
//!   partially specified [`MachineOptions`]. Every optional field is
//!   settled (explicit value, backend default, global fallback) and
//!   validated before the machine exists.

pub mod backend;
pub mod code_model;
pub mod descriptor;
pub mod error;
pub mod feature;
pub mod layout;
pub mod machine;
pub mod opt_level;
pub mod options;
pub mod registry;
pub mod reloc;
pub mod resolve;
pub mod triple;

pub use backend::{unsupported_triple, TargetBackend};
pub use code_model::CodeModel;
pub use descriptor::TargetDescriptor;
pub use error::{Result, TargetError};
pub use feature::FeatureSet;
pub use layout::{DataLayout, Endianness, Mangling};
pub use machine::{MachineOptions, TargetMachine, TargetMachineConfig, TargetMachineInfo};
pub use opt_level::OptLevel;
pub use options::MachineRequest;
pub use registry::{Initializer, RegisteredTarget, Registration, TargetRegistry};
pub use reloc::RelocModel;
pub use triple::{OsKind, Triple};
