//! CLI command implementations.

pub mod machine;
pub mod target;
