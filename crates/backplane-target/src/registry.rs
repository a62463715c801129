//! Target registry: the directory of available backends.
//!
//! Backends announce themselves by calling [`TargetRegistry::register`]
//! from their registration entry point during startup. After that phase the
//! registry is only read, so a shared reference can be handed to any number
//! of compilation threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::backend::TargetBackend;
use crate::descriptor::TargetDescriptor;
use crate::error::{Result, TargetError};
use crate::machine::{MachineOptions, TargetMachine};
use crate::triple::Triple;

/// A backend registration entry point.
pub type Initializer = fn(&mut TargetRegistry) -> Result<Registration>;

/// Outcome of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The backend was inserted.
    Added,
    /// An identical descriptor was already registered; nothing changed.
    AlreadyPresent,
}

/// A backend as stored in the registry.
#[derive(Debug, Clone)]
pub struct RegisteredTarget {
    backend: Arc<dyn TargetBackend>,
}

impl RegisteredTarget {
    pub fn descriptor(&self) -> &TargetDescriptor {
        self.backend.descriptor()
    }

    pub fn backend(&self) -> &Arc<dyn TargetBackend> {
        &self.backend
    }

    /// Resolve a configuration for this backend and build a target machine.
    pub fn create_target_machine(
        &self,
        triple: &Triple,
        cpu: &str,
        features: &str,
        options: &MachineOptions,
    ) -> Result<TargetMachine> {
        TargetMachine::new(Arc::clone(&self.backend), triple, cpu, features, options)
    }
}

/// Identifier-keyed directory of registered backends.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: BTreeMap<String, RegisteredTarget>,
}

impl TargetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and run each entry point against it, in order.
    pub fn with_backends(initializers: &[Initializer]) -> Result<Self> {
        let mut registry = Self::new();
        for init in initializers {
            init(&mut registry)?;
        }
        Ok(registry)
    }

    /// Register a backend under its descriptor's identifier.
    ///
    /// Registering an equal descriptor again is a no-op. A different
    /// descriptor under a taken identifier is rejected and the registry is
    /// left unchanged.
    pub fn register(&mut self, backend: Arc<dyn TargetBackend>) -> Result<Registration> {
        let identifier = backend.descriptor().identifier.clone();
        if let Some(existing) = self.targets.get(&identifier) {
            if existing.descriptor() == backend.descriptor() {
                log::debug!("target '{identifier}' already registered");
                return Ok(Registration::AlreadyPresent);
            }
            return Err(TargetError::DuplicateRegistration { identifier });
        }

        log::debug!(
            "registered target '{identifier}' ({}, jit: {})",
            backend.descriptor().name,
            backend.descriptor().has_jit
        );
        self.targets
            .insert(identifier, RegisteredTarget { backend });
        Ok(Registration::Added)
    }

    /// Look up a backend by identifier. A miss is an ordinary outcome.
    pub fn lookup(&self, identifier: &str) -> Option<&RegisteredTarget> {
        self.targets.get(identifier)
    }

    /// Look up a backend by identifier, reporting a miss as
    /// [`TargetError::UnknownTarget`].
    pub fn get(&self, identifier: &str) -> Result<&RegisteredTarget> {
        self.lookup(identifier)
            .ok_or_else(|| TargetError::UnknownTarget {
                identifier: identifier.to_string(),
            })
    }

    /// Find the backend that claims `triple`.
    pub fn lookup_triple(&self, triple: &Triple) -> Option<&RegisteredTarget> {
        self.targets
            .values()
            .find(|t| t.backend().supports_triple(triple))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.targets.contains_key(identifier)
    }

    /// All registered backends, ordered by identifier.
    pub fn targets(&self) -> impl Iterator<Item = &RegisteredTarget> {
        self.targets.values()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Look up `identifier`, then resolve and build a target machine.
    ///
    /// An unknown identifier fails before any configuration work happens.
    pub fn create_target_machine(
        &self,
        identifier: &str,
        triple: &Triple,
        cpu: &str,
        features: &str,
        options: &MachineOptions,
    ) -> Result<TargetMachine> {
        self.get(identifier)?
            .create_target_machine(triple, cpu, features, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureSet;
    use crate::layout::{DataLayout, Endianness};

    #[derive(Debug)]
    struct StubBackend {
        descriptor: TargetDescriptor,
    }

    impl TargetBackend for StubBackend {
        fn descriptor(&self) -> &TargetDescriptor {
            &self.descriptor
        }

        fn data_layout(&self, _: &Triple, _: &str, _: &FeatureSet) -> Result<DataLayout> {
            Ok(DataLayout::new(Endianness::Little, 32))
        }
    }

    fn stub(identifier: &str, name: &str) -> Arc<dyn TargetBackend> {
        Arc::new(StubBackend {
            descriptor: TargetDescriptor::new(identifier, name, "stub"),
        })
    }

    fn init_stub(registry: &mut TargetRegistry) -> Result<Registration> {
        registry.register(stub("stub", "Stub"))
    }

    #[test]
    fn register_then_lookup() {
        let mut registry = TargetRegistry::new();
        assert_eq!(registry.register(stub("a", "A")).unwrap(), Registration::Added);
        assert_eq!(registry.lookup("a").unwrap().descriptor().name, "A");
        assert!(registry.contains("a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn identical_registration_is_noop() {
        let mut registry = TargetRegistry::new();
        registry.register(stub("a", "A")).unwrap();
        assert_eq!(
            registry.register(stub("a", "A")).unwrap(),
            Registration::AlreadyPresent
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn conflicting_registration_rejected() {
        let mut registry = TargetRegistry::new();
        registry.register(stub("a", "A")).unwrap();
        let err = registry.register(stub("a", "Other")).unwrap_err();
        assert!(matches!(err, TargetError::DuplicateRegistration { ref identifier } if identifier == "a"));
        assert_eq!(registry.lookup("a").unwrap().descriptor().name, "A");
    }

    #[test]
    fn miss_is_none_or_unknown_target() {
        let registry = TargetRegistry::new();
        assert!(registry.lookup("foo").is_none());
        assert!(matches!(
            registry.get("foo"),
            Err(TargetError::UnknownTarget { ref identifier }) if identifier == "foo"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn with_backends_runs_initializers_idempotently() {
        let registry = TargetRegistry::with_backends(&[init_stub, init_stub]).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_by_triple_arch() {
        let mut registry = TargetRegistry::new();
        registry.register(stub("b", "B")).unwrap();
        registry.register(stub("a", "A")).unwrap();
        let triple = Triple::parse("b-unknown-none").unwrap();
        assert_eq!(registry.lookup_triple(&triple).unwrap().descriptor().identifier, "b");
        assert!(registry.lookup_triple(&Triple::for_arch("c")).is_none());
        let ids: Vec<&str> = registry
            .targets()
            .map(|t| t.descriptor().identifier.as_str())
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TargetRegistry>();
        assert_send_sync::<TargetMachine>();
    }
}
