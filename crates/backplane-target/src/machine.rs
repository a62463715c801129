//! Target machines.
//!
//! A [`TargetMachine`] is the resolved, immutable configuration one
//! compilation runs against, paired with the backend that produced it.
//! Construction resolves every optional request field up front; a request
//! that cannot be satisfied fails before any machine exists.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::{unsupported_triple, TargetBackend};
use crate::code_model::CodeModel;
use crate::descriptor::TargetDescriptor;
use crate::error::Result;
use crate::feature::FeatureSet;
use crate::layout::DataLayout;
use crate::opt_level::OptLevel;
use crate::reloc::RelocModel;
use crate::resolve::{effective_code_model, effective_reloc_model};
use crate::triple::Triple;

/// Processor name used when the caller names none or an unknown one.
pub const GENERIC_CPU: &str = "generic";

/// Caller-supplied machine options before resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MachineOptions {
    /// Explicit relocation model, or the backend default.
    pub reloc_model: Option<RelocModel>,
    /// Explicit code model, or the backend default.
    pub code_model: Option<CodeModel>,
    pub opt_level: OptLevel,
    /// The machine will generate code for in-process execution.
    pub jit: bool,
}

impl MachineOptions {
    pub fn with_reloc_model(mut self, model: RelocModel) -> Self {
        self.reloc_model = Some(model);
        self
    }

    pub fn with_code_model(mut self, model: CodeModel) -> Self {
        self.code_model = Some(model);
        self
    }

    pub fn with_opt_level(mut self, level: OptLevel) -> Self {
        self.opt_level = level;
        self
    }

    pub fn with_jit(mut self, jit: bool) -> Self {
        self.jit = jit;
        self
    }
}

/// Read-only view of a resolved machine configuration, as consumed by
/// later compilation stages.
pub trait TargetMachineInfo {
    fn triple(&self) -> &Triple;
    fn cpu(&self) -> &str;
    fn features(&self) -> &str;
    fn data_layout(&self) -> &DataLayout;
    fn reloc_model(&self) -> RelocModel;
    fn code_model(&self) -> CodeModel;
    fn opt_level(&self) -> OptLevel;
    fn jit(&self) -> bool;

    fn is_position_independent(&self) -> bool {
        self.reloc_model().is_position_independent()
    }
}

/// Fully resolved machine configuration. Every field holds a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetMachineConfig {
    target: String,
    triple: Triple,
    cpu: String,
    features: String,
    data_layout: DataLayout,
    reloc_model: RelocModel,
    code_model: CodeModel,
    opt_level: OptLevel,
    jit: bool,
}

impl TargetMachineConfig {
    /// Identifier of the backend this configuration was resolved for.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl TargetMachineInfo for TargetMachineConfig {
    fn triple(&self) -> &Triple {
        &self.triple
    }

    fn cpu(&self) -> &str {
        &self.cpu
    }

    fn features(&self) -> &str {
        &self.features
    }

    fn data_layout(&self) -> &DataLayout {
        &self.data_layout
    }

    fn reloc_model(&self) -> RelocModel {
        self.reloc_model
    }

    fn code_model(&self) -> CodeModel {
        self.code_model
    }

    fn opt_level(&self) -> OptLevel {
        self.opt_level
    }

    fn jit(&self) -> bool {
        self.jit
    }
}

/// A resolved target machine.
#[derive(Debug)]
pub struct TargetMachine {
    backend: Arc<dyn TargetBackend>,
    config: TargetMachineConfig,
}

impl TargetMachine {
    /// Resolve `options` against `backend` for the given subtarget.
    ///
    /// Fails with `UnsupportedTriple`, `IncompatibleRelocationModel`, or
    /// `UnsupportedCodeModel`; on failure no machine is produced.
    pub fn new(
        backend: Arc<dyn TargetBackend>,
        triple: &Triple,
        cpu: &str,
        features: &str,
        options: &MachineOptions,
    ) -> Result<Self> {
        let descriptor = backend.descriptor();
        if !backend.supports_triple(triple) {
            return Err(unsupported_triple(backend.as_ref(), triple));
        }

        let cpu = recognized_cpu(backend.as_ref(), cpu);
        let feature_set = FeatureSet::parse(features);
        warn_unknown_features(backend.as_ref(), &feature_set);

        let data_layout = backend.data_layout(triple, &cpu, &feature_set)?;
        let reloc_model = effective_reloc_model(
            descriptor,
            triple,
            options.reloc_model,
            backend.default_reloc_model(triple),
        )?;
        let code_model = effective_code_model(descriptor, options.code_model)?;

        if options.jit && !descriptor.has_jit {
            log::warn!(
                "target '{}' does not declare JIT support; building a JIT machine anyway",
                descriptor.identifier
            );
        }

        let config = TargetMachineConfig {
            target: descriptor.identifier.clone(),
            triple: triple.clone(),
            cpu,
            features: features.trim().to_string(),
            data_layout,
            reloc_model,
            code_model,
            opt_level: options.opt_level,
            jit: options.jit,
        };
        log::debug!(
            "created target machine for {} (layout {}, reloc {}, code model {}, opt {})",
            config.triple,
            config.data_layout,
            config.reloc_model,
            config.code_model,
            config.opt_level
        );

        Ok(Self { backend, config })
    }

    pub fn descriptor(&self) -> &TargetDescriptor {
        self.backend.descriptor()
    }

    pub fn backend(&self) -> &Arc<dyn TargetBackend> {
        &self.backend
    }

    pub fn config(&self) -> &TargetMachineConfig {
        &self.config
    }
}

impl TargetMachineInfo for TargetMachine {
    fn triple(&self) -> &Triple {
        self.config.triple()
    }

    fn cpu(&self) -> &str {
        self.config.cpu()
    }

    fn features(&self) -> &str {
        self.config.features()
    }

    fn data_layout(&self) -> &DataLayout {
        self.config.data_layout()
    }

    fn reloc_model(&self) -> RelocModel {
        self.config.reloc_model()
    }

    fn code_model(&self) -> CodeModel {
        self.config.code_model()
    }

    fn opt_level(&self) -> OptLevel {
        self.config.opt_level()
    }

    fn jit(&self) -> bool {
        self.config.jit()
    }
}

impl Drop for TargetMachine {
    fn drop(&mut self) {
        log::trace!("released target machine for {}", self.config.triple);
    }
}

fn recognized_cpu(backend: &dyn TargetBackend, cpu: &str) -> String {
    let cpu = cpu.trim();
    if cpu.is_empty() || cpu == GENERIC_CPU {
        return GENERIC_CPU.to_string();
    }
    if backend.cpus().iter().any(|known| *known == cpu) {
        return cpu.to_string();
    }
    log::warn!(
        "'{cpu}' is not a recognized processor for target '{}' (ignoring processor)",
        backend.descriptor().identifier
    );
    GENERIC_CPU.to_string()
}

fn warn_unknown_features(backend: &dyn TargetBackend, features: &FeatureSet) {
    for (name, enabled) in features.iter() {
        if !backend.features().iter().any(|known| *known == name) {
            log::warn!(
                "'{}{name}' is not a recognized feature for target '{}' (ignoring feature)",
                if enabled { '+' } else { '-' },
                backend.descriptor().identifier
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TargetError;
    use crate::layout::Endianness;

    #[derive(Debug)]
    struct Toy {
        descriptor: TargetDescriptor,
    }

    impl TargetBackend for Toy {
        fn descriptor(&self) -> &TargetDescriptor {
            &self.descriptor
        }

        fn data_layout(&self, triple: &Triple, _: &str, features: &FeatureSet) -> Result<DataLayout> {
            if !self.supports_triple(triple) {
                return Err(unsupported_triple(self, triple));
            }
            let bits = if features.is_enabled("wide") { 64 } else { 32 };
            Ok(DataLayout::new(Endianness::Little, bits))
        }

        fn cpus(&self) -> &[&'static str] {
            &["toy1"]
        }

        fn features(&self) -> &[&'static str] {
            &["wide"]
        }
    }

    fn toy() -> Arc<dyn TargetBackend> {
        Arc::new(Toy {
            descriptor: TargetDescriptor::new("toy", "Toy", "toy")
                .with_code_models(CodeModel::Small, &[CodeModel::Small, CodeModel::Kernel]),
        })
    }

    fn build(cpu: &str, features: &str, options: MachineOptions) -> Result<TargetMachine> {
        TargetMachine::new(toy(), &Triple::for_arch("toy"), cpu, features, &options)
    }

    #[test]
    fn defaults_resolve_to_concrete_values() {
        let tm = build("", "", MachineOptions::default()).unwrap();
        assert_eq!(tm.code_model(), CodeModel::Small);
        assert_eq!(tm.reloc_model(), RelocModel::Static);
        assert_eq!(tm.opt_level(), OptLevel::Default);
        assert_eq!(tm.cpu(), GENERIC_CPU);
        assert!(!tm.jit());
        assert_eq!(tm.config().target(), "toy");
    }

    #[test]
    fn explicit_values_pass_through() {
        let options = MachineOptions::default()
            .with_code_model(CodeModel::Kernel)
            .with_reloc_model(RelocModel::Pic)
            .with_opt_level(OptLevel::Aggressive)
            .with_jit(true);
        let tm = build("toy1", "+wide", options).unwrap();
        assert_eq!(tm.code_model(), CodeModel::Kernel);
        assert_eq!(tm.reloc_model(), RelocModel::Pic);
        assert!(tm.is_position_independent());
        assert_eq!(tm.opt_level(), OptLevel::Aggressive);
        assert!(tm.jit());
        assert_eq!(tm.cpu(), "toy1");
        assert_eq!(tm.data_layout().pointer_size_bytes(), 8);
    }

    #[test]
    fn unknown_cpu_and_features_are_ignored() {
        let tm = build("toy9", "+bogus", MachineOptions::default()).unwrap();
        assert_eq!(tm.cpu(), GENERIC_CPU);
        assert_eq!(tm.features(), "+bogus");
        assert_eq!(tm.data_layout().pointer_size_bytes(), 4);
    }

    #[test]
    fn foreign_triple_is_rejected() {
        let err = TargetMachine::new(
            toy(),
            &Triple::for_arch("other"),
            "",
            "",
            &MachineOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TargetError::UnsupportedTriple { .. }));
    }

    #[test]
    fn unsupported_code_model_produces_no_machine() {
        let err = build("", "", MachineOptions::default().with_code_model(CodeModel::Large))
            .unwrap_err();
        assert!(matches!(err, TargetError::UnsupportedCodeModel { .. }));
    }

    #[test]
    fn same_inputs_same_config() {
        let a = build("toy1", "+wide", MachineOptions::default()).unwrap();
        let b = build("toy1", "+wide", MachineOptions::default()).unwrap();
        assert_eq!(a.config(), b.config());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: MachineOptions = toml::from_str("code-model = \"medium\"").unwrap();
        assert_eq!(options.code_model, Some(CodeModel::Medium));
        assert_eq!(options.reloc_model, None);
        assert_eq!(options.opt_level, OptLevel::Default);
        assert!(!options.jit);
    }
}
