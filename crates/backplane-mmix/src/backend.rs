use backplane_target::{
    unsupported_triple, CodeModel, DataLayout, Endianness, FeatureSet, Mangling, RelocModel,
    Result, TargetBackend, TargetDescriptor, Triple,
};

use crate::IDENTIFIER;

/// Operating systems MMIX code can be generated for.
const SUPPORTED_OS: &[&str] = &["unknown", "none", "mmixware", "linux"];

/// The MMIX backend.
#[derive(Debug, Clone)]
pub struct MmixBackend {
    descriptor: TargetDescriptor,
}

impl MmixBackend {
    pub fn new() -> Self {
        Self {
            descriptor: TargetDescriptor::new(IDENTIFIER, "MMIX", "Knuth's 64-bit RISC (MMIX)")
                .with_code_models(
                    CodeModel::Small,
                    &[CodeModel::Small, CodeModel::Medium, CodeModel::Large],
                )
                .with_reloc_models(&[RelocModel::Static, RelocModel::Pic]),
        }
    }
}

impl Default for MmixBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetBackend for MmixBackend {
    fn descriptor(&self) -> &TargetDescriptor {
        &self.descriptor
    }

    fn supports_triple(&self, triple: &Triple) -> bool {
        triple.arch() == self.descriptor.arch && SUPPORTED_OS.iter().any(|os| *os == triple.os())
    }

    fn data_layout(&self, triple: &Triple, _cpu: &str, _features: &FeatureSet) -> Result<DataLayout> {
        if !self.supports_triple(triple) {
            return Err(unsupported_triple(self, triple));
        }
        Ok(DataLayout::new(Endianness::Big, 64)
            .with_mangling(Mangling::Elf)
            .with_int_align(8, 8)
            .with_int_align(16, 16)
            .with_int_align(32, 32)
            .with_int_align(64, 64)
            .with_float_align(32, 32)
            .with_float_align(64, 64)
            .with_native_ints(&[64])
            .with_stack_align(64))
    }

    fn cpus(&self) -> &[&'static str] {
        &["mmix"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backplane_target::TargetError;

    #[test]
    fn layout_is_big_endian_64() {
        let backend = MmixBackend::new();
        let layout = backend
            .data_layout(&Triple::for_arch("mmix"), "", &FeatureSet::default())
            .unwrap();
        assert_eq!(
            layout.to_string(),
            "E-m:e-p:64:64-i8:8-i16:16-i32:32-i64:64-f32:32-f64:64-n64-S64"
        );
    }

    #[test]
    fn rejects_foreign_triples() {
        let backend = MmixBackend::new();
        for text in ["tgxxx-unknown-unknown", "mmix-apple-darwin"] {
            let triple = Triple::parse(text).unwrap();
            assert!(!backend.supports_triple(&triple));
            assert!(matches!(
                backend.data_layout(&triple, "", &FeatureSet::default()),
                Err(TargetError::UnsupportedTriple { .. })
            ));
        }
    }

    #[test]
    fn no_relocation_preference() {
        let backend = MmixBackend::new();
        let linux = Triple::parse("mmix-unknown-linux-gnu").unwrap();
        assert!(!linux.requires_pic());
        assert_eq!(backend.default_reloc_model(&linux), None);
        assert_eq!(backend.default_reloc_model(&Triple::for_arch("mmix")), None);
    }

    #[test]
    fn descriptor_declares_small_default() {
        let d = MmixBackend::new().descriptor().clone();
        assert_eq!(d.default_code_model, CodeModel::Small);
        assert!(d.supports_code_model(CodeModel::Large));
        assert!(!d.supports_code_model(CodeModel::Tiny));
        assert!(!d.has_jit);
    }
}
