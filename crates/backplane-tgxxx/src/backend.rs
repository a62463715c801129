use backplane_target::{
    unsupported_triple, CodeModel, DataLayout, Endianness, FeatureSet, Mangling, OsKind,
    RelocModel, Result, TargetBackend, TargetDescriptor, Triple,
};

use crate::IDENTIFIER;

/// Feature that widens pointers to 64 bits.
pub const FEATURE_64BIT: &str = "64bit";

/// The TGXXX backend.
#[derive(Debug, Clone)]
pub struct TgxxxBackend {
    descriptor: TargetDescriptor,
}

impl TgxxxBackend {
    pub fn new() -> Self {
        Self {
            descriptor: TargetDescriptor::new(IDENTIFIER, "TGXXX", "TGXXX placeholder target")
                .with_jit(true)
                .with_code_models(
                    CodeModel::Small,
                    &[CodeModel::Tiny, CodeModel::Small, CodeModel::Medium],
                )
                .with_reloc_models(&[
                    RelocModel::Static,
                    RelocModel::Pic,
                    RelocModel::Ropi,
                    RelocModel::Rwpi,
                    RelocModel::RopiRwpi,
                ]),
        }
    }
}

impl Default for TgxxxBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetBackend for TgxxxBackend {
    fn descriptor(&self) -> &TargetDescriptor {
        &self.descriptor
    }

    fn supports_triple(&self, triple: &Triple) -> bool {
        triple.arch() == self.descriptor.arch
            && matches!(triple.os_kind(), OsKind::Unknown | OsKind::None)
    }

    fn data_layout(&self, triple: &Triple, _cpu: &str, features: &FeatureSet) -> Result<DataLayout> {
        if !self.supports_triple(triple) {
            return Err(unsupported_triple(self, triple));
        }
        let layout = if features.is_enabled(FEATURE_64BIT) {
            DataLayout::new(Endianness::Little, 64)
                .with_mangling(Mangling::Elf)
                .with_int_align(64, 64)
                .with_int_align(128, 128)
                .with_native_ints(&[32, 64])
        } else {
            DataLayout::new(Endianness::Little, 32)
                .with_mangling(Mangling::Elf)
                .with_int_align(64, 64)
                .with_native_ints(&[32])
        };
        Ok(layout.with_stack_align(128))
    }

    fn cpus(&self) -> &[&'static str] {
        &["tg1", "tg2"]
    }

    fn features(&self) -> &[&'static str] {
        &[FEATURE_64BIT, "mul"]
    }
}
