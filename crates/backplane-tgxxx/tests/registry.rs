//! Registration and machine resolution across both bundled backends.

use backplane_mmix::initialize_mmix_target;
use backplane_target::{
    CodeModel, MachineOptions, MachineRequest, OptLevel, Registration, RelocModel, TargetError,
    TargetMachineInfo, TargetRegistry, Triple,
};
use backplane_tgxxx::initialize_tgxxx_target;
use pretty_assertions::assert_eq;

fn registry() -> TargetRegistry {
    TargetRegistry::with_backends(&[initialize_mmix_target, initialize_tgxxx_target]).unwrap()
}

fn default_triple(registry: &TargetRegistry, identifier: &str) -> Triple {
    Triple::for_arch(&registry.lookup(identifier).unwrap().descriptor().arch)
}

#[test]
fn tgxxx_defaults_resolve() {
    let registry = registry();
    let triple = Triple::parse("tgxxx-unknown-unknown").unwrap();
    let options = MachineOptions::default().with_opt_level(OptLevel::Default);

    let tm = registry
        .create_target_machine("tgxxx", &triple, "", "", &options)
        .unwrap();

    assert_eq!(tm.code_model(), CodeModel::Small);
    assert_eq!(tm.reloc_model(), RelocModel::Static);
    assert_eq!(tm.opt_level(), OptLevel::Default);
    assert!(!tm.jit());
    assert_eq!(tm.triple(), &triple);
    assert_eq!(tm.data_layout().pointer_size_bytes(), 4);
}

#[test]
fn unknown_identifier_is_reported() {
    let registry = registry();
    assert!(registry.lookup("foo").is_none());

    let err = registry
        .create_target_machine(
            "foo",
            &Triple::for_arch("foo"),
            "",
            "",
            &MachineOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, TargetError::UnknownTarget { ref identifier } if identifier == "foo"));
}

#[test]
fn large_code_model_rejected_by_tgxxx() {
    let registry = registry();
    let triple = Triple::parse("tgxxx-unknown-unknown").unwrap();
    let options = MachineOptions::default().with_code_model(CodeModel::Large);

    let err = registry
        .create_target_machine("tgxxx", &triple, "", "", &options)
        .unwrap_err();
    assert!(matches!(
        err,
        TargetError::UnsupportedCodeModel { model: CodeModel::Large, ref target } if target == "tgxxx"
    ));
}

#[test]
fn defaults_are_always_concrete() {
    let registry = registry();
    for target in registry.targets() {
        let triple = default_triple(&registry, &target.descriptor().identifier);
        let tm = target
            .create_target_machine(&triple, "", "", &MachineOptions::default())
            .unwrap();
        assert!(RelocModel::ALL.contains(&tm.reloc_model()));
        assert!(CodeModel::ALL.contains(&tm.code_model()));
        assert_eq!(tm.code_model(), target.descriptor().default_code_model);
    }
}

#[test]
fn explicit_supported_code_model_is_kept() {
    let registry = registry();
    for target in registry.targets() {
        let triple = default_triple(&registry, &target.descriptor().identifier);
        for &model in &target.descriptor().code_models {
            let options = MachineOptions::default().with_code_model(model);
            let tm = target.create_target_machine(&triple, "", "", &options).unwrap();
            assert_eq!(tm.code_model(), model);
        }
    }
}

#[test]
fn explicit_unsupported_code_model_is_rejected() {
    let registry = registry();
    for target in registry.targets() {
        let triple = default_triple(&registry, &target.descriptor().identifier);
        let unsupported = CodeModel::ALL
            .into_iter()
            .filter(|m| !target.descriptor().supports_code_model(*m));
        for model in unsupported {
            let options = MachineOptions::default().with_code_model(model);
            assert!(matches!(
                target.create_target_machine(&triple, "", "", &options),
                Err(TargetError::UnsupportedCodeModel { .. })
            ));
        }
    }
}

#[test]
fn repeated_registration_changes_nothing() {
    let mut once = TargetRegistry::new();
    initialize_tgxxx_target(&mut once).unwrap();

    let mut twice = TargetRegistry::new();
    initialize_tgxxx_target(&mut twice).unwrap();
    assert_eq!(
        initialize_tgxxx_target(&mut twice).unwrap(),
        Registration::AlreadyPresent
    );

    assert_eq!(once.len(), twice.len());
    assert_eq!(
        once.lookup("tgxxx").unwrap().descriptor(),
        twice.lookup("tgxxx").unwrap().descriptor()
    );
}

#[test]
fn same_inputs_give_equal_configs() {
    let registry = registry();
    let triple = Triple::parse("mmix-unknown-linux").unwrap();
    let options = MachineOptions::default()
        .with_code_model(CodeModel::Medium)
        .with_opt_level(OptLevel::Aggressive);

    let a = registry
        .create_target_machine("mmix", &triple, "mmix", "", &options)
        .unwrap();
    let b = registry
        .create_target_machine("mmix", &triple, "mmix", "", &options)
        .unwrap();
    assert_eq!(a.config(), b.config());
}

#[test]
fn wrong_triple_for_backend() {
    let registry = registry();
    let err = registry
        .create_target_machine(
            "mmix",
            &Triple::parse("tgxxx-unknown-unknown").unwrap(),
            "",
            "",
            &MachineOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, TargetError::UnsupportedTriple { .. }));
}

#[test]
fn incompatible_reloc_model() {
    let registry = registry();
    let triple = Triple::parse("mmix-unknown-linux").unwrap();

    let ropi = MachineOptions::default().with_reloc_model(RelocModel::Ropi);
    assert!(matches!(
        registry.create_target_machine("mmix", &triple, "", "", &ropi),
        Err(TargetError::IncompatibleRelocationModel { .. })
    ));

    let tm = registry
        .create_target_machine("mmix", &triple, "", "", &MachineOptions::default())
        .unwrap();
    assert_eq!(tm.reloc_model(), RelocModel::Static);
}

#[test]
fn mmix_linux_defaults_to_static() {
    let registry = registry();
    let triple = Triple::parse("mmix-unknown-linux").unwrap();
    assert!(!triple.requires_pic());

    let tm = registry
        .create_target_machine("mmix", &triple, "", "", &MachineOptions::default())
        .unwrap();
    assert_eq!(tm.reloc_model(), RelocModel::Static);

    let pic = MachineOptions::default().with_reloc_model(RelocModel::Pic);
    let tm = registry
        .create_target_machine("mmix", &triple, "", "", &pic)
        .unwrap();
    assert_eq!(tm.reloc_model(), RelocModel::Pic);
}

#[test]
fn tgxxx_64bit_feature_and_jit() {
    let registry = registry();
    let triple = Triple::parse("tgxxx-unknown-none").unwrap();
    let options = MachineOptions::default().with_jit(true);
    let tm = registry
        .create_target_machine("tgxxx", &triple, "tg2", "+64bit", &options)
        .unwrap();
    assert_eq!(tm.data_layout().pointer_size_bytes(), 8);
    assert_eq!(tm.cpu(), "tg2");
    assert!(tm.jit());
    assert!(tm.descriptor().has_jit);
}

#[test]
fn lookup_by_triple() {
    let registry = registry();
    let found = registry
        .lookup_triple(&Triple::parse("mmix-knuth-mmixware").unwrap())
        .unwrap();
    assert_eq!(found.descriptor().identifier, "mmix");

    // MMIX matches the arch but does not claim Darwin.
    assert!(registry
        .lookup_triple(&Triple::parse("mmix-apple-darwin").unwrap())
        .is_none());
}

#[test]
fn request_file_builds_machine() {
    let registry = registry();
    let request: MachineRequest = backplane_target::options::parse_request_toml(
        r#"
target = "tgxxx"
features = "+mul"

[options]
code-model = "tiny"
opt-level = "none"
"#,
    )
    .unwrap();
    let tm = request.create(&registry).unwrap();
    assert_eq!(tm.opt_level(), OptLevel::None);
    assert_eq!(tm.code_model(), CodeModel::Tiny);
    assert_eq!(tm.triple().to_string(), "tgxxx-unknown-unknown");
}

#[test]
fn concurrent_lookups_after_registration() {
    let registry = registry();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = &registry;
                scope.spawn(move || {
                    let identifier = if i % 2 == 0 { "mmix" } else { "tgxxx" };
                    let triple = default_triple(registry, identifier);
                    registry
                        .create_target_machine(identifier, &triple, "", "", &MachineOptions::default())
                        .unwrap()
                        .config()
                        .clone()
                })
            })
            .collect();
        let configs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(configs[0], configs[2]);
        assert_eq!(configs[1], configs[3]);
    });
}
