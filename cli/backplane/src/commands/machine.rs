//! `backplane machine`: resolve and print a target machine configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use backplane_target::options::{discover_requests, load_request_toml};
use backplane_target::{
    CodeModel, MachineRequest, OptLevel, RelocModel, TargetMachineInfo, TargetRegistry, Triple,
};

/// Command-line inputs of `backplane machine`.
#[derive(Debug, Default)]
pub struct MachineArgs {
    pub target: Option<String>,
    pub triple: Option<Triple>,
    pub cpu: Option<String>,
    pub features: Option<String>,
    pub reloc: Option<RelocModel>,
    pub code_model: Option<CodeModel>,
    pub opt_level: Option<OptLevel>,
    pub jit: bool,
    pub config: Option<PathBuf>,
}

/// Merge a request file (if any) with command-line overrides.
pub fn build_request(registry: &TargetRegistry, args: &MachineArgs) -> Result<MachineRequest> {
    let base = match &args.config {
        Some(path) => Some(
            load_request_toml(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
        ),
        None => None,
    };

    let target = match (&args.target, &base, &args.triple) {
        (Some(t), _, _) => t.clone(),
        (None, Some(req), _) => req.target.clone(),
        (None, None, Some(triple)) => match registry.lookup_triple(triple) {
            Some(t) => t.descriptor().identifier.clone(),
            None => bail!("no registered target accepts triple '{triple}'"),
        },
        (None, None, None) => bail!("specify --target, --triple, or --config"),
    };

    let mut request = base.unwrap_or_else(|| MachineRequest::new(target.clone()));
    request.target = target;
    if let Some(triple) = &args.triple {
        request.triple = Some(triple.clone());
    }
    if let Some(cpu) = &args.cpu {
        request.cpu = cpu.clone();
    }
    if let Some(features) = &args.features {
        request.features = features.clone();
    }
    if let Some(reloc) = args.reloc {
        request.options.reloc_model = Some(reloc);
    }
    if let Some(code_model) = args.code_model {
        request.options.code_model = Some(code_model);
    }
    if let Some(level) = args.opt_level {
        request.options.opt_level = level;
    }
    if args.jit {
        request.options.jit = true;
    }
    Ok(request)
}

/// Resolve the requested machine and print its configuration.
pub fn run(registry: &TargetRegistry, args: &MachineArgs, format: Option<&str>) -> Result<()> {
    let request = build_request(registry, args)?;
    let machine = request
        .create(registry)
        .with_context(|| format!("cannot create a target machine for '{}'", request.target))?;

    match format {
        Some("json") => {
            println!("{}", serde_json::to_string_pretty(machine.config())?);
        }
        Some("text") | None => {
            println!("Target:       {}", machine.descriptor().name);
            println!("Triple:       {}", machine.triple());
            println!("CPU:          {}", machine.cpu());
            println!("Features:     {}", machine.features());
            println!("Data layout:  {}", machine.data_layout());
            println!("Relocation:   {}", machine.reloc_model());
            println!("Code model:   {}", machine.code_model());
            println!("Optimization: {} (-O{})", machine.opt_level(), machine.opt_level().level());
            println!("JIT:          {}", if machine.jit() { "yes" } else { "no" });
        }
        Some(other) => bail!("unknown format '{other}' (expected text or json)"),
    }
    Ok(())
}

/// List the `.machine.toml` requests in `dir` with the target each one names.
pub fn list_requests(dir: &Path) -> Result<()> {
    let requests = discover_requests(dir)
        .with_context(|| format!("failed to scan {}", dir.display()))?;
    if requests.is_empty() {
        println!("No machine requests in {}", dir.display());
        return Ok(());
    }

    println!("Machine requests in {}:", dir.display());
    println!();
    for (name, path) in &requests {
        match load_request_toml(path) {
            Ok(request) => println!("  {name:<16} {}", request.target),
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                println!("  {name:<16} (invalid)");
            }
        }
    }
    println!();
    println!("Use 'backplane machine --config <file>' to resolve one.");
    Ok(())
}
