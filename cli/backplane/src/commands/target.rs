//! `backplane target`: registered target listing and description.

use anyhow::{bail, Context, Result};
use backplane_target::options::generate_template;
use backplane_target::{TargetRegistry, Triple};

/// List all registered targets.
pub fn list(registry: &TargetRegistry) -> Result<()> {
    println!("Registered targets:");
    println!();
    for target in registry.targets() {
        let d = target.descriptor();
        let jit = if d.has_jit { " [jit]" } else { "" };
        println!("  {:<12} {}{jit}", d.identifier, d.description);
    }
    println!();
    println!("Use 'backplane target describe <name>' for details.");
    Ok(())
}

/// Describe a registered target in detail.
pub fn describe(registry: &TargetRegistry, name: &str, format: Option<&str>) -> Result<()> {
    let target = match registry.lookup(name) {
        Some(t) => t,
        None => bail!("unknown target: '{name}'. Use 'backplane target list' to see available targets."),
    };
    let d = target.descriptor();

    match format {
        Some("toml") => {
            print!("{}", toml::to_string_pretty(d).context("failed to serialize descriptor")?);
            return Ok(());
        }
        Some("json") => {
            println!("{}", serde_json::to_string_pretty(d)?);
            return Ok(());
        }
        Some(other) => bail!("unknown format '{other}' (expected toml or json)"),
        None => {}
    }

    let join = |items: Vec<String>| items.join(", ");

    println!("=== Target: {} ===", d.identifier);
    println!("Name:        {}", d.name);
    println!("Description: {}", d.description);
    println!("Arch:        {}", d.arch);
    println!("JIT:         {}", if d.has_jit { "yes" } else { "no" });
    println!();

    println!("--- Code models ---");
    println!("  Default:   {}", d.default_code_model);
    println!(
        "  Supported: {}",
        join(d.code_models.iter().map(|m| m.to_string()).collect())
    );
    println!();

    println!("--- Relocation models ---");
    println!(
        "  Supported: {}",
        join(d.reloc_models.iter().map(|m| m.to_string()).collect())
    );
    println!();

    let backend = target.backend();
    println!("--- Subtargets ---");
    println!("  CPUs:     generic {}", backend.cpus().join(" "));
    println!("  Features: {}", backend.features().join(" "));

    Ok(())
}

/// Print a `.machine.toml` template for a registered target.
pub fn template(registry: &TargetRegistry, name: &str, triple: Option<&Triple>) -> Result<()> {
    let target = registry.get(name)?;
    let triple = triple
        .cloned()
        .unwrap_or_else(|| Triple::for_arch(&target.descriptor().arch));
    print!("{}", generate_template(name, &triple)?);
    Ok(())
}
