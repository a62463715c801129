//! Backplane CLI: inspect registered targets and resolve target machines.

mod backends;
mod commands;

use std::path::{Path, PathBuf};
use std::process;

use backplane_target::{CodeModel, OptLevel, RelocModel, Triple};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "backplane", version, about = "Backplane target registry driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect registered targets
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },
    /// Resolve a target machine and print its configuration
    Machine {
        /// Target identifier (inferred from --triple when omitted)
        #[arg(long)]
        target: Option<String>,
        /// Target triple (default: <arch>-unknown-unknown)
        #[arg(long)]
        triple: Option<Triple>,
        /// Processor name
        #[arg(long)]
        cpu: Option<String>,
        /// Subtarget features (e.g., +64bit,-mul)
        #[arg(long)]
        features: Option<String>,
        /// Relocation model (static, pic, dynamic-no-pic, ropi, rwpi, ropi-rwpi)
        #[arg(long)]
        reloc: Option<RelocModel>,
        /// Code model (tiny, small, kernel, medium, large)
        #[arg(long)]
        code_model: Option<CodeModel>,
        /// Optimization level (0-3)
        #[arg(short = 'O', long = "opt-level")]
        opt_level: Option<OptLevel>,
        /// Build a machine for in-process code generation
        #[arg(long)]
        jit: bool,
        /// Machine request file (.machine.toml); flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// List machine request files in a directory
    Requests {
        /// Directory to scan (default: current directory)
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TargetAction {
    /// List registered targets
    List,
    /// Show the descriptor of a target
    Describe {
        /// Target identifier
        name: String,
        /// Output format (default: human-readable, "toml" or "json")
        #[arg(long)]
        format: Option<String>,
    },
    /// Print a machine request template for a target
    Template {
        /// Target identifier
        name: String,
        /// Triple to put in the template
        #[arg(long)]
        triple: Option<Triple>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let registry = backends::registry()?;

    match cli.command {
        Commands::Target { action } => match action {
            TargetAction::List => commands::target::list(&registry),
            TargetAction::Describe { name, format } => {
                commands::target::describe(&registry, &name, format.as_deref())
            }
            TargetAction::Template { name, triple } => {
                commands::target::template(&registry, &name, triple.as_ref())
            }
        },

        Commands::Machine {
            target,
            triple,
            cpu,
            features,
            reloc,
            code_model,
            opt_level,
            jit,
            config,
            format,
        } => {
            let args = commands::machine::MachineArgs {
                target,
                triple,
                cpu,
                features,
                reloc,
                code_model,
                opt_level,
                jit,
                config,
            };
            commands::machine::run(&registry, &args, format.as_deref())
        }

        Commands::Requests { dir } => {
            commands::machine::list_requests(dir.as_deref().unwrap_or(Path::new(".")))
        }
    }
}
