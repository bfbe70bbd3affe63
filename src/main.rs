use athena_probe::Result;
use athena_probe::config::ProbeConfig;
use athena_probe::diagnostics;
use athena_probe::export::{self, ExportOptions};
use athena_probe::modules::{Module, ModuleKind, Registry};
use athena_probe::platform::FsPermissionGate;
use athena_probe::render;
use athena_probe::resource::{Identifier, Resource};

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "athena")]
#[command(
    about = "Device diagnostics: browse and export hardware and software facts",
    long_about = None
)]
struct Cli {
    /// TOML config file. A missing file means defaults.
    #[arg(short = 'c', long, global = true, default_value = "athena.toml")]
    config: PathBuf,

    /// Read /proc, /sys and property files under this directory.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every screen and write one JSON document.
    Export {
        #[arg(short = 'o', long)]
        out: PathBuf,

        /// Also write failed identifiers with their error codes.
        #[arg(long)]
        errors: Option<PathBuf>,

        /// Single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Print one screen, the root by default.
    Show {
        #[arg(default_value = "athena://")]
        uri: String,
    },
    /// List the available modules.
    Modules,
}

fn main() -> Result<()> {
    diagnostics::init("info");
    let cli = Cli::parse();

    let mut config = ProbeConfig::load(&cli.config)?;
    // An unset `getprop` is skipped for roots other than "/".
    if let Some(root) = cli.root {
        config.root = root;
    }

    let platform = Arc::new(config.platform());
    let registry = Registry::new(
        ModuleKind::catalog(platform),
        Box::new(FsPermissionGate::new(&config.root)),
    )?;

    match cli.cmd {
        Commands::Export {
            out,
            errors,
            compact,
        } => {
            let options = ExportOptions {
                pretty: config.pretty && !compact,
                ..config.export_options()
            };
            let export = export::export_json(&registry, &options)?;

            std::fs::write(&out, &export.json)
                .with_context(|| format!("write export {}", out.display()))?;
            info!("wrote {}", out.display());

            if let Some(path) = errors {
                let log = serde_json::to_string_pretty(&export.error_log_json())?;
                std::fs::write(&path, log)
                    .with_context(|| format!("write error log {}", path.display()))?;
                info!("wrote {} errors to {}", export.errors.len(), path.display());
            }
        }
        Commands::Show { uri } => {
            let identifier: Identifier = uri.parse()?;
            let Resource::Screen(screen) = registry
                .resolve(&identifier)
                .with_context(|| format!("resolve {}", identifier))?;
            print!("{}", render::render_screen(&screen));
        }
        Commands::Modules => {
            for module in registry.modules() {
                let permissions: Vec<&str> =
                    module.required_permissions().iter().map(|p| p.name()).collect();
                println!("{}\t{}\t{}", module.id(), module.name(), module.description());
                if !permissions.is_empty() {
                    println!("\trequires: {}", permissions.join(", "));
                }
            }
        }
    }

    Ok(())
}
