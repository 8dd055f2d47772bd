use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use multiscan_engine::{loader, EngineConfig, ModuleRegistry, ScanEngine};
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct ScanArgs {
    /// Files or directories to scan
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Directory of module descriptor files; defaults to every registered
    /// module with its compiled-in settings
    #[arg(short, long)]
    pub modules_dir: Option<PathBuf>,

    /// Engine config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Emit the full report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ScanArgs) -> Result<()> {
    let files = super::collect_files(&args.paths);
    if files.is_empty() {
        bail!("no input files found");
    }

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let registry = ModuleRegistry::with_defaults();
    let modules = match &args.modules_dir {
        Some(dir) => loader::discover(dir, &registry),
        None => registry.descriptors(),
    };
    if modules.is_empty() {
        bail!("no modules to run");
    }

    let engine = ScanEngine::with_config(config);
    let report = engine
        .run(files, modules)
        .map_err(|e| anyhow::anyhow!("run failed at {}: {e}", e.stage()))?;

    let rendered = if args.json {
        report.to_json()?
    } else {
        report.summary()
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            println!("{} report written to {}", "OK".green().bold(), path.display());
        }
        None => {
            if !args.json {
                println!("{}", "Scan complete".green().bold());
            }
            print!("{rendered}");
        }
    }
    Ok(())
}
