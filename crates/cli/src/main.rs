use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
use commands::{modules::ModulesArgs, scan::ScanArgs};

#[derive(Parser)]
#[command(name = "multiscan")]
#[command(about = "Run pluggable scan modules over a batch of files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan files or directories with the active module set
    Scan(ScanArgs),

    /// List registered modules and their metadata
    Modules(ModulesArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args),
        Commands::Modules(args) => commands::modules::execute(args),
    }
}
