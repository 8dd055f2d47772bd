use anyhow::Result;
use clap::Args;
use colored::Colorize;
use multiscan_engine::{loader, ModuleRegistry};
use std::path::PathBuf;

#[derive(Args)]
pub struct ModulesArgs {
    /// Directory of module descriptor files to resolve against the registry
    #[arg(short, long)]
    pub modules_dir: Option<PathBuf>,
}

pub fn execute(args: ModulesArgs) -> Result<()> {
    let registry = ModuleRegistry::with_defaults();
    let descriptors = match &args.modules_dir {
        Some(dir) => loader::discover(dir, &registry),
        None => registry.descriptors(),
    };

    println!("{}", "Registered modules".bold());
    for descriptor in descriptors {
        let state = if descriptor.enabled {
            "enabled".green()
        } else {
            "disabled".red()
        };
        let mut line = format!(
            "  {} [{}] {}",
            descriptor.name.cyan(),
            descriptor.module_type,
            state
        );
        if !descriptor.requires.is_empty() {
            line.push_str(&format!(" requires: {}", descriptor.requires.join(", ")));
        }
        if let Some(ref replacement) = descriptor.replacement_path {
            line.push_str(&format!(" replacement path: {replacement}"));
        }
        println!("{line}");
    }
    Ok(())
}
