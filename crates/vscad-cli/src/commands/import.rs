use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use vscad_assembly::{AssemblyMode, PluginRegistry};

use super::{resolve_plugin, StoreArgs};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Input model file
    pub input: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Exchange plugin (defaults to the one registered for the file extension)
    #[arg(short, long)]
    pub plugin: Option<String>,

    /// Assembly layout (nested, flat)
    #[arg(short, long)]
    pub mode: Option<AssemblyMode>,

    /// Do not keep the root document open after the build
    #[arg(long)]
    pub no_reopen: bool,
}

pub fn import(args: ImportArgs, cwd: &Path, registry: &PluginRegistry) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut store = args.store.open(&config, cwd)?;
    let input = cwd.join(&args.input);
    let plugin = resolve_plugin(registry, args.plugin.as_deref(), &input)?;

    let mut options = config.import_options();
    if let Some(mode) = args.mode {
        options = options.with_mode(mode);
    }
    if args.no_reopen {
        options = options.with_reopen_root(false);
    }

    println!("📥 {} {}", "Importing".green().bold(), input.display());
    println!("   Plugin: {}", plugin.name());
    println!("   Mode:   {}", options.mode);
    println!("   Store:  {}", store.dir().display());
    println!();

    let data = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
    let summary = plugin
        .import(&data, &mut store, &options)
        .with_context(|| format!("importing {}", input.display()))?;

    for part in &summary.parts {
        println!("   {} {}", "✓".green(), part);
    }
    match summary.build {
        Some(build) => {
            for document in &build.documents {
                println!("   {} {}", "✓".green(), document);
            }
            println!();
            println!("✨ {} Import complete!", "Done".green().bold());
            println!("   Root: {}", build.root);
        }
        None => {
            println!();
            println!(
                "⚠️  {} The product tree has no children; no assembly was built.",
                "Note:".yellow().bold()
            );
        }
    }
    Ok(())
}
