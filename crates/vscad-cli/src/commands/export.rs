use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use vscad_assembly::PluginRegistry;
use vscad_document::DOCUMENT_EXTENSION;

use super::{resolve_plugin, StoreArgs};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Root assembly document (name or .vsdoc file)
    pub root: String,

    /// Output file
    pub output: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Exchange plugin (defaults to the one registered for the output extension)
    #[arg(short, long)]
    pub plugin: Option<String>,

    /// Write compact instead of indented output
    #[arg(long)]
    pub compact: bool,
}

/// Accept a bare document name or a path to its file.
fn document_name(root: &str) -> &str {
    let path = Path::new(root);
    match (path.file_stem().and_then(|s| s.to_str()), path.extension()) {
        (Some(stem), Some(ext)) if ext == DOCUMENT_EXTENSION => stem,
        _ => root,
    }
}

pub fn export(args: ExportArgs, cwd: &Path, registry: &PluginRegistry) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = args.store.open(&config, cwd)?;
    let output = cwd.join(&args.output);
    let plugin = resolve_plugin(registry, args.plugin.as_deref(), &output)?;
    let root = document_name(&args.root);

    let mut options = config.export_options();
    if args.compact {
        options = options.with_pretty(false);
    }

    println!("📤 {} {}", "Exporting".green().bold(), root);
    println!("   Plugin: {}", plugin.name());
    println!("   Store:  {}", store.dir().display());
    println!();

    let bytes = plugin
        .export(&store, root, &options)
        .with_context(|| format!("exporting {}", root))?;
    fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;

    println!("✨ {} Export complete!", "Done".green().bold());
    println!("   Output: {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}
