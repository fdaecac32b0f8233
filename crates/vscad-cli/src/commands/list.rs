use std::path::Path;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use vscad_core::{split_unique_name, ASSEMBLY_PREFIX, PART_PREFIX};
use vscad_document::DocumentStore;

use super::StoreArgs;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Show decoded names and uuids
    #[arg(short, long)]
    pub decode: bool,
}

pub fn list(args: ListArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = args.store.open(&config, cwd)?;
    let names = store.persisted_names()?;

    println!("📂 {} {}", "Documents in".green().bold(), store.dir().display());
    println!();
    for (title, prefix) in [("Assemblies", ASSEMBLY_PREFIX), ("Parts", PART_PREFIX)] {
        let group: Vec<&String> = names.iter().filter(|n| n.starts_with(prefix)).collect();
        if group.is_empty() {
            continue;
        }
        println!("   {}", title.bold());
        for name in group {
            let objects = store.load(name)?.object_count();
            match split_unique_name(prefix, name) {
                Ok((decoded, uuid)) if args.decode => {
                    println!("     {} ({} objects) {} / {}", name, objects, decoded, uuid)
                }
                _ => println!("     {} ({} objects)", name, objects),
            }
        }
        println!();
    }
    println!("   Total: {}", names.len());
    Ok(())
}
