pub mod export;
pub mod import;
pub mod list;
pub mod plan;
pub mod plugins;

pub use export::{export, ExportArgs};
pub use import::{import, ImportArgs};
pub use list::{list, ListArgs};
pub use plan::{plan, PlanArgs};
pub use plugins::plugins;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use vscad_assembly::{ExchangePlugin, PluginRegistry};
use vscad_document::FileStore;

use crate::config::Config;

/// Document store location shared by the commands.
#[derive(Args, Debug, Default)]
pub struct StoreArgs {
    /// Document directory (overrides workDir from vscad.config.json)
    #[arg(short, long)]
    pub work_dir: Option<PathBuf>,
}

impl StoreArgs {
    pub fn open(&self, config: &Config, cwd: &Path) -> Result<FileStore> {
        let dir = match &self.work_dir {
            Some(dir) => cwd.join(dir),
            None => config.work_dir(cwd),
        };
        FileStore::new(&dir).with_context(|| format!("opening work directory {}", dir.display()))
    }
}

/// Pick a plugin by name, else by the file's extension, else JSON.
pub fn resolve_plugin<'r>(
    registry: &'r PluginRegistry,
    name: Option<&str>,
    path: &Path,
) -> Result<&'r dyn ExchangePlugin> {
    if let Some(name) = name {
        return Ok(registry.require(name)?);
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    registry
        .plugin_for_extension(ext)
        .or_else(|| registry.get("json"))
        .ok_or_else(|| anyhow!("no plugin can handle {}", path.display()))
}
