use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use vscad_assembly::{AssemblyMode, ExportOptions, ImportOptions};

pub const DEFAULT_CONFIG_NAME: &str = "vscad.config.json";

/// vscad configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the persisted documents
    #[serde(default = "default_work_dir")]
    pub work_dir: String,

    /// How assemblies are laid out across documents
    #[serde(default)]
    pub assembly_mode: AssemblyMode,

    /// Indent exported JSON
    #[serde(default = "default_true")]
    pub pretty_json: bool,

    /// Keep the root document open after an import
    #[serde(default = "default_true")]
    pub reopen_root: bool,
}

fn default_work_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", config_path.display()))?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the work directory
    pub fn work_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.work_dir)
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions::new()
            .with_mode(self.assembly_mode)
            .with_reopen_root(self.reopen_root)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::new().with_pretty(self.pretty_json)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            assembly_mode: AssemblyMode::Nested,
            pretty_json: true,
            reopen_root: true,
        }
    }
}
