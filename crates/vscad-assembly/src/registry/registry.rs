//! Plugin registry for exchange formats.

use indexmap::IndexMap;
use tracing::debug;

use super::traits::ExchangePlugin;
use crate::error::{AssemblyError, Result};

/// Registry of exchange plugins.
///
/// Built once at start-up and passed to whatever needs to resolve a plugin.
/// Names and extensions are matched case-insensitively.
pub struct PluginRegistry {
    plugins: IndexMap<String, Box<dyn ExchangePlugin>>,
    extension_to_plugin: IndexMap<String, String>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            plugins: IndexMap::new(),
            extension_to_plugin: IndexMap::new(),
        }
    }

    /// Create a registry with the built-in plugins.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::formats::json::JsonPlugin::new());
        registry
    }

    /// Register a plugin, replacing one registered under the same name.
    pub fn register<P: ExchangePlugin + 'static>(&mut self, plugin: P) {
        let name = plugin.name().to_lowercase();
        for ext in plugin.extensions() {
            self.extension_to_plugin
                .insert(ext.to_lowercase(), name.clone());
        }
        debug!(plugin = %name, "registered plugin");
        self.plugins.insert(name, Box::new(plugin));
    }

    /// Get a plugin by name.
    pub fn get(&self, name: &str) -> Option<&dyn ExchangePlugin> {
        self.plugins.get(&name.to_lowercase()).map(|p| p.as_ref())
    }

    /// Get a plugin by name, failing with `UnknownPlugin`.
    pub fn require(&self, name: &str) -> Result<&dyn ExchangePlugin> {
        self.get(name)
            .ok_or_else(|| AssemblyError::UnknownPlugin(name.into()))
    }

    /// Get a plugin by file extension.
    pub fn plugin_for_extension(&self, ext: &str) -> Option<&dyn ExchangePlugin> {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();
        let name = self.extension_to_plugin.get(&ext_lower)?;
        self.get(name)
    }

    /// Registered plugin names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Registered plugins, in registration order.
    pub fn plugins(&self) -> impl Iterator<Item = &dyn ExchangePlugin> {
        self.plugins.values().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
