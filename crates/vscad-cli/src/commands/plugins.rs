use anyhow::Result;
use colored::Colorize;
use vscad_assembly::PluginRegistry;

pub fn plugins(registry: &PluginRegistry) -> Result<()> {
    println!("🔌 {}", "Exchange plugins".green().bold());
    println!();
    for plugin in registry.plugins() {
        println!(
            "   {:<8} {} [{}]",
            plugin.name().bold(),
            plugin.description(),
            plugin.extensions().join(", ")
        );
    }
    Ok(())
}
