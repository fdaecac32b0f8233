//! Exchange plugin registry and traits.

mod registry;
mod traits;

pub use registry::PluginRegistry;
pub use traits::ExchangePlugin;
