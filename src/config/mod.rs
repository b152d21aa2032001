//! Configuration file management and provider settings.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, LingoConfig, ProviderConfig, ResolveOptions, ResolvedConfig,
    resolve_config,
};
