//! Provider listing command handler.

use anyhow::Result;

use crate::config::ConfigManager;
use crate::ui::Style;

/// Prints configured providers to stdout.
///
/// If `specific_provider` is provided, shows detailed information for that
/// provider. Otherwise, lists all configured providers with their endpoints.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new();
    let config = manager.load_or_default();

    if config.providers.is_empty() {
        println!("No providers configured.");
        println!("Add providers to ~/.config/lingo/config.toml");
        return Ok(());
    }

    let default_provider = config.lingo.provider.as_deref();

    if let Some(provider_name) = specific_provider {
        let Some(provider) = config.providers.get(provider_name) else {
            anyhow::bail!("Provider '{provider_name}' not found");
        };

        let marker = if default_provider == Some(provider_name) {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        };
        println!("Provider: {}{marker}", Style::value(provider_name));
        println!("  endpoint = {}", provider.endpoint);
        if provider.requires_api_key() {
            let has_key = provider.get_api_key().is_some();
            println!(
                "  api_key  = {}",
                if has_key { "(set)" } else { "(not set)" }
            );
        }
    } else {
        println!("{}\n", Style::header("Configured providers"));
        for (name, provider) in &config.providers {
            let marker = if default_provider == Some(name.as_str()) {
                format!(" {}", Style::default_marker())
            } else {
                String::new()
            };
            println!("  {}{marker}", Style::value(name));
            println!("    endpoint: {}", Style::secondary(&provider.endpoint));
        }
    }

    Ok(())
}
