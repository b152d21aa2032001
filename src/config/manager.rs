use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::paths;

/// Default settings in the `[lingo]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LingoConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default target language (ISO 639-1 code).
    pub to: Option<String>,
    /// Default formality preference.
    pub formality: Option<String>,
}

/// Configuration for a translation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The translation API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ProviderConfig {
    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/lingo/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub lingo: LingoConfig,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The selected provider name.
    pub provider_name: String,
    /// The API endpoint URL.
    pub endpoint: String,
    /// The API key (if required).
    pub api_key: Option<String>,
    /// The target language code.
    pub target_language: String,
    /// Formality preference, if any.
    pub formality: Option<String>,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Target language code override.
    pub to: Option<String>,
    /// Provider name override.
    pub provider: Option<String>,
    /// Formality override.
    pub formality: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values.
///
/// # Errors
///
/// Returns an error if required configuration (provider, target language)
/// is missing or if the specified provider is not found.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let provider_name = options
        .provider
        .as_ref()
        .or(config_file.lingo.provider.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'provider'\n\n\
                 Please provide it via:\n  \
                 - CLI option: lingo --provider <name>\n  \
                 - Config file: ~/.config/lingo/config.toml"
            )
        })?;

    let provider_config = config_file.providers.get(&provider_name).ok_or_else(|| {
        let available: Vec<_> = config_file.providers.keys().collect();
        if available.is_empty() {
            anyhow::anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 No providers configured. Add providers to ~/.config/lingo/config.toml"
            )
        } else {
            anyhow::anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 Available providers:\n  \
                 - {}\n\n\
                 Add providers to ~/.config/lingo/config.toml",
                available
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join("\n  - ")
            )
        }
    })?;

    let target_language = options
        .to
        .as_ref()
        .or(config_file.lingo.to.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'to' (target language)\n\n\
                 Please provide it via:\n  \
                 - CLI option: lingo --to <lang>\n  \
                 - Config file: ~/.config/lingo/config.toml"
            )
        })?;

    let formality = options
        .formality
        .clone()
        .or_else(|| config_file.lingo.formality.clone());

    let api_key = provider_config.get_api_key();

    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        bail!(
            "Provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/lingo/config.toml"
        );
    }

    Ok(ResolvedConfig {
        provider_name,
        endpoint: provider_config.endpoint.clone(),
        api_key,
        target_language,
        formality,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/lingo/config.toml`
    /// or `~/.config/lingo/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Self {
        Self {
            config_path: paths::config_dir().join("config.toml"),
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    pub fn load_or_default(&self) -> ConfigFile {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
