mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use transforge_common::Error;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./transforge.toml",
        "~/.config/transforge/config.toml",
        "/etc/transforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.pool.threads == Some(0) {
        return Err(Error::config("pool.threads must be greater than 0").into());
    }

    if let Some(path) = &config.tool.path {
        if path.as_os_str().is_empty() {
            return Err(Error::config("tool.path cannot be empty").into());
        }
        if path.components().count() > 1 && !path.exists() {
            tracing::warn!("Configured tool does not exist: {:?}", path);
        }
    }

    if let Some(actor) = &config.log.actor {
        if actor.contains('\n') || actor.contains(" : ") {
            return Err(Error::config("log.actor cannot contain a line break or \" : \"").into());
        }
    }

    Ok(())
}
