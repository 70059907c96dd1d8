//! Configuration loading
//!
//! Resolves the listen port following the priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`ENCORE_PORT`)
//! 3. TOML config file (`~/.config/encore/config.toml`)
//! 4. Compiled default (fallback)

use std::path::PathBuf;

use encore_common::{Error, Result};

/// Default listen port when nothing else is configured.
pub const DEFAULT_PORT: u16 = 5780;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
}

impl Config {
    pub fn resolve(cli_port: Option<u16>) -> Result<Self> {
        Ok(Self {
            port: resolve_port(cli_port)?,
        })
    }
}

fn resolve_port(cli_port: Option<u16>) -> Result<u16> {
    // Priority 1: command-line argument
    if let Some(port) = cli_port {
        return Ok(port);
    }

    // Priority 2: environment variable
    if let Ok(value) = std::env::var("ENCORE_PORT") {
        return value
            .parse()
            .map_err(|_| Error::Config(format!("Invalid ENCORE_PORT value: {}", value)));
    }

    // Priority 3: TOML config file
    if let Some(config_path) = config_file_path() {
        if let Ok(contents) = std::fs::read_to_string(&config_path) {
            let config: toml::Value = toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
            })?;
            if let Some(port) = config.get("port").and_then(|v| v.as_integer()) {
                return u16::try_from(port).map_err(|_| {
                    Error::Config(format!(
                        "Port out of range in {}: {}",
                        config_path.display(),
                        port
                    ))
                });
            }
        }
    }

    // Priority 4: compiled default
    Ok(DEFAULT_PORT)
}

/// Platform config file location, e.g. `~/.config/encore/config.toml`.
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("encore").join("config.toml"))
}
