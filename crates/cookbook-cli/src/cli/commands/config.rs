//! Config command handlers.

use anyhow::{Context, Result};
use cookbook_core::config::{self, Config};
use cookbook_core::session_store::mask_token;

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

/// Prints the effective configuration (file + env overrides).
pub fn show(config: &Config) -> Result<()> {
    let mut shown = config.clone();
    shown.identity.api_key = config.identity.effective_api_key().map(mask_token);
    let rendered = toml::to_string_pretty(&shown).context("render config")?;
    print!("{rendered}");
    Ok(())
}
