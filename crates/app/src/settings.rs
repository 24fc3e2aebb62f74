use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;
use sigrelay_core::config::AppConfig;
use thiserror::Error;

/// Config file looked up in the working directory when `SIGRELAY_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "sigrelay.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing required settings: {0}")]
    Missing(String),
}

/// # Summary
/// Flat view of the settings sources. Environment variables keep their
/// historical names (`TELEGRAM_BOT_TOKEN`, `PORT`, ...), lower-cased by
/// the `config` crate.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    telegram_bot_token: Option<String>,
    telegram_chat_id: Option<String>,
    telegram_api_base: Option<String>,
    webhook_secret: Option<String>,
    host: Option<String>,
    port: Option<u16>,
}

/// # Summary
/// Loads the application configuration once at startup.
///
/// # Logic
/// 1. Reads `file` if it exists (TOML, flat keys).
/// 2. Overlays process environment variables.
/// 3. Applies defaults and rejects empty credentials.
///
/// # Arguments
/// * `file` - Optional settings file.
///
/// # Returns
/// * A complete `AppConfig`, or `SettingsError` naming what is missing.
pub fn load_settings(file: &Path) -> Result<AppConfig, SettingsError> {
    load_from(file, Environment::default())
}

fn load_from(file: &Path, env: Environment) -> Result<AppConfig, SettingsError> {
    let raw: RawSettings = Config::builder()
        .add_source(File::from(file).required(false))
        .add_source(env)
        .build()?
        .try_deserialize()?;

    let mut config = AppConfig::default();
    if let Some(token) = raw.telegram_bot_token {
        config.telegram.bot_token = token;
    }
    if let Some(chat_id) = raw.telegram_chat_id {
        config.telegram.chat_id = chat_id;
    }
    if let Some(api_base) = raw.telegram_api_base {
        config.telegram.api_base = api_base;
    }
    if let Some(secret) = raw.webhook_secret {
        config.webhook.secret = secret;
    }
    if let Some(host) = raw.host {
        config.server.host = host;
    }
    if let Some(port) = raw.port {
        config.server.port = port;
    }

    let missing = config.missing_fields();
    if !missing.is_empty() {
        return Err(SettingsError::Missing(missing.join(", ")));
    }
    Ok(config)
}
