use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, fs, path::PathBuf};

use crate::provider::ProviderId;

pub const ENV_OPENWEATHER_KEY: &str = "OPENWEATHER_KEY";
pub const ENV_WEATHERAPI_KEY: &str = "WEATHERAPI_KEY";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

const REDACTED: &str = "<redacted>";

/// Configuration for a single provider (e.g., API key).
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig").field("api_key", &REDACTED).finish()
    }
}

/// Where the finished report is delivered.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub chat_id: Option<String>,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &self.token.as_ref().map(|_| REDACTED))
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Complete delivery credentials. The token never shows up in `Debug` output.
#[derive(Clone, PartialEq)]
pub struct DeliveryCredentials {
    pub token: String,
    pub chat_id: String,
}

impl fmt::Debug for DeliveryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryCredentials")
            .field("token", &REDACTED)
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// [telegram]
    /// token = "..."
    /// chat_id = "..."
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl Config {
    /// Load config from disk (if present), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Overlay values from the environment. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| {
            lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        if let Some(key) = lookup(ENV_OPENWEATHER_KEY) {
            self.upsert_provider_api_key(ProviderId::OpenWeather, key);
        }
        if let Some(key) = lookup(ENV_WEATHERAPI_KEY) {
            self.upsert_provider_api_key(ProviderId::WeatherApi, key);
        }
        if let Some(token) = lookup(ENV_TELEGRAM_TOKEN) {
            self.telegram.token = Some(token);
        }
        if let Some(chat_id) = lookup(ENV_TELEGRAM_CHAT_ID) {
            self.telegram.chat_id = Some(chat_id);
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "marine-outlook", "marine-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers
            .get(provider_id.as_str())
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.is_empty())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }

    /// Delivery credentials, or an error naming what is missing.
    pub fn delivery(&self) -> Result<DeliveryCredentials> {
        match (&self.telegram.token, &self.telegram.chat_id) {
            (Some(token), Some(chat_id)) => {
                Ok(DeliveryCredentials { token: token.clone(), chat_id: chat_id.clone() })
            }
            (token, chat_id) => {
                let missing: Vec<&str> = [
                    token.is_none().then_some(ENV_TELEGRAM_TOKEN),
                    chat_id.is_none().then_some(ENV_TELEGRAM_CHAT_ID),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(anyhow!(
                    "Delivery credentials not configured: {} missing",
                    missing.join(" and ")
                ))
            }
        }
    }
}
