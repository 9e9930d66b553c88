use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GatewayError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Model identifier sent upstream on every attempt; never caller-controlled.
    pub model: String,
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl Settings {
    /// Load settings from `custom-config.toml` or `config.toml` when present;
    /// fall back to defaults otherwise (credentials never live in the file).
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("{}: {}", path, e)))
    }

    fn find_config_file() -> Option<String> {
        ["custom-config.toml", "config.toml"]
            .iter()
            .find(|name| Path::new(name).exists())
            .map(|name| name.to_string())
    }
}

/// Upstream credentials, one per named slot. Loaded once from the process
/// environment at boot; a missing or blank variable leaves the slot empty,
/// which makes pool entries using it ineligible rather than erroneous.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub main: Option<String>,
    pub backup: Option<String>,
    pub research: Option<String>,
    pub study: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            main: env_secret("GROQ_API_KEY"),
            backup: env_secret("GROQ_BACKUP_API_KEY"),
            research: env_secret("GROQ_RESEARCH_API_KEY"),
            study: env_secret("GROQ_STUDY_API_KEY"),
        }
    }
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
