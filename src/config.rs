use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::subscribe::{SubscribeProvider, DEFAULT_GROUP_ID};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub subscribe: SubscribeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeConfig {
    #[serde(default)]
    pub provider: SubscribeProvider,
    /// Bearer token for the provider API. Absent token means the subscribe
    /// endpoint answers 500 until it is configured.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_group_id")]
    pub group_id: String,
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_group_id() -> String {
    DEFAULT_GROUP_ID.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            subscribe: SubscribeConfig::default(),
        }
    }
}

impl Default for SubscribeConfig {
    fn default() -> Self {
        Self {
            provider: SubscribeProvider::default(),
            api_token: None,
            group_id: default_group_id(),
        }
    }
}

impl AppConfig {
    /// Get the directory containing the executable
    fn get_base_dir() -> PathBuf {
        match std::env::current_exe() {
            Ok(exe_path) => exe_path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
            Err(_) => PathBuf::from("."),
        }
    }

    /// Get the path to the config file (relative to executable)
    pub fn config_path() -> PathBuf {
        Self::get_base_dir().join("mindquest_config.toml")
    }

    /// Load config from mindquest_config.toml (next to executable), then let
    /// environment variables override individual fields.
    pub fn load() -> Self {
        let path = Self::config_path();

        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::error!("Failed to parse {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::warn!("No config file found, using defaults + env vars");
                Self::default()
            }
        };

        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(bind) = env::var("MINDQUEST_BIND") {
            if !bind.trim().is_empty() {
                self.bind = bind;
            }
        }

        if let Ok(provider) = env::var("MINDQUEST_SUBSCRIBE_PROVIDER") {
            match provider.trim().to_ascii_lowercase().as_str() {
                "mailerlite" => self.subscribe.provider = SubscribeProvider::Mailerlite,
                "sender" => self.subscribe.provider = SubscribeProvider::Sender,
                other => {
                    tracing::error!(
                        "Invalid MINDQUEST_SUBSCRIBE_PROVIDER '{}'; expected 'mailerlite' or 'sender'",
                        other
                    );
                }
            }
        }

        // SUBSS is the name the original deployment used for the MailerLite
        // token; keep honoring it.
        let token = env::var("MINDQUEST_SUBSCRIBE_TOKEN")
            .or_else(|_| env::var("SUBSS"))
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if token.is_some() {
            self.subscribe.api_token = token;
        }

        if let Ok(group) = env::var("MAILERLITE_GROUP_ID") {
            if !group.trim().is_empty() {
                self.subscribe.group_id = group.trim().to_string();
            }
        }
    }
}
