//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::composer::ResponseMode;

/// Environment variables holding the Neo4j password, in lookup order
const PASSWORD_VARS: [&str; 2] = ["DIAGNOIA_NEO4J_PASSWORD", "NEO4J_PASSWORD"];

/// DiagnOIA configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub database: String,
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// How the dashboard chat answers: "direct" or "narrated"
    pub dashboard_mode: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost:7474".to_string(),
            database: "neo4j".to_string(),
            username: "neo4j".to_string(),
            password: None,
            timeout_secs: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            temperature: 0.0,
            timeout_secs: None,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            dashboard_mode: "direct".to_string(),
        }
    }
}

impl GraphConfig {
    pub fn resolved_password(&self) -> anyhow::Result<Option<String>> {
        self.enforce_env_only()?;

        Ok(PASSWORD_VARS.iter().find_map(|var| env::var(var).ok()))
    }

    pub fn redacted_password(&self) -> anyhow::Result<Option<String>> {
        self.resolved_password()
            .map(|opt| opt.map(|_| "********".to_string()))
    }

    pub fn enforce_env_only(&self) -> anyhow::Result<()> {
        if self.password.is_some() {
            return Err(anyhow!(
                "The Neo4j password must be provided via environment variables, not stored in configuration"
            ));
        }
        Ok(())
    }
}

impl AssistantConfig {
    pub fn response_mode(&self) -> anyhow::Result<ResponseMode> {
        self.dashboard_mode.parse()
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("DIAGNOIA_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("diagnoia")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file (or defaults), then apply environment overrides
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load only what is stored on disk, for edits that are saved back
    pub fn load_file() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values taken from the environment
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(uri) = lookup("DIAGNOIA_NEO4J_URI") {
            self.graph.uri = uri;
        }
        if let Some(database) = lookup("DIAGNOIA_NEO4J_DATABASE") {
            self.graph.database = database;
        }
        if let Some(user) = lookup("DIAGNOIA_NEO4J_USER") {
            self.graph.username = user;
        }
        if let Some(url) = lookup("DIAGNOIA_OLLAMA_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("DIAGNOIA_OLLAMA_MODEL") {
            self.llm.model = model;
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.graph.enforce_env_only()?;
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
        }
        self.assistant.response_mode()?;
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            // Graph settings
            "graph.uri" => Ok(self.graph.uri.clone()),
            "graph.database" => Ok(self.graph.database.clone()),
            "graph.username" => Ok(self.graph.username.clone()),
            "graph.timeout_secs" => Ok(format_timeout(self.graph.timeout_secs)),

            // LLM settings
            "llm.base_url" => Ok(self.llm.base_url.clone()),
            "llm.model" => Ok(self.llm.model.clone()),
            "llm.temperature" => Ok(self.llm.temperature.to_string()),
            "llm.timeout_secs" => Ok(format_timeout(self.llm.timeout_secs)),

            // Assistant settings
            "assistant.dashboard_mode" => Ok(self.assistant.dashboard_mode.clone()),

            // Password (special handling - show redacted)
            "graph.password" | "password" => match self.graph.redacted_password()? {
                Some(redacted) => Ok(redacted),
                None => Ok(
                    "(not set - use DIAGNOIA_NEO4J_PASSWORD or NEO4J_PASSWORD env var)"
                        .to_string(),
                ),
            },

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `diagnoia config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "graph.uri" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(anyhow!(
                        "graph.uri must be an http(s) URL of the Neo4j HTTP endpoint"
                    ));
                }
                self.graph.uri = value.trim_end_matches('/').to_string();
            }
            "graph.database" => {
                self.graph.database = value.to_string();
            }
            "graph.username" => {
                self.graph.username = value.to_string();
            }
            "graph.timeout_secs" => {
                self.graph.timeout_secs = parse_timeout(value)?;
            }

            "llm.base_url" => {
                self.llm.base_url = value.trim_end_matches('/').to_string();
            }
            "llm.model" => {
                self.llm.model = value.to_string();
            }
            "llm.temperature" => {
                let temp: f32 = value
                    .parse()
                    .with_context(|| format!("Invalid temperature value: {}", value))?;
                if !(0.0..=2.0).contains(&temp) {
                    return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
                }
                self.llm.temperature = temp;
            }
            "llm.timeout_secs" => {
                self.llm.timeout_secs = parse_timeout(value)?;
            }

            "assistant.dashboard_mode" => {
                value.parse::<ResponseMode>()?;
                self.assistant.dashboard_mode = value.to_string();
            }

            // Password cannot be set via config
            "graph.password" | "password" => {
                return Err(anyhow!(
                    "The Neo4j password cannot be stored in configuration. \
                     Set the DIAGNOIA_NEO4J_PASSWORD or NEO4J_PASSWORD environment variable instead."
                ));
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `diagnoia config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "graph.uri",
            "graph.database",
            "graph.username",
            "graph.password",
            "graph.timeout_secs",
            "llm.base_url",
            "llm.model",
            "llm.temperature",
            "llm.timeout_secs",
            "assistant.dashboard_mode",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

fn format_timeout(timeout: Option<u64>) -> String {
    match timeout {
        Some(secs) => secs.to_string(),
        None => "(client default)".to_string(),
    }
}

/// "none", "default" or an empty value clears the timeout
fn parse_timeout(value: &str) -> anyhow::Result<Option<u64>> {
    match value.trim() {
        "" | "none" | "default" => Ok(None),
        secs => {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
            Ok(Some(secs))
        }
    }
}
