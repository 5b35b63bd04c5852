use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Configuration for the REST endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Configuration for session transcripts
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TranscriptsConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub transcripts: TranscriptsConfig,
}

impl Config {
    /// Load configuration from default paths
    /// Priority: project (.userctl/config.toml) > user (~/.userctl/config.toml)
    /// Starts with built-in defaults, then merges user and project configs
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // User-level config first (lower priority)
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".userctl").join("config.toml");
            if user_config.exists() {
                let user = Self::load_from(&user_config)?;
                config.merge(user);
            }
        }

        // Project-level config overrides user-level
        let project_config = Path::new(".userctl").join("config.toml");
        if project_config.exists() {
            let project = Self::load_from(&project_config)?;
            config.merge(project);
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Config) {
        if other.endpoint.base_url != default_base_url() {
            self.endpoint.base_url = other.endpoint.base_url;
        }
        if other.transcripts.dir.is_some() {
            self.transcripts.dir = other.transcripts.dir;
        }
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let url = &self.endpoint.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ValidationError {
                field: "endpoint.base_url".to_string(),
                message: format!("Must start with http:// or https://, got '{}'", url),
            });
        }
        if url.trim_end_matches('/').is_empty() {
            errors.push(ValidationError {
                field: "endpoint.base_url".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
