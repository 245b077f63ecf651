use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_MODELS_ENDPOINT: &str = "https://api.openai.com/v1/models";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_models_endpoint")]
    pub api_endpoint_models: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub selected_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint_models: default_models_endpoint(),
            api_key: String::new(),
            selected_model: String::new(),
        }
    }
}

fn default_models_endpoint() -> String {
    DEFAULT_MODELS_ENDPOINT.to_string()
}

impl Config {
    /// The completions endpoint is derived from the models endpoint so the
    /// user configures one base URL.
    pub fn completions_endpoint(&self) -> String {
        self.api_endpoint_models
            .replace("/v1/models", "/v1/completions")
    }
}

/// An absent config file yields the defaults; any other failure is an error.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let body = match fs::read_to_string(path) {
        Ok(body) => body,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };
    serde_json::from_str(&body).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let body = serde_json::to_string_pretty(config).map_err(ConfigError::Encode)?;
    fs::write(path, body).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}
