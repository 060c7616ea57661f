use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use llm::EmbeddingConfig;
use recommender::ServiceConfig;

const APP_NAME: &str = "quiz-eval";

/// Local inference server expected to host the embedding model
pub const DEFAULT_EMBEDDING_URL: &str = "http://127.0.0.1:8080/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default = "default_embedding")]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            embedding: default_embedding(),
            output: OutputConfig::default(),
        }
    }
}

fn default_embedding() -> EmbeddingConfig {
    EmbeddingConfig {
        base_url: Some(DEFAULT_EMBEDDING_URL.to_string()),
        ..Default::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where results and charts are written
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("evaluation")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    // QUIZ_EVAL_CONFIG_PATH overrides the default config directory
    if let Ok(path) = std::env::var("QUIZ_EVAL_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }

    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .context("Could not determine config directory")
}

pub fn get_config_file() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

/// Load configuration from `path`, or from the default location
///
/// A missing default file yields the built-in defaults; a missing explicit
/// file is an error. Environment overrides are applied last.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => {
            let config_file = get_config_file()?;
            if config_file.exists() {
                read_config(&config_file)?
            } else {
                Config::default()
            }
        }
    };

    apply_env_from(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Override config values from environment-style lookups
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup("QUIZ_EVAL_ENDPOINT") {
        config.service.endpoint = endpoint;
    }
    if let Some(timeout) = lookup("QUIZ_EVAL_TIMEOUT_SECS") {
        match timeout.parse() {
            Ok(secs) => config.service.timeout_secs = secs,
            Err(_) => tracing::warn!("Ignoring invalid QUIZ_EVAL_TIMEOUT_SECS: {}", timeout),
        }
    }
    if let Some(url) = lookup("QUIZ_EVAL_EMBEDDING_URL") {
        config.embedding.base_url = Some(url);
    }
    if let Some(model) = lookup("QUIZ_EVAL_EMBEDDING_MODEL") {
        config.embedding.model = model;
    }
    if let Some(key) = lookup("OPENAI_API_KEY") {
        config.embedding.api_key = Some(key);
    }
    if let Some(dir) = lookup("QUIZ_EVAL_OUTPUT_DIR") {
        config.output.dir = PathBuf::from(dir);
    }
}
