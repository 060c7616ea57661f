//! Embedding client abstraction
//!
//! Talks to any OpenAI-compatible `/embeddings` endpoint. In practice this is
//! a local inference server hosting a multilingual sentence-embedding model.

use anyhow::{Context, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{CreateEmbeddingRequestArgs, EmbeddingInput},
    Client as OpenAIClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Multilingual model used for semantic similarity scoring
pub const DEFAULT_EMBEDDING_MODEL: &str = "paraphrase-multilingual-MiniLM-L12-v2";

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name (only openai-compatible endpoints are supported)
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model to use for embeddings
    #[serde(default = "default_model")]
    pub model: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Base URL override (for self-hosted endpoints)
    pub base_url: Option<String>,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Anything that turns text into fixed-length vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Name of the model producing the vectors
    fn model(&self) -> &str;

    /// Embed a single text
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed(vec![text.to_string()]).await?;
        results.into_iter().next().context("No embedding returned")
    }
}

/// Loaded handle to a remote embedding model
///
/// Built once per run and shared read-only by every metric computation.
pub struct EmbeddingClient {
    config: EmbeddingConfig,
    client: OpenAIClient<OpenAIConfig>,
}

impl EmbeddingClient {
    /// Connect to the configured endpoint and verify the model answers
    ///
    /// Sends one test request so that a missing or misnamed model fails
    /// here instead of on the first test case.
    pub async fn load(config: EmbeddingConfig) -> Result<Self> {
        match config.provider.as_str() {
            "openai" => {}
            provider => anyhow::bail!("Unsupported embedding provider: {}", provider),
        }

        let mut openai_config = OpenAIConfig::new();

        if let Some(api_key) = &config.api_key {
            openai_config = openai_config.with_api_key(api_key);
        }

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        let this = Self {
            config,
            client: OpenAIClient::with_config(openai_config),
        };

        let sample = this
            .embed_one("ping")
            .await
            .with_context(|| format!("Failed to load embedding model {}", this.config.model))?;
        anyhow::ensure!(!sample.is_empty(), "Embedding model returned an empty vector");

        info!(
            "Embedding model ready: {} ({} dimensions)",
            this.config.model,
            sample.len()
        );
        Ok(this)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let count = texts.len();
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.config.model)
            .input(EmbeddingInput::StringArray(texts))
            .build()
            .context("Failed to build embedding request")?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .context("Failed to create embeddings")?;

        let mut data = response.data;
        data.sort_by_key(|e| e.index);
        anyhow::ensure!(
            data.len() == count,
            "Expected {} embeddings, got {}",
            count,
            data.len()
        );
        debug!("Embedded {} text(s)", count);

        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_default_config() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, DEFAULT_EMBEDDING_MODEL);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_config_from_partial_toml_fields() {
        let config: EmbeddingConfig =
            serde_json::from_str(r#"{"base_url": "http://localhost:8080/v1"}"#).unwrap();
        assert_eq!(config.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
    }

    #[tokio::test]
    async fn test_embed_one_uses_batch() {
        let embedder = FixedEmbedder;
        let v = embedder.embed_one("abcd").await.unwrap();
        assert_eq!(v, vec![4.0, 1.0]);
    }

    #[tokio::test]
    async fn test_unsupported_provider() {
        let config = EmbeddingConfig {
            provider: "ollama".to_string(),
            ..Default::default()
        };
        let err = EmbeddingClient::load(config).await.err().unwrap();
        assert!(err.to_string().contains("Unsupported embedding provider"));
    }
}
