//! HTTP clients for the AI services
//!
//! `HttpClient` has no domain knowledge: it posts JSON and decodes JSON,
//! mapping every failure into a `common::Error`. The domain clients wrap it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::schema::{Answers, BlogArticle, BlogRequest, QuizInput, RecommendationOutput};

/// Bounded wait for a single service call
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default address of the locally running AI service
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

const RECOMMEND_PATH: &str = "/api/recommander";
const BLOG_PATH: &str = "/api/v1/generate";

/// Connection settings for a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL, without a trailing route
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Other("endpoint cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Other("timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Base JSON-over-HTTP client with a request timeout
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let timeout = config.timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Other(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            timeout,
            http,
        })
    }

    /// Full URL for a route on this service
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let start = Instant::now();
        trace!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_error(e))?;
        debug!(
            "POST {} -> {} in {}ms",
            url,
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    fn map_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout)
        } else if err.is_decode() {
            Error::MalformedResponse(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}

/// Anything that turns quiz answers into a recommendation
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn submit(&self, answers: &Answers) -> Result<RecommendationOutput>;
}

/// Client for the quiz recommender
#[derive(Debug, Clone)]
pub struct RecommenderClient {
    client: HttpClient,
}

impl RecommenderClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
        })
    }

    /// URL the answers are posted to
    pub fn endpoint(&self) -> String {
        self.client.url(RECOMMEND_PATH)
    }
}

#[async_trait]
impl RecommendationService for RecommenderClient {
    async fn submit(&self, answers: &Answers) -> Result<RecommendationOutput> {
        self.client
            .post_json(RECOMMEND_PATH, &QuizInput { answers })
            .await
    }
}

/// Client for the blog article generator
#[derive(Debug, Clone)]
pub struct BlogClient {
    client: HttpClient,
}

impl BlogClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
        })
    }

    /// Generate an article on the given subject
    pub async fn generate(&self, subject: &str) -> Result<BlogArticle> {
        if subject.trim().is_empty() {
            return Err(Error::Other("subject cannot be empty".to_string()));
        }
        self.client
            .post_json(BLOG_PATH, &BlogRequest { subject })
            .await
    }
}
