//! Search collaborator
//!
//! Web search behind the opaque [`SearchProvider`] capability. The
//! production implementation posts to the Tavily Search API and maps each
//! result to a [`ReferenceNote`]. No retry: a search failure aborts the
//! current run.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::state::ReferenceNote;

/// Default Tavily search endpoint
const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

/// Default timeout for search requests
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of snippets requested per query
const DEFAULT_MAX_RESULTS: usize = 2;

/// Opaque search capability: query in, finite set of reference snippets out
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Execute one query and return its reference snippets
    async fn search(&self, query: &str) -> Result<Vec<ReferenceNote>, AgentError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Typed errors for the Tavily API
#[derive(Debug, Error)]
pub enum TavilyError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized - check API key")]
    Unauthorized,

    #[error("Rate limited - too many requests")]
    RateLimited,

    #[error("HTTP error ({0}): {1}")]
    Http(u16, String),

    #[error("Response parse error: {0}")]
    Parse(String),
}

impl From<TavilyError> for AgentError {
    fn from(err: TavilyError) -> Self {
        AgentError::search(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    content: String,
}

/// Search provider backed by the Tavily Search API
pub struct TavilySearch {
    api_key: String,
    client: Client,
    endpoint: String,
    timeout: Duration,
    max_results: usize,
}

impl TavilySearch {
    /// Create a search provider with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            endpoint: TAVILY_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Create a search provider from a validated configuration
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(&config.tavily_api_key)
    }

    /// Set a custom request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many snippets to request per query
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Point the client at a different endpoint (used by HTTP-level tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn execute(&self, query: &str) -> Result<TavilyResponse, TavilyError> {
        let request = TavilyRequest {
            query,
            search_depth: "basic",
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TavilyError::Timeout
                } else if e.is_connect() {
                    TavilyError::Connection(e.to_string())
                } else {
                    TavilyError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| TavilyError::Parse(e.to_string()));
        }

        let error_text = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(TavilyError::Unauthorized),
            429 => Err(TavilyError::RateLimited),
            code => Err(TavilyError::Http(code, error_text)),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Result<Vec<ReferenceNote>, AgentError> {
        debug!(query = %query, max_results = self.max_results, "executing search query");

        let response = self.execute(query).await?;

        let notes: Vec<ReferenceNote> = response
            .results
            .into_iter()
            .take(self.max_results)
            .map(|r| ReferenceNote::new(r.content, r.url))
            .collect();

        debug!(query = %query, count = notes.len(), "search returned snippets");
        Ok(notes)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_maps_results_to_notes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("Authorization", "Bearer tvly-test"))
            .and(body_partial_json(json!({ "query": "quantum annealing" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "url": "https://a.com", "title": "A", "content": "snippet a" },
                    { "url": "https://b.com", "title": "B", "content": "snippet b" }
                ]
            })))
            .mount(&server)
            .await;

        let provider =
            TavilySearch::new("tvly-test").with_endpoint(format!("{}/search", server.uri()));

        let notes = provider.search("quantum annealing").await.unwrap();

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0], ReferenceNote::new("snippet a", "https://a.com"));
        assert_eq!(notes[1].source, "https://b.com");
    }

    #[tokio::test]
    async fn test_search_caps_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "url": "https://a.com", "content": "a" },
                    { "url": "https://b.com", "content": "b" },
                    { "url": "https://c.com", "content": "c" }
                ]
            })))
            .mount(&server)
            .await;

        let provider = TavilySearch::new("tvly-test")
            .with_endpoint(server.uri())
            .with_max_results(1);

        let notes = provider.search("q").await.unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_search_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = TavilySearch::new("bad-key").with_endpoint(server.uri());

        let err = provider.search("q").await.unwrap_err();
        assert!(matches!(err, AgentError::Search(_)));
        assert!(err.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn test_empty_results_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let provider = TavilySearch::new("tvly-test").with_endpoint(server.uri());

        let notes = provider.search("q").await.unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn test_tavily_error_conversion() {
        let err: AgentError = TavilyError::RateLimited.into();
        assert!(matches!(err, AgentError::Search(_)));
    }
}
