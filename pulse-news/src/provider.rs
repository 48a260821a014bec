//! NewsAPI.org adapter.
//!
//! # API Documentation
//! https://newsapi.org/docs
//!
//! # Endpoints Used
//! - Top headlines by category: `GET /v2/top-headlines`
//! - Keyword search: `GET /v2/everything`
//!
//! Authentication is the `apiKey` query parameter. The free tier allows
//! 100 requests/day, which the default 30-minute refresh cycle over seven
//! categories stays under.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Categories supported by the NewsAPI top-headlines endpoint.
pub const NEWS_CATEGORIES: &[&str] = &[
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// NewsAPI client.
pub struct NewsApiClient {
    /// API key
    api_key: String,
    /// HTTP client
    client: reqwest::Client,
    /// API base URL
    base_url: String,
}

impl NewsApiClient {
    /// Create a new NewsAPI client.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key: api_key.into(),
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch top US headlines for a category.
    pub async fn top_headlines(&self, category: &str, page_size: u32) -> Result<NewsApiResponse> {
        self.get(
            "top-headlines",
            &[
                ("country", "us"),
                ("category", category),
                ("pageSize", &page_size.to_string()),
            ],
        )
        .await
        .with_context(|| format!("Failed to fetch top headlines for category {category}"))
    }

    /// Fetch recent English articles matching a keyword query.
    pub async fn everything(&self, query: &str, page_size: u32) -> Result<NewsApiResponse> {
        self.get(
            "everything",
            &[
                ("q", query),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", &page_size.to_string()),
            ],
        )
        .await
        .with_context(|| format!("Failed to fetch articles for query {query}"))
    }

    /// Call a NewsAPI endpoint and decode the standard response envelope.
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<NewsApiResponse> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to send request to NewsAPI")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("NewsAPI error: {} - {}", status, body);
        }

        let result: NewsApiResponse = response
            .json()
            .await
            .context("Failed to parse NewsAPI response")?;

        if result.status != "ok" {
            anyhow::bail!(
                "NewsAPI returned status {}: {}",
                result.status,
                result.message.unwrap_or_default()
            );
        }

        Ok(result)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Standard NewsAPI response envelope.
#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "totalResults", default)]
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// An article as delivered by NewsAPI. Most fields are nullable on the
/// wire; normalization decides what is usable.
#[derive(Debug, Clone, Deserialize)]
pub struct RawArticle {
    pub source: RawSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "urlToImage", default)]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = NewsApiClient::new("test_key");
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);

        let client = client.with_base_url("http://localhost:9999/v2");
        assert_eq!(client.base_url, "http://localhost:9999/v2");
    }

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": { "id": null, "name": "TechDaily" },
                "author": "R. Ortiz",
                "title": "A headline",
                "description": "A summary",
                "url": "https://techdaily.example/a",
                "urlToImage": null,
                "publishedAt": "2025-01-15T08:30:00Z",
                "content": "Body text"
            }]
        })
    }

    #[tokio::test]
    async fn test_top_headlines_request_and_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/top-headlines"))
            .and(query_param("country", "us"))
            .and(query_param("category", "technology"))
            .and(query_param("pageSize", "5"))
            .and(query_param("apiKey", "k-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&server)
            .await;

        let client = NewsApiClient::new("k-1").with_base_url(format!("{}/v2", server.uri()));
        let response = client.top_headlines("technology", 5).await.unwrap();
        assert_eq!(response.status, "ok");
        assert_eq!(response.total_results, 1);
        assert_eq!(response.articles.len(), 1);
        assert_eq!(
            response.articles[0].source.name.as_deref(),
            Some("TechDaily")
        );
        assert_eq!(response.articles[0].title.as_deref(), Some("A headline"));
    }

    #[tokio::test]
    async fn test_everything_sets_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "fusion energy"))
            .and(query_param("language", "en"))
            .and(query_param("sortBy", "publishedAt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&server)
            .await;

        let client = NewsApiClient::new("k-1").with_base_url(format!("{}/v2", server.uri()));
        let response = client.everything("fusion energy", 10).await.unwrap();
        assert_eq!(response.articles.len(), 1);
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/top-headlines"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = NewsApiClient::new("bad").with_base_url(format!("{}/v2", server.uri()));
        let err = client.top_headlines("business", 5).await.unwrap_err();
        assert!(format!("{err:#}").contains("401"));
    }

    #[tokio::test]
    async fn test_api_level_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/top-headlines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "message": "apiKeyInvalid"
            })))
            .mount(&server)
            .await;

        let client = NewsApiClient::new("bad").with_base_url(format!("{}/v2", server.uri()));
        let err = client.top_headlines("business", 5).await.unwrap_err();
        assert!(format!("{err:#}").contains("apiKeyInvalid"));
    }
}
