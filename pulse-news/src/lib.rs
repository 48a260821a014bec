//! Pulse News - Ingestion and feed service for NewsPulse.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    pulse-news (service)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────┐   ┌────────────────┐   │
//! │  │  NewsAPI     │──▶│  Ingest      │──▶│  Memory Store  │   │
//! │  │  Client      │   │  Pipeline    │   │  + Feed        │   │
//! │  └──────────────┘   └──────┬───────┘   └────────────────┘   │
//! │                            │ classify                       │
//! │                     ┌──────▼───────┐                        │
//! │                     │ pulse-       │                        │
//! │                     │ sentiment    │                        │
//! │                     └──────────────┘                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The refresh scheduler drives the pipeline on a fixed interval; each
//! cycle fetches top headlines per category, normalizes and classifies
//! them, and persists article + classification into the store. The feed
//! layer serves filtered, paginated reads over the store contents.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod feed;
pub mod ingest;
pub mod model;
pub mod provider;
pub mod scheduler;
pub mod store;

use anyhow::{Context, Result};
use std::sync::Arc;

use pulse_common::config::Config;

use crate::feed::FeedService;
use crate::ingest::IngestPipeline;
use crate::model::ArticleWithSentiment;
use crate::provider::NewsApiClient;
use crate::scheduler::RefreshScheduler;
use crate::store::{MemoryStore, NewsStore};

/// Terms shorter than this skip the remote fetch and search locally only.
const MIN_REMOTE_SEARCH_LEN: usize = 3;

/// Shared service state.
pub struct NewsState {
    /// Configuration
    pub config: Config,
    /// Article/user store
    pub store: Arc<dyn NewsStore>,
    /// Ingestion pipeline
    pub pipeline: Arc<IngestPipeline>,
    /// Feed query layer
    pub feed: FeedService,
}

impl NewsState {
    /// Build the service state. Fails when no API key is configured.
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .news
            .api_key
            .clone()
            .context("news.api_key (or NEWS_API_KEY) is required")?;

        let mut client = NewsApiClient::new(api_key);
        if let Some(base_url) = &config.news.base_url {
            client = client.with_base_url(base_url.clone());
        }

        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let pipeline = Arc::new(IngestPipeline::new(client, store.clone(), &config.news));
        let feed = FeedService::new(store.clone());

        Ok(Self {
            config,
            store,
            pipeline,
            feed,
        })
    }

    /// Search the feed. Substantial terms first trigger a provider fetch so
    /// fresh matches land in the store; a failing fetch degrades to a
    /// local-only search rather than erroring the whole request.
    pub async fn search(
        &self,
        term: &str,
        user_id: Option<u64>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>> {
        if term.trim().len() >= MIN_REMOTE_SEARCH_LEN {
            if let Err(e) = self.pipeline.ingest_search(term).await {
                tracing::warn!(term, error = %e, "Search fetch failed; serving stored articles only");
            }
        }

        Ok(self.feed.search(term, user_id, limit, offset).await?)
    }
}

/// Main news service: runs the refresh scheduler until shutdown.
pub struct NewsService {
    state: Arc<NewsState>,
}

impl NewsService {
    pub fn new(config: Config) -> Result<Self> {
        let state = Arc::new(NewsState::new(config)?);
        Ok(Self { state })
    }

    pub fn state(&self) -> Arc<NewsState> {
        self.state.clone()
    }

    /// Start the refresh scheduler and run until ctrl-c.
    pub async fn start(self) -> Result<()> {
        let scheduler = RefreshScheduler::new(
            self.state.pipeline.clone(),
            self.state.config.news.refresh_minutes,
        );

        tracing::info!(
            period_secs = scheduler.period().as_secs(),
            "Starting refresh scheduler"
        );

        tokio::select! {
            _ = scheduler.run() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_state_requires_api_key() {
        let config = Config::default();
        assert!(NewsState::new(config).is_err());

        let mut config = Config::default();
        config.news.api_key = Some("k-1".into());
        assert!(NewsState::new(config).is_ok());
    }

    #[tokio::test]
    async fn test_search_ingests_then_serves_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "fusion"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "totalResults": 1,
                "articles": [{
                    "source": { "id": null, "name": "Science Wire" },
                    "title": "Fusion reactor sets record",
                    "description": "A big step",
                    "url": "https://sciencewire.example/fusion",
                    "publishedAt": "2025-01-15T10:00:00Z",
                    "content": "A great success for fusion research."
                }]
            })))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.news.api_key = Some("k-1".into());
        config.news.base_url = Some(format!("{}/v2", server.uri()));
        let state = NewsState::new(config).unwrap();

        let hits = state.search("fusion", None, 10, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article.title, "Fusion reactor sets record");
        assert!(hits[0].sentiment.is_some());

        // Short terms skip the provider and search the store only.
        let hits = state.search("fu", None, 10, 0).await.unwrap();
        assert_eq!(hits.len(), 1);
    }
}
