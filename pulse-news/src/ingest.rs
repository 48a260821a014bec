//! Article ingestion pipeline.
//!
//! Pulls raw articles from the news provider, normalizes them, classifies
//! each one, and persists article + classification. Failures are isolated:
//! a bad article never aborts its batch and a failing category never aborts
//! the refresh cycle.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use pulse_common::config::NewsConfig;
use pulse_sentiment::Classifier;

use crate::model::NewArticle;
use crate::provider::{NewsApiClient, NewsApiResponse, RawArticle, NEWS_CATEGORIES};
use crate::store::NewsStore;

/// Page size for search-triggered fetches; searches pull a small batch
/// of fresh matches rather than a full refresh page.
const SEARCH_PAGE_SIZE: u32 = 5;

/// Ingestion pipeline: provider -> normalize -> classify -> store.
pub struct IngestPipeline {
    client: NewsApiClient,
    store: Arc<dyn NewsStore>,
    classifier: Classifier,
    categories: Vec<String>,
    page_size: u32,
}

impl IngestPipeline {
    pub fn new(client: NewsApiClient, store: Arc<dyn NewsStore>, config: &NewsConfig) -> Self {
        let categories = config.categories.clone().unwrap_or_else(|| {
            NEWS_CATEGORIES.iter().map(|c| c.to_string()).collect()
        });

        Self {
            client,
            store,
            classifier: Classifier::default(),
            categories,
            page_size: config.page_size,
        }
    }

    /// Refresh every configured category. Per-category failures are logged
    /// and skipped. Returns the number of newly stored articles.
    pub async fn refresh_all(&self) -> Result<usize> {
        tracing::info!(categories = self.categories.len(), "Starting news refresh");

        let mut stored = 0;
        for category in &self.categories {
            match self.refresh_category(category).await {
                Ok(count) => stored += count,
                Err(e) => {
                    tracing::warn!(category = %category, error = %e, "Category refresh failed");
                }
            }
        }

        tracing::info!(stored, "News refresh completed");
        Ok(stored)
    }

    /// Fetch and ingest one category. Returns the number of newly stored
    /// articles.
    pub async fn refresh_category(&self, category: &str) -> Result<usize> {
        let response = self.client.top_headlines(category, self.page_size).await?;
        Ok(self.process_batch(response, category).await)
    }

    /// Fetch and ingest articles matching a search term. Stored under the
    /// "Search" topic. Returns the number of newly stored articles.
    pub async fn ingest_search(&self, term: &str) -> Result<usize> {
        let response = self.client.everything(term, SEARCH_PAGE_SIZE).await?;
        Ok(self.process_batch(response, "search").await)
    }

    /// Normalize, classify, and store a batch of raw articles.
    async fn process_batch(&self, response: NewsApiResponse, category: &str) -> usize {
        if response.articles.is_empty() {
            tracing::debug!(category = %category, "No articles in response");
            return 0;
        }

        tracing::debug!(
            category = %category,
            count = response.articles.len(),
            "Processing article batch"
        );

        let mut stored = 0;
        for raw in response.articles {
            match self.ingest_one(raw, category).await {
                Ok(true) => stored += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(category = %category, error = %e, "Failed to ingest article");
                }
            }
        }
        stored
    }

    /// Ingest a single raw article. Returns Ok(false) when the article is
    /// skipped (incomplete data or already stored).
    async fn ingest_one(&self, raw: RawArticle, category: &str) -> Result<bool> {
        let Some(article) = normalize(raw, category) else {
            tracing::debug!(category = %category, "Skipping article with missing fields");
            return Ok(false);
        };

        if self
            .store
            .get_article_by_url(&article.source_url)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let result = self
            .classifier
            .classify(&article.title, &article.content, &article.topic);

        let saved = self.store.create_article(article).await?;
        self.store.save_classification(saved.id, result).await?;

        tracing::debug!(article_id = saved.id, title = %saved.title, "Stored article");
        Ok(true)
    }
}

/// Normalize a raw provider article into an insertable one.
///
/// Title, URL, and source name are required; anything else falls back.
/// Returns `None` when a required field is missing or blank.
fn normalize(raw: RawArticle, category: &str) -> Option<NewArticle> {
    let title = raw.title.filter(|t| !t.trim().is_empty())?;
    let source_url = raw.url.filter(|u| !u.trim().is_empty())?;
    let source_name = raw.source.name.filter(|n| !n.trim().is_empty())?;

    let content = raw
        .content
        .or_else(|| raw.description.clone())
        .unwrap_or_else(|| "No content available".to_string());

    let published_at = raw
        .published_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Some(NewArticle {
        title,
        content,
        summary: raw.description,
        source_url,
        source_name,
        image_url: raw.url_to_image,
        topic: capitalize(category),
        published_at,
    })
}

/// Capitalize a NewsAPI category into a topic name ("science" -> "Science").
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
