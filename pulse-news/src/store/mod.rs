//! Persistence seam for articles, classifications, users, and interactions.
//!
//! The [`NewsStore`] trait is the only surface the ingestion pipeline and
//! feed layer talk to; [`MemoryStore`] is the in-memory implementation.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use pulse_common::Result;
use pulse_sentiment::{Classification, SentimentLabel};

use crate::model::{
    Article, ArticleSentiment, ArticleWithSentiment, InteractionUpdate, NewArticle, NewUser,
    NewUserPreferences, Stats, User, UserArticleInteraction, UserPreferences,
};

/// Storage operations for the NewsPulse feed.
#[async_trait]
pub trait NewsStore: Send + Sync {
    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Create a user; the plaintext password is hashed before storage.
    /// Fails with a conflict when the username or email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn get_user(&self, id: u64) -> Result<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Check a plaintext password against the stored hash.
    /// Unknown users verify as false.
    async fn verify_password(&self, username: &str, password: &str) -> Result<bool>;

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    async fn get_preferences(&self, user_id: u64) -> Result<Option<UserPreferences>>;

    /// Create or replace the preferences row for a user.
    async fn upsert_preferences(&self, prefs: NewUserPreferences) -> Result<UserPreferences>;

    // ------------------------------------------------------------------
    // Articles
    // ------------------------------------------------------------------

    /// Persist a normalized article. Fails with a conflict when an article
    /// with the same source URL already exists.
    async fn create_article(&self, article: NewArticle) -> Result<Article>;

    async fn get_article(&self, id: u64) -> Result<Option<Article>>;

    async fn get_article_by_url(&self, source_url: &str) -> Result<Option<Article>>;

    /// Newest-first page of all articles.
    async fn list_articles(&self, limit: usize, offset: usize) -> Result<Vec<Article>>;

    async fn list_articles_by_topic(
        &self,
        topic: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Article>>;

    // ------------------------------------------------------------------
    // Classifications
    // ------------------------------------------------------------------

    /// Persist a classification keyed by article id. At most one per
    /// article; reprocessing overwrites.
    async fn save_classification(
        &self,
        article_id: u64,
        result: Classification,
    ) -> Result<ArticleSentiment>;

    async fn get_classification(&self, article_id: u64) -> Result<Option<ArticleSentiment>>;

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    async fn get_interaction(
        &self,
        user_id: u64,
        article_id: u64,
    ) -> Result<Option<UserArticleInteraction>>;

    /// Apply a partial update to the (user, article) interaction row,
    /// creating it when absent. The article must exist.
    async fn upsert_interaction(
        &self,
        user_id: u64,
        article_id: u64,
        update: InteractionUpdate,
    ) -> Result<UserArticleInteraction>;

    // ------------------------------------------------------------------
    // Combined feed reads (newest-first, paginated)
    // ------------------------------------------------------------------

    async fn articles_with_sentiment(
        &self,
        user_id: Option<u64>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>>;

    async fn articles_with_sentiment_by_topic(
        &self,
        topic: &str,
        user_id: Option<u64>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>>;

    async fn articles_with_sentiment_by_label(
        &self,
        label: SentimentLabel,
        user_id: Option<u64>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>>;

    /// Articles the user has saved.
    async fn saved_articles_with_sentiment(
        &self,
        user_id: u64,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>>;

    // ------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------

    /// Dashboard counters for a user: today's article count, the share of
    /// positive classifications, and how many topics the user follows.
    async fn stats(&self, user_id: u64) -> Result<Stats>;
}
