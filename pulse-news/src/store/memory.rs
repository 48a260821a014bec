//! In-memory store: plain maps behind a `tokio::sync::RwLock` with
//! autoincrement ids. Suitable for a single process; the [`NewsStore`]
//! trait is the seam a database-backed implementation would slot into.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use pulse_common::{Error, Result};
use pulse_sentiment::{Classification, SentimentLabel};

use super::NewsStore;
use crate::model::{
    Article, ArticleSentiment, ArticleWithSentiment, InteractionUpdate, NewArticle, NewUser,
    NewUserPreferences, Stats, User, UserArticleInteraction, UserPreferences,
};

/// In-memory implementation of [`NewsStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    users: HashMap<u64, User>,
    /// Keyed by user id (one preferences row per user).
    preferences: HashMap<u64, UserPreferences>,
    articles: HashMap<u64, Article>,
    /// Keyed by article id (at most one classification per article).
    sentiments: HashMap<u64, ArticleSentiment>,
    interactions: HashMap<(u64, u64), UserArticleInteraction>,
    next_user_id: u64,
    next_preferences_id: u64,
    next_article_id: u64,
    next_sentiment_id: u64,
}

impl StoreInner {
    fn next_id(counter: &mut u64) -> u64 {
        *counter += 1;
        *counter
    }

    /// All articles, newest first (publish time, then id for stability).
    fn sorted_articles(&self) -> Vec<Article> {
        let mut articles: Vec<Article> = self.articles.values().cloned().collect();
        articles.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        articles
    }

    fn join(&self, article: Article, user_id: Option<u64>) -> ArticleWithSentiment {
        let sentiment = self.sentiments.get(&article.id).cloned();
        let interaction =
            user_id.and_then(|uid| self.interactions.get(&(uid, article.id)).cloned());
        ArticleWithSentiment {
            article,
            sentiment,
            interaction,
        }
    }
}

fn paginate<T>(items: impl IntoIterator<Item = T>, limit: usize, offset: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::Internal(format!("Password hashing failed: {e}")))
    }
}

#[async_trait]
impl NewsStore for MemoryStore {
    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    async fn create_user(&self, user: NewUser) -> Result<User> {
        if user.username.is_empty() || user.email.is_empty() {
            return Err(Error::InvalidInput("username and email are required".into()));
        }

        // Hash outside the lock; argon2 is deliberately slow.
        let password_hash = Self::hash_password(&user.password)?;

        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == user.username) {
            return Err(Error::Conflict(format!(
                "username {} is taken",
                user.username
            )));
        }
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(Error::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }

        let id = StoreInner::next_id(&mut inner.next_user_id);
        let record = User {
            id,
            username: user.username,
            password_hash,
            email: user.email,
            full_name: user.full_name,
            created_at: Utc::now(),
        };
        inner.users.insert(id, record.clone());
        Ok(record)
    }

    async fn get_user(&self, id: u64) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let Some(user) = self.get_user_by_username(username).await? else {
            return Ok(false);
        };
        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| Error::Internal(format!("Stored password hash is invalid: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    async fn get_preferences(&self, user_id: u64) -> Result<Option<UserPreferences>> {
        Ok(self.inner.read().await.preferences.get(&user_id).cloned())
    }

    async fn upsert_preferences(&self, prefs: NewUserPreferences) -> Result<UserPreferences> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&prefs.user_id) {
            return Err(Error::NotFound(format!("user {}", prefs.user_id)));
        }

        let existing_id = inner.preferences.get(&prefs.user_id).map(|p| p.id);
        let id =
            existing_id.unwrap_or_else(|| StoreInner::next_id(&mut inner.next_preferences_id));
        let record = UserPreferences {
            id,
            user_id: prefs.user_id,
            topics: prefs.topics,
            keywords: prefs.keywords,
            sources: prefs.sources,
        };
        inner.preferences.insert(prefs.user_id, record.clone());
        Ok(record)
    }

    // ------------------------------------------------------------------
    // Articles
    // ------------------------------------------------------------------

    async fn create_article(&self, article: NewArticle) -> Result<Article> {
        let mut inner = self.inner.write().await;
        if inner
            .articles
            .values()
            .any(|a| a.source_url == article.source_url)
        {
            return Err(Error::Conflict(format!(
                "article already stored for {}",
                article.source_url
            )));
        }

        let id = StoreInner::next_id(&mut inner.next_article_id);
        let record = Article {
            id,
            title: article.title,
            content: article.content,
            summary: article.summary,
            source_url: article.source_url,
            source_name: article.source_name,
            image_url: article.image_url,
            topic: article.topic,
            published_at: article.published_at,
            fetched_at: Utc::now(),
        };
        inner.articles.insert(id, record.clone());
        Ok(record)
    }

    async fn get_article(&self, id: u64) -> Result<Option<Article>> {
        Ok(self.inner.read().await.articles.get(&id).cloned())
    }

    async fn get_article_by_url(&self, source_url: &str) -> Result<Option<Article>> {
        let inner = self.inner.read().await;
        Ok(inner
            .articles
            .values()
            .find(|a| a.source_url == source_url)
            .cloned())
    }

    async fn list_articles(&self, limit: usize, offset: usize) -> Result<Vec<Article>> {
        let inner = self.inner.read().await;
        Ok(paginate(inner.sorted_articles(), limit, offset))
    }

    async fn list_articles_by_topic(
        &self,
        topic: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Article>> {
        let inner = self.inner.read().await;
        let filtered = inner
            .sorted_articles()
            .into_iter()
            .filter(|a| a.topic == topic);
        Ok(paginate(filtered, limit, offset))
    }

    // ------------------------------------------------------------------
    // Classifications
    // ------------------------------------------------------------------

    async fn save_classification(
        &self,
        article_id: u64,
        result: Classification,
    ) -> Result<ArticleSentiment> {
        let mut inner = self.inner.write().await;
        if !inner.articles.contains_key(&article_id) {
            return Err(Error::NotFound(format!("article {article_id}")));
        }

        // Overwrite semantics: keep the row id stable across reprocessing.
        let existing_id = inner.sentiments.get(&article_id).map(|s| s.id);
        let id = existing_id.unwrap_or_else(|| StoreInner::next_id(&mut inner.next_sentiment_id));
        let record = ArticleSentiment::from_classification(id, article_id, result);
        inner.sentiments.insert(article_id, record.clone());
        Ok(record)
    }

    async fn get_classification(&self, article_id: u64) -> Result<Option<ArticleSentiment>> {
        Ok(self.inner.read().await.sentiments.get(&article_id).cloned())
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    async fn get_interaction(
        &self,
        user_id: u64,
        article_id: u64,
    ) -> Result<Option<UserArticleInteraction>> {
        let inner = self.inner.read().await;
        Ok(inner.interactions.get(&(user_id, article_id)).cloned())
    }

    async fn upsert_interaction(
        &self,
        user_id: u64,
        article_id: u64,
        update: InteractionUpdate,
    ) -> Result<UserArticleInteraction> {
        let mut inner = self.inner.write().await;
        if !inner.articles.contains_key(&article_id) {
            return Err(Error::NotFound(format!("article {article_id}")));
        }

        let entry = inner
            .interactions
            .entry((user_id, article_id))
            .or_insert_with(|| UserArticleInteraction {
                user_id,
                article_id,
                is_saved: false,
                is_read: false,
                interacted_at: Utc::now(),
            });

        if let Some(saved) = update.is_saved {
            entry.is_saved = saved;
        }
        if let Some(read) = update.is_read {
            entry.is_read = read;
        }
        entry.interacted_at = Utc::now();

        Ok(entry.clone())
    }

    // ------------------------------------------------------------------
    // Combined feed reads
    // ------------------------------------------------------------------

    async fn articles_with_sentiment(
        &self,
        user_id: Option<u64>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>> {
        let inner = self.inner.read().await;
        let page = paginate(inner.sorted_articles(), limit, offset);
        Ok(page.into_iter().map(|a| inner.join(a, user_id)).collect())
    }

    async fn articles_with_sentiment_by_topic(
        &self,
        topic: &str,
        user_id: Option<u64>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>> {
        let inner = self.inner.read().await;
        let filtered = inner
            .sorted_articles()
            .into_iter()
            .filter(|a| a.topic == topic);
        let page = paginate(filtered, limit, offset);
        Ok(page.into_iter().map(|a| inner.join(a, user_id)).collect())
    }

    async fn articles_with_sentiment_by_label(
        &self,
        label: SentimentLabel,
        user_id: Option<u64>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>> {
        let inner = self.inner.read().await;
        let filtered = inner.sorted_articles().into_iter().filter(|a| {
            inner
                .sentiments
                .get(&a.id)
                .is_some_and(|s| s.label == label)
        });
        let page = paginate(filtered, limit, offset);
        Ok(page.into_iter().map(|a| inner.join(a, user_id)).collect())
    }

    async fn saved_articles_with_sentiment(
        &self,
        user_id: u64,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>> {
        let inner = self.inner.read().await;
        let filtered = inner.sorted_articles().into_iter().filter(|a| {
            inner
                .interactions
                .get(&(user_id, a.id))
                .is_some_and(|i| i.is_saved)
        });
        let page = paginate(filtered, limit, offset);
        Ok(page
            .into_iter()
            .map(|a| inner.join(a, Some(user_id)))
            .collect())
    }

    // ------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------

    async fn stats(&self, user_id: u64) -> Result<Stats> {
        let inner = self.inner.read().await;
        let today = Utc::now().date_naive();

        let articles_today = inner
            .articles
            .values()
            .filter(|a| a.published_at.date_naive() >= today)
            .count() as u64;

        let total = inner.sentiments.len();
        let positive = inner
            .sentiments
            .values()
            .filter(|s| s.label == SentimentLabel::Positive)
            .count();
        let positive_news = if total == 0 {
            0
        } else {
            ((positive as f64 / total as f64) * 100.0).round() as u64
        };

        let active_topics = inner
            .preferences
            .get(&user_id)
            .map_or(0, |p| p.topics.len() as u64);

        Ok(Stats {
            articles_today,
            positive_news,
            active_topics,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
