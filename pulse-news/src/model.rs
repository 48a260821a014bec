//! Domain model for the NewsPulse feed.
//!
//! Stored records carry autoincrement ids assigned by the store; the
//! `New*` types are the insert shapes handed to it.

use chrono::{DateTime, Utc};
use pulse_sentiment::{Classification, SentimentLabel};
use serde::{Deserialize, Serialize};

// ============================================================================
// Users & Preferences
// ============================================================================

/// A registered user. The password is stored as an argon2 hash only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a new user; `password` is plaintext and hashed on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Per-user feed preferences: preferred topics, keyword filters, and
/// source filters. Empty lists mean "no restriction".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub id: u64,
    pub user_id: u64,
    pub topics: Vec<String>,
    pub keywords: Vec<String>,
    pub sources: Vec<String>,
}

/// Insert/update shape for preferences (upsert by user id).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUserPreferences {
    pub user_id: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

// ============================================================================
// Articles & Sentiment
// ============================================================================

/// A normalized, persisted news article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub source_url: String,
    pub source_name: String,
    pub image_url: Option<String>,
    pub topic: String,
    pub published_at: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
}

/// Insert shape for a normalized article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub source_url: String,
    pub source_name: String,
    pub image_url: Option<String>,
    pub topic: String,
    pub published_at: DateTime<Utc>,
}

/// Persisted sentiment classification, one-to-one with an article.
/// Overwritten (not versioned) when the article is reprocessed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSentiment {
    pub id: u64,
    pub article_id: u64,
    pub label: SentimentLabel,
    pub score: f64,
    pub explanation: String,
    pub processed_at: DateTime<Utc>,
}

impl ArticleSentiment {
    /// Build a persisted record from a classifier result.
    pub fn from_classification(id: u64, article_id: u64, result: Classification) -> Self {
        Self {
            id,
            article_id,
            label: result.label,
            score: result.score,
            explanation: result.explanation,
            processed_at: Utc::now(),
        }
    }
}

// ============================================================================
// Interactions
// ============================================================================

/// Per-user flags on an article, keyed by (user, article).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserArticleInteraction {
    pub user_id: u64,
    pub article_id: u64,
    pub is_saved: bool,
    pub is_read: bool,
    pub interacted_at: DateTime<Utc>,
}

/// Partial update for an interaction; unset fields keep their value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct InteractionUpdate {
    pub is_saved: Option<bool>,
    pub is_read: Option<bool>,
}

// ============================================================================
// Composite Views
// ============================================================================

/// An article joined with its classification and, when a user is known,
/// that user's interaction flags.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleWithSentiment {
    pub article: Article,
    pub sentiment: Option<ArticleSentiment>,
    pub interaction: Option<UserArticleInteraction>,
}

/// Per-user dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Articles published today (UTC).
    pub articles_today: u64,
    /// Percentage of all classifications that are positive, rounded.
    pub positive_news: u64,
    /// Number of topics the user follows.
    pub active_topics: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: 1,
            username: "amira".into(),
            password_hash: "$argon2id$...".into(),
            email: "amira@example.com".into(),
            full_name: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("amira"));
    }

    #[test]
    fn test_sentiment_from_classification() {
        let classification = Classification {
            label: SentimentLabel::Negative,
            score: 0.2,
            explanation: "This article leans negative.".into(),
        };
        let record = ArticleSentiment::from_classification(3, 42, classification);
        assert_eq!(record.article_id, 42);
        assert_eq!(record.label, SentimentLabel::Negative);
        assert_eq!(record.score, 0.2);
    }

    #[test]
    fn test_interaction_update_defaults_to_noop() {
        let update = InteractionUpdate::default();
        assert!(update.is_saved.is_none());
        assert!(update.is_read.is_none());
    }
}
