//! Feed queries: filtered, paginated article reads for a (possibly
//! anonymous) user, with preference-based keyword/source filtering.

use std::sync::Arc;

use pulse_common::Result;
use pulse_sentiment::SentimentLabel;

use crate::model::{ArticleWithSentiment, UserPreferences};
use crate::store::NewsStore;

/// Default page size when a query does not specify one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Hard cap on page size.
pub const MAX_PAGE_SIZE: usize = 50;

/// A feed request. All set filters apply together: saved-only restricts
/// to the user's saved set, topic and sentiment narrow it further, and
/// pagination runs over the filtered result.
#[derive(Debug, Clone)]
pub struct FeedQuery {
    pub topic: Option<String>,
    pub sentiment: Option<SentimentLabel>,
    pub saved_only: bool,
    pub limit: usize,
    pub offset: usize,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            topic: None,
            sentiment: None,
            saved_only: false,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Resolves feed queries against the store.
pub struct FeedService {
    store: Arc<dyn NewsStore>,
}

impl FeedService {
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self { store }
    }

    /// Fetch a page of the feed.
    ///
    /// When a user id is given, their interactions are attached and their
    /// keyword/source preferences (if any) filter the result. All filters
    /// run before pagination, so a page is only short when the filtered
    /// result actually runs out. Saved-only queries require a user id.
    pub async fn fetch(
        &self,
        query: &FeedQuery,
        user_id: Option<u64>,
    ) -> Result<Vec<ArticleWithSentiment>> {
        let limit = query.limit.clamp(1, MAX_PAGE_SIZE);

        // Narrowest store read first; the remaining filters retain over it.
        let mut items = if query.saved_only {
            let Some(uid) = user_id else {
                return Err(pulse_common::Error::InvalidInput(
                    "saved-only feed requires a user".into(),
                ));
            };
            self.store
                .saved_articles_with_sentiment(uid, usize::MAX, 0)
                .await?
        } else if let Some(topic) = &query.topic {
            self.store
                .articles_with_sentiment_by_topic(topic, user_id, usize::MAX, 0)
                .await?
        } else if let Some(label) = query.sentiment {
            self.store
                .articles_with_sentiment_by_label(label, user_id, usize::MAX, 0)
                .await?
        } else {
            self.store
                .articles_with_sentiment(user_id, usize::MAX, 0)
                .await?
        };

        // No-ops when the store read already applied the filter.
        if let Some(topic) = &query.topic {
            items.retain(|item| item.article.topic == *topic);
        }
        if let Some(label) = query.sentiment {
            items.retain(|item| {
                item.sentiment.as_ref().is_some_and(|s| s.label == label)
            });
        }

        if let Some(uid) = user_id {
            if let Some(prefs) = self.store.get_preferences(uid).await? {
                items.retain(|item| matches_preferences(item, &prefs));
            }
        }

        Ok(paginate(items, limit, query.offset))
    }

    /// Search stored articles. An article matches when any whitespace-
    /// separated word of the term appears in its title or content,
    /// case-insensitively. An empty term matches nothing.
    pub async fn search(
        &self,
        term: &str,
        user_id: Option<u64>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArticleWithSentiment>> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let words: Vec<String> = term.split_whitespace().map(str::to_lowercase).collect();

        let mut items = self
            .store
            .articles_with_sentiment(user_id, usize::MAX, 0)
            .await?;
        items.retain(|item| {
            let title = item.article.title.to_lowercase();
            let content = item.article.content.to_lowercase();
            words
                .iter()
                .any(|w| title.contains(w.as_str()) || content.contains(w.as_str()))
        });

        Ok(paginate(items, limit, offset))
    }
}

fn paginate<T>(items: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}

/// Apply keyword and source preferences. Empty preference lists do not
/// restrict; topic preferences are a feed default, not a filter, so they
/// are not applied here.
fn matches_preferences(item: &ArticleWithSentiment, prefs: &UserPreferences) -> bool {
    if !prefs.sources.is_empty()
        && !prefs
            .sources
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&item.article.source_name))
    {
        return false;
    }

    if !prefs.keywords.is_empty() {
        let haystack =
            format!("{} {}", item.article.title, item.article.content).to_lowercase();
        if !prefs
            .keywords
            .iter()
            .any(|k| haystack.contains(&k.to_lowercase()))
        {
            return false;
        }
    }

    true
}

// ============================================================================
// Tests
// ============================================================================
