//! Sentiment lexicon tables.
//!
//! Static word lists consumed by the classifier: global positive/negative
//! terms, negators, intensifiers, and per-topic override sets. The tables
//! are built once and never mutated afterwards; the classifier only reads
//! them, so a single lexicon can be shared across ingestion workers.

use std::collections::{HashMap, HashSet};

/// Global positive sentiment terms.
const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "positive",
    "success",
    "successful",
    "breakthrough",
    "win",
    "wins",
    "improve",
    "improved",
    "improvement",
    "benefit",
    "happy",
    "best",
    "strong",
    "growth",
    "gain",
    "gains",
    "record",
    "boost",
    "thrive",
    "progress",
    "promising",
    "achievement",
    "hope",
    "optimism",
];

/// Global negative sentiment terms.
const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "worst",
    "terrible",
    "negative",
    "fail",
    "fails",
    "failure",
    "crisis",
    "problem",
    "issue",
    "threat",
    "risk",
    "danger",
    "fear",
    "conflict",
    "decline",
    "loss",
    "losses",
    "crash",
    "collapse",
    "warning",
    "concern",
    "damage",
    "lawsuit",
    "scandal",
    "fraud",
    "weak",
    "recession",
];

/// Words that invert the polarity of a following sentiment word.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "neither", "nor", "cannot", "can't", "won't", "don't",
    "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't", "hardly", "barely", "without",
];

/// Words that double the weight of a following sentiment word.
const INTENSIFIERS: &[&str] = &[
    "very",
    "extremely",
    "highly",
    "incredibly",
    "hugely",
    "massively",
    "deeply",
    "truly",
    "really",
    "remarkably",
    "significantly",
];

/// Topic-specific override tables, keyed by the topic name the ingestion
/// pipeline assigns (capitalized NewsAPI category).
const TOPIC_WORDS: &[(&str, &[&str], &[&str])] = &[
    (
        "Technology",
        &["innovative", "seamless", "revolutionary"],
        &["outage", "breach", "vulnerability", "recall"],
    ),
    (
        "Business",
        &["profitable", "bullish", "rally", "surge"],
        &["bankruptcy", "layoffs", "bearish", "selloff"],
    ),
    (
        "Science",
        &["discovery", "milestone"],
        &["retraction", "contamination"],
    ),
    (
        "Health",
        &["cure", "remission"],
        &["outbreak", "epidemic", "contagion"],
    ),
    (
        "Sports",
        &["championship", "triumph", "undefeated"],
        &["injury", "doping", "relegation"],
    ),
    (
        "Entertainment",
        &["blockbuster", "acclaimed"],
        &["flop", "cancellation"],
    ),
];

/// Positive/negative override sets for a single topic.
#[derive(Debug, Clone, Default)]
pub struct TopicLexicon {
    pub positive: HashSet<&'static str>,
    pub negative: HashSet<&'static str>,
}

/// Immutable lexicon configuration for the classifier.
///
/// Built once (normally via [`Default`]) and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
    negators: HashSet<&'static str>,
    intensifiers: HashSet<&'static str>,
    topics: HashMap<&'static str, TopicLexicon>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        let topics = TOPIC_WORDS
            .iter()
            .map(|(topic, positive, negative)| {
                (
                    *topic,
                    TopicLexicon {
                        positive: positive.iter().copied().collect(),
                        negative: negative.iter().copied().collect(),
                    },
                )
            })
            .collect();

        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
            negators: NEGATORS.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            topics,
        }
    }
}

impl SentimentLexicon {
    /// Check membership in the global positive set.
    pub fn is_positive(&self, token: &str) -> bool {
        self.positive.contains(token)
    }

    /// Check membership in the global negative set.
    pub fn is_negative(&self, token: &str) -> bool {
        self.negative.contains(token)
    }

    /// Check whether a token is a negator.
    pub fn is_negator(&self, token: &str) -> bool {
        self.negators.contains(token)
    }

    /// Check whether a token is an intensifier.
    pub fn is_intensifier(&self, token: &str) -> bool {
        self.intensifiers.contains(token)
    }

    /// Look up the override table for a topic (exact, case-sensitive key).
    pub fn topic(&self, topic: &str) -> Option<&TopicLexicon> {
        self.topics.get(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_sets_are_disjoint() {
        let lexicon = SentimentLexicon::default();
        for word in POSITIVE_WORDS {
            assert!(!lexicon.is_negative(word), "{word} is in both global sets");
        }
    }

    #[test]
    fn test_topic_words_not_in_global_sets() {
        let lexicon = SentimentLexicon::default();
        for (topic, positive, negative) in TOPIC_WORDS {
            for word in positive.iter().chain(negative.iter()) {
                assert!(
                    !lexicon.is_positive(word) && !lexicon.is_negative(word),
                    "{word} ({topic}) shadows a global entry"
                );
            }
        }
    }

    #[test]
    fn test_modifiers_do_not_overlap_sentiment_words() {
        let lexicon = SentimentLexicon::default();
        for word in NEGATORS.iter().chain(INTENSIFIERS.iter()) {
            assert!(!lexicon.is_positive(word));
            assert!(!lexicon.is_negative(word));
        }
    }

    #[test]
    fn test_topic_lookup_is_case_sensitive() {
        let lexicon = SentimentLexicon::default();
        assert!(lexicon.topic("Technology").is_some());
        assert!(lexicon.topic("technology").is_none());
        assert!(lexicon.topic("Astrology").is_none());
    }
}
