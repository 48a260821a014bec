//! Lexicon-based sentiment classifier.
//!
//! `classify(title, body, topic)` is a total, deterministic function: any
//! three strings (including empty ones) produce a `Classification` with a
//! score in `[0, 1]`. Scoring walks the text sentence by sentence with a
//! short-lived negation/intensifier window, then applies two extra passes:
//! topic-specific lexicon hits over the full text and headline hits over
//! the title alone.

use serde::{Deserialize, Serialize};

use crate::lexicon::SentimentLexicon;

// ============================================================================
// Scoring Constants
// ============================================================================

/// Label is positive when the score reaches this threshold (inclusive).
pub const POSITIVE_THRESHOLD: f64 = 0.67;

/// Label is negative when the score falls to this threshold (inclusive).
pub const NEGATIVE_THRESHOLD: f64 = 0.33;

/// Score assigned when no sentiment words are found.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Tokens a negator stays active for after being triggered.
const NEGATION_WINDOW: usize = 3;

/// Tokens an intensifier stays active for after being triggered.
const INTENSIFIER_WINDOW: usize = 2;

/// Weight of a topic-specific lexicon hit.
const TOPIC_WEIGHT: f64 = 1.5;

/// Extra weight of a global lexicon hit in the headline.
const HEADLINE_WEIGHT: f64 = 2.0;

/// Weight of a negated negative term, credited to the positive side.
/// Weaker than a direct positive on purpose.
const NEGATED_NEGATIVE_WEIGHT: f64 = 0.5;

/// Maximum reasons per polarity surfaced in the explanation.
const MAX_REASONS: usize = 3;

// ============================================================================
// Result Types
// ============================================================================

/// Final sentiment label for an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Map a normalized score onto a label using the fixed thresholds.
    pub fn from_score(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which accumulator a match contributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

/// A single lexicon hit recorded while scanning.
///
/// Transient: only used to assemble the explanation text.
#[derive(Debug, Clone)]
pub struct SentimentMatch {
    /// The matched token as it appeared in the lowercased text.
    pub excerpt: String,
    /// Side the hit counted toward.
    pub polarity: Polarity,
    /// Why the hit counted the way it did.
    pub reason: &'static str,
}

/// Classification output: label, normalized score, and explanation.
///
/// The score is the ratio of weighted positive contributions to total
/// weighted contributions, or [`NEUTRAL_SCORE`] when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: SentimentLabel,
    pub score: f64,
    pub explanation: String,
}

// ============================================================================
// Classifier
// ============================================================================

/// Sentiment classifier over an immutable lexicon.
///
/// Stateless across calls; safe to share between ingestion workers.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    lexicon: SentimentLexicon,
}

/// Running accumulators and recorded matches for one classification call.
#[derive(Debug, Default)]
struct Tally {
    positive: f64,
    negative: f64,
    matches: Vec<SentimentMatch>,
}

impl Tally {
    fn add(&mut self, polarity: Polarity, weight: f64, excerpt: &str, reason: &'static str) {
        match polarity {
            Polarity::Positive => self.positive += weight,
            Polarity::Negative => self.negative += weight,
        }
        self.matches.push(SentimentMatch {
            excerpt: excerpt.to_string(),
            polarity,
            reason,
        });
    }
}

impl Classifier {
    /// Create a classifier over a custom lexicon.
    pub fn new(lexicon: SentimentLexicon) -> Self {
        Self { lexicon }
    }

    /// Classify an article.
    ///
    /// Pure and infallible: empty inputs and unknown topics are valid and
    /// simply contribute no signal.
    pub fn classify(&self, title: &str, body: &str, topic: &str) -> Classification {
        let text = format!("{} {}", title, body).to_lowercase();
        let mut tally = Tally::default();

        // Pass 1: per-sentence scan with negation/intensifier context.
        for sentence in split_sentences(&text) {
            self.scan_sentence(sentence, &mut tally);
        }

        // Pass 2: topic-specific hits over the full text, no modifier context.
        self.scan_topic(&text, topic, &mut tally);

        // Pass 3: headline hits, weighted above body words.
        self.scan_headline(&title.to_lowercase(), &mut tally);

        let total = tally.positive + tally.negative;
        let score = if total == 0.0 {
            NEUTRAL_SCORE
        } else {
            tally.positive / total
        };
        let label = SentimentLabel::from_score(score);
        let explanation = build_explanation(label, &tally.matches);

        tracing::trace!(
            %label,
            score,
            positive = tally.positive,
            negative = tally.negative,
            matched = tally.matches.len(),
            "Classified article"
        );

        Classification {
            label,
            score,
            explanation,
        }
    }

    /// Scan one sentence, tracking modifier windows with explicit
    /// countdowns. Both counters reset at every sentence boundary, so a
    /// trailing "not" cannot leak into the next sentence.
    fn scan_sentence(&self, sentence: &str, tally: &mut Tally) {
        let mut negation_left: usize = 0;
        let mut intensifier_left: usize = 0;

        for token in tokenize(sentence) {
            if self.lexicon.is_negator(token) {
                negation_left = NEGATION_WINDOW;
                continue;
            }
            if self.lexicon.is_intensifier(token) {
                intensifier_left = INTENSIFIER_WINDOW;
                continue;
            }

            let negated = negation_left > 0;
            let intensified = intensifier_left > 0;

            if self.lexicon.is_positive(token) {
                if negated {
                    tally.add(Polarity::Negative, 1.0, token, "positive term negated");
                } else if intensified {
                    tally.add(Polarity::Positive, 2.0, token, "positive term intensified");
                } else {
                    tally.add(Polarity::Positive, 1.0, token, "positive term");
                }
            } else if self.lexicon.is_negative(token) {
                if negated {
                    tally.add(
                        Polarity::Positive,
                        NEGATED_NEGATIVE_WEIGHT,
                        token,
                        "negative term negated",
                    );
                } else if intensified {
                    tally.add(Polarity::Negative, 2.0, token, "negative term intensified");
                } else {
                    tally.add(Polarity::Negative, 1.0, token, "negative term");
                }
            }

            negation_left = negation_left.saturating_sub(1);
            intensifier_left = intensifier_left.saturating_sub(1);
        }
    }

    /// Count topic-lexicon occurrences over the full text. Unknown topics
    /// contribute nothing.
    fn scan_topic(&self, text: &str, topic: &str, tally: &mut Tally) {
        let Some(topic_lexicon) = self.lexicon.topic(topic) else {
            return;
        };

        for token in tokenize(text) {
            if topic_lexicon.positive.contains(token) {
                tally.add(Polarity::Positive, TOPIC_WEIGHT, token, "topic term");
            } else if topic_lexicon.negative.contains(token) {
                tally.add(Polarity::Negative, TOPIC_WEIGHT, token, "topic term");
            }
        }
    }

    /// Count global-lexicon occurrences in the title alone.
    fn scan_headline(&self, title: &str, tally: &mut Tally) {
        for token in tokenize(title) {
            if self.lexicon.is_positive(token) {
                tally.add(Polarity::Positive, HEADLINE_WEIGHT, token, "headline term");
            } else if self.lexicon.is_negative(token) {
                tally.add(Polarity::Negative, HEADLINE_WEIGHT, token, "headline term");
            }
        }
    }
}

// ============================================================================
// Text Helpers
// ============================================================================

/// Split text into trimmed, non-empty sentences on `.`, `!`, `?`.
/// Consecutive delimiters collapse because empty fragments are dropped.
fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Whitespace tokenization with non-word/apostrophe characters stripped
/// from token edges. Interior punctuation (hyphens, apostrophes) survives.
fn tokenize(sentence: &str) -> impl Iterator<Item = &str> {
    sentence
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !(c.is_alphanumeric() || c == '\'')))
        .filter(|t| !t.is_empty())
}

/// Assemble the explanation: a templated label sentence plus up to
/// [`MAX_REASONS`] reasons per polarity. A side with no matches is omitted.
fn build_explanation(label: SentimentLabel, matches: &[SentimentMatch]) -> String {
    let mut explanation = match label {
        SentimentLabel::Positive => String::from("This article leans positive."),
        SentimentLabel::Neutral => String::from("This article reads neutral."),
        SentimentLabel::Negative => String::from("This article leans negative."),
    };

    let side = |polarity: Polarity| -> Vec<String> {
        matches
            .iter()
            .filter(|m| m.polarity == polarity)
            .take(MAX_REASONS)
            .map(|m| format!("\"{}\" ({})", m.excerpt, m.reason))
            .collect()
    };

    let positive = side(Polarity::Positive);
    if !positive.is_empty() {
        explanation.push_str(" Positive signals: ");
        explanation.push_str(&positive.join("; "));
        explanation.push('.');
    }

    let negative = side(Polarity::Negative);
    if !negative.is_empty() {
        explanation.push_str(" Negative signals: ");
        explanation.push_str(&negative.join("; "));
        explanation.push('.');
    }

    explanation
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn classify(title: &str, body: &str, topic: &str) -> Classification {
        Classifier::default().classify(title, body, topic)
    }

    fn repeat(word: &str, n: usize) -> String {
        vec![word; n].join(" ")
    }

    #[test]
    fn test_empty_input_is_neutral() {
        let result = classify("", "", "any");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, NEUTRAL_SCORE);
        assert_eq!(result.explanation, "This article reads neutral.");
    }

    #[test]
    fn test_score_stays_in_bounds() {
        let inputs = [
            ("", "", ""),
            ("good good good", "great win success", "Business"),
            ("crisis", "bad terrible failure loss", "Technology"),
            ("not good", "very bad, hardly great!", "Sports"),
            ("Mixed outlook", "gain and loss. risk and benefit.", "Science"),
        ];
        for (title, body, topic) in inputs {
            let result = classify(title, body, topic);
            assert!(
                (0.0..=1.0).contains(&result.score),
                "score {} out of bounds for {:?}",
                result.score,
                (title, body, topic)
            );
        }
    }

    #[test]
    fn test_positive_text_scores_positive() {
        let result = classify("", "a great success and a clear win", "");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_negative_text_scores_negative() {
        let result = classify("", "a terrible crisis and a painful loss", "");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_monotonic_in_positive_occurrences() {
        let base = classify("", "good but bad", "");
        let more = classify("", "good good but bad", "");
        assert!(more.score >= base.score);

        // Already saturated at 1.0: adding more must not decrease it.
        let saturated = classify("", "good", "");
        let still = classify("", "good good", "");
        assert!(still.score >= saturated.score);
    }

    #[test]
    fn test_negation_inverts_polarity() {
        let plain = classify("", "good", "");
        let negated = classify("", "not good", "");
        assert!(negated.score < plain.score);
        assert_eq!(negated.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_negated_negative_is_weak_positive() {
        // "not bad" credits 0.5 to positive, so it alone scores 1.0,
        // but against one real negative it is outweighed.
        let result = classify("", "not bad", "");
        assert_eq!(result.label, SentimentLabel::Positive);

        let outweighed = classify("", "not bad. crisis", "");
        assert!(outweighed.score < 0.5);
    }

    #[test]
    fn test_intensifier_amplifies() {
        // One balancing negative word keeps the ratio away from saturation.
        let plain = classify("", "good. bad", "");
        let intensified = classify("", "very good. bad", "");
        assert!(intensified.score > plain.score);
    }

    #[test]
    fn test_negation_window_expires_after_three_tokens() {
        // "good" is the third token after "not": still negated.
        let in_window = classify("", "not a thing good", "");
        assert_eq!(in_window.label, SentimentLabel::Negative);

        // Fourth token after "not": the window has expired.
        let expired = classify("", "not a thing here good", "");
        assert_eq!(expired.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_intensifier_window_expires_after_two_tokens() {
        let in_window = classify("", "very nice good. bad", "");
        assert_eq!(in_window.score, 2.0 / 3.0);

        let expired = classify("", "very nice day good. bad", "");
        assert_eq!(expired.score, 0.5);
    }

    #[test]
    fn test_modifier_state_resets_at_sentence_boundary() {
        let result = classify("", "this is not. good", "");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_retriggered_negator_refreshes_window() {
        // Second "not" resets the countdown, so "good" is still negated.
        let result = classify("", "not so not so good", "");
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_headline_words_weigh_more() {
        // Same words overall; the title placement tips the balance.
        let body_only = classify("", "good bad", "");
        let in_title = classify("good", "bad", "");
        assert_eq!(body_only.score, 0.5);
        assert!(in_title.score > body_only.score);
        assert_eq!(in_title.score, 0.75);
    }

    #[test]
    fn test_topic_lexicon_applies_only_to_matching_topic() {
        // "innovative" is a Technology-only term.
        let matched = classify("", "an innovative product", "Technology");
        assert!(matched.score > 0.5);
        assert_eq!(matched.label, SentimentLabel::Positive);

        let unmatched = classify("", "an innovative product", "Business");
        assert_eq!(unmatched.score, NEUTRAL_SCORE);
        assert_eq!(unmatched.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_unknown_topic_contributes_nothing() {
        let known = classify("", "good. outage", "Technology");
        let unknown = classify("", "good. outage", "Gardening");
        assert!(known.score < unknown.score);
        assert_eq!(unknown.score, 1.0);
    }

    #[test]
    fn test_topic_hits_ignore_negation_context() {
        // The topic pass runs without modifier context: "not outage" still
        // counts as a negative topic hit.
        let result = classify("", "not outage", "Technology");
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_idempotent() {
        let a = classify("Markets improve", "strong growth, no crisis", "Business");
        let b = classify("Markets improve", "strong growth, no crisis", "Business");
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_exactly_at_positive_threshold() {
        // positive: 33 plain + 0.5 negated-negative = 33.5
        // negative: 15 plain + 1.5 topic = 16.5
        // score: 33.5 / 50 = 0.67 exactly
        let body = format!("not bad. {}. {} outage", repeat("good", 33), repeat("bad", 15));
        let result = classify("", &body, "Technology");
        assert_eq!(result.score, 0.67);
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_score_exactly_at_negative_threshold() {
        // positive: 16 plain + 0.5 negated-negative = 16.5
        // negative: 32 plain + 1.5 topic = 33.5
        // score: 16.5 / 50 = 0.33 exactly
        let body = format!("not bad. {}. {} outage", repeat("good", 16), repeat("bad", 32));
        let result = classify("", &body, "Technology");
        assert_eq!(result.score, 0.33);
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test_case(1.0 => SentimentLabel::Positive)]
    #[test_case(0.67 => SentimentLabel::Positive)]
    #[test_case(0.66 => SentimentLabel::Neutral)]
    #[test_case(0.5 => SentimentLabel::Neutral)]
    #[test_case(0.34 => SentimentLabel::Neutral)]
    #[test_case(0.33 => SentimentLabel::Negative)]
    #[test_case(0.0 => SentimentLabel::Negative)]
    fn test_label_thresholds(score: f64) -> SentimentLabel {
        SentimentLabel::from_score(score)
    }

    #[test]
    fn test_tokenizer_strips_edge_punctuation() {
        let result = classify("", "\"good,\" they said -- (great!)", "");
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_tokenizer_keeps_apostrophes() {
        // "don't" must survive tokenization to act as a negator.
        let result = classify("", "don't expect a good outcome", "");
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_explanation_names_signals() {
        let result = classify("", "not good, and a real crisis", "");
        assert!(result.explanation.starts_with("This article leans negative."));
        assert!(result.explanation.contains("positive term negated"));
        assert!(result.explanation.contains("\"crisis\" (negative term)"));
        // Nothing counted toward the positive side, so it is omitted.
        assert!(!result.explanation.contains("Positive signals"));
    }

    #[test]
    fn test_explanation_caps_reasons_per_side() {
        let body = repeat("crisis", 10);
        let result = classify("", &body, "");
        assert_eq!(result.explanation.matches("\"crisis\"").count(), MAX_REASONS);
    }

    #[test]
    fn test_label_serializes_lowercase() {
        let json = serde_json::to_string(&SentimentLabel::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        let back: SentimentLabel = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(back, SentimentLabel::Negative);
    }
}
