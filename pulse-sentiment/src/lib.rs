//! Pulse Sentiment - Rule-based sentiment classification for news articles.
//!
//! This crate implements a deterministic, lexicon-driven text classifier:
//! article text is split into sentences and tokens, scanned with a short
//! negation/intensifier context window, and scored against weighted
//! positive/negative word lists (with per-topic overrides). The result is a
//! normalized score in `[0, 1]`, a label, and a human-readable explanation
//! that traces back to literal lexicon hits.
//!
//! The classifier is pure and stateless: it performs no I/O, never fails,
//! and may be called concurrently from any number of ingestion workers.
//!
//! # Example
//!
//! ```
//! use pulse_sentiment::{Classifier, SentimentLabel};
//!
//! let classifier = Classifier::default();
//! let result = classifier.classify("Breakthrough in renewable energy", "", "Science");
//! assert_eq!(result.label, SentimentLabel::Positive);
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod classifier;
pub mod lexicon;

pub use classifier::{Classification, Classifier, Polarity, SentimentLabel, SentimentMatch};
pub use lexicon::{SentimentLexicon, TopicLexicon};
