//! Lightweight sentiment classifier backed by a keyword lexicon
//!
//! Needs no download, so it serves offline runs, tests and benchmarks.
//! Labels match the SST-2 model (`POSITIVE` / `NEGATIVE`).

use crate::classifier::{top_k, Classifier};
use aho_corasick::{AhoCorasick, MatchKind};
use sentiserve_core::{Error, LabelScore, Result};

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "love",
    "loved",
    "amazing",
    "wonderful",
    "happy",
    "fantastic",
    "awesome",
    "best",
    "like",
    "enjoy",
    "enjoyed",
    "nice",
    "perfect",
    "recommend",
    "beautiful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "hate",
    "hated",
    "horrible",
    "worst",
    "sad",
    "angry",
    "disappointed",
    "disappointing",
    "poor",
    "boring",
    "broken",
    "useless",
    "waste",
    "rude",
];

pub struct LexiconClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
    top_k: usize,
}

impl LexiconClassifier {
    pub fn new(top_k: usize) -> Result<Self> {
        Self::with_name("sentiment-lexicon", top_k)
    }

    pub fn with_name(name: impl Into<String>, top_k: usize) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            positive: build_matcher(POSITIVE_WORDS, "positive")?,
            negative: build_matcher(NEGATIVE_WORDS, "negative")?,
            top_k,
        })
    }

    /// Probability of the positive class; 0.5 when no keyword matches
    pub fn positive_probability(&self, text: &str) -> f32 {
        let positive_hits = count_words(&self.positive, text) as f32;
        let negative_hits = count_words(&self.negative, text) as f32;
        let total = positive_hits + negative_hits;

        if total == 0.0 {
            0.5
        } else {
            positive_hits / total
        }
    }
}

impl Classifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        let score = self.positive_probability(text);

        // Ties go to POSITIVE, which sorts first among equal scores.
        let scores = vec![
            LabelScore::new("POSITIVE", score),
            LabelScore::new("NEGATIVE", 1.0 - score),
        ];
        Ok(top_k(scores, self.top_k))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn build_matcher(words: &[&str], which: &str) -> Result<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(words)
        .map_err(|e| {
            Error::initialization(format!("Failed to build {which} sentiment matcher: {e}"))
        })
}

/// Count matches that sit on word boundaries, so "glove" does not count as "love"
fn count_words(matcher: &AhoCorasick, text: &str) -> usize {
    let bytes = text.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';

    matcher
        .find_iter(text)
        .filter(|m| {
            let before = m.start() == 0 || !is_word(bytes[m.start() - 1]);
            let after = m.end() == bytes.len() || !is_word(bytes[m.end()]);
            before && after
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let classifier = LexiconClassifier::new(1).unwrap();
        let result = classifier.classify("I love this").unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, "POSITIVE");
        assert!(result[0].score > 0.5);
    }

    #[test]
    fn test_negative_text() {
        let classifier = LexiconClassifier::new(1).unwrap();
        let result = classifier
            .classify("This is the WORST experience, truly awful.")
            .unwrap();

        assert_eq!(result[0].label, "NEGATIVE");
        assert_eq!(result[0].score, 1.0);
    }

    #[test]
    fn test_mixed_text_returns_all_labels() {
        let classifier = LexiconClassifier::new(0).unwrap();
        let result = classifier
            .classify("Great food, great view, but a rude waiter")
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].label, "POSITIVE");
        assert!((result[0].score - 2.0 / 3.0).abs() < 1e-6);
        assert!((result[0].score + result[1].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_word_boundaries() {
        let classifier = LexiconClassifier::new(1).unwrap();
        assert_eq!(classifier.positive_probability("a glove and a badge"), 0.5);
        assert_eq!(classifier.positive_probability("Bad."), 0.0);
    }
}
