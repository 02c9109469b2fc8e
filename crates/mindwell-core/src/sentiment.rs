//! Text sentiment scoring.
//!
//! A small lexicon-based scorer in the spirit of pattern-style polarity
//! analyzers: known words carry a polarity, a preceding negation flips and
//! dampens it, a preceding intensifier scales it, and the result is the mean
//! over the polar words found.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scores at or above this are positive; at or below the negation are negative.
const LABEL_THRESHOLD: f32 = 0.1;

/// Multiplier applied to a word's polarity after a negation.
const NEGATION_FACTOR: f32 = -0.5;

/// Maps free text to a polarity in [-1, 1].
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f32;
}

/// Coarse bucket for a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f32) -> Self {
        if score >= LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

static POLARITY: &[(&str, f32)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("bad", -0.7),
    ("better", 0.5),
    ("calm", 0.3),
    ("confident", 0.5),
    ("depressed", -0.8),
    ("awful", -1.0),
    ("excited", 0.4),
    ("exhausted", -0.4),
    ("fine", 0.4),
    ("glad", 0.5),
    ("good", 0.7),
    ("grateful", 0.6),
    ("great", 0.8),
    ("happy", 0.8),
    ("hate", -0.8),
    ("hopeful", 0.5),
    ("hopeless", -0.8),
    ("horrible", -1.0),
    ("hurt", -0.5),
    ("lonely", -0.5),
    ("love", 0.5),
    ("miserable", -1.0),
    ("nervous", -0.3),
    ("nice", 0.6),
    ("okay", 0.2),
    ("overwhelmed", -0.5),
    ("peaceful", 0.5),
    ("proud", 0.8),
    ("relaxed", 0.4),
    ("sad", -0.5),
    ("scared", -0.5),
    ("stressed", -0.5),
    ("terrible", -1.0),
    ("tired", -0.4),
    ("upset", -0.5),
    ("angry", -0.5),
    ("anxious", -0.4),
    ("wonderful", 1.0),
    ("worried", -0.4),
    ("worse", -0.4),
    ("worst", -1.0),
];

static INTENSIFIERS: &[(&str, f32)] = &[
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("really", 1.3),
    ("so", 1.3),
    ("very", 1.3),
    ("quite", 1.1),
    ("slightly", 0.5),
    ("somewhat", 0.7),
];

static NEGATIONS: &[&str] = &["not", "no", "never", "hardly", "isn't", "don't", "didn't", "can't", "won't", "wasn't"];

/// Word-polarity scorer with negation and intensifier handling.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    fn polarity(word: &str) -> Option<f32> {
        POLARITY.iter().find(|(w, _)| *w == word).map(|(_, p)| *p)
    }

    fn intensity(word: &str) -> Option<f32> {
        INTENSIFIERS.iter().find(|(w, _)| *w == word).map(|(_, m)| *m)
    }

    fn is_negation(word: &str) -> bool {
        NEGATIONS.contains(&word) || word.ends_with("n't")
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f32 {
        let words = text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase());

        let mut total = 0.0f32;
        let mut count = 0usize;
        let mut modifier = 1.0f32;

        for word in words {
            if Self::is_negation(&word) {
                modifier *= NEGATION_FACTOR;
            } else if let Some(m) = Self::intensity(&word) {
                modifier *= m;
            } else if let Some(p) = Self::polarity(&word) {
                total += (p * modifier).clamp(-1.0, 1.0);
                count += 1;
                modifier = 1.0;
            } else {
                // modifiers only reach the next word
                modifier = 1.0;
            }
        }

        if count == 0 {
            return 0.0;
        }
        (total / count as f32).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_text_scores_zero() {
        assert_eq!(LexiconScorer.score("I went to the shop"), 0.0);
        assert_eq!(LexiconScorer.score(""), 0.0);
    }

    #[test]
    fn test_positive_and_negative() {
        assert!(LexiconScorer.score("I feel happy today") > 0.5);
        assert!(LexiconScorer.score("I feel sad and anxious") < 0.0);
    }

    #[test]
    fn test_negation_flips_and_dampens() {
        let plain = LexiconScorer.score("good");
        let negated = LexiconScorer.score("not good");
        assert!(negated < 0.0);
        assert!((negated - plain * NEGATION_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_intensifier_scales() {
        assert!(LexiconScorer.score("very sad") < LexiconScorer.score("sad"));
        assert_eq!(LexiconScorer.score("extremely wonderful"), 1.0);
    }

    #[test]
    fn test_modifier_does_not_carry_past_neutral_word() {
        assert_eq!(LexiconScorer.score("not today, happy"), LexiconScorer.score("happy"));
    }

    #[test]
    fn test_score_is_bounded() {
        let score = LexiconScorer.score("terrible horrible awful worst miserable");
        assert!((-1.0..=1.0).contains(&score));
    }

    #[test]
    fn test_labels() {
        assert_eq!(SentimentLabel::from_score(0.5), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.05), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.1), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::Negative.to_string(), "negative");
    }
}
