//! Similarity scoring seam.
//!
//! A `Scorer` maps `(topic, normalized texts)` to one similarity per text, same
//! order as the input. Two strategies implement it:
//! - `Lexical`  : TF-IDF cosine over a per-request vocabulary (`lexical.rs`);
//! - `Semantic` : dense sentence embeddings + cosine (`semantic.rs`).
//!
//! Implementations must be `Send + Sync`: one instance is built at startup and
//! shared by every request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RankError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Lexical,
    Semantic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Lexical => f.write_str("lexical"),
            Strategy::Semantic => f.write_str("semantic"),
        }
    }
}

impl FromStr for Strategy {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" | "tfidf" | "tf-idf" => Ok(Strategy::Lexical),
            "semantic" | "embedding" => Ok(Strategy::Semantic),
            other => Err(RankError::InvalidInput(format!(
                "unknown scoring strategy `{other}`"
            ))),
        }
    }
}

pub trait Scorer: Send + Sync {
    /// Score every text against `topic`. `topic` is non-blank (checked by the engine);
    /// `texts` is non-empty. Returns exactly `texts.len()` scores.
    fn score(&self, topic: &str, texts: &[String]) -> Result<Vec<f32>>;

    fn strategy(&self) -> Strategy;
}

/// Cosine similarity of two dense vectors. Zero vectors score 0.0.
/// Accumulates in f64 and clamps into [-1, 1] to absorb rounding.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0) as f32
}

/// Reject backend output that cannot be ranked: wrong length or non-finite values.
pub fn validate_scores(expected: usize, scores: Vec<f32>) -> Result<Vec<f32>> {
    if scores.len() != expected {
        return Err(RankError::ScoringFailure(format!(
            "backend returned {} scores for {} candidates",
            scores.len(),
            expected
        )));
    }
    if let Some(pos) = scores.iter().position(|s| !s.is_finite()) {
        return Err(RankError::ScoringFailure(format!(
            "non-finite score at position {pos}"
        )));
    }
    Ok(scores)
}
