//! Lexical scorer: TF-IDF cosine over a vocabulary built fresh per request.
//!
//! Corpus = {topic} ∪ {candidate texts}. Weighting:
//! - lowercase, tokens are runs of >= 2 Unicode word chars (`(?u)\b\w\w+\b`);
//! - tf = raw count in the document;
//! - idf = ln((1 + n) / (1 + df)) + 1   (smoothed, never zero);
//! - score = cosine(topic vector, candidate vector), in [0, 1].
//!
//! Vocabulary and term vectors live in `BTreeMap`s so iteration order, and thus
//! floating-point accumulation order, is identical across runs.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::scoring::{Scorer, Strategy};
use crate::error::Result;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("tokenizer regex"));

/// Lowercased tokens in order of appearance.
pub fn tokenize(input: &str) -> Vec<String> {
    let lowered = input.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn term_counts(text: &str) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for tok in tokenize(text) {
        *counts.entry(tok).or_insert(0) += 1;
    }
    counts
}

type TermVector = BTreeMap<String, f64>;

/// Stateless TF-IDF scorer. Cheap to clone and share.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer;

impl LexicalScorer {
    pub fn new() -> Self {
        Self
    }

    /// Build weighted vectors for every document; index 0 is the topic.
    fn vectorize(docs: &[&str]) -> Vec<TermVector> {
        let counts: Vec<BTreeMap<String, u32>> = docs.iter().map(|d| term_counts(d)).collect();

        let mut df: BTreeMap<&str, u32> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = docs.len() as f64;
        let idf: BTreeMap<&str, f64> = df
            .iter()
            .map(|(t, &d)| (*t, ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0))
            .collect();

        counts
            .iter()
            .map(|doc| {
                doc.iter()
                    .map(|(t, &tf)| {
                        let w = tf as f64 * idf.get(t.as_str()).copied().unwrap_or(1.0);
                        (t.clone(), w)
                    })
                    .collect()
            })
            .collect()
    }

    fn cosine_sparse(a: &TermVector, b: &TermVector) -> f64 {
        let norm = |v: &TermVector| v.values().map(|w| w * w).sum::<f64>().sqrt();
        let (na, nb) = (norm(a), norm(b));
        if na == 0.0 || nb == 0.0 {
            return 0.0;
        }
        let dot: f64 = a
            .iter()
            .filter_map(|(t, wa)| b.get(t).map(|wb| wa * wb))
            .sum();
        (dot / (na * nb)).clamp(0.0, 1.0)
    }
}

impl Scorer for LexicalScorer {
    fn score(&self, topic: &str, texts: &[String]) -> Result<Vec<f32>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut docs: Vec<&str> = Vec::with_capacity(texts.len() + 1);
        docs.push(topic);
        docs.extend(texts.iter().map(String::as_str));

        let vectors = Self::vectorize(&docs);
        let Some((topic_vec, rest)) = vectors.split_first() else {
            return Ok(vec![0.0; texts.len()]);
        };
        Ok(rest
            .iter()
            .map(|v| Self::cosine_sparse(topic_vec, v) as f32)
            .collect())
    }

    fn strategy(&self) -> Strategy {
        Strategy::Lexical
    }
}
