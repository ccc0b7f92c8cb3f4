// src/analyze/ranker.rs
//! Ranker: order scored candidates and keep the top K.
//!
//! - Descending by score.
//! - Exact ties keep input order (`sort_by` is stable).
//! - Fewer than K candidates → all of them; never padded.

use serde::Serialize;
use std::cmp::Ordering;

use crate::candidate::Candidate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: f32,
    /// Position in the input list.
    pub index: usize,
    /// 1-based position in the ranked output; 0 until ranked.
    pub rank: usize,
}

impl ScoredCandidate {
    pub fn new(candidate: Candidate, index: usize, score: f32) -> Self {
        Self {
            candidate,
            score,
            index,
            rank: 0,
        }
    }
}

/// Sort descending by score, truncate to `top_k`, and stamp 1-based ranks.
/// Scores are expected to be finite; NaN compares as equal and keeps input order.
pub fn rank_top_k(mut items: Vec<ScoredCandidate>, top_k: usize) -> Vec<ScoredCandidate> {
    items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    items.truncate(top_k);
    for (i, it) in items.iter_mut().enumerate() {
        it.rank = i + 1;
    }
    items
}
