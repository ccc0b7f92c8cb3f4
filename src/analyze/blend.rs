//! Single-best selection: blend a funding signal with a keyword-frequency signal.
//!
//! 1) budget_score    : min-max of valid amounts (>= 0). Invalid/absent → 0.0 and
//!                      excluded from the min/max basis.
//! 2) frequency_score : min-max of case-sensitive, non-overlapping keyword counts in
//!                      the candidate's content text (content, else goal, else summary).
//! 3) total_score     : weighted sum (default 0.6 / 0.4).
//! 4) selection       : highest total; exact ties keep the earliest input position.
//!
//! A degenerate range (max == min) scores every member of the basis 1.0.

use serde::Serialize;

use super::weights::BlendWeights;
use crate::candidate::Candidate;
use crate::error::{RankError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Position in the input list.
    pub index: usize,
    pub budget_score: f32,
    pub frequency_score: f32,
    pub total_score: f32,
}

/// Case-sensitive, non-overlapping occurrences of `keyword` in `text`.
pub fn keyword_count(text: &str, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    text.matches(keyword).count()
}

/// Min-max normalize. `None` entries score 0.0 and do not shape the range.
pub fn min_max(values: &[Option<f64>]) -> Vec<f32> {
    let valid = values.iter().flatten().copied();
    let (lo, hi) = valid.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    values
        .iter()
        .map(|v| match v {
            None => 0.0,
            Some(_) if hi <= lo => 1.0,
            Some(x) => ((x - lo) / (hi - lo)).clamp(0.0, 1.0) as f32,
        })
        .collect()
}

fn content_text(c: &Candidate) -> &str {
    [&c.content, &c.goal, &c.summary]
        .into_iter()
        .find_map(|f| f.as_deref().filter(|s| !s.trim().is_empty()))
        .unwrap_or_default()
}

/// Score every candidate. Empty input → empty output.
pub fn blend(
    candidates: &[Candidate],
    keyword: &str,
    weights: &BlendWeights,
) -> Result<Vec<BlendedCandidate>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }
    if keyword.trim().is_empty() {
        return Err(RankError::InvalidInput("keyword must not be blank".into()));
    }
    weights.validate()?;

    let amounts: Vec<Option<f64>> = candidates.iter().map(Candidate::valid_amount).collect();
    let counts: Vec<Option<f64>> = candidates
        .iter()
        .map(|c| Some(keyword_count(content_text(c), keyword) as f64))
        .collect();

    let budget = min_max(&amounts);
    let frequency = min_max(&counts);

    Ok(candidates
        .iter()
        .enumerate()
        .map(|(index, c)| BlendedCandidate {
            candidate: c.clone(),
            index,
            budget_score: budget[index],
            frequency_score: frequency[index],
            total_score: weights.total(budget[index], frequency[index]),
        })
        .collect())
}

/// Pick the single best candidate, or `None` when there are no candidates.
pub fn select_best(
    candidates: &[Candidate],
    keyword: &str,
    weights: &BlendWeights,
) -> Result<Option<BlendedCandidate>> {
    let mut best: Option<BlendedCandidate> = None;
    for b in blend(candidates, keyword, weights)? {
        let better = best
            .as_ref()
            .map_or(true, |cur| b.total_score > cur.total_score);
        if better {
            best = Some(b);
        }
    }
    Ok(best)
}
