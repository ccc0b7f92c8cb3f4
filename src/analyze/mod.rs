// src/analyze/mod.rs
//! Ranking pipeline entry: normalize → score → rank (or blend → select).
//!
//! The engine owns no model state of its own. It receives an already-initialized
//! `Scorer` (dependency injection); loading and disposing the backend is the
//! caller's job. All methods take `&self` and share nothing mutable, so one engine
//! serves concurrent requests.

pub mod blend;
pub mod debug;
pub mod lexical;
pub mod normalize;
pub mod ranker;
pub mod scoring;
pub mod semantic;
pub mod weights;

use metrics::{counter, histogram};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::candidate::Candidate;
use crate::error::{RankError, Result};

// Re-export convenient types.
pub use crate::analyze::blend::{select_best, BlendedCandidate};
pub use crate::analyze::lexical::LexicalScorer;
pub use crate::analyze::normalize::{Field, FieldPolicy};
pub use crate::analyze::ranker::{rank_top_k, ScoredCandidate};
pub use crate::analyze::scoring::{Scorer, Strategy};
pub use crate::analyze::semantic::{Embedder, SemanticScorer};
pub use crate::analyze::weights::BlendWeights;

pub const DEFAULT_TOP_K: usize = 5;

/// One ranking request as received from a caller.
#[derive(Debug, Clone, Deserialize)]
pub struct RankRequest {
    pub topic: String,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// `None` ranks `DEFAULT_TOP_K` candidates.
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Clone)]
pub struct RankingEngine {
    scorer: Arc<dyn Scorer>,
    policy: FieldPolicy,
    weights: BlendWeights,
}

impl RankingEngine {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            scorer,
            policy: FieldPolicy::default(),
            weights: BlendWeights::default(),
        }
    }

    /// Lexical engine with default policy; needs no backend.
    pub fn lexical() -> Self {
        Self::new(Arc::new(LexicalScorer::new()))
    }

    pub fn with_policy(mut self, policy: FieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_weights(mut self, weights: BlendWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.scorer.strategy()
    }

    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    pub fn weights(&self) -> &BlendWeights {
        &self.weights
    }

    /// Rank `candidates` against `topic` and keep the best `top_k`.
    ///
    /// Empty candidates → `Ok(vec![])` regardless of topic/top_k. Otherwise a
    /// blank topic or `top_k == 0` is `InvalidInput`, and backend errors are
    /// returned as-is; no fallback ordering is ever substituted.
    pub fn rank(
        &self,
        topic: &str,
        candidates: &[Candidate],
        top_k: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        counter!("ranking_requests_total").increment(1);

        let result = self.rank_non_empty(topic, candidates, top_k);
        if let Err(e) = &result {
            counter!("ranking_failures_total", "kind" => e.kind()).increment(1);
            tracing::warn!(
                target: "ranking",
                id = %debug::anon_hash(topic),
                kind = e.kind(),
                retryable = e.is_retryable(),
                error = %e,
                "ranking failed"
            );
        }
        result
    }

    fn rank_non_empty(
        &self,
        topic: &str,
        candidates: &[Candidate],
        top_k: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        if topic.trim().is_empty() {
            return Err(RankError::InvalidInput("topic must not be blank".into()));
        }
        if top_k == 0 {
            return Err(RankError::InvalidInput("top_k must be at least 1".into()));
        }

        let t0 = Instant::now();
        let texts = self.policy.normalize_all(candidates);
        let raw = self.scorer.score(topic, &texts)?;
        let scores = scoring::validate_scores(texts.len(), raw)?;

        let scored = candidates
            .iter()
            .cloned()
            .zip(scores)
            .enumerate()
            .map(|(i, (c, s))| ScoredCandidate::new(c, i, s))
            .collect();
        let ranked = rank_top_k(scored, top_k);

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ranking_duration_ms").record(ms);
        counter!("ranking_candidates_total").increment(candidates.len() as u64);
        debug::log_ranked(topic, self.strategy(), candidates.len(), &ranked, ms);

        Ok(ranked)
    }

    pub fn rank_request(&self, req: &RankRequest) -> Result<Vec<ScoredCandidate>> {
        self.rank(&req.topic, &req.candidates, req.top_k.unwrap_or(DEFAULT_TOP_K))
    }

    /// Single-best mode using the engine's blend weights.
    pub fn select_best(
        &self,
        candidates: &[Candidate],
        keyword: &str,
    ) -> Result<Option<BlendedCandidate>> {
        blend::select_best(candidates, keyword, &self.weights)
    }
}

/// Build the scorer for `strategy`. `model` is only used by the semantic strategy.
///
/// Semantic without the `semantic` feature, or a model that fails to load, is
/// `BackendUnavailable`; the caller decides whether to fall back to lexical.
pub fn build_scorer(strategy: Strategy, model: &str) -> Result<Arc<dyn Scorer>> {
    match strategy {
        Strategy::Lexical => Ok(Arc::new(LexicalScorer::new())),
        Strategy::Semantic => build_semantic(model),
    }
}

#[cfg(feature = "semantic")]
fn build_semantic(model: &str) -> Result<Arc<dyn Scorer>> {
    let embedder = semantic::FastEmbedder::new(model)?;
    Ok(Arc::new(SemanticScorer::new(embedder)))
}

#[cfg(not(feature = "semantic"))]
fn build_semantic(model: &str) -> Result<Arc<dyn Scorer>> {
    Err(RankError::BackendUnavailable(format!(
        "embedding model `{model}` requested but built without the `semantic` feature"
    )))
}
