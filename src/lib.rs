// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod candidate;
pub mod config;
pub mod error;
pub mod metrics;

// Ranking pipeline (normalize, score, blend, rank, debug)
pub mod analyze;

// Upstream collectors (NTIS) + ingest pipeline
pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{build_scorer, RankRequest, RankingEngine, ScoredCandidate, Strategy};
pub use crate::api::router;
pub use crate::candidate::{Candidate, Keywords};
pub use crate::error::{RankError, Result};

use std::sync::Arc;

use crate::analyze::Scorer;
use crate::config::RankingConfig;

/// Build the scorer the config asks for. When the semantic backend cannot load and
/// `fallback_to_lexical` is set, log it and serve lexical instead; otherwise the
/// load error is returned.
pub fn scorer_from_config(cfg: &RankingConfig) -> Result<Arc<dyn Scorer>> {
    match build_scorer(cfg.ranking.strategy, &cfg.semantic.model) {
        Ok(s) => Ok(s),
        Err(e @ RankError::BackendUnavailable(_)) if cfg.ranking.fallback_to_lexical => {
            tracing::warn!(error = %e, model = %cfg.semantic.model, "semantic backend unavailable, using lexical");
            build_scorer(Strategy::Lexical, "")
        }
        Err(e) => Err(e),
    }
}

/// Engine wired from a loaded config: scorer, field policy and blend weights.
pub fn engine_from_config(cfg: &RankingConfig) -> Result<RankingEngine> {
    Ok(RankingEngine::new(scorer_from_config(cfg)?)
        .with_policy(cfg.field_policy())
        .with_weights(cfg.blend))
}
