//! Diagnostics helpers for the ranking pipeline.
//!
//! Raw topic text never reaches the logs: requests are identified by a short
//! SHA-256 prefix. Per-candidate detail is only logged in dev (see
//! `dev_logging_enabled`).

use tracing::{debug, info};

use super::ranker::ScoredCandidate;
use super::scoring::Strategy;

/// Dev logging gate: RANKING_DEV_LOG=1 AND dev env (debug build or SHUTTLE_ENV in {local,development,dev}).
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var("RANKING_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// First 6 bytes of SHA-256 as hex: stable, short, not reversible.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub(crate) fn log_ranked(
    topic: &str,
    strategy: Strategy,
    candidates: usize,
    ranked: &[ScoredCandidate],
    elapsed_ms: f64,
) {
    let id = anon_hash(topic);
    let top_score = ranked.first().map(|r| r.score).unwrap_or(0.0);
    info!(
        target: "ranking",
        %id, %strategy, candidates, returned = ranked.len(), top_score, elapsed_ms,
        "ranked candidates"
    );

    if !dev_logging_enabled() {
        return;
    }
    let detail: Vec<String> = ranked
        .iter()
        .take(5)
        .map(|r| format!("#{}@{}={:.3}", r.rank, r.index, r.score))
        .collect();
    debug!(target: "ranking", %id, top = ?detail, "ranking detail");
}
