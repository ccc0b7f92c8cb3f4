// src/ingest/types.rs
use anyhow::Result;

use crate::candidate::Candidate;

/// Anything that can hand over a fresh batch of candidate records.
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Candidate>>;
    fn name(&self) -> &'static str;
}
