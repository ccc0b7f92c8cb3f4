// src/config/ranking.rs
//! Ranking configuration (`config/ranking.toml`).
//!
//! Resolution order:
//! 1) `$RANKING_CONFIG_PATH`, else `config/ranking.toml`; a missing file → defaults
//! 2) `RANKING_TOP_K` / `RANKING_STRATEGY` env overrides (invalid values ignored)
//! 3) validation

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyze::{BlendWeights, Field, FieldPolicy, Strategy, DEFAULT_TOP_K};
use crate::analyze::normalize::DEFAULT_FIELDS;

// --- env defaults & names ---
pub const DEFAULT_RANKING_CONFIG_PATH: &str = "config/ranking.toml";
pub const DEFAULT_SEMANTIC_MODEL: &str = "multilingual-e5-small";

pub const ENV_RANKING_CONFIG_PATH: &str = "RANKING_CONFIG_PATH";
pub const ENV_RANKING_TOP_K: &str = "RANKING_TOP_K";
pub const ENV_RANKING_STRATEGY: &str = "RANKING_STRATEGY";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankingConfig {
    #[serde(default)]
    pub ranking: RankingSection,
    #[serde(default)]
    pub normalizer: NormalizerSection,
    #[serde(default)]
    pub blend: BlendWeights,
    #[serde(default)]
    pub semantic: SemanticSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankingSection {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_true")]
    pub fallback_to_lexical: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NormalizerSection {
    #[serde(default = "default_fields")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SemanticSection {
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
fn default_true() -> bool {
    true
}
fn default_fields() -> Vec<Field> {
    DEFAULT_FIELDS.to_vec()
}
fn default_model() -> String {
    DEFAULT_SEMANTIC_MODEL.to_string()
}

impl Default for RankingSection {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            strategy: Strategy::default(),
            fallback_to_lexical: true,
        }
    }
}

impl Default for NormalizerSection {
    fn default() -> Self {
        Self {
            fields: default_fields(),
        }
    }
}

impl Default for SemanticSection {
    fn default() -> Self {
        Self {
            model: default_model(),
        }
    }
}

// positive integer or nothing
fn parse_top_k_env(raw: Option<String>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|k| *k > 0)
}

fn parse_strategy_env(raw: Option<String>) -> Option<Strategy> {
    raw.and_then(|s| s.parse::<Strategy>().ok())
}

impl RankingConfig {
    /// Load from `$RANKING_CONFIG_PATH` or `config/ranking.toml`, then apply env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_RANKING_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_RANKING_CONFIG_PATH));
        let mut cfg = Self::from_path(&path)?;
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a file; a missing file yields defaults. No env overrides applied.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "ranking config not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading ranking config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing ranking config at {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: RankingConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Env overrides win over the file; unparsable values are ignored.
    pub fn apply_env(&mut self) {
        if let Some(k) = parse_top_k_env(std::env::var(ENV_RANKING_TOP_K).ok()) {
            self.ranking.top_k = k;
        }
        if let Some(s) = parse_strategy_env(std::env::var(ENV_RANKING_STRATEGY).ok()) {
            self.ranking.strategy = s;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ranking.top_k == 0 {
            bail!("[ranking] top_k must be at least 1");
        }
        if self.normalizer.fields.is_empty() {
            bail!("[normalizer] fields must not be empty");
        }
        self.blend
            .validate()
            .map_err(|e| anyhow::anyhow!("[blend] {e}"))?;
        if self.semantic.model.trim().is_empty() {
            bail!("[semantic] model must not be blank");
        }
        Ok(())
    }

    pub fn field_policy(&self) -> FieldPolicy {
        FieldPolicy::new(self.normalizer.fields.clone())
    }
}
