//! Grant Context Ranker — Binary Entrypoint
//! Boots the Axum HTTP server: config, scorer, shared state, metrics.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use grant_context_ranker::analyze::debug::dev_logging_enabled;
use grant_context_ranker::api::{self, AppState};
use grant_context_ranker::config::RankingConfig;
use grant_context_ranker::engine_from_config;
use grant_context_ranker::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - RANKING_DEV_LOG=1
fn enable_dev_tracing() {
    if !dev_logging_enabled() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ranking=debug,grant_context_ranker=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables RANKING_CONFIG_PATH / RANKING_TOP_K / RANKING_STRATEGY from .env.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let cfg = RankingConfig::load().context("loading ranking config")?;

    // Model load happens here, once; semantic may fall back to lexical.
    let engine = tokio::task::spawn_blocking({
        let cfg = cfg.clone();
        move || engine_from_config(&cfg)
    })
    .await
    .context("scorer init task")?
    .context("initializing scorer")?;

    tracing::info!(
        strategy = %engine.strategy(),
        top_k = cfg.ranking.top_k,
        fields = ?cfg.normalizer.fields,
        "ranking engine ready"
    );

    let metrics = Metrics::init()?;
    let state = AppState::new(engine, cfg.ranking.top_k);
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
