// tests/ranking_config.rs
//
// Config file resolution + env overrides. Env/CWD-mutating tests run serially.

use std::{env, fs};

use grant_context_ranker::analyze::{Field, Strategy};
use grant_context_ranker::config::ranking::{
    ENV_RANKING_CONFIG_PATH, ENV_RANKING_STRATEGY, ENV_RANKING_TOP_K,
};
use grant_context_ranker::config::RankingConfig;
use grant_context_ranker::engine_from_config;

fn clear_env() {
    env::remove_var(ENV_RANKING_CONFIG_PATH);
    env::remove_var(ENV_RANKING_TOP_K);
    env::remove_var(ENV_RANKING_STRATEGY);
}

#[test]
fn from_path_reads_file_and_missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.toml");
    assert_eq!(RankingConfig::from_path(&missing).unwrap(), RankingConfig::default());

    let p = dir.path().join("ranking.toml");
    fs::write(
        &p,
        r#"
[ranking]
top_k = 2

[normalizer]
fields = ["title", "agency"]
"#,
    )
    .unwrap();
    let cfg = RankingConfig::from_path(&p).unwrap();
    assert_eq!(cfg.ranking.top_k, 2);
    assert_eq!(cfg.normalizer.fields, vec![Field::Title, Field::Agency]);
}

#[test]
fn broken_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("ranking.toml");
    fs::write(&p, "[ranking]\ntop_k = \"many\"").unwrap();
    let err = RankingConfig::from_path(&p).unwrap_err();
    assert!(format!("{err:#}").contains("ranking.toml"));
}

#[serial_test::serial]
#[test]
fn load_uses_env_path_then_cwd_default() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing on disk → defaults
    assert_eq!(RankingConfig::load().unwrap(), RankingConfig::default());

    // 2) ./config/ranking.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("ranking.toml"), "[ranking]\ntop_k = 4").unwrap();
    assert_eq!(RankingConfig::load().unwrap().ranking.top_k, 4);

    // 3) RANKING_CONFIG_PATH wins
    let p_env = tmp.path().join("other.toml");
    fs::write(&p_env, "[ranking]\ntop_k = 9").unwrap();
    env::set_var(ENV_RANKING_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(RankingConfig::load().unwrap().ranking.top_k, 9);

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn env_overrides_win_and_garbage_is_ignored() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("ranking.toml");
    fs::write(&p, "[ranking]\ntop_k = 3\nstrategy = \"semantic\"").unwrap();
    env::set_var(ENV_RANKING_CONFIG_PATH, p.display().to_string());

    env::set_var(ENV_RANKING_TOP_K, "7");
    env::set_var(ENV_RANKING_STRATEGY, "lexical");
    let cfg = RankingConfig::load().unwrap();
    assert_eq!(cfg.ranking.top_k, 7);
    assert_eq!(cfg.ranking.strategy, Strategy::Lexical);

    env::set_var(ENV_RANKING_TOP_K, "zero");
    env::set_var(ENV_RANKING_STRATEGY, "quantum");
    let cfg = RankingConfig::load().unwrap();
    assert_eq!(cfg.ranking.top_k, 3);
    assert_eq!(cfg.ranking.strategy, Strategy::Semantic);

    clear_env();
}

#[cfg(not(feature = "semantic"))]
#[test]
fn semantic_config_falls_back_to_lexical_when_allowed() {
    let mut cfg = RankingConfig::from_toml_str("[ranking]\nstrategy = \"semantic\"").unwrap();
    let engine = engine_from_config(&cfg).unwrap();
    assert_eq!(engine.strategy(), Strategy::Lexical);

    cfg.ranking.fallback_to_lexical = false;
    let err = engine_from_config(&cfg).err().unwrap();
    assert_eq!(err.kind(), "backend_unavailable");
}

#[test]
fn shipped_sample_config_is_valid() {
    let p = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/ranking.toml");
    let cfg = RankingConfig::from_path(&p).unwrap();
    assert_eq!(cfg, RankingConfig::default());
}
