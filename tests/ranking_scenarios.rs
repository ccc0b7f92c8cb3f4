// tests/ranking_scenarios.rs
//
// End-to-end ranking behaviour through the public engine (lexical scorer):
// ordering, truncation, empty input, self-similarity, missing fields, tie-break.

use grant_context_ranker::analyze::{Field, FieldPolicy, RankingEngine};
use grant_context_ranker::{Candidate, Keywords, RankError};

fn titles(ts: &[&str]) -> Vec<Candidate> {
    ts.iter().map(|t| Candidate::titled(*t)).collect()
}

fn corpus() -> Vec<Candidate> {
    titles(&[
        "해양 생태계 모니터링 시스템",
        "인공지능 기반 신약 개발 플랫폼 구축",
        "스마트 팩토리 로봇 제어",
        "인공지능 반도체 설계",
        "신약 임상시험 데이터 관리",
        "수소 연료전지 소재",
    ])
}

#[test]
fn closest_title_wins_top_1() {
    let engine = RankingEngine::lexical();
    let cands = titles(&["인공지능 기반 신약 개발 플랫폼 구축", "해양 생태계 모니터링 시스템"]);
    let out = engine.rank("인공지능 기반 신약 개발", &cands, 1).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].index, 0);
    assert_eq!(out[0].rank, 1);
    assert!(out[0].score > 0.0);
}

#[test]
fn empty_candidates_yield_empty_output_for_any_k() {
    let engine = RankingEngine::lexical();
    for k in [0usize, 1, 5, 100] {
        assert!(engine.rank("인공지능", &[], k).unwrap().is_empty());
    }
}

#[test]
fn output_is_descending_and_truncated() {
    let engine = RankingEngine::lexical();
    let cands = corpus();
    for k in [1usize, 3, 6, 10] {
        let out = engine.rank("인공지능 신약", &cands, k).unwrap();
        assert_eq!(out.len(), k.min(cands.len()));
        for w in out.windows(2) {
            assert!(w[0].score >= w[1].score, "not descending: {:?}", out);
        }
    }
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let engine = RankingEngine::lexical();
    let a = engine.rank("인공지능 신약 개발", &corpus(), 4).unwrap();
    let b = engine.rank("인공지능 신약 개발", &corpus(), 4).unwrap();
    assert_eq!(a, b);
}

#[test]
fn text_identical_to_topic_scores_one() {
    let engine = RankingEngine::lexical();
    let mut cands = corpus();
    cands.push(Candidate::titled("수소 연료전지 스택 내구성"));
    let out = engine.rank("수소 연료전지 스택 내구성", &cands, 1).unwrap();
    assert_eq!(out[0].index, cands.len() - 1);
    assert!((out[0].score - 1.0).abs() < 1e-5, "score {}", out[0].score);
}

#[test]
fn record_without_text_scores_zero_without_error() {
    let engine = RankingEngine::lexical();
    let cands = vec![
        Candidate {
            id: Some("empty".into()),
            amount: Some(10.0),
            ..Candidate::default()
        },
        Candidate::titled("인공지능 기반 신약"),
    ];
    let out = engine.rank("인공지능", &cands, 2).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].index, 1);
    assert_eq!(out[1].index, 0);
    assert_eq!(out[1].score, 0.0);
}

#[test]
fn equal_scores_keep_input_order() {
    let engine = RankingEngine::lexical();
    let cands = titles(&["무관한 과제", "로봇 제어", "로봇 제어", "로봇 제어"]);
    let out = engine.rank("로봇", &cands, 4).unwrap();
    let idx: Vec<_> = out.iter().map(|s| s.index).collect();
    assert_eq!(idx, vec![1, 2, 3, 0]);
}

#[test]
fn keywords_and_goal_contribute_by_default() {
    let engine = RankingEngine::lexical();
    let cands = vec![
        Candidate::titled("기초 연구 지원"),
        Candidate {
            goal: Some("연구 지원".into()),
            keywords: Some(Keywords::List(vec!["양자컴퓨팅".into()])),
            ..Candidate::titled("기초 연구")
        },
    ];
    let out = engine.rank("양자컴퓨팅", &cands, 1).unwrap();
    assert_eq!(out[0].index, 1);
}

#[test]
fn title_only_policy_ignores_other_fields() {
    let engine = RankingEngine::lexical().with_policy(FieldPolicy::new(vec![Field::Title]));
    let cands = vec![Candidate {
        goal: Some("양자컴퓨팅".into()),
        ..Candidate::titled("기초 연구")
    }];
    let out = engine.rank("양자컴퓨팅", &cands, 1).unwrap();
    assert_eq!(out[0].score, 0.0);
}

#[test]
fn invalid_requests_are_rejected() {
    let engine = RankingEngine::lexical();
    assert!(matches!(
        engine.rank("   ", &corpus(), 3),
        Err(RankError::InvalidInput(_))
    ));
    assert!(matches!(
        engine.rank("인공지능", &corpus(), 0),
        Err(RankError::InvalidInput(_))
    ));
}
