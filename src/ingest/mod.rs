// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::candidate::Candidate;
use crate::ingest::types::CandidateSource;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::collections::HashSet;

pub const MAX_FIELD_CHARS: usize = 4000;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_kept_total",
            "Candidates kept after empty-drop + dedup."
        );
        describe_counter!(
            "ingest_dropped_empty_total",
            "Candidates dropped because every text field was empty."
        );
        describe_counter!(
            "ingest_dedup_total",
            "Candidates removed as duplicate identifiers."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
    });
}

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));

/// Normalize one text field: decode entities, strip tags, collapse whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let decoded = html_escape::decode_html_entities(s);

    // 2) Strip HTML tags (replaced by a space so adjacent words stay apart)
    let stripped = RE_TAGS.replace_all(&decoded, " ");

    // 3) Collapse whitespace
    let mut out = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    // 4) Length cap
    if out.chars().count() > MAX_FIELD_CHARS {
        out = out.chars().take(MAX_FIELD_CHARS).collect();
    }

    out
}

/// Drop text-less records, then de-duplicate by identifier (first occurrence wins).
/// Records without an identifier are never treated as duplicates.
/// Returns (kept, dropped_empty, dedup).
pub fn drop_empty_dedup(raw: Vec<Candidate>) -> (Vec<Candidate>, usize, usize) {
    let mut dropped_empty = 0usize;
    let mut dedup = 0usize;
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(raw.len());

    for c in raw {
        if c.has_no_text() {
            dropped_empty += 1;
            continue;
        }
        if let Some(id) = c.id.as_deref() {
            if !seen_ids.insert(id.to_string()) {
                dedup += 1;
                continue;
            }
        }
        keep.push(c);
    }

    (keep, dropped_empty, dedup)
}

/// Run every provider once. A failing provider is logged and counted; the rest
/// still contribute. Returns (kept, dropped_empty, dedup).
pub async fn run_once(providers: &[Box<dyn CandidateSource>]) -> (Vec<Candidate>, usize, usize) {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => raw.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("ingest_provider_errors_total").increment(1);
            }
        }
    }

    let (kept, dropped_empty, dedup) = drop_empty_dedup(raw);

    // Telemetry
    counter!("ingest_kept_total").increment(kept.len() as u64);
    counter!("ingest_dropped_empty_total").increment(dropped_empty as u64);
    counter!("ingest_dedup_total").increment(dedup as u64);
    tracing::info!(
        kept = kept.len(),
        dropped_empty,
        dedup,
        providers = providers.len(),
        "ingest run finished"
    );

    (kept, dropped_empty, dedup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_id(id: Option<&str>, title: &str) -> Candidate {
        Candidate {
            id: id.map(str::to_string),
            ..Candidate::titled(title)
        }
    }

    #[test]
    fn normalize_text_decodes_strips_and_collapses() {
        let s = "  <b>Smart</b>&nbsp;&nbsp;factory<br/>robots &amp; AI  ";
        assert_eq!(normalize_text(s), "Smart factory robots & AI");
    }

    #[test]
    fn normalize_text_caps_length_on_char_boundary() {
        let long = "가".repeat(MAX_FIELD_CHARS + 10);
        let out = normalize_text(&long);
        assert_eq!(out.chars().count(), MAX_FIELD_CHARS);
    }

    #[test]
    fn dedup_by_id_first_wins_and_anonymous_kept() {
        let raw = vec![
            with_id(Some("A"), "first"),
            with_id(Some("A"), "second"),
            with_id(None, "anon"),
            with_id(None, "anon"),
            with_id(Some("B"), "   "),
        ];
        let (kept, dropped, dedup) = drop_empty_dedup(raw);
        let titles: Vec<_> = kept.iter().filter_map(|c| c.title.as_deref()).collect();
        assert_eq!(titles, vec!["first", "anon", "anon"]);
        assert_eq!(dropped, 1);
        assert_eq!(dedup, 1);
    }
}
