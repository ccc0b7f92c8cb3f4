// src/candidate.rs
//! Candidate record: one funding announcement or project handed over by a collector.
//!
//! Every attribute is optional. Collectors disagree on key names, so the NTIS-style
//! keys (`pjtTitle`, `pjtGoal`, ...) are accepted as aliases on input; output always
//! uses the canonical snake_case names.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, alias = "pjtId", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, alias = "pjtTitle", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, alias = "pjtGoal", skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,

    /// Abstract / body text.
    #[serde(
        default,
        alias = "pjtContent",
        alias = "abstract",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<String>,

    /// Text pulled from an attached document; may be empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(
        default,
        alias = "pjtKeyword",
        alias = "keyword",
        skip_serializing_if = "Option::is_none"
    )]
    pub keywords: Option<Keywords>,

    #[serde(default, alias = "department", skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,

    /// Funding amount. Negative values are invalid and ignored by the blender.
    #[serde(default, alias = "budget", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Keywords arrive either as a list or as one free-form string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    List(Vec<String>),
    Text(String),
}

impl Keywords {
    /// Flatten into one space-separated string, skipping blank entries.
    pub fn joined(&self) -> String {
        match self {
            Keywords::Text(s) => s.trim().to_string(),
            Keywords::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl Candidate {
    /// Convenience constructor used by tests and fixtures.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// True when no text-bearing field carries anything but whitespace.
    pub fn has_no_text(&self) -> bool {
        let blank = |f: &Option<String>| f.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.title)
            && blank(&self.goal)
            && blank(&self.content)
            && blank(&self.summary)
            && self
                .keywords
                .as_ref()
                .map_or(true, |k| k.joined().is_empty())
    }

    /// Funding amount if present and valid (finite, non-negative).
    pub fn valid_amount(&self) -> Option<f64> {
        self.amount.filter(|a| a.is_finite() && *a >= 0.0)
    }
}
