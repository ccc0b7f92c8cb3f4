//! Field normalizer: one comparable text surface per candidate.
//!
//! Policy:
//! - fields are visited in the configured order (default: title, goal, content,
//!   summary, keywords);
//! - absent or blank fields are skipped, so an all-empty record yields `""`;
//! - whitespace runs inside a field collapse to one space;
//! - the surviving pieces are joined with a single space.
//!
//! Agency is not part of the default surface.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Goal,
    Content,
    Summary,
    Keywords,
    Agency,
}

pub const DEFAULT_FIELDS: [Field; 5] = [
    Field::Title,
    Field::Goal,
    Field::Content,
    Field::Summary,
    Field::Keywords,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicy {
    fields: Vec<Field>,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.to_vec(),
        }
    }
}

impl FieldPolicy {
    /// Custom field order. An empty list falls back to the default order.
    pub fn new(fields: Vec<Field>) -> Self {
        if fields.is_empty() {
            return Self::default();
        }
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Build the comparison text for one candidate. Never fails.
    pub fn normalize(&self, c: &Candidate) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let raw = match field {
                Field::Title => c.title.clone(),
                Field::Goal => c.goal.clone(),
                Field::Content => c.content.clone(),
                Field::Summary => c.summary.clone(),
                Field::Keywords => c.keywords.as_ref().map(|k| k.joined()),
                Field::Agency => c.agency.clone(),
            };
            let collapsed = collapse_ws(raw.as_deref().unwrap_or_default());
            if !collapsed.is_empty() {
                parts.push(collapsed);
            }
        }
        parts.join(" ")
    }

    /// Normalize a batch, preserving order.
    pub fn normalize_all(&self, candidates: &[Candidate]) -> Vec<String> {
        candidates.iter().map(|c| self.normalize(c)).collect()
    }
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Keywords;

    fn full() -> Candidate {
        Candidate {
            id: Some("p-1".into()),
            title: Some("Title".into()),
            goal: Some("Goal\n text".into()),
            content: Some("Content".into()),
            summary: Some("Summary".into()),
            keywords: Some(Keywords::List(vec!["k1".into(), "k2".into()])),
            agency: Some("Ministry".into()),
            ..Candidate::default()
        }
    }

    #[test]
    fn default_order_and_single_spaces() {
        let p = FieldPolicy::default();
        assert_eq!(p.normalize(&full()), "Title Goal text Content Summary k1 k2");
    }

    #[test]
    fn missing_fields_do_not_leave_gaps() {
        let c = Candidate {
            title: Some("A".into()),
            content: Some("   ".into()),
            keywords: Some(Keywords::Text("B".into())),
            ..Candidate::default()
        };
        assert_eq!(FieldPolicy::default().normalize(&c), "A B");
    }

    #[test]
    fn all_empty_yields_empty_string() {
        assert_eq!(FieldPolicy::default().normalize(&Candidate::default()), "");
    }

    #[test]
    fn custom_policy_titles_and_agency() {
        let p = FieldPolicy::new(vec![Field::Title, Field::Agency]);
        assert_eq!(p.normalize(&full()), "Title Ministry");
        assert_eq!(FieldPolicy::new(vec![]), FieldPolicy::default());
    }
}
