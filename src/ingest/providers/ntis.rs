// src/ingest/providers/ntis.rs
//! NTIS open-API collector: `public_project` search results → candidates.
//!
//! Response shape (only the parts we read):
//! ```xml
//! <RESULT>
//!   <RESULTSET>
//!     <HIT>
//!       <ProjectNumber>..</ProjectNumber>
//!       <ProjectTitle><Korean>..</Korean></ProjectTitle>
//!       <Goal><Full>..</Full></Goal>
//!       <Abstract><Full>..</Full></Abstract>
//!       <Keyword><Korean>..</Korean></Keyword>
//!     </HIT>
//!   </RESULTSET>
//! </RESULT>
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::borrow::Cow;

use crate::candidate::{Candidate, Keywords};
use crate::ingest::normalize_text;
use crate::ingest::types::CandidateSource;

pub const NTIS_PUBLIC_PROJECT_URL: &str = "https://www.ntis.go.kr/rndopen/openApi/public_project";

#[derive(Debug, Default, Deserialize)]
struct ResultDoc {
    #[serde(rename = "RESULTSET", default)]
    result_set: Option<ResultSet>,
}

#[derive(Debug, Default, Deserialize)]
struct ResultSet {
    #[serde(rename = "HIT", default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "ProjectNumber")]
    project_number: Option<String>,
    #[serde(rename = "ProjectTitle")]
    project_title: Option<Localized>,
    #[serde(rename = "Goal")]
    goal: Option<Texts>,
    #[serde(rename = "Abstract")]
    abstract_: Option<Texts>,
    #[serde(rename = "Keyword")]
    keyword: Option<Localized>,
}

#[derive(Debug, Deserialize)]
struct Localized {
    #[serde(rename = "Korean")]
    korean: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Texts {
    #[serde(rename = "Full")]
    full: Option<String>,
}

// normalized, or None when nothing survives
fn field(raw: Option<String>) -> Option<String> {
    raw.map(|s| normalize_text(&s)).filter(|s| !s.is_empty())
}

impl Hit {
    fn into_candidate(self) -> Candidate {
        Candidate {
            id: self
                .project_number
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            title: field(self.project_title.and_then(|t| t.korean)),
            goal: field(self.goal.and_then(|t| t.full)),
            content: field(self.abstract_.and_then(|t| t.full)),
            keywords: field(self.keyword.and_then(|t| t.korean)).map(Keywords::Text),
            ..Candidate::default()
        }
    }
}

pub struct NtisProvider {
    mode: Mode,
}

enum Mode {
    Xml(String),
    #[cfg(feature = "ingest-http")]
    Http {
        api_key: String,
        query: String,
        display_cnt: usize,
        client: reqwest::Client,
    },
}

impl NtisProvider {
    /// Offline mode: parse a captured response body.
    pub fn from_xml_str(s: &str) -> Self {
        Self {
            mode: Mode::Xml(s.to_string()),
        }
    }

    /// Live mode. Reads the key from `NTIS_API_KEY`; a missing key is an error.
    /// A blank query searches everything, newest first.
    #[cfg(feature = "ingest-http")]
    pub fn from_env(query: &str, display_cnt: usize) -> Result<Self> {
        let api_key = std::env::var("NTIS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing NTIS_API_KEY env var"))?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .context("building ntis http client")?;
        Ok(Self {
            mode: Mode::Http {
                api_key,
                query: if query.trim().is_empty() { " ".into() } else { query.to_string() },
                display_cnt: display_cnt.max(1),
                client,
            },
        })
    }

    pub fn parse_projects(s: &str) -> Result<Vec<Candidate>> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(s);
        let doc: ResultDoc = from_str(&xml_clean).context("parsing ntis xml")?;

        let out: Vec<Candidate> = doc
            .result_set
            .map(|rs| rs.hits)
            .unwrap_or_default()
            .into_iter()
            .map(Hit::into_candidate)
            .collect();

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        Ok(out)
    }
}

#[async_trait]
impl CandidateSource for NtisProvider {
    async fn fetch_latest(&self) -> Result<Vec<Candidate>> {
        match &self.mode {
            Mode::Xml(s) => Self::parse_projects(s),

            #[cfg(feature = "ingest-http")]
            Mode::Http {
                api_key,
                query,
                display_cnt,
                client,
            } => {
                let display = display_cnt.to_string();
                let body = client
                    .get(NTIS_PUBLIC_PROJECT_URL)
                    .query(&[
                        ("apprVkey", api_key.as_str()),
                        ("query", query.as_str()),
                        ("sortby", "DATE/DESC"),
                        ("startPosition", "1"),
                        ("displayCnt", display.as_str()),
                    ])
                    .send()
                    .await
                    .context("ntis http get()")?
                    .error_for_status()
                    .context("ntis http status")?
                    .text()
                    .await
                    .context("ntis http .text()")?;
                Self::parse_projects(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "NTIS"
    }
}

static RE_NAMED_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("entity regex"));

// quick-xml only knows the five XML entities. Decode every other named (HTML)
// entity NTIS leaks and re-escape the result so markup chars stay text.
// Names html-escape does not know are escaped as literal text.
fn scrub_html_entities_for_xml(s: &str) -> Cow<'_, str> {
    RE_NAMED_ENTITY.replace_all(s, |caps: &Captures| {
        let name = &caps[1];
        if matches!(name, "lt" | "gt" | "amp" | "quot" | "apos") {
            return caps[0].to_string();
        }
        let decoded = html_escape::decode_html_entities(&caps[0]);
        if decoded == caps[0] {
            return format!("&amp;{name};");
        }
        html_escape::encode_text(&decoded).into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_HIT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<RESULT>
  <TOTALHITS>1</TOTALHITS>
  <RESULTSET>
    <HIT>
      <ProjectNumber> 1711000001 </ProjectNumber>
      <ProjectTitle><Korean>인공지능 기반&nbsp;신약 개발</Korean><English>AI drug discovery</English></ProjectTitle>
      <Goal><Full>&lt;p&gt;후보물질 발굴&lt;/p&gt;</Full><Teaser>x</Teaser></Goal>
      <Abstract><Full>딥러닝   모델로 단백질 구조를 예측한다</Full></Abstract>
      <Keyword><Korean>인공지능, 신약</Korean></Keyword>
    </HIT>
  </RESULTSET>
</RESULT>"#;

    #[test]
    fn parses_hit_fields() {
        let v = NtisProvider::parse_projects(ONE_HIT).unwrap();
        assert_eq!(v.len(), 1);
        let c = &v[0];
        assert_eq!(c.id.as_deref(), Some("1711000001"));
        assert_eq!(c.title.as_deref(), Some("인공지능 기반 신약 개발"));
        assert_eq!(c.goal.as_deref(), Some("후보물질 발굴"));
        assert_eq!(c.content.as_deref(), Some("딥러닝 모델로 단백질 구조를 예측한다"));
        assert_eq!(c.keywords, Some(Keywords::Text("인공지능, 신약".into())));
    }

    #[test]
    fn missing_result_set_is_empty() {
        let v = NtisProvider::parse_projects("<RESULT><TOTALHITS>0</TOTALHITS></RESULT>").unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn any_html_entity_survives_parsing() {
        let xml = r#"<RESULT><RESULTSET>
  <HIT><ProjectNumber>1</ProjectNumber><ProjectTitle><Korean>정상 과제</Korean></ProjectTitle></HIT>
  <HIT><ProjectNumber>2</ProjectNumber><ProjectTitle><Korean>비용 절감&hellip; 10&times; &rarr; A&amp;B &lt;x&gt; &bogus;</Korean></ProjectTitle></HIT>
</RESULTSET></RESULT>"#;
        let v = NtisProvider::parse_projects(xml).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].title.as_deref(), Some("정상 과제"));
        assert_eq!(
            v[1].title.as_deref(),
            Some("비용 절감… 10× → A&B &bogus;")
        );
    }

    #[test]
    fn scrub_keeps_xml_entities_and_escapes_decoded_markup() {
        assert_eq!(scrub_html_entities_for_xml("&lt;&amp;&quot;"), "&lt;&amp;&quot;");
        assert_eq!(scrub_html_entities_for_xml("&hellip;&nbsp;"), "…\u{a0}");
        assert_eq!(scrub_html_entities_for_xml("&AMP;"), "&amp;");
        assert_eq!(scrub_html_entities_for_xml("&nope;"), "&amp;nope;");
        assert_eq!(scrub_html_entities_for_xml("&#8230;"), "&#8230;");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(NtisProvider::parse_projects("<RESULT><RESULTSET><HIT>").is_err());
    }
}
