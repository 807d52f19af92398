// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Simplicity Oracle Port
//!
//! The oracle is an external judgment backend that explains a textual claim
//! with the fewest assumptions. It is non-deterministic and may time out or
//! fail; all of that is folded into [`OracleVerdict`] so callers only ever
//! branch on [`OracleVerdict::is_failure`].
//!
//! Two call shapes are offered:
//!
//! - [`SimplicityOracle::ask`] returns a short verdict string (used by the razor
//!   and the fixpoint reducer).
//! - [`SimplicityOracle::analyze`] returns the structured hypothesis breakdown,
//!   or the raw reply flagged as unparsed.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Oracle interface, verdict and analysis value objects

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of asking the oracle about one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum OracleVerdict {
    Judgment(String),
    Timeout,
    Error(String),
}

impl OracleVerdict {
    /// Classifies free text coming back from a backend. Replies carrying a
    /// `[timeout` or `[error`/`[erreur` marker are failures.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let lower = text.to_lowercase();
        if lower.contains("[timeout") {
            OracleVerdict::Timeout
        } else if lower.contains("[error") || lower.contains("[erreur") {
            OracleVerdict::Error(text)
        } else {
            OracleVerdict::Judgment(text)
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, OracleVerdict::Judgment(_))
    }

    pub fn judgment(&self) -> Option<&str> {
        match self {
            OracleVerdict::Judgment(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for OracleVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleVerdict::Judgment(text) => f.write_str(text),
            OracleVerdict::Timeout => f.write_str("[timeout]"),
            OracleVerdict::Error(reason) if reason.starts_with('[') => f.write_str(reason),
            OracleVerdict::Error(reason) => write!(f, "[error: {}]", reason),
        }
    }
}

/// One candidate explanation and the assumptions it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub explanation: String,
    #[serde(default)]
    pub assumptions: Vec<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

impl Hypothesis {
    /// Declared assumption count, falling back to the listed assumptions.
    pub fn assumption_count(&self) -> u32 {
        self.count.unwrap_or(self.assumptions.len() as u32)
    }
}

/// Structured reply of the heavier analysis call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OccamAnalysis {
    #[serde(default)]
    pub hypotheses: Vec<Hypothesis>,
    #[serde(default)]
    pub simplest: Option<String>,
    #[serde(default)]
    pub verdict: Option<String>,
}

impl OccamAnalysis {
    /// Hypothesis with the fewest assumptions; the first one wins a tie.
    pub fn fewest_assumptions(&self) -> Option<&Hypothesis> {
        self.hypotheses
            .iter()
            .enumerate()
            .min_by_key(|(i, h)| (h.assumption_count(), *i))
            .map(|(_, h)| h)
    }

    /// Short answer: verdict, then simplest, then the leanest hypothesis.
    pub fn summary(&self) -> Option<String> {
        non_empty(self.verdict.as_deref())
            .or_else(|| non_empty(self.simplest.as_deref()))
            .or_else(|| self.fewest_assumptions().and_then(|h| non_empty(Some(&h.explanation))))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OracleAnalysis {
    Structured(OccamAnalysis),
    Unparsed { raw: String, parse_error: String },
    Failed { verdict: OracleVerdict },
}

impl OracleAnalysis {
    /// Parses a backend reply. The outermost JSON object is extracted, so
    /// replies wrapped in prose or code fences still parse.
    pub fn parse(raw: &str) -> Self {
        let Some(json) = extract_json_object(raw) else {
            return OracleAnalysis::Unparsed {
                raw: raw.to_string(),
                parse_error: "no JSON object found".to_string(),
            };
        };
        match serde_json::from_str::<OccamAnalysis>(json) {
            Ok(analysis) => OracleAnalysis::Structured(analysis),
            Err(e) => OracleAnalysis::Unparsed {
                raw: raw.to_string(),
                parse_error: format!("JSON parse failed: {}", e),
            },
        }
    }

    pub fn parse_failed(&self) -> bool {
        matches!(self, OracleAnalysis::Unparsed { .. })
    }

    /// Collapses the analysis to a verdict, truncating raw text to `max_raw_chars`.
    pub fn to_verdict(&self, max_raw_chars: usize) -> OracleVerdict {
        match self {
            OracleAnalysis::Structured(analysis) => match analysis.summary() {
                Some(summary) => OracleVerdict::Judgment(summary),
                None => OracleVerdict::Error("empty analysis".to_string()),
            },
            OracleAnalysis::Unparsed { raw, .. } => {
                let truncated: String = raw.trim().chars().take(max_raw_chars).collect();
                if truncated.is_empty() {
                    OracleVerdict::Error("empty response".to_string())
                } else {
                    OracleVerdict::from_text(truncated)
                }
            }
            OracleAnalysis::Failed { verdict } => verdict.clone(),
        }
    }
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// External judgment backend.
#[async_trait]
pub trait SimplicityOracle: Send + Sync {
    /// Short verdict for one claim. Must return within the adapter's timeout
    /// and must not panic; failures come back as failure verdicts.
    async fn ask(&self, claim: &str) -> OracleVerdict;

    /// Structured hypothesis breakdown. Backends without a structured mode
    /// report their verdict as an unparsed reply.
    async fn analyze(&self, claim: &str) -> OracleAnalysis {
        match self.ask(claim).await {
            OracleVerdict::Judgment(text) => OracleAnalysis::parse(&text),
            failure => OracleAnalysis::Failed { verdict: failure },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── OracleVerdict ─────────────────────────────────────────────────────────

    #[test]
    fn test_from_text_markers() {
        assert_eq!(OracleVerdict::from_text("[timeout]"), OracleVerdict::Timeout);
        assert!(OracleVerdict::from_text("[erreur: boom]").is_failure());
        assert!(OracleVerdict::from_text("[ERROR] backend down").is_failure());
        assert_eq!(
            OracleVerdict::from_text("shorter\nrest"),
            OracleVerdict::Judgment("shorter\nrest".to_string())
        );
    }

    #[test]
    fn test_display_markers() {
        assert_eq!(OracleVerdict::Timeout.to_string(), "[timeout]");
        assert_eq!(OracleVerdict::Error("boom".into()).to_string(), "[error: boom]");
        assert_eq!(OracleVerdict::Error("[erreur: boom]".into()).to_string(), "[erreur: boom]");
    }

    // ── OracleAnalysis ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_structured_reply_in_prose() {
        let raw = r#"Here is my analysis:
```json
{
  "hypotheses": [
    {"explanation": "coincidence", "assumptions": ["a", "b", "c"], "count": 3},
    {"explanation": "shared cause", "assumptions": ["a"], "count": 1}
  ],
  "simplest": "shared cause",
  "verdict": "a shared cause explains it"
}
```"#;
        let analysis = OracleAnalysis::parse(raw);
        let OracleAnalysis::Structured(parsed) = &analysis else {
            panic!("expected structured analysis, got {:?}", analysis);
        };
        assert_eq!(parsed.hypotheses.len(), 2);
        assert_eq!(parsed.fewest_assumptions().unwrap().explanation, "shared cause");
        assert_eq!(
            analysis.to_verdict(500),
            OracleVerdict::Judgment("a shared cause explains it".to_string())
        );
    }

    #[test]
    fn test_summary_fallback_order() {
        let analysis = OccamAnalysis {
            hypotheses: vec![Hypothesis {
                explanation: "lean".into(),
                assumptions: vec![],
                count: None,
            }],
            simplest: Some("  ".into()),
            verdict: None,
        };
        assert_eq!(analysis.summary().as_deref(), Some("lean"));
    }

    #[test]
    fn test_unparsed_reply_keeps_raw_text() {
        let analysis = OracleAnalysis::parse("plain words, no braces");
        assert!(analysis.parse_failed());
        assert_eq!(
            analysis.to_verdict(5),
            OracleVerdict::Judgment("plain".to_string())
        );

        let broken = OracleAnalysis::parse("{ not json }");
        assert!(broken.parse_failed());
    }

    #[test]
    fn test_empty_reply_is_not_success() {
        assert!(OracleAnalysis::parse("   ").to_verdict(500).is_failure());
        assert!(OracleAnalysis::parse("{}").to_verdict(500).is_failure());
    }
}
