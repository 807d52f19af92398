// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! LLM-backed Simplicity Oracle
//!
//! Asks a language model to enumerate explanations for a claim, count the
//! assumptions behind each one and name the one with the fewest. Every call is
//! bounded by a timeout and recorded as one exchange in the analysis log.
//!
//! Verdict derivation for `ask`: the reply's `verdict` field, then its
//! `simplest` field, then the raw reply cut to `max_raw_chars`. Timeouts and
//! backend errors come back as failure verdicts, never as `Err`.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** SimplicityOracle adapter over an LLMProvider

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::domain::engine_config::OracleConfig;
use crate::domain::llm::{GenerationOptions, LLMProvider};
use crate::domain::oracle::{OracleAnalysis, OracleVerdict, SimplicityOracle};
use crate::domain::record::{AnalysisLog, ExchangeOutcome, OracleExchange};

#[derive(Debug, Clone)]
pub struct OracleSettings {
    pub timeout: Duration,
    /// Overrides the backend's default model
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub max_raw_chars: usize,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            model: None,
            temperature: None,
            max_tokens: None,
            max_raw_chars: 500,
        }
    }
}

impl OracleSettings {
    pub fn from_config(config: &OracleConfig) -> Self {
        Self {
            timeout: config.timeout,
            model: None,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_raw_chars: config.max_raw_chars,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn generation_options(&self) -> GenerationOptions {
        let defaults = GenerationOptions::default();
        GenerationOptions {
            model: self.model.clone(),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
            temperature: self.temperature.or(defaults.temperature),
        }
    }
}

fn occam_prompt(claim: &str) -> String {
    format!(
        r#"OCKHAM'S RAZOR - Analyze this claim or experience:

"{claim}"

Instructions:
1. List 3-5 possible explanations, from the most material to the most metaphysical.
2. For each explanation, count the assumptions it needs.
3. Apply the razor: the explanation with the FEWEST assumptions wins.
4. "Simple" does not mean "materialist". A synchronicity can need fewer assumptions than a chain of coincidences.

Answer in JSON:
{{
  "hypotheses": [
    {{"explanation": "...", "assumptions": ["...", "..."], "count": N}}
  ],
  "simplest": "the explanation that survives the razor",
  "verdict": "what can be stated with the least doubt"
}}

Be honest. No materialist or spiritualist bias."#
    )
}

pub struct LlmOracle {
    provider: Arc<dyn LLMProvider>,
    settings: OracleSettings,
    log: Arc<dyn AnalysisLog>,
}

/// Analysis plus the raw reply it came from (absent for failed calls).
struct Exchange {
    analysis: OracleAnalysis,
    raw: Option<String>,
}

impl LlmOracle {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        settings: OracleSettings,
        log: Arc<dyn AnalysisLog>,
    ) -> Self {
        Self {
            provider,
            settings,
            log,
        }
    }

    async fn exchange(&self, claim: &str) -> Exchange {
        let started = Instant::now();
        let prompt = occam_prompt(claim);
        let options = self.settings.generation_options();

        let result = tokio::time::timeout(
            self.settings.timeout,
            self.provider.generate(&prompt, &options),
        )
        .await;

        let exchange = match result {
            Err(_) => {
                warn!(timeout_ms = self.settings.timeout.as_millis() as u64, "Oracle call timed out");
                Exchange {
                    analysis: OracleAnalysis::Failed {
                        verdict: OracleVerdict::Timeout,
                    },
                    raw: None,
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Oracle backend failed");
                Exchange {
                    analysis: OracleAnalysis::Failed {
                        verdict: OracleVerdict::Error(e.to_string()),
                    },
                    raw: None,
                }
            }
            Ok(Ok(response)) => Exchange {
                analysis: OracleAnalysis::parse(&response.text),
                raw: Some(response.text),
            },
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(
            claim_chars = claim.chars().count(),
            elapsed_ms,
            parse_failed = exchange.analysis.parse_failed(),
            "Oracle exchange complete"
        );

        self.log.record_exchange(&OracleExchange {
            timestamp: Utc::now(),
            claim: claim.to_string(),
            model: self.settings.model.clone(),
            outcome: outcome_of(&exchange.analysis),
            response: match (&exchange.raw, &exchange.analysis) {
                (Some(raw), _) => raw.clone(),
                (None, OracleAnalysis::Failed { verdict }) => verdict.to_string(),
                (None, _) => String::new(),
            },
            elapsed_ms,
        });

        exchange
    }
}

fn outcome_of(analysis: &OracleAnalysis) -> ExchangeOutcome {
    match analysis {
        // ask() answers with the raw text when nothing usable was parsed
        OracleAnalysis::Structured(parsed) if parsed.summary().is_none() => {
            ExchangeOutcome::Unparsed
        }
        OracleAnalysis::Structured(_) => ExchangeOutcome::Judgment,
        OracleAnalysis::Unparsed { .. } => ExchangeOutcome::Unparsed,
        OracleAnalysis::Failed {
            verdict: OracleVerdict::Timeout,
        } => ExchangeOutcome::Timeout,
        OracleAnalysis::Failed { .. } => ExchangeOutcome::Error,
    }
}

#[async_trait]
impl SimplicityOracle for LlmOracle {
    async fn ask(&self, claim: &str) -> OracleVerdict {
        let Exchange { analysis, raw } = self.exchange(claim).await;

        match (&analysis, raw) {
            // Structured but empty: fall back to the raw reply
            (OracleAnalysis::Structured(parsed), Some(raw)) if parsed.summary().is_none() => {
                OracleAnalysis::Unparsed {
                    raw,
                    parse_error: "empty analysis".to_string(),
                }
                .to_verdict(self.settings.max_raw_chars)
            }
            _ => analysis.to_verdict(self.settings.max_raw_chars),
        }
    }

    async fn analyze(&self, claim: &str) -> OracleAnalysis {
        self.exchange(claim).await.analysis
    }
}
