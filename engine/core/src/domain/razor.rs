// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Razor (Candidate Scorer)
//!
//! Reduces one candidate field by field and computes its simplicity score, an
//! inverse proxy for the number of independent assumptions the candidate makes.
//!
//! ## Scoring Table
//! | Field value | Action | Score |
//! |-------------|--------|-------|
//! | long text, oracle answered | becomes `(original, verdict)` | +1.0 |
//! | long text, oracle failed | kept unchanged | +0.5 |
//! | anything else | kept unchanged | `+1 / hypotheses(value)` |
//!
//! No field is ever dropped: simplification happens through the superposition
//! pair, so `kept` always has the input's field names and `cut` stays empty.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Oracle-backed field reduction and simplicity scoring

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::domain::candidate::{Candidate, FieldValue};
use crate::domain::oracle::SimplicityOracle;

/// Text longer than this many characters is submitted to the oracle.
pub const DEFAULT_LONG_CLAIM_THRESHOLD: usize = 10;

/// Score credited to a long claim the oracle could not adjudicate.
const UNVERIFIED_CREDIT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RazorOutcome {
    pub kept: Candidate,
    pub cut: Vec<String>,
    pub score: f64,
    pub hypotheses: usize,
}

/// A candidate with a fresh razor score attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    pub hypotheses: usize,
}

impl ScoredCandidate {
    pub fn new(candidate: Candidate, outcome: &RazorOutcome) -> Self {
        Self {
            candidate,
            score: outcome.score,
            hypotheses: outcome.hypotheses,
        }
    }
}

/// Rounds to three decimals so scores compare and log stably.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// Score contribution of a value that is not sent to the oracle.
pub fn direct_score(value: &FieldValue) -> f64 {
    1.0 / value.hypothesis_count() as f64
}

pub struct Razor {
    oracle: Arc<dyn SimplicityOracle>,
    long_claim_threshold: usize,
}

impl Razor {
    pub fn new(oracle: Arc<dyn SimplicityOracle>) -> Self {
        Self {
            oracle,
            long_claim_threshold: DEFAULT_LONG_CLAIM_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.long_claim_threshold = threshold;
        self
    }

    pub fn oracle(&self) -> &Arc<dyn SimplicityOracle> {
        &self.oracle
    }

    fn is_long_claim<'a>(&self, value: &'a FieldValue) -> Option<&'a str> {
        value
            .as_text()
            .filter(|text| text.chars().count() > self.long_claim_threshold)
    }

    /// Runs the razor over every field. Oracle calls are awaited one at a time.
    pub async fn razor(&self, candidate: &Candidate) -> RazorOutcome {
        let mut score = 0.0;
        let mut kept = Candidate::new();

        for (name, value) in candidate.fields() {
            let reduced = match self.is_long_claim(value) {
                Some(text) => {
                    let verdict = self.oracle.ask(&format!("{}: {}", name, text)).await;
                    if verdict.is_failure() {
                        debug!(field = %name, %verdict, "Oracle failed, keeping field unverified");
                        score += UNVERIFIED_CREDIT;
                        value.clone()
                    } else {
                        score += 1.0;
                        FieldValue::pair(value.clone(), FieldValue::text(verdict.to_string()))
                    }
                }
                None => {
                    score += direct_score(value);
                    value.clone()
                }
            };
            kept.insert(name.clone(), reduced);
        }

        let hypotheses = kept.fields().map(|(_, v)| v.hypothesis_count()).sum();

        RazorOutcome {
            kept,
            cut: Vec::new(),
            score: round_score(score),
            hypotheses,
        }
    }

    /// Razors a candidate and pairs the original with its fresh score.
    pub async fn score(&self, candidate: &Candidate) -> ScoredCandidate {
        let outcome = self.razor(candidate).await;
        ScoredCandidate::new(candidate.clone(), &outcome)
    }
}
