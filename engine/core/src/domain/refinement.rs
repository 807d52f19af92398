// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Refinement
//!
//! Request/response types of the run invocation API, the only surface the
//! surrounding daemons and the CLI need to drive the engine.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Run invocation contract and caller-facing errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::candidate::Seed;
use crate::domain::record::{GenerationSummary, PassSummary};

/// Caller-contract violations. Oracle-level problems never surface here.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Malformed seed: {0}")]
    MalformedSeed(String),

    #[error("Invalid generation budget: {0}")]
    InvalidBudget(String),

    #[error("Invalid mutation rate: {0}")]
    InvalidMutationRate(f64),
}

/// Checks a mutation probability.
pub fn check_rate(rate: f64) -> Result<f64, EngineError> {
    if rate.is_nan() || !(0.0..=1.0).contains(&rate) {
        return Err(EngineError::InvalidMutationRate(rate));
    }
    Ok(rate)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementRequest {
    pub seed: Seed,

    /// Generation budget for mappings, depth cap for sequences.
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub generations: Option<u32>,

    /// Offspring mutation rate (mappings only).
    #[serde(default)]
    pub mutation_rate: Option<f64>,
}

impl RefinementRequest {
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            generations: None,
            mutation_rate: None,
        }
    }

    pub fn with_generations(mut self, generations: u32) -> Self {
        self.generations = Some(generations);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = Some(rate);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", content = "entries", rename_all = "snake_case")]
pub enum RefinementHistory {
    Generations(Vec<GenerationSummary>),
    Passes(Vec<PassSummary>),
}

impl RefinementHistory {
    pub fn len(&self) -> usize {
        match self {
            RefinementHistory::Generations(g) => g.len(),
            RefinementHistory::Passes(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementOutcome {
    pub output: Seed,
    pub history: RefinementHistory,
    pub final_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_rate_bounds() {
        assert_eq!(check_rate(0.0), Ok(0.0));
        assert_eq!(check_rate(1.0), Ok(1.0));
        assert!(check_rate(1.5).is_err());
        assert!(check_rate(-0.1).is_err());
        assert!(check_rate(f64::NAN).is_err());
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::InvalidBudget("generations must be at least 1".to_string());
        assert!(err.to_string().contains("at least 1"));
        assert!(EngineError::InvalidMutationRate(2.0).to_string().contains('2'));
    }
}
