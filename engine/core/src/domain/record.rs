// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Run Records & Analysis Log Port
//!
//! Immutable entries written once per oracle exchange and once per completed
//! run. The log is a side effect: nothing in the engine reads it back, and a
//! failed append never changes a run's result.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Log entry value objects and the append-only sink interface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::candidate::Candidate;

/// One line of per-generation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub population_size: usize,
    pub best_score: f64,
    pub best_hypotheses: usize,
}

/// One full map over a sequence in fixpoint mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassSummary {
    pub depth: u32,
    /// Items whose value differs from the previous pass.
    pub changed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionRecord {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub input: Candidate,
    pub output: Candidate,
    pub generations: u32,
    pub history: Vec<GenerationSummary>,
    pub final_score: f64,
    /// Set when the run was aborted between generations.
    #[serde(default)]
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixpointRecord {
    pub timestamp: DateTime<Utc>,
    pub input: Vec<String>,
    pub output: Vec<String>,
    pub passes: Vec<PassSummary>,
    pub converged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeOutcome {
    Judgment,
    Unparsed,
    Timeout,
    Error,
}

/// Request/response pair of a single oracle call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleExchange {
    pub timestamp: DateTime<Utc>,
    pub claim: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub outcome: ExchangeOutcome,
    pub response: String,
    pub elapsed_ms: u64,
}

/// Append-only sink for run records.
///
/// Implementations must tolerate concurrent callers and must not fail the
/// caller: write problems are reported through tracing and dropped.
pub trait AnalysisLog: Send + Sync {
    fn record_exchange(&self, exchange: &OracleExchange);
    fn record_evolution(&self, record: &EvolutionRecord);
    fn record_fixpoint(&self, record: &FixpointRecord);
}

/// Discards every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl AnalysisLog for NullLog {
    fn record_exchange(&self, _exchange: &OracleExchange) {}
    fn record_evolution(&self, _record: &EvolutionRecord) {}
    fn record_fixpoint(&self, _record: &FixpointRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_outcome_serialization() {
        let json = serde_json::to_string(&ExchangeOutcome::Timeout).unwrap();
        assert_eq!(json, "\"timeout\"");
    }

    #[test]
    fn test_evolution_record_serialization() {
        let candidate = Candidate::new().with("a", "short");
        let record = EvolutionRecord {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            input: candidate.clone(),
            output: candidate,
            generations: 1,
            history: vec![GenerationSummary {
                generation: 0,
                population_size: 2,
                best_score: 1.0,
                best_hypotheses: 1,
            }],
            final_score: 1.0,
            cancelled: false,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains('\n'));
        let back: EvolutionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.history.len(), 1);
        assert_eq!(back.output.get("a").and_then(|v| v.as_text()), Some("short"));
    }
}
