// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Fixpoint Reducer
//!
//! Repeatedly maps every item of a flat list to the oracle's short verdict for
//! it until a pass changes nothing or the depth cap is reached.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Oracle-driven list simplification to a fixpoint

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::delta::DeltaVector;
use crate::domain::engine_config::FixpointConfig;
use crate::domain::oracle::SimplicityOracle;
use crate::domain::record::{AnalysisLog, FixpointRecord, PassSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixpointOutcome {
    pub items: Vec<String>,
    pub passes: Vec<PassSummary>,
    /// False when the depth cap stopped the reduction.
    pub converged: bool,
}

pub struct FixpointReducer {
    oracle: Arc<dyn SimplicityOracle>,
    config: FixpointConfig,
    log: Arc<dyn AnalysisLog>,
}

impl FixpointReducer {
    pub fn new(
        oracle: Arc<dyn SimplicityOracle>,
        config: FixpointConfig,
        log: Arc<dyn AnalysisLog>,
    ) -> Self {
        Self {
            oracle,
            config,
            log,
        }
    }

    pub fn config(&self) -> &FixpointConfig {
        &self.config
    }

    /// First line of the verdict, cut to `max_item_chars`. Failures and blank
    /// verdicts keep the item.
    async fn simplify_item(&self, item: &str) -> String {
        let verdict = self.oracle.ask(item).await;
        let first_line = verdict
            .judgment()
            .and_then(|text| text.lines().next())
            .filter(|line| !line.trim().is_empty());

        match first_line {
            Some(line) => line.chars().take(self.config.max_item_chars).collect(),
            None => item.to_string(),
        }
    }

    /// Runs at most `max_depth + 1` passes. The output always has the input's length.
    pub async fn reduce_to_fixpoint(&self, items: &[String], max_depth: u32) -> FixpointOutcome {
        let mut current = items.to_vec();
        let mut passes = Vec::new();
        let mut converged = false;
        let mut depth = 0;

        while depth <= max_depth {
            let mut next = Vec::with_capacity(current.len());
            for item in &current {
                next.push(self.simplify_item(item).await);
            }

            let changed = current.iter().zip(&next).filter(|(a, b)| a != b).count();
            debug!(depth, changed, "Fixpoint pass complete");
            passes.push(PassSummary { depth, changed });

            if changed == 0 {
                converged = true;
                break;
            }
            current = next;
            depth += 1;
        }

        info!(
            items = current.len(),
            passes = passes.len(),
            converged,
            "Fixpoint reduction finished"
        );

        self.log.record_fixpoint(&FixpointRecord {
            timestamp: Utc::now(),
            input: items.to_vec(),
            output: current.clone(),
            passes: passes.clone(),
            converged,
        });

        FixpointOutcome {
            items: current,
            passes,
            converged,
        }
    }

    /// Reduces both sides of a delta vector independently.
    pub async fn compile_delta(&self, delta: &DeltaVector, max_depth: u32) -> DeltaVector {
        let plus = self.reduce_to_fixpoint(&delta.plus, max_depth).await;
        let minus = self.reduce_to_fixpoint(&delta.minus, max_depth).await;
        DeltaVector::new(plus.items, minus.items)
    }
}
