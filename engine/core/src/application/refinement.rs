// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Refinement Service
//!
//! Single entry point for a refinement run. Mappings go through the evolution
//! engine; flat sequences go through the fixpoint reducer, with the request's
//! `generations` used as the depth cap.
//!
//! [`ContinuousRefiner`] re-runs the service on an interval, feeding every
//! output back in as the next seed, until its shutdown token fires.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Run dispatch and the background refinement loop

use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::evolution::{EvolutionEngine, EvolutionParams};
use crate::application::fixpoint::FixpointReducer;
use crate::domain::candidate::{Candidate, FieldValue, Seed};
use crate::domain::engine_config::RazorConfigManifest;
use crate::domain::oracle::SimplicityOracle;
use crate::domain::razor::{direct_score, round_score, Razor};
use crate::domain::record::AnalysisLog;
use crate::domain::refinement::{
    EngineError, RefinementHistory, RefinementOutcome, RefinementRequest,
};

pub struct RefinementService {
    engine: EvolutionEngine,
    reducer: FixpointReducer,
}

impl RefinementService {
    pub fn new(engine: EvolutionEngine, reducer: FixpointReducer) -> Self {
        Self { engine, reducer }
    }

    /// Wires an engine and a reducer from a loaded manifest.
    pub fn from_manifest(
        manifest: &RazorConfigManifest,
        oracle: Arc<dyn SimplicityOracle>,
        log: Arc<dyn AnalysisLog>,
    ) -> anyhow::Result<Self> {
        let razor = Razor::new(oracle.clone())
            .with_threshold(manifest.spec.oracle.long_claim_threshold);
        let engine = EvolutionEngine::new(
            razor,
            manifest.axiom_set()?,
            manifest.spec.evolution.clone(),
            log.clone(),
        );
        let reducer = FixpointReducer::new(oracle, manifest.spec.fixpoint.clone(), log);
        Ok(Self::new(engine, reducer))
    }

    pub fn engine(&self) -> &EvolutionEngine {
        &self.engine
    }

    pub fn reducer(&self) -> &FixpointReducer {
        &self.reducer
    }

    pub async fn refine(&self, request: RefinementRequest) -> Result<RefinementOutcome, EngineError> {
        self.refine_with_cancel(request, &CancellationToken::new()).await
    }

    /// Like [`refine`](Self::refine); a mapping run stops between generations
    /// once `cancel` fires.
    pub async fn refine_with_cancel(
        &self,
        request: RefinementRequest,
        cancel: &CancellationToken,
    ) -> Result<RefinementOutcome, EngineError> {
        match request.seed {
            Seed::Mapping(seed) => {
                let defaults = EvolutionParams::from_config(self.engine.config());
                let params = EvolutionParams {
                    generations: request.generations.unwrap_or(defaults.generations),
                    mutation_rate: request.mutation_rate.unwrap_or(defaults.mutation_rate),
                };
                let outcome = self.engine.evolve(&seed, params, cancel).await?;
                Ok(RefinementOutcome {
                    output: Seed::Mapping(outcome.best),
                    history: RefinementHistory::Generations(outcome.history),
                    final_score: outcome.final_score,
                })
            }
            Seed::Sequence(items) => {
                let max_depth = request
                    .generations
                    .unwrap_or(self.reducer.config().max_depth);
                let outcome = self.reducer.reduce_to_fixpoint(&items, max_depth).await;
                let final_score =
                    round_score(direct_score(&FieldValue::sequence(outcome.items.iter().cloned())));
                Ok(RefinementOutcome {
                    output: Seed::Sequence(outcome.items),
                    history: RefinementHistory::Passes(outcome.passes),
                    final_score,
                })
            }
        }
    }
}

/// Background loop that keeps refining its own output.
pub struct ContinuousRefiner {
    service: Arc<RefinementService>,
    seed: Candidate,
    interval: Duration,
    max_runs: Option<u32>,
    shutdown_token: CancellationToken,
}

impl ContinuousRefiner {
    pub fn new(service: Arc<RefinementService>, seed: Candidate, interval: Duration) -> Self {
        Self {
            service,
            seed,
            interval,
            max_runs: None,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Stops after this many completed runs.
    pub fn with_max_runs(mut self, runs: u32) -> Self {
        self.max_runs = Some(runs);
        self
    }

    /// Get a handle to trigger shutdown
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<Candidate> {
        tokio::spawn(async move { self.run().await })
    }

    /// Runs until shutdown (or `max_runs`) and returns the last refined seed.
    pub async fn run(&self) -> Candidate {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            max_runs = ?self.max_runs,
            "Starting continuous refinement"
        );

        let mut current = self.seed.clone();
        let mut completed = 0u32;
        let mut tick = interval(self.interval);

        loop {
            if self.max_runs.is_some_and(|max| completed >= max) {
                break;
            }

            tokio::select! {
                _ = tick.tick() => {
                    debug!(run = completed, "Running refinement cycle");
                    let request = RefinementRequest::new(Seed::Mapping(current.clone()));

                    match self.service.refine_with_cancel(request, &self.shutdown_token).await {
                        Ok(RefinementOutcome { output: Seed::Mapping(next), final_score, .. }) => {
                            info!(run = completed, final_score, "Refinement cycle completed");
                            current = next;
                        }
                        Ok(_) => warn!("Refinement cycle returned a non-mapping output, keeping seed"),
                        Err(e) => warn!("Refinement cycle failed: {}", e),
                    }
                    completed += 1;
                }
                _ = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received, stopping continuous refinement");
                    break;
                }
            }
        }

        info!(runs = completed, "Continuous refinement stopped");
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::oracle::OracleVerdict;
    use crate::domain::record::NullLog;
    use async_trait::async_trait;

    struct EchoOracle;

    #[async_trait]
    impl SimplicityOracle for EchoOracle {
        async fn ask(&self, claim: &str) -> OracleVerdict {
            OracleVerdict::Judgment(claim.to_string())
        }
    }

    struct TimeoutOracle;

    #[async_trait]
    impl SimplicityOracle for TimeoutOracle {
        async fn ask(&self, _claim: &str) -> OracleVerdict {
            OracleVerdict::Timeout
        }
    }

    fn service(oracle: Arc<dyn SimplicityOracle>) -> RefinementService {
        let mut manifest = RazorConfigManifest::default();
        manifest.spec.evolution.rng_seed = Some(11);
        RefinementService::from_manifest(&manifest, oracle, Arc::new(NullLog)).unwrap()
    }

    fn seed() -> Candidate {
        Candidate::new()
            .with("a", "short")
            .with("b", "this is a sufficiently long claim string")
            .with("requires_api", false)
            .with("ollama", true)
    }

    #[tokio::test]
    async fn test_mapping_seed_runs_evolution() {
        let service = service(Arc::new(TimeoutOracle));
        let request = RefinementRequest::new(Seed::Mapping(seed())).with_generations(2);

        let outcome = service.refine(request).await.unwrap();

        assert_eq!(outcome.output, Seed::Mapping(seed()));
        assert_eq!(outcome.final_score, 3.5);
        assert!(matches!(outcome.history, RefinementHistory::Generations(ref g) if g.len() == 2));
    }

    #[tokio::test]
    async fn test_sequence_seed_runs_fixpoint() {
        let service = service(Arc::new(EchoOracle));
        let request = RefinementRequest::new(Seed::Sequence(vec![
            "x".to_string(),
            "y".to_string(),
            "z".to_string(),
        ]));

        let outcome = service.refine(request).await.unwrap();

        assert_eq!(outcome.output, Seed::Sequence(vec!["x".into(), "y".into(), "z".into()]));
        assert_eq!(outcome.final_score, 0.333);
        assert!(matches!(outcome.history, RefinementHistory::Passes(ref p) if p.len() == 1));
    }

    #[tokio::test]
    async fn test_invalid_budget_and_rate_are_errors() {
        let service = service(Arc::new(TimeoutOracle));

        let zero = RefinementRequest::new(Seed::Mapping(seed())).with_generations(0);
        assert!(matches!(
            service.refine(zero).await,
            Err(EngineError::InvalidBudget(_))
        ));

        let bad_rate = RefinementRequest::new(Seed::Mapping(seed())).with_mutation_rate(2.0);
        assert_eq!(
            service.refine(bad_rate).await.unwrap_err(),
            EngineError::InvalidMutationRate(2.0)
        );
    }

    #[tokio::test]
    async fn test_continuous_refiner_stops_after_max_runs() {
        let service = Arc::new(service(Arc::new(TimeoutOracle)));
        let refiner = Arc::new(
            ContinuousRefiner::new(service, seed(), Duration::from_millis(10)).with_max_runs(2),
        );

        let last = refiner.start().await.unwrap();
        assert_eq!(last, seed());
    }

    #[tokio::test]
    async fn test_continuous_refiner_honours_shutdown() {
        let service = Arc::new(service(Arc::new(TimeoutOracle)));
        let refiner = Arc::new(ContinuousRefiner::new(service, seed(), Duration::from_secs(3600)));
        let token = refiner.shutdown_token();

        let handle = refiner.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        let last = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(last.len(), seed().len());
    }
}
