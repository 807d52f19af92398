// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Evolution Engine
//!
//! Refines one seed candidate over a fixed number of generations:
//!
//! 1. Seed population: the seed plus `seed_variants` mutated copies.
//! 2. Per generation: razor every member, drop axiom violators, keep the better
//!    half by fresh razor score, and pair every survivor with one mutated child.
//! 3. Output: the best member of the final population.
//!
//! When every member of a generation violates an axiom, the first razored member
//! survives unvalidated so the population never empties.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Generation loop over razor, axioms, selection and mutation

use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::axiom::AxiomSet;
use crate::domain::candidate::Candidate;
use crate::domain::engine_config::EvolutionConfig;
use crate::domain::mutation::{mutate, Mutation};
use crate::domain::razor::{Razor, ScoredCandidate};
use crate::domain::record::{AnalysisLog, EvolutionRecord, GenerationSummary};
use crate::domain::refinement::{check_rate, EngineError};
use crate::domain::selection::{rank_population, select};

/// Per-run budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionParams {
    pub generations: u32,
    pub mutation_rate: f64,
}

impl EvolutionParams {
    pub fn from_config(config: &EvolutionConfig) -> Self {
        Self {
            generations: config.generations,
            mutation_rate: config.mutation_rate,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub run_id: Uuid,
    pub best: Candidate,
    pub history: Vec<GenerationSummary>,
    pub final_score: f64,
    pub final_hypotheses: usize,
    pub cancelled: bool,
}

pub struct EvolutionEngine {
    razor: Razor,
    axioms: AxiomSet,
    config: EvolutionConfig,
    log: Arc<dyn AnalysisLog>,
    rng: Mutex<StdRng>,
}

impl EvolutionEngine {
    pub fn new(
        razor: Razor,
        axioms: AxiomSet,
        config: EvolutionConfig,
        log: Arc<dyn AnalysisLog>,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            razor,
            axioms,
            config,
            log,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn razor(&self) -> &Razor {
        &self.razor
    }

    pub async fn evolve(
        &self,
        seed: &Candidate,
        params: EvolutionParams,
        cancel: &CancellationToken,
    ) -> Result<EvolutionOutcome, EngineError> {
        if seed.is_empty() {
            return Err(EngineError::MalformedSeed(
                "candidate has no fields".to_string(),
            ));
        }
        if params.generations == 0 {
            return Err(EngineError::InvalidBudget(
                "generations must be at least 1".to_string(),
            ));
        }
        if self.config.seed_variants == 0 {
            return Err(EngineError::InvalidBudget(
                "seed_variants must be at least 1".to_string(),
            ));
        }
        let mutation_rate = check_rate(params.mutation_rate)?;

        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            generations = params.generations,
            mutation_rate,
            fields = seed.len(),
            "Starting evolution run"
        );

        let mut population = self.seed_population(seed);
        let mut history = Vec::with_capacity(params.generations as usize);
        let mut cancelled = false;

        for generation in 0..params.generations {
            if cancel.is_cancelled() {
                info!(%run_id, generation, "Evolution run cancelled");
                cancelled = true;
                break;
            }

            population = self.step(population, mutation_rate).await;

            if let Some(first) = population.first() {
                let probe = self.razor.razor(first).await;
                let summary = GenerationSummary {
                    generation,
                    population_size: population.len(),
                    best_score: probe.score,
                    best_hypotheses: probe.hypotheses,
                };
                debug!(
                    %run_id,
                    generation,
                    population_size = summary.population_size,
                    best_score = summary.best_score,
                    "Generation complete"
                );
                history.push(summary);
            }
        }

        let best = self.pick_best(population, seed).await;

        self.log.record_evolution(&EvolutionRecord {
            run_id,
            timestamp: Utc::now(),
            input: seed.clone(),
            output: best.candidate.clone(),
            generations: history.len() as u32,
            history: history.clone(),
            final_score: best.score,
            cancelled,
        });

        info!(
            %run_id,
            final_score = best.score,
            hypotheses = best.hypotheses,
            cancelled,
            "Evolution run finished"
        );

        Ok(EvolutionOutcome {
            run_id,
            best: best.candidate,
            history,
            final_score: best.score,
            final_hypotheses: best.hypotheses,
            cancelled,
        })
    }

    fn vary(&self, candidate: &Candidate, rate: f64) -> Mutation {
        let mutation = mutate(candidate, rate, &mut *self.rng.lock());
        if !mutation.mutations.is_empty() {
            debug!(mutations = ?mutation.mutations, "Mutated candidate");
        }
        mutation
    }

    fn seed_population(&self, seed: &Candidate) -> Vec<Candidate> {
        let mut population = Vec::with_capacity(self.config.seed_variants + 1);
        population.push(seed.clone());
        for _ in 0..self.config.seed_variants {
            population.push(self.vary(seed, self.config.seed_mutation_rate).candidate);
        }
        population
    }

    /// One generation. Never returns an empty population for a non-empty input.
    async fn step(&self, population: Vec<Candidate>, mutation_rate: f64) -> Vec<Candidate> {
        let mut razored = Vec::with_capacity(population.len());
        for member in &population {
            razored.push(self.razor.razor(member).await.kept);
        }

        let mut valid: Vec<Candidate> = razored
            .iter()
            .filter(|candidate| self.axioms.validate(candidate).valid)
            .cloned()
            .collect();

        if valid.is_empty() {
            warn!(
                population_size = razored.len(),
                "validation exhausted, keeping first member unvalidated"
            );
            valid.extend(razored.into_iter().take(1));
        }

        let mut scored = Vec::with_capacity(valid.len());
        for candidate in &valid {
            scored.push(self.razor.score(candidate).await);
        }

        let survivors = select(scored);
        let mut next = Vec::with_capacity(survivors.len() * 2);
        for survivor in survivors {
            let child = self.vary(&survivor, mutation_rate).candidate;
            next.push(survivor);
            next.push(child);
        }
        next
    }

    async fn pick_best(&self, population: Vec<Candidate>, seed: &Candidate) -> ScoredCandidate {
        let mut scored = Vec::with_capacity(population.len());
        for candidate in population {
            scored.push(self.razor.score(&candidate).await);
        }
        rank_population(&mut scored);

        match scored.into_iter().next() {
            Some(best) => best,
            None => self.razor.score(seed).await,
        }
    }
}
