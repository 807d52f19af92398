// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Single refinement run
//!
//! An object seed goes through the evolution loop; an array seed is reduced to
//! a fixpoint with `--generations` as the depth cap.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ockham_core::domain::refinement::{RefinementHistory, RefinementRequest};

use super::{ctrl_c_token, print_json, seed::parse_seed};
use crate::embedded::EmbeddedEngine;

#[derive(Args)]
pub struct EvolveArgs {
    /// Seed as inline JSON or @FILE
    #[arg(long, value_name = "JSON|@FILE")]
    pub seed: String,

    /// Generation budget (depth cap for array seeds)
    #[arg(short, long)]
    pub generations: Option<u32>,

    /// Offspring mutation rate in [0, 1]
    #[arg(short = 'r', long)]
    pub mutation_rate: Option<f64>,
}

pub async fn execute(args: EvolveArgs, config_path: Option<PathBuf>) -> Result<()> {
    let seed = parse_seed(&args.seed)?;
    let engine = EmbeddedEngine::new(config_path, None)?;

    let mut request = RefinementRequest::new(seed);
    request.generations = args.generations;
    request.mutation_rate = args.mutation_rate;

    let cancel = ctrl_c_token();
    let outcome = engine.service.refine_with_cancel(request, &cancel).await?;

    let (label, steps) = match &outcome.history {
        RefinementHistory::Generations(g) => ("generations", g.len()),
        RefinementHistory::Passes(p) => ("passes", p.len()),
    };
    eprintln!(
        "{}",
        format!(
            "✓ Refined over {} {} (score {})",
            steps, label, outcome.final_score
        )
        .green()
    );
    if cancel.is_cancelled() {
        eprintln!("{}", "Run was interrupted; output is the best so far".yellow());
    }

    print_json(&outcome)
}
