// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Continuous refinement
//!
//! Re-runs evolution on an interval, feeding each output back as the next seed,
//! until Ctrl-C or `--runs` completed runs.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ockham_core::application::refinement::ContinuousRefiner;

use super::{print_json, seed::parse_candidate};
use crate::embedded::EmbeddedEngine;

#[derive(Args)]
pub struct LoopArgs {
    /// Seed object as inline JSON or @FILE
    #[arg(long, value_name = "JSON|@FILE")]
    pub seed: String,

    /// Seconds between runs (default: from configuration)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop after this many runs
    #[arg(long)]
    pub runs: Option<u32>,
}

pub async fn execute(args: LoopArgs, config_path: Option<PathBuf>) -> Result<()> {
    let seed = parse_candidate(&args.seed)?;
    let engine = EmbeddedEngine::new(config_path, None)?;
    let interval = args
        .interval
        .map(Duration::from_secs)
        .unwrap_or(engine.manifest.spec.evolution.loop_interval);

    let mut refiner = ContinuousRefiner::new(engine.service.clone(), seed, interval);
    if let Some(runs) = args.runs {
        refiner = refiner.with_max_runs(runs);
    }
    let refiner = Arc::new(refiner);

    let shutdown = refiner.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    eprintln!(
        "{}",
        format!("Refining every {}s, Ctrl-C to stop", interval.as_secs()).bold()
    );
    let last = refiner.start().await?;

    print_json(&last)
}
