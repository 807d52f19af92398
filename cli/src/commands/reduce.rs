// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Fixpoint reduction of a list of claims

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::print_json;
use crate::embedded::EmbeddedEngine;

#[derive(Args)]
pub struct ReduceArgs {
    /// Items to reduce
    #[arg(required = true, value_name = "ITEM")]
    pub items: Vec<String>,

    /// Depth cap (default: from configuration)
    #[arg(long)]
    pub max_depth: Option<u32>,
}

pub async fn execute(args: ReduceArgs, config_path: Option<PathBuf>) -> Result<()> {
    let engine = EmbeddedEngine::new(config_path, None)?;
    let reducer = engine.service.reducer();
    let max_depth = args.max_depth.unwrap_or(reducer.config().max_depth);

    let outcome = reducer.reduce_to_fixpoint(&args.items, max_depth).await;

    if outcome.converged {
        eprintln!("{}", format!("✓ Fixpoint after {} passes", outcome.passes.len()).green());
    } else {
        eprintln!(
            "{}",
            format!("Depth cap reached after {} passes", outcome.passes.len()).yellow()
        );
    }

    print_json(&outcome)
}
