// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! One-off oracle query

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use ockham_core::domain::oracle::SimplicityOracle;

use super::print_json;
use crate::embedded::EmbeddedEngine;

#[derive(Args)]
pub struct AskArgs {
    /// Claim or experience to put through the razor
    #[arg(required_unless_present = "check")]
    pub claim: Option<String>,

    /// Check that the oracle backend is reachable before asking
    #[arg(long)]
    pub check: bool,

    /// Print the full hypothesis breakdown instead of the verdict
    #[arg(long)]
    pub analyze: bool,

    /// Model override for this call
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn execute(args: AskArgs, config_path: Option<PathBuf>) -> Result<()> {
    let engine = EmbeddedEngine::new(config_path, args.model)?;

    if args.check {
        engine.check_backend().await?;
        eprintln!("{}", "Oracle backend is reachable".green());
    }

    let Some(claim) = args.claim else {
        return Ok(());
    };

    if args.analyze {
        let analysis = engine.oracle.analyze(&claim).await;
        if analysis.parse_failed() {
            eprintln!("{}", "Oracle reply was not valid JSON".yellow());
        }
        return print_json(&analysis);
    }

    let verdict = engine.oracle.ask(&claim).await;
    if verdict.is_failure() {
        eprintln!("{}", verdict.to_string().red());
    } else {
        println!("{}", verdict);
    }
    Ok(())
}
