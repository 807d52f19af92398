// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Delta vector compilation
//!
//! Reads `{"+": [...], "-": [...]}` and reduces both lists to their fixpoints.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::{Path, PathBuf};

use ockham_core::domain::delta::DeltaVector;

use super::print_json;
use crate::embedded::EmbeddedEngine;

#[derive(Args)]
pub struct DeltaArgs {
    /// JSON file holding the delta vector
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Depth cap (default: from configuration)
    #[arg(long)]
    pub max_depth: Option<u32>,
}

pub fn read_delta(path: &Path) -> Result<DeltaVector> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read delta file {:?}", path))?;
    serde_json::from_str(&text).context("Delta file must be {\"+\": [..], \"-\": [..]}")
}

pub async fn execute(args: DeltaArgs, config_path: Option<PathBuf>) -> Result<()> {
    let delta = read_delta(&args.file)?;
    let engine = EmbeddedEngine::new(config_path, None)?;
    let reducer = engine.service.reducer();
    let max_depth = args.max_depth.unwrap_or(reducer.config().max_depth);

    let compiled = reducer.compile_delta(&delta, max_depth).await;

    print_json(&json!({
        "delta": compiled,
        "inverse": compiled.inverse(),
    }))
}
