// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Ockham CLI

pub mod ask;
pub mod config;
pub mod delta;
pub mod evolve;
pub mod reduce;
pub mod run_loop;
pub mod seed;

pub use self::ask::AskArgs;
pub use self::config::ConfigCommand;
pub use self::delta::DeltaArgs;
pub use self::evolve::EvolveArgs;
pub use self::reduce::ReduceArgs;
pub use self::run_loop::LoopArgs;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Prints a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Token cancelled on Ctrl-C.
pub(crate) fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after the current generation");
            trigger.cancel();
        }
    });
    token
}
