// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Ockham CLI
//!
//! The `ockham` binary runs the refinement engine in-process.
//!
//! ## Commands
//!
//! - `ockham evolve --seed <JSON|@FILE>` - Single refinement run
//! - `ockham reduce <ITEM>...` - Fixpoint reduction of a list
//! - `ockham delta <FILE>` - Compile a delta vector
//! - `ockham ask <CLAIM> [--analyze] [--check]` - One-off oracle query
//! - `ockham loop --seed <JSON|@FILE>` - Continuous refinement
//! - `ockham config show|validate|generate` - Configuration management
//!
//! Results go to stdout as JSON; logs and status lines go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use ockham_cli::commands::{
    self, AskArgs, ConfigCommand, DeltaArgs, EvolveArgs, LoopArgs, ReduceArgs,
};

/// Ockham - keep the explanation with the fewest assumptions
#[derive(Parser)]
#[command(name = "ockham")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "OCKHAM_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "OCKHAM_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Refine a seed (object: evolution, array: fixpoint)
    #[command(name = "evolve")]
    Evolve(EvolveArgs),

    /// Reduce a list of claims to a fixpoint
    #[command(name = "reduce")]
    Reduce(ReduceArgs),

    /// Compile a delta vector file
    #[command(name = "delta")]
    Delta(DeltaArgs),

    /// Put one claim through the oracle
    #[command(name = "ask")]
    Ask(AskArgs),

    /// Refine continuously on an interval
    #[command(name = "loop")]
    Loop(LoopArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Evolve(args)) => commands::evolve::execute(args, cli.config).await,
        Some(Commands::Reduce(args)) => commands::reduce::execute(args, cli.config).await,
        Some(Commands::Delta(args)) => commands::delta::execute(args, cli.config).await,
        Some(Commands::Ask(args)) => commands::ask::execute(args, cli.config).await,
        Some(Commands::Loop(args)) => commands::run_loop::execute(args, cli.config).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evolve_flags() {
        let cli = Cli::try_parse_from([
            "ockham",
            "--log-level",
            "debug",
            "evolve",
            "--seed",
            r#"{"a": "short"}"#,
            "-g",
            "3",
            "-r",
            "0.2",
        ])
        .unwrap();

        assert_eq!(cli.log_level, "debug");
        let Some(Commands::Evolve(args)) = cli.command else {
            panic!("expected evolve");
        };
        assert_eq!(args.generations, Some(3));
        assert_eq!(args.mutation_rate, Some(0.2));
    }

    #[test]
    fn test_reduce_requires_items() {
        assert!(Cli::try_parse_from(["ockham", "reduce"]).is_err());
        assert!(Cli::try_parse_from(["ockham", "reduce", "x", "y", "--max-depth", "2"]).is_ok());
    }

    #[test]
    fn test_ask_claim_optional_with_check() {
        assert!(Cli::try_parse_from(["ockham", "ask"]).is_err());

        let cli = Cli::try_parse_from(["ockham", "ask", "--check"]).unwrap();
        let Some(Commands::Ask(args)) = cli.command else {
            panic!("expected ask");
        };
        assert!(args.check);
        assert!(args.claim.is_none());
    }
}
