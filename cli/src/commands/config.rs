// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use ockham_core::domain::engine_config::RazorConfigManifest;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate default configuration
    Generate {
        /// Output path (default: ./ockham-config.yaml)
        #[arg(short, long, default_value = "./ockham-config.yaml")]
        output: PathBuf,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output } => generate(output),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = RazorConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. OCKHAM_CONFIG_PATH: {}",
            std::env::var("OCKHAM_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./ockham-config.yaml");
        println!("  4. ~/.ockham/config.yaml");
        println!("  5. /etc/ockham/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    let oracle = &config.spec.oracle;
    println!("{}", "Oracle:".bold());
    println!("  Backend: {:?}", oracle.backend.kind);
    println!("  Model: {}", oracle.backend.model);
    println!("  Endpoint: {}", oracle.backend.endpoint);
    println!("  Timeout: {:?}", oracle.timeout);
    println!();

    let evolution = &config.spec.evolution;
    println!("{}", "Evolution:".bold());
    println!("  Generations: {}", evolution.generations);
    println!(
        "  Seed variants: {} (rate {})",
        evolution.seed_variants, evolution.seed_mutation_rate
    );
    println!("  Mutation rate: {}", evolution.mutation_rate);
    match evolution.rng_seed {
        Some(seed) => println!("  RNG seed: {}", seed),
        None => println!("  RNG seed: {}", "(random)".dimmed()),
    }
    println!();

    println!("{}", "Fixpoint:".bold());
    println!("  Max depth: {}", config.spec.fixpoint.max_depth);
    println!();

    println!("{}", "Axioms:".bold());
    println!("  Enabled: {:?}", config.spec.axioms.enabled);
    println!();

    let log = &config.spec.log;
    println!("{}", "Logs:".bold());
    if log.enabled {
        println!("  Oracle: {}", log.oracle_log.display());
        println!("  Runs: {}", log.evolution_log.display());
    } else {
        println!("  {}", "(disabled)".dimmed());
    }

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = RazorConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf) -> Result<()> {
    RazorConfigManifest::default()
        .to_yaml_file(&output)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
