// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each adapter translates between the domain LLMProvider interface and one
// concrete backend.

pub mod command;
pub mod ollama;

use std::sync::Arc;
use tracing::info;

use crate::domain::engine_config::{BackendKind, OracleBackendConfig};
use crate::domain::llm::LLMProvider;

pub use command::CommandAdapter;
pub use ollama::OllamaAdapter;

/// Create a provider instance from configuration
pub fn create_provider(config: &OracleBackendConfig) -> anyhow::Result<Arc<dyn LLMProvider>> {
    if config.model.is_empty() {
        anyhow::bail!("No model configured for the oracle backend");
    }

    let provider: Arc<dyn LLMProvider> = match config.kind {
        BackendKind::Ollama => {
            info!(endpoint = %config.endpoint, model = %config.model, "Using Ollama backend");
            Arc::new(OllamaAdapter::new(config.endpoint.clone(), config.model.clone()))
        }
        BackendKind::Command => {
            if config.program.is_empty() {
                anyhow::bail!("Command backend requires a program");
            }
            info!(program = %config.program, model = %config.model, "Using command backend");
            Arc::new(CommandAdapter::new(
                config.program.clone(),
                config.args.clone(),
                config.model.clone(),
            ))
        }
    };

    Ok(provider)
}
