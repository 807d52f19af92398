// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-process engine wiring
//!
//! Loads the configuration manifest and builds the oracle, the analysis log and
//! the refinement service every command runs against.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use ockham_core::{
    application::refinement::RefinementService,
    domain::{engine_config::RazorConfigManifest, llm::LLMProvider, oracle::SimplicityOracle},
    infrastructure::{llm::create_provider, JsonlAnalysisLog, LlmOracle, OracleSettings},
};

pub struct EmbeddedEngine {
    pub manifest: RazorConfigManifest,
    pub oracle: Arc<dyn SimplicityOracle>,
    pub service: Arc<RefinementService>,
    provider: Arc<dyn LLMProvider>,
}

impl EmbeddedEngine {
    pub fn new(config_path: Option<PathBuf>, model_override: Option<String>) -> Result<Self> {
        let manifest = RazorConfigManifest::load_or_default(config_path)
            .context("Failed to load configuration")?;

        manifest
            .validate()
            .context("Configuration validation failed")?;

        let log = JsonlAnalysisLog::from_config(&manifest.spec.log);
        let provider = create_provider(&manifest.spec.oracle.backend)
            .context("Failed to initialize oracle backend")?;

        let mut settings = OracleSettings::from_config(&manifest.spec.oracle);
        if let Some(model) = model_override {
            settings = settings.with_model(model);
        }
        debug!(timeout = ?settings.timeout, model = ?settings.model, "Oracle settings resolved");

        let oracle: Arc<dyn SimplicityOracle> =
            Arc::new(LlmOracle::new(provider.clone(), settings, log.clone()));
        let service = Arc::new(
            RefinementService::from_manifest(&manifest, oracle.clone(), log)
                .context("Failed to build refinement service")?,
        );

        Ok(Self {
            manifest,
            oracle,
            service,
            provider,
        })
    }

    /// Fails when the configured oracle backend cannot be reached.
    pub async fn check_backend(&self) -> Result<()> {
        let backend = &self.manifest.spec.oracle.backend;
        self.provider.health_check().await.with_context(|| {
            format!(
                "Oracle backend {:?} ({}) is not reachable",
                backend.kind, backend.model
            )
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use ockham_core::domain::engine_config::BackendKind;

    fn command_config(dir: &std::path::Path, program: &str) -> PathBuf {
        let mut manifest = RazorConfigManifest::default();
        manifest.spec.log.enabled = false;
        manifest.spec.oracle.backend.kind = BackendKind::Command;
        manifest.spec.oracle.backend.program = program.to_string();
        let path = dir.join("ockham-config.yaml");
        manifest.to_yaml_file(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_check_backend_reports_reachable_program() {
        let dir = tempfile::tempdir().unwrap();
        let engine = EmbeddedEngine::new(Some(command_config(dir.path(), "echo")), None).unwrap();
        assert!(engine.check_backend().await.is_ok());
    }

    #[tokio::test]
    async fn test_check_backend_reports_failing_program() {
        let dir = tempfile::tempdir().unwrap();
        let engine = EmbeddedEngine::new(Some(command_config(dir.path(), "false")), None).unwrap();
        let err = engine.check_backend().await.unwrap_err();
        assert!(err.to_string().contains("not reachable"));
    }
}
