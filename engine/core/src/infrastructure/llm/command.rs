// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Command LLM Provider Adapter
//
// Runs a local program once per prompt (default: `ollama run <model> <prompt>`)
// and takes its stdout as the completion. The child is killed when the future
// is dropped, so an oracle timeout never leaves a process behind.

use crate::domain::llm::{FinishReason, GenerationOptions, GenerationResponse, LLMError, LLMProvider};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

const MODEL_PLACEHOLDER: &str = "{model}";

pub struct CommandAdapter {
    program: String,
    args: Vec<String>,
    model: String,
}

impl CommandAdapter {
    pub fn new(program: impl Into<String>, args: Vec<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            model: model.into(),
        }
    }

    fn command(&self, model: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.args.iter().map(|arg| arg.replace(MODEL_PLACEHOLDER, model)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl LLMProvider for CommandAdapter {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        if prompt.trim().is_empty() {
            return Err(LLMError::InvalidInput("empty prompt".to_string()));
        }

        let model = options.model.as_deref().unwrap_or(&self.model);
        let output = self
            .command(model)
            .arg(prompt)
            .output()
            .await
            .map_err(|e| LLMError::Network(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(LLMError::Provider(format!(
                "{} exited with {}: {}",
                self.program, output.status, stderr
            )));
        }

        Ok(GenerationResponse {
            text: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            provider: "command".to_string(),
            model: model.to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    async fn health_check(&self) -> Result<(), LLMError> {
        let status = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| LLMError::Network(format!("failed to run {}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(LLMError::Provider(format!("{} --version exited with {}", self.program, status)))
        }
    }
}
