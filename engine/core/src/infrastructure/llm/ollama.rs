// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Ollama LLM Provider Adapter
//
// Anti-Corruption Layer for Ollama's /api/generate endpoint.
// Non-streaming; one request per oracle call.

use crate::domain::llm::{FinishReason, GenerationOptions, GenerationResponse, LLMError, LLMProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub struct OllamaAdapter {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
}

impl OllamaAdapter {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl LLMProvider for OllamaAdapter {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        if prompt.trim().is_empty() {
            return Err(LLMError::InvalidInput("empty prompt".to_string()));
        }

        let model = options.model.as_deref().unwrap_or(&self.model);
        let request = OllamaRequest {
            model,
            prompt,
            stream: false,
            options: Some(OllamaOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens.map(|t| t as i32),
            }),
        };

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status {
                StatusCode::NOT_FOUND => LLMError::ModelNotFound(model.to_string()),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    LLMError::Authentication(error_text)
                }
                StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimit,
                _ => LLMError::Provider(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LLMError::Provider(format!("Failed to parse response: {}", e)))?;

        let truncated = !ollama_response.done || ollama_response.done_reason.as_deref() == Some("length");

        Ok(GenerationResponse {
            text: ollama_response.response,
            provider: "ollama".to_string(),
            model: model.to_string(),
            finish_reason: if truncated {
                FinishReason::Length
            } else {
                FinishReason::Stop
            },
        })
    }

    async fn health_check(&self) -> Result<(), LLMError> {
        // Listing local models proves the server is up
        let response = self
            .client
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(LLMError::Network(format!("HTTP {}", response.status())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama3.1:8b",
                "stream": false,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "{\"verdict\": \"coincidence\"}", "done": true, "done_reason": "stop"}"#)
            .create_async()
            .await;

        let adapter = OllamaAdapter::new(server.url(), "llama3.1:8b");
        let response = adapter
            .generate("why do I keep seeing 11:11?", &GenerationOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.text, r#"{"verdict": "coincidence"}"#);
        assert_eq!(response.provider, "ollama");
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn test_model_override_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({ "model": "phi3" })))
            .with_status(200)
            .with_body(r#"{"response": "ok", "done": true}"#)
            .create_async()
            .await;

        let adapter = OllamaAdapter::new(format!("{}/", server.url()), "llama3.1:8b");
        let options = GenerationOptions {
            model: Some("phi3".to_string()),
            ..GenerationOptions::default()
        };
        let response = adapter.generate("claim", &options).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.model, "phi3");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = mockito::Server::new_async().await;
        let adapter = OllamaAdapter::new(server.url(), "missing-model");

        let not_found = server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_body("model not found")
            .create_async()
            .await;
        let err = adapter
            .generate("claim", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::ModelNotFound(ref m) if m == "missing-model"));
        not_found.remove_async().await;

        server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let err = adapter
            .generate("claim", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::Provider(ref m) if m.contains("boom")));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let adapter = OllamaAdapter::new("http://127.0.0.1:9", "llama3.1:8b");
        let err = adapter
            .generate("claim", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::Network(_)));
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let adapter = OllamaAdapter::new("http://127.0.0.1:9", "llama3.1:8b");
        let err = adapter
            .generate("  ", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models": []}"#)
            .create_async()
            .await;

        let adapter = OllamaAdapter::new(server.url(), "llama3.1:8b");
        assert!(adapter.health_check().await.is_ok());
    }
}
