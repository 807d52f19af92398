// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure
//!
//! Concrete adapters: model backends, the LLM-backed oracle and the JSONL log.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Adapters behind the domain ports

pub mod jsonl_log;
pub mod llm;
pub mod oracle;

pub use jsonl_log::JsonlAnalysisLog;
pub use oracle::{LlmOracle, OracleSettings};
