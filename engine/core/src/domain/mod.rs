// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Candidates, scoring, axioms, mutation and selection, plus the ports the
//! engine talks through (oracle, LLM backend, analysis log).
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure refinement model and port traits

pub mod axiom;
pub mod candidate;
pub mod delta;
pub mod engine_config;
pub mod llm;
pub mod mutation;
pub mod oracle;
pub mod razor;
pub mod record;
pub mod refinement;
pub mod selection;
