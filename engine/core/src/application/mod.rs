// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application
//!
//! Use cases built on the domain: the evolution loop, the fixpoint reducer and
//! the refinement service that dispatches between them.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Refinement use cases

pub mod evolution;
pub mod fixpoint;
pub mod refinement;

pub use evolution::{EvolutionEngine, EvolutionOutcome, EvolutionParams};
pub use fixpoint::{FixpointOutcome, FixpointReducer};
pub use refinement::{ContinuousRefiner, RefinementService};
