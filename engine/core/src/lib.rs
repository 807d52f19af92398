// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Ockham refinement engine: an evolutionary search that favours candidates
//! with fewer independent assumptions, and a fixpoint reducer for flat lists.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Crate root

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use domain::*;
