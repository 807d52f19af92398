// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Axiom Validator
//!
//! Fixed structural invariants a candidate must satisfy to stay in the
//! population. Each axiom has a stable numeric id used for diagnostics.
//!
//! ## Standard Set
//! | Id | Name | Fires when |
//! |----|------|------------|
//! | 1 | `local` | `requires_api` is set and `ollama` is not |
//! | 2 | `superposition` | `force_choice` is set |
//! | 5 | `self_evolution` | `static` or `immutable` is set |
//! | 6 | `confrontation` | `single_source` is set |
//!
//! Ids 3 and 4 exist in the wider axiom list but have no structural check.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Candidate invariants, passed explicitly to each engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::domain::candidate::Candidate;

pub type AxiomId = u8;

type Predicate = Arc<dyn Fn(&Candidate) -> bool + Send + Sync>;

/// A named predicate that fires on a violating candidate.
#[derive(Clone)]
pub struct Axiom {
    pub id: AxiomId,
    pub name: String,
    pub description: String,
    violated_by: Predicate,
}

impl Axiom {
    pub fn new<F>(id: AxiomId, name: &str, description: &str, violated_by: F) -> Self
    where
        F: Fn(&Candidate) -> bool + Send + Sync + 'static,
    {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            violated_by: Arc::new(violated_by),
        }
    }

    pub fn is_violated_by(&self, candidate: &Candidate) -> bool {
        (self.violated_by)(candidate)
    }
}

impl fmt::Debug for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axiom")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxiomReport {
    pub valid: bool,
    pub violations: Vec<AxiomId>,
}

#[derive(Debug, Clone)]
pub struct AxiomSet {
    axioms: Vec<Axiom>,
}

impl AxiomSet {
    pub fn new(axioms: Vec<Axiom>) -> Self {
        Self { axioms }
    }

    /// The four checkable axioms, in evaluation order.
    pub fn standard() -> Self {
        Self::new(vec![
            Axiom::new(1, "local", "remote dependency without local fallback", |c| {
                c.flag("requires_api") && !c.flag("ollama")
            }),
            Axiom::new(2, "superposition", "candidate forces a single choice", |c| {
                c.flag("force_choice")
            }),
            Axiom::new(5, "self_evolution", "candidate declares itself immutable", |c| {
                c.flag("static") || c.flag("immutable")
            }),
            Axiom::new(6, "confrontation", "candidate cites a single source", |c| {
                c.flag("single_source")
            }),
        ])
    }

    /// Standard set restricted to `ids`. Unknown ids are returned as the error.
    pub fn standard_subset(ids: &[AxiomId]) -> Result<Self, Vec<AxiomId>> {
        let standard = Self::standard();
        let unknown: Vec<AxiomId> = ids
            .iter()
            .copied()
            .filter(|id| !standard.axioms.iter().any(|a| a.id == *id))
            .collect();
        if !unknown.is_empty() {
            return Err(unknown);
        }
        Ok(Self::new(
            standard
                .axioms
                .into_iter()
                .filter(|a| ids.contains(&a.id))
                .collect(),
        ))
    }

    pub fn ids(&self) -> Vec<AxiomId> {
        self.axioms.iter().map(|a| a.id).collect()
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    /// Evaluates every axiom; no short-circuit, so the report lists all violations.
    pub fn validate(&self, candidate: &Candidate) -> AxiomReport {
        let violations: Vec<AxiomId> = self
            .axioms
            .iter()
            .filter(|axiom| axiom.is_violated_by(candidate))
            .map(|axiom| axiom.id)
            .collect();
        AxiomReport {
            valid: violations.is_empty(),
            violations,
        }
    }
}

impl Default for AxiomSet {
    fn default() -> Self {
        Self::standard()
    }
}
