// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mutation
//!
//! Structural variants of a candidate. Each field gets an independent coin flip
//! at `rate`; on success one kind is drawn uniformly, and it only lands if it
//! fits the field's current shape.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Mutation operator with human-readable traces

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::candidate::{Candidate, FieldValue, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// Adds a tagged alternative next to a plain value.
    Superposition,
    /// Collapses a pair to one of its alternatives.
    Simplify,
    /// Flips a boolean.
    Invert,
}

impl MutationKind {
    pub const ALL: [MutationKind; 3] = [
        MutationKind::Superposition,
        MutationKind::Simplify,
        MutationKind::Invert,
    ];

    /// Applies this kind to `value`, or returns `None` when the shape does not fit.
    fn apply<R: Rng + ?Sized>(self, value: &FieldValue, rng: &mut R) -> Option<FieldValue> {
        match (self, value) {
            (MutationKind::Superposition, FieldValue::Superposition(_)) => None,
            (MutationKind::Superposition, plain) => Some(FieldValue::pair(
                plain.clone(),
                FieldValue::Scalar(Scalar::Text(format!("alt_{}", plain))),
            )),
            (MutationKind::Simplify, FieldValue::Superposition(pair)) => {
                if rng.random_bool(0.5) {
                    Some(pair.primary.clone())
                } else {
                    Some(pair.alternative.clone())
                }
            }
            (MutationKind::Invert, FieldValue::Scalar(Scalar::Bool(b))) => {
                Some(FieldValue::boolean(!b))
            }
            _ => None,
        }
    }

    fn trace(self, field: &str) -> String {
        match self {
            MutationKind::Superposition => format!("{}: +superposition", field),
            MutationKind::Simplify => format!("{}: collapse", field),
            MutationKind::Invert => format!("{}: invert", field),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub candidate: Candidate,
    pub mutations: Vec<String>,
}

/// Produces a mutated copy of `candidate`. The input is never modified.
pub fn mutate<R: Rng + ?Sized>(candidate: &Candidate, rate: f64, rng: &mut R) -> Mutation {
    let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    let mut mutated = Candidate::new();
    let mut mutations = Vec::new();

    for (name, value) in candidate.fields() {
        let mut next = None;
        if rng.random_bool(rate) {
            let kind = *MutationKind::ALL
                .choose(&mut *rng)
                .unwrap_or(&MutationKind::Superposition);
            next = kind.apply(value, &mut *rng);
            if next.is_some() {
                mutations.push(kind.trace(name));
            }
        }
        mutated.insert(name.clone(), next.unwrap_or_else(|| value.clone()));
    }

    Mutation {
        candidate: mutated,
        mutations,
    }
}
