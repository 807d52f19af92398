// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Selection
//!
//! Ranks a scored population and keeps the better half.
//!
//! Ordering: higher score first; on equal score the candidate with fewer
//! hypotheses wins; remaining ties keep their incoming order.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Ranking and truncation of a population

use std::cmp::Ordering;

use crate::domain::candidate::Candidate;
use crate::domain::razor::ScoredCandidate;

/// Number of survivors for a population of `size`: `ceil(size / 2)`, at least one.
pub fn survivor_count(size: usize) -> usize {
    size.div_ceil(2).max(1)
}

fn rank(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.hypotheses.cmp(&b.hypotheses))
}

/// Stable sort, best first.
pub fn rank_population(scored: &mut [ScoredCandidate]) {
    scored.sort_by(rank);
}

/// Keeps the top `ceil(n / 2)` candidates, best first.
pub fn select(mut scored: Vec<ScoredCandidate>) -> Vec<Candidate> {
    let keep = survivor_count(scored.len());
    rank_population(&mut scored);
    scored
        .into_iter()
        .take(keep)
        .map(|s| s.candidate)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(tag: i64, score: f64, hypotheses: usize) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate::new().with("tag", tag),
            score,
            hypotheses,
        }
    }

    fn tags(candidates: &[Candidate]) -> Vec<String> {
        candidates
            .iter()
            .map(|c| c.get("tag").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_survivor_count() {
        assert_eq!(survivor_count(0), 1);
        assert_eq!(survivor_count(1), 1);
        assert_eq!(survivor_count(2), 1);
        assert_eq!(survivor_count(5), 3);
        assert_eq!(survivor_count(6), 3);
    }

    #[test]
    fn test_select_keeps_best_half() {
        let survivors = select(vec![
            scored(1, 1.0, 1),
            scored(2, 3.0, 1),
            scored(3, 2.0, 1),
            scored(4, 0.5, 1),
        ]);
        assert_eq!(tags(&survivors), vec!["2", "3"]);
    }

    #[test]
    fn test_single_member_survives() {
        let survivors = select(vec![scored(1, 0.0, 1)]);
        assert_eq!(survivors.len(), 1);
    }

    #[test]
    fn test_tie_prefers_fewer_hypotheses_then_order() {
        let survivors = select(vec![
            scored(1, 2.0, 4),
            scored(2, 2.0, 3),
            scored(3, 2.0, 3),
            scored(4, 1.0, 1),
            scored(5, 2.0, 4),
        ]);
        assert_eq!(tags(&survivors), vec!["2", "3", "1"]);
    }
}
