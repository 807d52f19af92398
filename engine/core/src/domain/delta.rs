// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Delta vector: a pair of item lists, things to grow ("+") and things to shed
// ("-"). Its inverse swaps the two sides. Both sides are reduced independently
// by the fixpoint reducer (see application::fixpoint).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaVector {
    #[serde(rename = "+", default)]
    pub plus: Vec<String>,
    #[serde(rename = "-", default)]
    pub minus: Vec<String>,
}

impl DeltaVector {
    pub fn new(plus: Vec<String>, minus: Vec<String>) -> Self {
        Self { plus, minus }
    }

    pub fn inverse(&self) -> Self {
        Self {
            plus: self.minus.clone(),
            minus: self.plus.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plus.is_empty() && self.minus.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_swaps_sides() {
        let delta = DeltaVector::new(vec!["local".into()], vec!["api".into(), "rigid".into()]);
        let inverse = delta.inverse();
        assert_eq!(inverse.plus, vec!["api", "rigid"]);
        assert_eq!(inverse.minus, vec!["local"]);
        assert_eq!(inverse.inverse(), delta);
    }

    #[test]
    fn test_json_uses_sign_keys() {
        let delta: DeltaVector = serde_json::from_str(r#"{"+": ["audio"], "-": []}"#).unwrap();
        assert_eq!(delta.plus, vec!["audio"]);
        assert!(delta.minus.is_empty());
        assert!(!delta.is_empty());
    }
}
