// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Seed argument parsing
//!
//! A seed argument is either inline JSON or `@path` naming a JSON file.

use anyhow::{Context, Result};
use std::path::Path;

use ockham_core::domain::candidate::{Candidate, Seed};

/// Reads inline JSON, or the file named after a leading `@`.
pub fn read_json_arg(arg: &str) -> Result<serde_json::Value> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read seed file {}", path))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("Seed is not valid JSON")
}

pub fn parse_seed(arg: &str) -> Result<Seed> {
    let value = read_json_arg(arg)?;
    Ok(Seed::from_json(value)?)
}

/// Like [`parse_seed`], but only accepts an object.
pub fn parse_candidate(arg: &str) -> Result<Candidate> {
    let value = read_json_arg(arg)?;
    Ok(Candidate::from_json(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_inline_object_and_array() {
        let seed = parse_seed(r#"{"idea": "synchronicity", "local": true}"#).unwrap();
        assert!(matches!(seed, Seed::Mapping(ref c) if c.len() == 2));

        let seed = parse_seed(r#"["x", "y"]"#).unwrap();
        assert_eq!(seed, Seed::Sequence(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_seed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"a": "short", "n": 2}}"#).unwrap();

        let candidate = parse_candidate(&format!("@{}", file.path().display())).unwrap();
        assert_eq!(candidate.len(), 2);
    }

    #[test]
    fn test_malformed_seeds() {
        assert!(parse_seed("not json").is_err());
        assert!(parse_seed("42").is_err());
        assert!(parse_seed("{}").is_err());
        assert!(parse_candidate(r#"["x"]"#).is_err());
        assert!(parse_seed("@/nonexistent/seed.json").is_err());
    }
}
