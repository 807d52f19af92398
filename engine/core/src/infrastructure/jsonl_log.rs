// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// JSON Lines Analysis Log
//
// One UTF-8 JSON object per line, appended to files opened in append+create
// mode. Oracle exchanges go to one file; evolution and fixpoint runs go to a
// second file, tagged by "kind". Each file is opened once, on first write, and
// the handle is kept behind its own mutex. Every entry goes out in a single
// write_all under that lock, so concurrent runs never interleave partial lines.
// Failures are logged at warn and dropped; a failed open is retried on the
// next entry.

use parking_lot::Mutex;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::domain::engine_config::LogConfig;
use crate::domain::record::{AnalysisLog, EvolutionRecord, FixpointRecord, NullLog, OracleExchange};

#[derive(Debug, Error)]
enum LogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RunEntry<'a> {
    Evolution(&'a EvolutionRecord),
    Fixpoint(&'a FixpointRecord),
}

/// Append-only JSONL file with a lazily opened handle.
struct JsonlFile {
    path: PathBuf,
    handle: Mutex<Option<File>>,
}

impl JsonlFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            handle: Mutex::new(None),
        }
    }

    fn open(path: &Path) -> Result<File, LogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(OpenOptions::new().create(true).append(true).open(path)?)
    }

    fn append<T: Serialize>(&self, entry: &T) -> Result<(), LogError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut handle = self.handle.lock();
        if handle.is_none() {
            *handle = Some(Self::open(&self.path)?);
        }
        if let Some(file) = handle.as_mut() {
            if let Err(e) = file.write_all(line.as_bytes()) {
                // Reopen on the next entry
                *handle = None;
                return Err(e.into());
            }
        }
        Ok(())
    }

    fn append_or_warn<T: Serialize>(&self, entry: &T) {
        if let Err(e) = self.append(entry) {
            warn!(path = %self.path.display(), "Failed to append log entry: {}", e);
        }
    }
}

pub struct JsonlAnalysisLog {
    oracle: JsonlFile,
    evolution: JsonlFile,
}

impl JsonlAnalysisLog {
    pub fn new(oracle_path: impl Into<PathBuf>, evolution_path: impl Into<PathBuf>) -> Self {
        Self {
            oracle: JsonlFile::new(oracle_path.into()),
            evolution: JsonlFile::new(evolution_path.into()),
        }
    }

    /// JSONL sink for the configured paths, or a discarding log when disabled.
    pub fn from_config(config: &LogConfig) -> Arc<dyn AnalysisLog> {
        if config.enabled {
            Arc::new(Self::new(&config.oracle_log, &config.evolution_log))
        } else {
            Arc::new(NullLog)
        }
    }
}

impl AnalysisLog for JsonlAnalysisLog {
    fn record_exchange(&self, exchange: &OracleExchange) {
        self.oracle.append_or_warn(exchange);
    }

    fn record_evolution(&self, record: &EvolutionRecord) {
        self.evolution.append_or_warn(&RunEntry::Evolution(record));
    }

    fn record_fixpoint(&self, record: &FixpointRecord) {
        self.evolution.append_or_warn(&RunEntry::Fixpoint(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candidate::Candidate;
    use crate::domain::record::{ExchangeOutcome, PassSummary};
    use chrono::Utc;
    use uuid::Uuid;

    fn exchange(claim: &str) -> OracleExchange {
        OracleExchange {
            timestamp: Utc::now(),
            claim: claim.to_string(),
            model: None,
            outcome: ExchangeOutcome::Judgment,
            response: "line one\nline two".to_string(),
            elapsed_ms: 12,
        }
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_appends_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let oracle_path = dir.path().join("logs").join("occam.jsonl");
        let log = JsonlAnalysisLog::new(&oracle_path, dir.path().join("evolution.jsonl"));

        log.record_exchange(&exchange("first"));
        log.record_exchange(&exchange("second"));

        let lines = read_lines(&oracle_path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["claim"], "first");
        assert_eq!(lines[1]["response"], "line one\nline two");
        assert_eq!(lines[1]["outcome"], "judgment");
    }

    #[test]
    fn test_existing_content_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let evolution_path = dir.path().join("evolution.jsonl");
        std::fs::write(&evolution_path, "{\"kind\":\"legacy\"}\n").unwrap();
        let log = JsonlAnalysisLog::new(dir.path().join("occam.jsonl"), &evolution_path);

        let candidate = Candidate::new().with("a", "short");
        log.record_evolution(&EvolutionRecord {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            input: candidate.clone(),
            output: candidate,
            generations: 1,
            history: vec![],
            final_score: 1.0,
            cancelled: false,
        });
        log.record_fixpoint(&FixpointRecord {
            timestamp: Utc::now(),
            input: vec!["x".to_string()],
            output: vec!["x".to_string()],
            passes: vec![PassSummary { depth: 0, changed: 0 }],
            converged: true,
        });

        let lines = read_lines(&evolution_path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["kind"], "legacy");
        assert_eq!(lines[1]["kind"], "evolution");
        assert_eq!(lines[1]["output"]["a"], "short");
        assert_eq!(lines[2]["kind"], "fixpoint");
        assert_eq!(lines[2]["converged"], true);
    }

    #[test]
    fn test_concurrent_writers_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let oracle_path = dir.path().join("occam.jsonl");
        let log = Arc::new(JsonlAnalysisLog::new(&oracle_path, dir.path().join("evolution.jsonl")));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        log.record_exchange(&exchange(&format!("claim {}-{} {}", t, i, "z".repeat(200))));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(read_lines(&oracle_path).len(), 200);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let log = JsonlAnalysisLog::new(dir.path(), dir.path());
        log.record_exchange(&exchange("ignored"));
        assert!(log.oracle.append(&exchange("ignored")).is_err());
        assert!(log.oracle.handle.lock().is_none());
    }

    #[test]
    fn test_handle_is_opened_once_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let oracle_path = dir.path().join("occam.jsonl");
        let log = JsonlAnalysisLog::new(&oracle_path, dir.path().join("evolution.jsonl"));

        assert!(log.oracle.handle.lock().is_none());
        log.record_exchange(&exchange("first"));
        assert!(log.oracle.handle.lock().is_some());
        // The evolution file stays closed until a run is recorded
        assert!(log.evolution.handle.lock().is_none());

        log.record_exchange(&exchange("second"));
        let lines = read_lines(&oracle_path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["claim"], "second");
    }

    #[test]
    fn test_failed_open_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, "not a directory").unwrap();
        let oracle_path = blocker.join("occam.jsonl");
        let log = JsonlAnalysisLog::new(&oracle_path, dir.path().join("evolution.jsonl"));

        log.record_exchange(&exchange("lost"));
        assert!(log.oracle.handle.lock().is_none());

        std::fs::remove_file(&blocker).unwrap();
        log.record_exchange(&exchange("kept"));

        let lines = read_lines(&oracle_path);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["claim"], "kept");
    }

    #[test]
    fn test_disabled_config_discards() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            enabled: false,
            oracle_log: dir.path().join("occam.jsonl"),
            evolution_log: dir.path().join("evolution.jsonl"),
        };
        let log = JsonlAnalysisLog::from_config(&config);
        log.record_exchange(&exchange("dropped"));
        assert!(!config.oracle_log.exists());
    }
}
