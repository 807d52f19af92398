// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Engine Configuration Types
//
// Kubernetes-style manifest (apiVersion/kind/metadata/spec) holding every knob
// the refinement engine reads:
// - Oracle backend, model and per-call timeout
// - Evolution loop budgets and mutation rates
// - Fixpoint depth cap
// - Append-only log locations
// - Enabled axioms
//
// Engines receive these values through their constructors; nothing here is
// global state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::axiom::{AxiomId, AxiomSet};

pub const API_VERSION: &str = "ockham/v1";
pub const KIND: &str = "RazorConfig";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorConfigManifest {
    /// API version (must be "ockham/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "RazorConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: RazorConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RazorConfigSpec {
    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub evolution: EvolutionConfig,

    #[serde(default)]
    pub fixpoint: FixpointConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub axioms: AxiomConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub backend: OracleBackendConfig,

    /// Upper bound for a single oracle call
    #[serde(default = "default_oracle_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Raw replies are cut to this many characters when used as a verdict
    #[serde(default = "default_max_raw_chars")]
    pub max_raw_chars: usize,

    /// Text fields longer than this are sent to the oracle by the razor
    #[serde(default = "default_long_claim_threshold")]
    pub long_claim_threshold: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Ollama HTTP API
    Ollama,
    /// Local program taking the prompt as its last argument
    Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleBackendConfig {
    #[serde(rename = "type")]
    pub kind: BackendKind,

    /// HTTP endpoint (ollama backend)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    pub model: String,

    /// Program to run (command backend)
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the prompt; `{model}` is substituted
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    #[serde(default = "default_generations")]
    pub generations: u32,

    /// Mutated copies of the seed in the initial population
    #[serde(default = "default_seed_variants")]
    pub seed_variants: usize,

    #[serde(default = "default_seed_mutation_rate")]
    pub seed_mutation_rate: f64,

    /// Offspring mutation rate applied to survivors each generation
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,

    /// Fixed RNG seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,

    /// Pause between runs of the continuous loop
    #[serde(default = "default_loop_interval", with = "humantime_serde")]
    pub loop_interval: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixpointConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Simplified items are cut to this many characters
    #[serde(default = "default_max_item_chars")]
    pub max_item_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_oracle_log")]
    pub oracle_log: PathBuf,

    #[serde(default = "default_evolution_log")]
    pub evolution_log: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxiomConfig {
    /// Ids of the standard axioms to enforce
    #[serde(default = "default_axiom_ids")]
    pub enabled: Vec<AxiomId>,
}

fn default_true() -> bool {
    true
}

fn default_oracle_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_max_raw_chars() -> usize {
    500
}

fn default_long_claim_threshold() -> usize {
    crate::domain::razor::DEFAULT_LONG_CLAIM_THRESHOLD
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_program() -> String {
    "ollama".to_string()
}

fn default_args() -> Vec<String> {
    vec!["run".to_string(), "{model}".to_string()]
}

fn default_generations() -> u32 {
    10
}

fn default_seed_variants() -> usize {
    5
}

fn default_seed_mutation_rate() -> f64 {
    0.3
}

fn default_mutation_rate() -> f64 {
    0.1
}

fn default_loop_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_item_chars() -> usize {
    50
}

fn log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".ockham").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

fn default_oracle_log() -> PathBuf {
    log_dir().join("occam.jsonl")
}

fn default_evolution_log() -> PathBuf {
    log_dir().join("evolution.jsonl")
}

/// Bare integers are seconds; anything else goes through humantime.
fn parse_timeout(value: &str) -> Option<Duration> {
    if let Ok(secs) = value.trim().parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    humantime_serde::re::humantime::parse_duration(value.trim()).ok()
}

fn default_axiom_ids() -> Vec<AxiomId> {
    AxiomSet::standard().ids()
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: OracleBackendConfig::default(),
            timeout: default_oracle_timeout(),
            temperature: None,
            max_tokens: None,
            max_raw_chars: default_max_raw_chars(),
            long_claim_threshold: default_long_claim_threshold(),
        }
    }
}

impl Default for OracleBackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Ollama,
            endpoint: default_endpoint(),
            model: default_model(),
            program: default_program(),
            args: default_args(),
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            generations: default_generations(),
            seed_variants: default_seed_variants(),
            seed_mutation_rate: default_seed_mutation_rate(),
            mutation_rate: default_mutation_rate(),
            rng_seed: None,
            loop_interval: default_loop_interval(),
        }
    }
}

impl Default for FixpointConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_item_chars: default_max_item_chars(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            oracle_log: default_oracle_log(),
            evolution_log: default_evolution_log(),
        }
    }
}

impl Default for AxiomConfig {
    fn default() -> Self {
        Self {
            enabled: default_axiom_ids(),
        }
    }
}

impl Default for RazorConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "ockham-node".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: RazorConfigSpec::default(),
        }
    }
}

impl RazorConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. OCKHAM_CONFIG_PATH environment variable
    /// 2. ./ockham-config.yaml (working directory)
    /// 3. ~/.ockham/config.yaml (user home)
    /// 4. /etc/ockham/config.yaml (Unix only)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("OCKHAM_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./ockham-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".ockham").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from("/etc/ockham/config.yaml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary key lookup (the environment in
    /// production).
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup("OCKHAM_ORACLE_MODEL") {
            tracing::info!("Environment override: OCKHAM_ORACLE_MODEL={}", model);
            self.spec.oracle.backend.model = model;
        }

        if let Some(endpoint) = lookup("OCKHAM_ORACLE_ENDPOINT") {
            tracing::info!("Environment override: OCKHAM_ORACLE_ENDPOINT={}", endpoint);
            self.spec.oracle.backend.endpoint = endpoint;
        }

        if let Some(val) = lookup("OCKHAM_ORACLE_TIMEOUT") {
            match parse_timeout(&val) {
                Some(timeout) => {
                    tracing::info!("Environment override: OCKHAM_ORACLE_TIMEOUT={}", val);
                    self.spec.oracle.timeout = timeout;
                }
                None => tracing::warn!(
                    "Invalid value for OCKHAM_ORACLE_TIMEOUT: '{}'. Expected seconds or a duration like '90s'. Ignoring.",
                    val
                ),
            }
        }

        if let Some(val) = lookup("OCKHAM_RNG_SEED") {
            match val.parse::<u64>() {
                Ok(seed) => {
                    tracing::info!("Environment override: OCKHAM_RNG_SEED={}", seed);
                    self.spec.evolution.rng_seed = Some(seed);
                }
                Err(_) => tracing::warn!(
                    "Invalid value for OCKHAM_RNG_SEED: '{}'. Expected an integer. Ignoring.",
                    val
                ),
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let evolution = &self.spec.evolution;
        if evolution.generations == 0 {
            anyhow::bail!("spec.evolution.generations must be at least 1");
        }
        if evolution.seed_variants == 0 {
            anyhow::bail!("spec.evolution.seed_variants must be at least 1");
        }
        for (name, rate) in [
            ("seed_mutation_rate", evolution.seed_mutation_rate),
            ("mutation_rate", evolution.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                anyhow::bail!("spec.evolution.{} must be within [0, 1], got {}", name, rate);
            }
        }

        if self.spec.oracle.timeout.is_zero() {
            anyhow::bail!("spec.oracle.timeout must be greater than zero");
        }

        if self.spec.oracle.backend.model.is_empty() {
            anyhow::bail!("spec.oracle.backend.model cannot be empty");
        }

        if self.spec.fixpoint.max_item_chars == 0 {
            anyhow::bail!("spec.fixpoint.max_item_chars must be at least 1");
        }

        self.axiom_set()?;

        Ok(())
    }

    /// Axiom set selected by `spec.axioms.enabled`.
    pub fn axiom_set(&self) -> anyhow::Result<AxiomSet> {
        AxiomSet::standard_subset(&self.spec.axioms.enabled)
            .map_err(|unknown| anyhow::anyhow!("Unknown axiom ids: {:?}", unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_is_valid() {
        let config = RazorConfigManifest::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spec.evolution.generations, 10);
        assert_eq!(config.spec.evolution.seed_variants, 5);
        assert_eq!(config.spec.fixpoint.max_depth, 3);
        assert_eq!(config.spec.axioms.enabled, vec![1, 2, 5, 6]);
    }

    #[test]
    fn test_minimal_yaml_fills_defaults() {
        let yaml = r#"
apiVersion: ockham/v1
kind: RazorConfig
metadata:
  name: test-node
spec:
  oracle:
    backend:
      type: command
      model: phi3
    timeout: 90s
  evolution:
    generations: 4
    rng_seed: 7
"#;
        let config = RazorConfigManifest::from_yaml_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.spec.oracle.backend.kind, BackendKind::Command);
        assert_eq!(config.spec.oracle.backend.program, "ollama");
        assert_eq!(config.spec.oracle.timeout, Duration::from_secs(90));
        assert_eq!(config.spec.evolution.generations, 4);
        assert_eq!(config.spec.evolution.mutation_rate, 0.1);
        assert_eq!(config.spec.evolution.rng_seed, Some(7));
    }

    #[test]
    fn test_yaml_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ockham-config.yaml");

        let mut config = RazorConfigManifest::default();
        config.spec.evolution.loop_interval = Duration::from_secs(30);
        config.to_yaml_file(&path).unwrap();

        let loaded = RazorConfigManifest::load_or_default(Some(path)).unwrap();
        assert_eq!(loaded.spec.evolution.loop_interval, Duration::from_secs(30));
        assert_eq!(loaded.metadata.name, config.metadata.name);
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let result = RazorConfigManifest::load_or_default(Some(PathBuf::from(
            "/nonexistent/ockham-config.yaml",
        )));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = RazorConfigManifest::default();
        config.kind = "NodeConfig".to_string();
        assert!(config.validate().is_err());

        let mut config = RazorConfigManifest::default();
        config.spec.evolution.generations = 0;
        assert!(config.validate().is_err());

        let mut config = RazorConfigManifest::default();
        config.spec.evolution.mutation_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = RazorConfigManifest::default();
        config.spec.evolution.seed_variants = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("seed_variants"));

        let mut config = RazorConfigManifest::default();
        config.spec.axioms.enabled = vec![1, 4];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[4]"));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let mut config = RazorConfigManifest::default();
        config.apply_overrides_from(|key| match key {
            "OCKHAM_ORACLE_MODEL" => Some("mistral".to_string()),
            "OCKHAM_ORACLE_TIMEOUT" => Some("5".to_string()),
            "OCKHAM_RNG_SEED" => Some("not-a-number".to_string()),
            _ => None,
        });
        assert_eq!(config.spec.oracle.backend.model, "mistral");
        assert_eq!(config.spec.oracle.timeout, Duration::from_secs(5));
        assert_eq!(config.spec.evolution.rng_seed, None);
    }

    #[test]
    fn test_parse_timeout_accepts_humantime() {
        assert_eq!(parse_timeout("90s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_timeout("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_timeout("soon"), None);
    }
}
