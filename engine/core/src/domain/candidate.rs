// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Candidate Model
//!
//! A candidate is a named-field record under refinement. Every field holds a
//! [`FieldValue`], a tagged union over the three shapes the engine knows about:
//!
//! | Variant | JSON form | Hypotheses |
//! |---------|-----------|------------|
//! | `Scalar` | string / number / boolean | 1 |
//! | `Sequence` | array of scalars | `max(1, len)` |
//! | `Superposition` | `{"primary": …, "alternative": …}` | 2 |
//!
//! Razor, axioms and mutation all pattern-match on this tag instead of
//! inspecting runtime shapes.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Value objects for candidates and run seeds

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::refinement::EngineError;

/// A single scalar value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
            Scalar::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Two alternative values held at once, pending a later collapse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Superposition {
    pub primary: FieldValue,
    pub alternative: FieldValue,
}

/// Value stored in one candidate field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(Scalar),
    Sequence(Vec<Scalar>),
    Superposition(Box<Superposition>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Scalar(Scalar::Text(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        FieldValue::Scalar(Scalar::Bool(value))
    }

    pub fn number(value: i64) -> Self {
        FieldValue::Scalar(Scalar::Number(value.into()))
    }

    pub fn sequence<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Sequence(items.into_iter().map(|s| Scalar::Text(s.into())).collect())
    }

    pub fn pair(primary: FieldValue, alternative: FieldValue) -> Self {
        FieldValue::Superposition(Box::new(Superposition { primary, alternative }))
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, FieldValue::Superposition(_))
    }

    /// Returns the text when the value is a plain string scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Number of independent hypotheses this value stands for.
    ///
    /// Sequences count one per element (an empty sequence still counts as one),
    /// a superposition counts both of its alternatives.
    pub fn hypothesis_count(&self) -> usize {
        match self {
            FieldValue::Scalar(_) => 1,
            FieldValue::Sequence(items) => items.len().max(1),
            FieldValue::Superposition(_) => 2,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Scalar(s) => s.is_truthy(),
            FieldValue::Sequence(items) => !items.is_empty(),
            FieldValue::Superposition(_) => true,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(s) => write!(f, "{}", s),
            FieldValue::Sequence(items) => {
                let joined: Vec<String> = items.iter().map(|s| s.to_string()).collect();
                write!(f, "[{}]", joined.join(", "))
            }
            FieldValue::Superposition(pair) => {
                write!(f, "({} | {})", pair.primary, pair.alternative)
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::text(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::boolean(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::number(value)
    }
}

/// A named-field record under refinement.
///
/// Fields are kept in a sorted map: field order carries no meaning, and a fixed
/// iteration order keeps seeded mutation runs reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate {
    fields: BTreeMap<String, FieldValue>,
}

impl Candidate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Truthiness of a flag field; absent fields are false.
    pub fn flag(&self, name: &str) -> bool {
        self.fields.get(name).map(FieldValue::is_truthy).unwrap_or(false)
    }

    /// Parses a candidate from a JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Self, EngineError> {
        if !value.is_object() {
            return Err(EngineError::MalformedSeed(
                "candidate must be a JSON object".to_string(),
            ));
        }
        let candidate: Candidate = serde_json::from_value(value)
            .map_err(|e| EngineError::MalformedSeed(format!("invalid field value: {}", e)))?;
        if candidate.is_empty() {
            return Err(EngineError::MalformedSeed("candidate has no fields".to_string()));
        }
        Ok(candidate)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl FromIterator<(String, FieldValue)> for Candidate {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Candidate {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Input to a refinement run: a mapping goes through the evolution loop, a flat
/// sequence through the fixpoint reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Mapping(Candidate),
    Sequence(Vec<String>),
}

impl Seed {
    pub fn from_json(value: serde_json::Value) -> Result<Self, EngineError> {
        match value {
            serde_json::Value::Object(_) => Candidate::from_json(value).map(Seed::Mapping),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => Ok(s),
                    other => Err(EngineError::MalformedSeed(format!(
                        "sequence items must be strings, got {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Seed::Sequence),
            other => Err(EngineError::MalformedSeed(format!(
                "seed must be an object or an array, got {}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
