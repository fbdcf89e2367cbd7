//! Append-only, tag-addressable store of evaluation results.
//!
//! Every value produced during a run is written once under a name and a
//! tag set. Lookups return every entry whose tags are a superset of the
//! requested tags; [`ResultStore::get_one`] is the strict variant for
//! consumers that need a single value.

pub mod payload;
pub mod tags;

use std::collections::HashSet;

pub use payload::{FailureKind, FailureMarker, Payload};
pub use tags::Tags;

use crate::data::ConsumptionHistory;
use crate::error::EvaluationError;
use crate::model::{FittedModel, UsageEstimate};

/// One write to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub name: String,
    pub tags: Tags,
    pub value: Payload,
    /// Name of the meter that wrote the entry.
    pub provenance: String,
}

/// Results of one evaluation run.
///
/// # Examples
///
/// ```
/// use eemeter::store::{Payload, ResultStore, Tags};
///
/// let mut store = ResultStore::new();
/// store
///     .set("savings", Tags::from(["electricity"]), Payload::Scalar(0.5), "savings")
///     .ok();
/// assert_eq!(store.get("savings", &Tags::new()).len(), 1);
/// assert!(store
///     .set("savings", Tags::from(["electricity"]), Payload::Scalar(0.4), "savings")
///     .is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    entries: Vec<ResultEntry>,
    keys: HashSet<(String, Tags)>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `name` and `tags`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateResult` if the exact name and tag set already exist.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        tags: Tags,
        value: Payload,
        provenance: impl Into<String>,
    ) -> Result<(), EvaluationError> {
        self.push(ResultEntry {
            name: name.into(),
            tags,
            value,
            provenance: provenance.into(),
        })
    }

    fn push(&mut self, entry: ResultEntry) -> Result<(), EvaluationError> {
        let key = (entry.name.clone(), entry.tags.clone());
        if self.keys.contains(&key) {
            return Err(EvaluationError::DuplicateResult {
                name: key.0,
                tags: key.1,
            });
        }
        self.keys.insert(key);
        self.entries.push(entry);
        Ok(())
    }

    /// Every entry named `name` whose tags include all of `tags`, in write order.
    pub fn get(&self, name: &str, tags: &Tags) -> Vec<&ResultEntry> {
        self.entries
            .iter()
            .filter(|e| e.name == name && e.tags.is_superset_of(tags))
            .collect()
    }

    /// The single entry matching `name` and `tags`.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousOrMissingResult` unless exactly one entry matches.
    pub fn get_one(&self, name: &str, tags: &Tags) -> Result<&ResultEntry, EvaluationError> {
        match self.get(name, tags).as_slice() {
            [one] => Ok(*one),
            matches => Err(EvaluationError::AmbiguousOrMissingResult {
                name: name.to_string(),
                tags: tags.clone(),
                matches: matches.len(),
            }),
        }
    }

    /// `true` when at least one entry matches.
    pub fn contains(&self, name: &str, tags: &Tags) -> bool {
        self.entries
            .iter()
            .any(|e| e.name == name && e.tags.is_superset_of(tags))
    }

    pub fn scalar(&self, name: &str, tags: &Tags) -> Result<f64, EvaluationError> {
        let entry = self.get_one(name, tags)?;
        entry.value.as_scalar().ok_or_else(|| mismatch(name, "scalar"))
    }

    pub fn flag(&self, name: &str, tags: &Tags) -> Result<bool, EvaluationError> {
        let entry = self.get_one(name, tags)?;
        entry.value.as_flag().ok_or_else(|| mismatch(name, "flag"))
    }

    pub fn consumption(
        &self,
        name: &str,
        tags: &Tags,
    ) -> Result<&ConsumptionHistory, EvaluationError> {
        let entry = self.get_one(name, tags)?;
        entry
            .value
            .as_consumption()
            .ok_or_else(|| mismatch(name, "consumption"))
    }

    pub fn model(&self, name: &str, tags: &Tags) -> Result<&FittedModel, EvaluationError> {
        let entry = self.get_one(name, tags)?;
        entry.value.as_model().ok_or_else(|| mismatch(name, "model"))
    }

    pub fn usage(&self, name: &str, tags: &Tags) -> Result<&UsageEstimate, EvaluationError> {
        let entry = self.get_one(name, tags)?;
        entry.value.as_usage().ok_or_else(|| mismatch(name, "usage"))
    }

    /// Number of entries written so far; usable as a mark for [`Self::entries_since`].
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in write order.
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    /// Entries written after `mark`.
    pub fn entries_since(&self, mark: usize) -> &[ResultEntry] {
        self.entries.get(mark..).unwrap_or(&[])
    }

    /// Distinct result names in first-write order.
    pub fn names(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for e in &self.entries {
            if !seen.contains(&e.name.as_str()) {
                seen.push(e.name.as_str());
            }
        }
        seen
    }

    /// Appends entries produced elsewhere, keeping write-once semantics.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateResult` on the first entry that collides; entries
    /// before it remain appended.
    pub fn absorb(
        &mut self,
        entries: impl IntoIterator<Item = ResultEntry>,
    ) -> Result<(), EvaluationError> {
        for entry in entries {
            self.push(entry)?;
        }
        Ok(())
    }
}

fn mismatch(name: &str, expected: &'static str) -> EvaluationError {
    EvaluationError::PayloadMismatch {
        name: name.to_string(),
        expected,
    }
}
